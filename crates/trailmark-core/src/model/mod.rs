pub mod attributes;
pub mod record;
pub mod table;

pub use attributes::{AttributeMap, ChangePair, Changeset};
pub use record::{HistoryRecord, NewRecord, Subject};
pub use table::{HistoryTable, TrackingOptions};
