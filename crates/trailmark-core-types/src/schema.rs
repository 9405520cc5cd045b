//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// History identifiers
pub const FIELD_TABLE: &str = "table";
pub const FIELD_COLUMN: &str = "column";
pub const FIELD_SUBJECT_TYPE: &str = "subject_type";
pub const FIELD_SUBJECT_ID: &str = "subject_id";
pub const FIELD_ENCODING: &str = "encoding";
pub const FIELD_STRATEGY: &str = "strategy";

// Result sizes
pub const FIELD_ROWS: &str = "rows";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
