//! Persisted history rows.

use chrono::{DateTime, Utc};
use serde::Serialize;
use trailmark_core_types::Event;

/// The tracked entity a history row belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Subject {
    pub subject_type: String,
    pub subject_id: String,
}

impl Subject {
    pub fn new(subject_type: impl Into<String>, subject_id: impl Into<String>) -> Self {
        Self {
            subject_type: subject_type.into(),
            subject_id: subject_id.into(),
        }
    }
}

/// One immutable snapshot/diff event for a tracked subject.
///
/// `snapshot` and `changes` hold the payload exactly as stored. Decoding
/// depends on the column encoding and the serialization strategy, so it is
/// done by the engine rather than here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryRecord {
    pub id: i64,
    pub subject_type: String,
    pub subject_id: String,
    pub event: Event,
    pub snapshot: Option<String>,
    pub changes: Option<String>,
    pub actor: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl HistoryRecord {
    pub fn subject(&self) -> Subject {
        Subject::new(self.subject_type.clone(), self.subject_id.clone())
    }
}

/// A history row about to be written. Payloads are already encoded.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
    pub subject: Subject,
    pub event: Event,
    pub snapshot: Option<String>,
    pub changes: Option<String>,
    pub actor: Option<String>,
    pub created_at: DateTime<Utc>,
}
