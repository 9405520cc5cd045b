//! Error handling for trailmark-store
//!
//! Wraps trailmark-core TmError with store-specific helpers

use trailmark_core::errors::{TmError, TmErrorKind};

/// Result type alias using TmError
pub type Result<T> = std::result::Result<T, TmError>;

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> TmError {
    TmError::new(TmErrorKind::Persistence)
        .with_op("migration")
        .with_message(format!("Migration {} failed: {}", migration_id, reason))
}

/// Create a checksum mismatch error
pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> TmError {
    TmError::new(TmErrorKind::Schema)
        .with_op("migration_checksum")
        .with_message(format!(
            "Checksum mismatch for migration {}: expected {}, got {}",
            migration_id, expected, actual
        ))
}

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> TmError {
    TmError::new(TmErrorKind::Persistence)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Same as `from_rusqlite`, tagged with the operation and table
pub fn persistence(op: &str, table: &str, err: rusqlite::Error) -> TmError {
    TmError::new(TmErrorKind::Persistence)
        .with_op(op.to_string())
        .with_table(table)
        .with_message(err.to_string())
}

/// No row with the given id
pub fn record_not_found(op: &str, table: &str, id: i64) -> TmError {
    TmError::new(TmErrorKind::NotFound)
        .with_op(op.to_string())
        .with_table(table)
        .with_record_id(id)
        .with_message("history record not found")
}
