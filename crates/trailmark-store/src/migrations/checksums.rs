//! Migration fingerprints recorded in `schema_version`.

use sha2::{Digest, Sha256};

/// Hex SHA-256 of a migration's SQL.
///
/// Line endings are normalized first, so a checkout with CRLF endings still
/// matches a database migrated from LF sources.
pub fn compute_checksum(sql: &str) -> String {
    let mut hasher = Sha256::new();
    for line in sql.lines() {
        hasher.update(line.trim_end_matches('\r').as_bytes());
        hasher.update(b"\n");
    }
    hex::encode(hasher.finalize())
}
