// Integration tests for the migration framework

use rusqlite::Connection;

fn setup_test_db() -> Connection {
    Connection::open_in_memory().expect("Failed to create in-memory database")
}

fn get_table_names(conn: &Connection) -> Vec<String> {
    let mut stmt = conn
        .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
        .unwrap();
    stmt.query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<Vec<String>, _>>()
        .unwrap()
}

#[test]
fn test_apply_migrations_on_empty_db() {
    let mut conn = setup_test_db();

    let result = trailmark_store::migrations::apply_migrations(&mut conn);
    assert!(
        result.is_ok(),
        "Migrations should succeed: {:?}",
        result.err()
    );

    let tables = get_table_names(&conn);
    for expected_table in ["schema_version", "versions", "sqlite_sequence"] {
        assert!(
            tables.contains(&expected_table.to_string()),
            "Missing table: {}",
            expected_table
        );
    }
}

#[test]
fn test_default_table_has_text_payload_columns() {
    let mut conn = setup_test_db();
    trailmark_store::migrations::apply_migrations(&mut conn).unwrap();

    let schema = trailmark_store::SqliteSchema::new(&conn);
    let resolver = trailmark_core::ColumnEncodingResolver::new();
    for column in ["snapshot", "changes"] {
        assert_eq!(
            resolver.resolve(&schema, "versions", column).unwrap(),
            trailmark_core::ColumnEncoding::Text
        );
    }
}

#[test]
fn test_subject_index_exists() {
    let mut conn = setup_test_db();
    trailmark_store::migrations::apply_migrations(&mut conn).unwrap();

    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND name = 'idx_versions_subject'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn test_migrations_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trail.db");

    {
        let mut conn = trailmark_store::db::open(&path).unwrap();
        trailmark_store::migrations::apply_migrations(&mut conn).unwrap();
    }

    let mut conn = trailmark_store::db::open(&path).unwrap();
    trailmark_store::migrations::apply_migrations(&mut conn).unwrap();
    assert_eq!(
        trailmark_store::migrations::applied_migrations(&conn)
            .unwrap()
            .len(),
        2
    );
}
