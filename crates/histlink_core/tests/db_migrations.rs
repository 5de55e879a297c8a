use histlink_core::db::{current_user_version, latest_version, open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

const LINK_TABLES: [&str; 3] = ["entity_links", "unmatched_fragments", "source_dates"];

#[test]
fn in_memory_store_has_every_link_table() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(current_user_version(&conn).unwrap(), latest_version());
    for table in LINK_TABLES {
        assert_table_exists(&conn, table);
    }
}

#[test]
fn reopening_a_store_file_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("histlink.db");

    let first = open_db(&path).unwrap();
    assert_eq!(current_user_version(&first).unwrap(), latest_version());
    drop(first);

    let second = open_db(&path).unwrap();
    assert_eq!(current_user_version(&second).unwrap(), latest_version());
    assert_table_exists(&second, "entity_links");
}

#[test]
fn partially_migrated_store_is_upgraded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("v1.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE entity_links (
            source_kind TEXT NOT NULL,
            source_id TEXT NOT NULL,
            target_kind TEXT NOT NULL,
            target_slug TEXT NOT NULL,
            confidence TEXT NOT NULL,
            matched_text TEXT NOT NULL,
            note TEXT,
            position INTEGER NOT NULL,
            PRIMARY KEY (source_kind, source_id, target_kind, target_slug)
        );
        CREATE TABLE unmatched_fragments (
            kind TEXT NOT NULL,
            text TEXT NOT NULL,
            position INTEGER NOT NULL,
            PRIMARY KEY (kind, text)
        );
        PRAGMA user_version = 1;",
    )
    .unwrap();
    drop(conn);

    let upgraded = open_db(&path).unwrap();
    assert_eq!(current_user_version(&upgraded).unwrap(), latest_version());
    assert_table_exists(&upgraded, "source_dates");
}

#[test]
fn newer_schema_version_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
