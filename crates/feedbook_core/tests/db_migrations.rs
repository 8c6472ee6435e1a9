use feedbook_core::db::migrations::latest_version;
use feedbook_core::db::{open_db, open_db_in_memory, DbError};
use feedbook_core::{RepoError, SqliteNoteRepository};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "kv_store");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("feedbook.db");

    let first = open_db(&path).unwrap();
    assert_eq!(schema_version(&first), latest_version());
    drop(first);

    let second = open_db(&path).unwrap();
    assert_eq!(schema_version(&second), latest_version());
    assert_table_exists(&second, "kv_store");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
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

#[test]
fn kv_store_schema_has_text_key_and_millisecond_default_timestamp() {
    let conn = open_db_in_memory().unwrap();

    let mut stmt = conn
        .prepare("SELECT name, type, \"notnull\", pk FROM pragma_table_info('kv_store') ORDER BY cid;")
        .unwrap();
    let columns: Vec<(String, String, i64, i64)> = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(
        columns,
        vec![
            ("key".to_string(), "TEXT".to_string(), 1, 1),
            ("value".to_string(), "TEXT".to_string(), 1, 0),
            ("updated_at".to_string(), "INTEGER".to_string(), 1, 0),
        ]
    );

    conn.execute(
        "INSERT INTO kv_store (key, value) VALUES ('settings', '[]');",
        [],
    )
    .unwrap();
    let updated_at: i64 = conn
        .query_row(
            "SELECT updated_at FROM kv_store WHERE key = 'settings';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    // Epoch milliseconds, not seconds.
    assert!(updated_at > 1_000_000_000_000, "got {updated_at}");
    assert_eq!(updated_at % 1000, 0);
}

#[test]
fn kv_store_keys_are_unique() {
    let conn = open_db_in_memory().unwrap();
    conn.execute("INSERT INTO kv_store (key, value) VALUES ('notes', '[]');", [])
        .unwrap();

    let duplicate = conn.execute("INSERT INTO kv_store (key, value) VALUES ('notes', '[]');", []);
    assert!(duplicate.is_err());
}

#[test]
fn note_repository_refuses_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteNoteRepository::try_new(&conn) {
        Err(RepoError::InvalidData(message)) => assert!(message.contains("kv_store")),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected unmigrated connection to be rejected"),
    }
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "expected table `{table_name}` to exist");
}
