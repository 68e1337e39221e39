use partlab_core::db::migrations::latest_version;
use partlab_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

fn user_version(conn: &Connection) -> u32 {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .unwrap()
}

fn table_names(conn: &Connection) -> Vec<String> {
    let mut stmt = conn
        .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name;")
        .unwrap();
    let names = stmt
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<Vec<String>, _>>()
        .unwrap();
    names
}

#[test]
fn fresh_database_gets_part_and_test_tables() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(user_version(&conn), latest_version());
    assert_eq!(table_names(&conn), vec!["part", "test"]);
}

#[test]
fn test_rows_reference_parts_with_cascading_delete() {
    let conn = open_db_in_memory().unwrap();

    let fk_enabled: i64 = conn
        .pragma_query_value(None, "foreign_keys", |row| row.get(0))
        .unwrap();
    assert_eq!(fk_enabled, 1);

    let (parent, from, on_delete): (String, String, String) = conn
        .query_row(
            "SELECT \"table\", \"from\", on_delete FROM pragma_foreign_key_list('test');",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .unwrap();
    assert_eq!(
        (parent.as_str(), from.as_str(), on_delete.as_str()),
        ("part", "part_id", "CASCADE")
    );

    let indexed: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM pragma_index_list('test') WHERE name = 'idx_test_part_id';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(indexed, 1);
}

#[test]
fn reopening_a_current_file_keeps_its_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("partlab.db");

    let conn = open_db(&path).unwrap();
    conn.execute(
        "INSERT INTO part (id, name, modified_timestamp) VALUES ('p1', 'kept', '2024-01-01T00:00:00Z');",
        [],
    )
    .unwrap();
    drop(conn);

    let reopened = open_db(&path).unwrap();
    assert_eq!(user_version(&reopened), latest_version());
    let count: i64 = reopened
        .query_row("SELECT COUNT(*) FROM part;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn file_from_a_newer_build_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("newer.db");
    Connection::open(&path)
        .unwrap()
        .pragma_update(None, "user_version", 42)
        .unwrap();

    let err = open_db(&path).unwrap_err();

    assert!(
        matches!(
            err,
            DbError::UnsupportedSchemaVersion { db_version: 42, latest_supported }
                if latest_supported == latest_version()
        ),
        "unexpected error: {err}"
    );
}
