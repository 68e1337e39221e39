use chrono::Utc;
use partlab_core::db::open_db_in_memory;
use partlab_core::{Database, DbError, PartRecord};
use uuid::Uuid;

fn part_record(name: &str) -> PartRecord {
    PartRecord {
        id: Uuid::new_v4(),
        name: name.to_string(),
        modified_timestamp: Utc::now(),
    }
}

#[test]
fn update_of_absent_row_is_row_missing() {
    let mut conn = open_db_in_memory().unwrap();
    let record = part_record("never_inserted");
    let db = Database::new(&mut conn);

    let err = db.update(&record).unwrap_err();

    assert!(matches!(
        err,
        DbError::RowMissing { table: "part", id } if id == record.id
    ));
    assert!(db.in_transaction());
}

#[test]
fn update_rewrites_an_inserted_row() {
    let mut conn = open_db_in_memory().unwrap();
    let mut record = part_record("before");
    {
        let db = Database::new(&mut conn);
        db.add(&record).unwrap();
        record.name = "after".to_string();
        db.update(&record).unwrap();
        db.commit().unwrap();
        assert!(!db.in_transaction());
    }

    let name: String = conn
        .query_row(
            "SELECT name FROM part WHERE id = ?1;",
            [record.id.to_string()],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(name, "after");
}

#[test]
fn remove_of_absent_row_is_a_no_op() {
    let mut conn = open_db_in_memory().unwrap();
    let db = Database::new(&mut conn);

    db.remove(&part_record("ghost")).unwrap();
    db.commit().unwrap();
}

#[test]
fn commit_and_rollback_while_idle_do_nothing() {
    let mut conn = open_db_in_memory().unwrap();
    let db = Database::new(&mut conn);

    db.rollback().unwrap();
    db.commit().unwrap();
    assert!(!db.in_transaction());
}

#[test]
fn dropping_the_wrapper_discards_uncommitted_inserts() {
    let mut conn = open_db_in_memory().unwrap();
    {
        let db = Database::new(&mut conn);
        db.add(&part_record("pending")).unwrap();
        assert!(db.in_transaction());
    }

    assert!(conn.is_autocommit());
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM part;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0);
}
