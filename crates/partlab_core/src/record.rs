//! Persistence records: rows of the `part` and `test` tables.
//!
//! # Responsibility
//! - Mirror table columns one-to-one.
//! - Own the SQL that reads and writes a single row.
//!
//! # Invariants
//! - UUIDs and timestamps are stored as TEXT; timestamps in RFC 3339 UTC
//!   with nanosecond precision so a row decodes to the value it was written
//!   from.
//! - Decoding rejects malformed persisted values instead of masking them.

use crate::db::DbResult;
use crate::repo::{RepoError, RepoResult};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, Row};
use serde_json::{Map, Value};
use std::fmt::Debug;
use uuid::Uuid;

/// A row that can be staged on a [`crate::session::Session`] and replayed
/// by a unit of work.
pub trait Record: Debug {
    fn table(&self) -> &'static str;
    fn id(&self) -> Uuid;
    fn insert(&self, conn: &Connection) -> DbResult<()>;
    /// Overwrites every non-key column; returns the number of rows touched.
    fn update(&self, conn: &Connection) -> DbResult<usize>;

    fn delete(&self, conn: &Connection) -> DbResult<usize> {
        let changed = conn.execute(
            &format!("DELETE FROM {} WHERE id = ?1;", self.table()),
            [self.id().to_string()],
        )?;
        Ok(changed)
    }
}

/// Static table metadata needed to query records of one type.
pub trait Table: Record + Sized + 'static {
    const TABLE: &'static str;
    /// `SELECT <columns> FROM <table>` without a trailing clause.
    const SELECT_SQL: &'static str;

    fn from_row(row: &Row<'_>) -> RepoResult<Self>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartRecord {
    pub id: Uuid,
    pub name: String,
    pub modified_timestamp: DateTime<Utc>,
}

impl Record for PartRecord {
    fn table(&self) -> &'static str {
        Self::TABLE
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn insert(&self, conn: &Connection) -> DbResult<()> {
        conn.execute(
            "INSERT INTO part (id, name, modified_timestamp) VALUES (?1, ?2, ?3);",
            params![
                self.id.to_string(),
                self.name.as_str(),
                timestamp_to_db(&self.modified_timestamp),
            ],
        )?;
        Ok(())
    }

    fn update(&self, conn: &Connection) -> DbResult<usize> {
        let changed = conn.execute(
            "UPDATE part SET name = ?1, modified_timestamp = ?2 WHERE id = ?3;",
            params![
                self.name.as_str(),
                timestamp_to_db(&self.modified_timestamp),
                self.id.to_string(),
            ],
        )?;
        Ok(changed)
    }
}

impl Table for PartRecord {
    const TABLE: &'static str = "part";
    const SELECT_SQL: &'static str = "SELECT id, name, modified_timestamp FROM part";

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        Ok(Self {
            id: parse_uuid(row, "id", Self::TABLE)?,
            name: row.get("name")?,
            modified_timestamp: parse_timestamp(row, "modified_timestamp", Self::TABLE)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TestRecord {
    pub id: Uuid,
    pub part_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub successful: bool,
    pub data: Option<Map<String, Value>>,
}

impl Record for TestRecord {
    fn table(&self) -> &'static str {
        Self::TABLE
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn insert(&self, conn: &Connection) -> DbResult<()> {
        conn.execute(
            "INSERT INTO test (id, part_id, timestamp, successful, data)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                self.id.to_string(),
                self.part_id.to_string(),
                timestamp_to_db(&self.timestamp),
                self.successful,
                data_to_db(self.data.as_ref())?,
            ],
        )?;
        Ok(())
    }

    fn update(&self, conn: &Connection) -> DbResult<usize> {
        let changed = conn.execute(
            "UPDATE test
             SET part_id = ?1, timestamp = ?2, successful = ?3, data = ?4
             WHERE id = ?5;",
            params![
                self.part_id.to_string(),
                timestamp_to_db(&self.timestamp),
                self.successful,
                data_to_db(self.data.as_ref())?,
                self.id.to_string(),
            ],
        )?;
        Ok(changed)
    }
}

impl Table for TestRecord {
    const TABLE: &'static str = "test";
    const SELECT_SQL: &'static str =
        "SELECT id, part_id, timestamp, successful, data FROM test";

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        let successful = match row.get::<_, i64>("successful")? {
            0 => false,
            1 => true,
            other => {
                return Err(RepoError::InvalidData(format!(
                    "invalid successful value `{other}` in test.successful"
                )));
            }
        };

        let data = match row.get::<_, Option<String>>("data")? {
            Some(text) => Some(parse_data(&text)?),
            None => None,
        };

        Ok(Self {
            id: parse_uuid(row, "id", Self::TABLE)?,
            part_id: parse_uuid(row, "part_id", Self::TABLE)?,
            timestamp: parse_timestamp(row, "timestamp", Self::TABLE)?,
            successful,
            data,
        })
    }
}

fn timestamp_to_db(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn data_to_db(value: Option<&Map<String, Value>>) -> DbResult<Option<String>> {
    Ok(value.map(serde_json::to_string).transpose()?)
}

fn parse_uuid(row: &Row<'_>, column: &str, table: &str) -> RepoResult<Uuid> {
    let text: String = row.get(column)?;
    Uuid::parse_str(&text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{text}` in {table}.{column}"))
    })
}

fn parse_timestamp(row: &Row<'_>, column: &str, table: &str) -> RepoResult<DateTime<Utc>> {
    let text: String = row.get(column)?;
    DateTime::parse_from_rfc3339(&text)
        .map(|value| value.with_timezone(&Utc))
        .map_err(|_| {
            RepoError::InvalidData(format!(
                "invalid timestamp value `{text}` in {table}.{column}"
            ))
        })
}

fn parse_data(text: &str) -> RepoResult<Map<String, Value>> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) | Err(_) => Err(RepoError::InvalidData(
            "test.data must hold a JSON object".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_data, timestamp_to_db};
    use crate::repo::RepoError;
    use chrono::{DateTime, TimeZone, Utc};

    #[test]
    fn timestamp_text_keeps_sub_second_precision() {
        let stamp = Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap();
        let text = timestamp_to_db(&stamp);
        assert_eq!(text, "2023-11-14T22:13:20.123456789Z");
        let parsed = DateTime::parse_from_rfc3339(&text).unwrap();
        assert_eq!(parsed.with_timezone(&Utc), stamp);
    }

    #[test]
    fn data_must_be_a_json_object() {
        assert!(parse_data(r#"{"a": 1}"#).is_ok());
        assert!(matches!(parse_data("[1, 2]"), Err(RepoError::InvalidData(_))));
        assert!(matches!(parse_data("not json"), Err(RepoError::InvalidData(_))));
    }
}
