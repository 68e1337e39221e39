//! SQLite storage bootstrap and the per-request database wrapper.
//!
//! # Responsibility
//! - Open and configure SQLite connections.
//! - Apply the embedded schema before any data access.
//! - Wrap one connection's transaction for a unit of work.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - Connections handed out have `foreign_keys=ON`, so `test.part_id`
//!   cascades on part deletion.

use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

mod app;
mod database;
pub mod migrations;
mod open;

pub use app::DatabaseApp;
pub use database::Database;
pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    Json(serde_json::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// A write addressed a row that no longer exists.
    RowMissing { table: &'static str, id: Uuid },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "json encoding failed: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::RowMissing { table, id } => write!(f, "row {id} missing from `{table}`"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } | Self::RowMissing { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<serde_json::Error> for DbError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}
