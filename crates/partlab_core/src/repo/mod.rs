//! Repository contracts and the SQLite-backed implementation.
//!
//! # Responsibility
//! - Give services a typed query and staging facade per entity kind.
//! - Keep SQL and row decoding out of services.
//!
//! # Invariants
//! - `add` and `remove` only stage intents on the session; storage sees
//!   them when the unit of work saves.
//! - `modify` writes immediately inside the open transaction, since it
//!   needs the live row to assign columns onto.
//! - Missing rows surface as `EntityNotFound`, never as a default value.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

mod sqlite_repo;

pub use sqlite_repo::{PartRepository, SqliteRepository, TestRepository};

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug)]
pub enum RepoError {
    /// No row with this id in `entity`'s table.
    EntityNotFound { entity: &'static str, id: Uuid },
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EntityNotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::EntityNotFound { .. } | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Query and staging operations for one entity kind.
pub trait Repository {
    type Domain;

    /// Stages an insert of `domain`. Performs no I/O.
    fn add(&mut self, domain: &Self::Domain);
    /// Assigns `domain`'s fields onto its stored row right away.
    fn modify(&self, domain: &Self::Domain) -> RepoResult<()>;
    /// Looks up the stored row for `domain` and stages its deletion.
    fn remove(&mut self, domain: &Self::Domain) -> RepoResult<()>;
    fn find_by_id(&self, id: Uuid) -> RepoResult<Self::Domain>;
    /// Up to `limit` objects after skipping `offset`, in storage row order.
    fn find_all(&self, limit: u32, offset: u32) -> RepoResult<Vec<Self::Domain>>;
}
