//! Use-case services, one per operation on parts and tests.
//!
//! # Responsibility
//! - Turn caller requests into repository calls and a single `save`.
//! - Translate repository misses into use-case errors where the caller
//!   needs to tell them apart.
//!
//! # Invariants
//! - Every service receives its unit of work from the caller and never
//!   opens storage on its own.
//! - Validation that can fail happens before anything is staged.

use crate::db::DbError;
use crate::model::part::PartId;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod part_service;
pub mod test_service;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug)]
pub enum ServiceError {
    /// A test referenced a part that does not exist.
    PartNotFound(PartId),
    /// Lookup or staging failure, including `EntityNotFound`.
    Repo(RepoError),
    /// `save` failed and the transaction was rolled back.
    Transaction(DbError),
}

impl ServiceError {
    /// Whether the request addressed something that does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::PartNotFound(_) | Self::Repo(RepoError::EntityNotFound { .. })
        )
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PartNotFound(id) => write!(f, "no part found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Transaction(err) => write!(f, "transaction failed: {err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::PartNotFound(_) => None,
            Self::Repo(err) => Some(err),
            Self::Transaction(err) => Some(err),
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<DbError> for ServiceError {
    fn from(value: DbError) -> Self {
        Self::Transaction(value)
    }
}
