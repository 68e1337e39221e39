//! Domain model for parts and the tests run against them.
//!
//! # Responsibility
//! - Define business-level objects independent of the storage schema.
//!
//! # Invariants
//! - Every domain object carries an `id` fixed at construction.
//! - Nothing in this module knows about tables, rows, or SQL.

use uuid::Uuid;

pub mod part;
pub mod test_run;

/// Capability shared by every domain object a repository can persist.
pub trait Domain {
    fn id(&self) -> Uuid;
}
