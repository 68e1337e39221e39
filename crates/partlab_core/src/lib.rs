//! Core persistence orchestration for parts and the tests run against them.
//!
//! Services stage domain changes through repositories onto a session; a
//! unit of work replays the session against one SQLite transaction and
//! commits it, or rolls everything back.

pub mod config;
pub mod db;
pub mod logging;
pub mod mapper;
pub mod model;
pub mod record;
pub mod repo;
pub mod service;
pub mod session;
pub mod unit_of_work;

pub use config::{ConfigError, LogSettings, Settings};
pub use db::{open_db, open_db_in_memory, Database, DatabaseApp, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use mapper::{EntityDomainMapper, PartMapper, TestMapper};
pub use model::part::{Part, PartId};
pub use model::test_run::{Test, TestData, TestId};
pub use model::Domain;
pub use record::{PartRecord, Record, Table, TestRecord};
pub use repo::{PartRepository, RepoError, RepoResult, Repository, SqliteRepository, TestRepository};
pub use service::part_service::{
    ChangePartTimestampService, CreatePartService, DeletePartService, PartChangeTimestamp,
    PartRegistration, ShowPartService,
};
pub use service::test_service::{
    CreateTestService, DeleteTestService, ShowTestService, TestRegistration, TestUpdate,
    UpdateTestService,
};
pub use service::{ServiceError, ServiceResult};
pub use session::{Operation, Session, SessionEntry};
pub use unit_of_work::{StoreUnitOfWork, UnitOfWork};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
