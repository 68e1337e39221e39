//! Unit of work: the single commit boundary for one request.
//!
//! # Responsibility
//! - Bind one session and one database transaction to the part and test
//!   repositories.
//! - Replay staged intents in order, then commit.
//!
//! # Invariants
//! - Replay is sequential and follows staging order exactly.
//! - Any failed stage rolls back before its error is returned, and `save`
//!   rolls back once more; the caller never sees a half-applied batch.
//! - Errors are returned unchanged. Retrying is the caller's business.
//! - The session is drained by `save` whether it succeeds or not.

use crate::db::{Database, DbResult};
use crate::mapper::{PartMapper, TestMapper};
use crate::model::part::Part;
use crate::model::test_run::Test;
use crate::repo::{PartRepository, Repository, SqliteRepository, TestRepository};
use crate::session::{Operation, Session, SessionEntry};
use log::{debug, error};
use rusqlite::Connection;
use std::fmt::Display;

/// Repositories sharing one transaction scope, plus its commit boundary.
pub trait UnitOfWork {
    type Parts<'a>: Repository<Domain = Part>
    where
        Self: 'a;
    type Tests<'a>: Repository<Domain = Test>
    where
        Self: 'a;

    fn part_repository(&mut self) -> Self::Parts<'_>;
    fn test_repository(&mut self) -> Self::Tests<'_>;
    /// Applies every staged intent and commits, all or nothing.
    fn save(&mut self) -> DbResult<()>;
}

/// SQLite-backed unit of work over a borrowed connection.
#[derive(Debug)]
pub struct StoreUnitOfWork<'conn> {
    session: Session,
    db: Database<'conn>,
    part_mapper: PartMapper,
    test_mapper: TestMapper,
}

impl<'conn> StoreUnitOfWork<'conn> {
    pub fn new(session: Session, db: Database<'conn>) -> Self {
        Self {
            session,
            db,
            part_mapper: PartMapper,
            test_mapper: TestMapper,
        }
    }

    /// Default wiring: an empty session over a new wrapper for `conn`.
    pub fn for_connection(conn: &'conn mut Connection) -> Self {
        Self::new(Session::new(), Database::new(conn))
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn db(&self) -> &Database<'conn> {
        &self.db
    }

    /// Releases the connection, rolling back whatever was not saved.
    pub fn teardown(self) -> DbResult<()> {
        self.db.teardown()
    }

    fn replay(&self, entries: &[SessionEntry]) -> DbResult<()> {
        entries.iter().try_for_each(|entry| self.apply(entry))
    }

    fn apply(&self, entry: &SessionEntry) -> DbResult<()> {
        let record = entry.record();
        let operation = entry.operation();
        let applied = match operation {
            Operation::Add => self.db.add(record),
            Operation::Remove => self.db.remove(record),
        };
        applied.map_err(|err| {
            error!(
                "event=uow_replay module=unit_of_work status=error operation={operation} table={} id={} error={err}",
                record.table(),
                record.id()
            );
            self.rollback_after_failure(operation);
            err
        })
    }

    fn commit(&self) -> DbResult<()> {
        self.db.commit().map_err(|err| {
            error!("event=uow_commit module=unit_of_work status=error error={err}");
            self.rollback_after_failure("commit");
            err
        })
    }

    // The stage error is what the caller gets back; a failing rollback is
    // only logged.
    fn rollback_after_failure(&self, stage: impl Display) {
        if let Err(err) = self.db.rollback() {
            error!(
                "event=uow_rollback module=unit_of_work status=error stage={stage} error={err}"
            );
        }
    }
}

impl<'conn> UnitOfWork for StoreUnitOfWork<'conn> {
    type Parts<'a> = PartRepository<'a, 'conn> where Self: 'a;
    type Tests<'a> = TestRepository<'a, 'conn> where Self: 'a;

    fn part_repository(&mut self) -> PartRepository<'_, 'conn> {
        SqliteRepository::new(&mut self.session, &self.db, &self.part_mapper)
    }

    fn test_repository(&mut self) -> TestRepository<'_, 'conn> {
        SqliteRepository::new(&mut self.session, &self.db, &self.test_mapper)
    }

    fn save(&mut self) -> DbResult<()> {
        let entries = self.session.take_entries();
        let staged = entries.len();

        match self.replay(&entries).and_then(|()| self.commit()) {
            Ok(()) => {
                debug!("event=uow_save module=unit_of_work status=ok staged={staged}");
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=uow_save module=unit_of_work status=error staged={staged} error={err}"
                );
                self.rollback_after_failure("save");
                Err(err)
            }
        }
    }
}
