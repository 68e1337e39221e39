//! Per-request wrapper around one SQLite connection's transaction.
//!
//! # Responsibility
//! - Expose the primitive write operations replayed by a unit of work.
//! - Own commit/rollback and release of the transaction.
//!
//! # Invariants
//! - A transaction is opened lazily on first access and stays open until
//!   `commit`, `rollback`, or drop.
//! - Dropping the wrapper with an open transaction rolls it back, so an
//!   interrupted save never leaves writes pending on the connection.

use super::{DbError, DbResult};
use crate::record::Record;
use log::{debug, warn};
use rusqlite::Connection;

/// Transaction handle shared by every repository of one unit of work.
///
/// Borrows the connection exclusively, so only one wrapper can drive a
/// connection's transaction at a time.
#[derive(Debug)]
pub struct Database<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> Database<'conn> {
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }

    /// Returns the connection with a transaction guaranteed to be open.
    ///
    /// Repositories run their reads through this so that a later `modify`
    /// or staged write lands in the same transaction.
    pub fn connection(&self) -> DbResult<&Connection> {
        self.begin()?;
        Ok(&*self.conn)
    }

    /// Whether writes or reads are pending an outcome on this connection.
    pub fn in_transaction(&self) -> bool {
        !self.conn.is_autocommit()
    }

    /// Inserts `record` inside the open transaction.
    pub fn add(&self, record: &dyn Record) -> DbResult<()> {
        let conn = self.connection()?;
        record.insert(conn)?;
        debug!(
            "event=db_add module=db status=ok table={} id={}",
            record.table(),
            record.id()
        );
        Ok(())
    }

    /// Deletes the row backing `record` inside the open transaction.
    ///
    /// Deleting a row that is already gone is not an error.
    pub fn remove(&self, record: &dyn Record) -> DbResult<()> {
        let conn = self.connection()?;
        let changed = record.delete(conn)?;
        if changed == 0 {
            warn!(
                "event=db_remove module=db status=noop table={} id={}",
                record.table(),
                record.id()
            );
        } else {
            debug!(
                "event=db_remove module=db status=ok table={} id={}",
                record.table(),
                record.id()
            );
        }
        Ok(())
    }

    /// Writes every mutable column of `record` back to its row.
    pub fn update(&self, record: &dyn Record) -> DbResult<()> {
        let conn = self.connection()?;
        if record.update(conn)? == 0 {
            return Err(DbError::RowMissing {
                table: record.table(),
                id: record.id(),
            });
        }
        Ok(())
    }

    pub fn commit(&self) -> DbResult<()> {
        if self.in_transaction() {
            self.conn.execute_batch("COMMIT;")?;
            debug!("event=db_commit module=db status=ok");
        }
        Ok(())
    }

    /// Discards everything since the transaction began. No-op when idle.
    pub fn rollback(&self) -> DbResult<()> {
        if self.in_transaction() {
            self.conn.execute_batch("ROLLBACK;")?;
            debug!("event=db_rollback module=db status=ok");
        }
        Ok(())
    }

    /// Releases the connection, rolling back anything not committed.
    pub fn teardown(self) -> DbResult<()> {
        self.rollback()
    }

    fn begin(&self) -> DbResult<()> {
        if !self.in_transaction() {
            self.conn.execute_batch("BEGIN DEFERRED;")?;
        }
        Ok(())
    }
}

impl Drop for Database<'_> {
    fn drop(&mut self) {
        if let Err(err) = self.rollback() {
            warn!("event=db_teardown module=db status=error error={err}");
        }
    }
}
