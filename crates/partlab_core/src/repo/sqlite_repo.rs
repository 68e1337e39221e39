//! Repository over one table, parametrized by its mapper.

use super::{RepoError, RepoResult, Repository};
use crate::db::Database;
use crate::mapper::{EntityDomainMapper, PartMapper, TestMapper};
use crate::model::Domain;
use crate::record::Table;
use crate::session::Session;
use rusqlite::params;
use uuid::Uuid;

pub type PartRepository<'uow, 'conn> = SqliteRepository<'uow, 'conn, PartMapper>;
pub type TestRepository<'uow, 'conn> = SqliteRepository<'uow, 'conn, TestMapper>;

/// Repository handle borrowed from a unit of work.
///
/// Every handle of one unit of work points at the same session and the
/// same database transaction.
pub struct SqliteRepository<'uow, 'conn, M> {
    session: &'uow mut Session,
    db: &'uow Database<'conn>,
    mapper: &'uow M,
}

impl<'uow, 'conn, M: EntityDomainMapper> SqliteRepository<'uow, 'conn, M> {
    pub fn new(session: &'uow mut Session, db: &'uow Database<'conn>, mapper: &'uow M) -> Self {
        Self {
            session,
            db,
            mapper,
        }
    }

    fn find_first_record(&self, id: Uuid) -> RepoResult<M::Record> {
        let conn = self.db.connection()?;
        let mut stmt = conn.prepare(&format!(
            "{} WHERE id = ?1;",
            <M::Record as Table>::SELECT_SQL
        ))?;

        let mut rows = stmt.query([id.to_string()])?;
        let Some(row) = rows.next()? else {
            return Err(RepoError::EntityNotFound {
                entity: <M::Record as Table>::TABLE,
                id,
            });
        };
        <M::Record as Table>::from_row(row)
    }

    fn find_all_records(&self, limit: u32, offset: u32) -> RepoResult<Vec<M::Record>> {
        let conn = self.db.connection()?;
        let mut stmt = conn.prepare(&format!(
            "{} ORDER BY rowid LIMIT ?1 OFFSET ?2;",
            <M::Record as Table>::SELECT_SQL
        ))?;

        let mut rows = stmt.query(params![i64::from(limit), i64::from(offset)])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(<M::Record as Table>::from_row(row)?);
        }
        Ok(records)
    }
}

impl<M: EntityDomainMapper> Repository for SqliteRepository<'_, '_, M> {
    type Domain = M::Domain;

    fn add(&mut self, domain: &M::Domain) {
        let record = self.mapper.to_entity(domain);
        self.session.add(record);
    }

    fn modify(&self, domain: &M::Domain) -> RepoResult<()> {
        let mut record = self.find_first_record(domain.id())?;
        self.mapper.map_to_record(domain, &mut record);
        self.db.update(&record)?;
        Ok(())
    }

    fn remove(&mut self, domain: &M::Domain) -> RepoResult<()> {
        let record = self.find_first_record(domain.id())?;
        self.session.remove(record);
        Ok(())
    }

    fn find_by_id(&self, id: Uuid) -> RepoResult<M::Domain> {
        let record = self.find_first_record(id)?;
        Ok(self.mapper.to_domain(&record))
    }

    fn find_all(&self, limit: u32, offset: u32) -> RepoResult<Vec<M::Domain>> {
        let records = self.find_all_records(limit, offset)?;
        Ok(records
            .iter()
            .map(|record| self.mapper.to_domain(record))
            .collect())
    }
}
