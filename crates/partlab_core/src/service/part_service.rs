//! Part use-cases: create, list, delete, and timestamp change.

use super::ServiceResult;
use crate::model::part::{Part, PartId};
use crate::repo::Repository;
use crate::unit_of_work::UnitOfWork;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Input for registering a new part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartRegistration {
    pub name: String,
}

/// Input for moving a part's modification timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartChangeTimestamp {
    pub id: PartId,
    pub modified_timestamp: DateTime<Utc>,
}

pub struct CreatePartService<U: UnitOfWork> {
    unit_of_work: U,
}

impl<U: UnitOfWork> CreatePartService<U> {
    pub fn new(unit_of_work: U) -> Self {
        Self { unit_of_work }
    }

    pub fn unit_of_work(&self) -> &U {
        &self.unit_of_work
    }

    /// Creates a part with a fresh id and the current time, and persists it.
    pub fn create_part(&mut self, request: &PartRegistration) -> ServiceResult<Part> {
        let part = Part::new(request.name.clone());
        self.unit_of_work.part_repository().add(&part);
        self.unit_of_work.save()?;
        Ok(part)
    }
}

pub struct ShowPartService<U: UnitOfWork> {
    unit_of_work: U,
}

impl<U: UnitOfWork> ShowPartService<U> {
    pub fn new(unit_of_work: U) -> Self {
        Self { unit_of_work }
    }

    pub fn show_parts(&mut self, limit: u32, offset: u32) -> ServiceResult<Vec<Part>> {
        Ok(self.unit_of_work.part_repository().find_all(limit, offset)?)
    }

    pub fn show_part(&mut self, id: PartId) -> ServiceResult<Part> {
        Ok(self.unit_of_work.part_repository().find_by_id(id)?)
    }
}

pub struct DeletePartService<U: UnitOfWork> {
    unit_of_work: U,
}

impl<U: UnitOfWork> DeletePartService<U> {
    pub fn new(unit_of_work: U) -> Self {
        Self { unit_of_work }
    }

    /// Deletes a part; storage cascades the deletion to its tests.
    pub fn delete_part(&mut self, id: PartId) -> ServiceResult<()> {
        {
            let mut repository = self.unit_of_work.part_repository();
            let part = repository.find_by_id(id)?;
            repository.remove(&part)?;
        }
        self.unit_of_work.save()?;
        Ok(())
    }
}

pub struct ChangePartTimestampService<U: UnitOfWork> {
    unit_of_work: U,
}

impl<U: UnitOfWork> ChangePartTimestampService<U> {
    pub fn new(unit_of_work: U) -> Self {
        Self { unit_of_work }
    }

    pub fn change_timestamp(&mut self, request: &PartChangeTimestamp) -> ServiceResult<Part> {
        let part = {
            let repository = self.unit_of_work.part_repository();
            let mut part = repository.find_by_id(request.id)?;
            part.set_modified_timestamp(request.modified_timestamp);
            repository.modify(&part)?;
            part
        };
        self.unit_of_work.save()?;
        Ok(part)
    }
}
