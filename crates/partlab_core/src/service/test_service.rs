//! Test use-cases: create, list, delete, and partial update.

use super::{ServiceError, ServiceResult};
use crate::model::part::PartId;
use crate::model::test_run::{Test, TestData, TestId};
use crate::repo::{RepoError, Repository};
use crate::unit_of_work::UnitOfWork;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Input for recording a new test run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestRegistration {
    pub part_id: PartId,
    pub successful: bool,
    #[serde(default)]
    pub data: Option<TestData>,
}

/// Partial update of a test run; `None` fields are left untouched.
///
/// Any `Some` value is written, including `Some(false)` and an empty `data`
/// object; falsy values are not skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestUpdate {
    pub id: TestId,
    #[serde(default)]
    pub successful: Option<bool>,
    #[serde(default)]
    pub data: Option<TestData>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

pub struct CreateTestService<U: UnitOfWork> {
    unit_of_work: U,
}

impl<U: UnitOfWork> CreateTestService<U> {
    pub fn new(unit_of_work: U) -> Self {
        Self { unit_of_work }
    }

    pub fn unit_of_work(&self) -> &U {
        &self.unit_of_work
    }

    /// Records a test run against an existing part.
    ///
    /// # Errors
    /// - `ServiceError::PartNotFound` when `part_id` is unknown; nothing is
    ///   staged in that case.
    pub fn create_test(&mut self, request: &TestRegistration) -> ServiceResult<Test> {
        self.validate_part_id(request.part_id)?;

        let test = Test::new(request.part_id, request.successful, request.data.clone());
        self.unit_of_work.test_repository().add(&test);
        self.unit_of_work.save()?;
        Ok(test)
    }

    fn validate_part_id(&mut self, part_id: PartId) -> ServiceResult<()> {
        match self.unit_of_work.part_repository().find_by_id(part_id) {
            Ok(_) => Ok(()),
            Err(RepoError::EntityNotFound { .. }) => Err(ServiceError::PartNotFound(part_id)),
            Err(other) => Err(other.into()),
        }
    }
}

pub struct ShowTestService<U: UnitOfWork> {
    unit_of_work: U,
}

impl<U: UnitOfWork> ShowTestService<U> {
    pub fn new(unit_of_work: U) -> Self {
        Self { unit_of_work }
    }

    pub fn show_tests(&mut self, limit: u32, offset: u32) -> ServiceResult<Vec<Test>> {
        Ok(self.unit_of_work.test_repository().find_all(limit, offset)?)
    }

    pub fn show_test(&mut self, id: TestId) -> ServiceResult<Test> {
        Ok(self.unit_of_work.test_repository().find_by_id(id)?)
    }
}

pub struct DeleteTestService<U: UnitOfWork> {
    unit_of_work: U,
}

impl<U: UnitOfWork> DeleteTestService<U> {
    pub fn new(unit_of_work: U) -> Self {
        Self { unit_of_work }
    }

    pub fn delete_test(&mut self, id: TestId) -> ServiceResult<()> {
        {
            let mut repository = self.unit_of_work.test_repository();
            let test = repository.find_by_id(id)?;
            repository.remove(&test)?;
        }
        self.unit_of_work.save()?;
        Ok(())
    }
}

pub struct UpdateTestService<U: UnitOfWork> {
    unit_of_work: U,
}

impl<U: UnitOfWork> UpdateTestService<U> {
    pub fn new(unit_of_work: U) -> Self {
        Self { unit_of_work }
    }

    /// Applies the present fields of `update` and persists the result.
    ///
    /// `Some(false)` for `successful` is applied like any other value.
    pub fn update_data(&mut self, update: &TestUpdate) -> ServiceResult<Test> {
        let test = {
            let repository = self.unit_of_work.test_repository();
            let mut test = repository.find_by_id(update.id)?;
            apply_update(&mut test, update);
            repository.modify(&test)?;
            test
        };
        self.unit_of_work.save()?;
        Ok(test)
    }
}

fn apply_update(test: &mut Test, update: &TestUpdate) {
    if let Some(data) = &update.data {
        test.set_data(Some(data.clone()));
    }
    if let Some(successful) = update.successful {
        test.set_success_state(successful);
    }
    if let Some(timestamp) = update.timestamp {
        test.set_timestamp(timestamp);
    }
}

#[cfg(test)]
mod tests {
    use super::{apply_update, TestUpdate};
    use crate::model::test_run::Test;
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use uuid::Uuid;

    #[test]
    fn apply_update_leaves_absent_fields_alone() {
        let mut test = Test::new(Uuid::new_v4(), true, None);
        let before = test.clone();
        let update = TestUpdate {
            id: test.id(),
            successful: None,
            data: json!({"note": "rerun"}).as_object().cloned(),
            timestamp: None,
        };

        apply_update(&mut test, &update);

        assert_eq!(test.successful(), before.successful());
        assert_eq!(test.timestamp(), before.timestamp());
        assert_eq!(test.data(), json!({"note": "rerun"}).as_object());
    }

    #[test]
    fn apply_update_accepts_false_and_explicit_timestamp() {
        let mut test = Test::new(Uuid::new_v4(), true, None);
        let stamp = Utc.with_ymd_and_hms(2021, 3, 4, 5, 6, 7).unwrap();
        let update = TestUpdate {
            id: test.id(),
            successful: Some(false),
            data: None,
            timestamp: Some(stamp),
        };

        apply_update(&mut test, &update);

        assert!(!test.successful());
        assert_eq!(test.timestamp(), stamp);
        assert!(test.data().is_none());
    }

    #[test]
    fn update_request_deserializes_with_missing_fields() {
        let id = Uuid::new_v4();
        let update: TestUpdate =
            serde_json::from_value(json!({"id": id.to_string(), "data": {"a": 1}})).unwrap();
        assert_eq!(update.id, id);
        assert!(update.successful.is_none());
        assert!(update.timestamp.is_none());
        assert!(update.data.is_some());
    }

    #[test]
    fn apply_update_writes_an_empty_data_object() {
        let mut test = Test::new(Uuid::new_v4(), true, json!({"old": 1}).as_object().cloned());
        let update = TestUpdate {
            id: test.id(),
            successful: None,
            data: Some(Default::default()),
            timestamp: None,
        };

        apply_update(&mut test, &update);

        assert_eq!(test.data().map(|data| data.len()), Some(0));
        assert!(test.successful());
    }
}
