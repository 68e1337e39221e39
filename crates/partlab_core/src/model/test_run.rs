//! Test domain object: one run of a test against a part.

use super::part::PartId;
use super::Domain;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type TestId = Uuid;

/// Free-form key/value document attached to a test.
pub type TestData = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Test {
    id: TestId,
    part_id: PartId,
    timestamp: DateTime<Utc>,
    successful: bool,
    data: Option<TestData>,
}

impl Test {
    /// Creates a test run with a fresh v4 id, timestamped now.
    ///
    /// Does not check that `part_id` exists; services do that before staging.
    pub fn new(part_id: PartId, successful: bool, data: Option<TestData>) -> Self {
        Self::with_id(Uuid::new_v4(), part_id, Utc::now(), successful, data)
    }

    pub fn with_id(
        id: TestId,
        part_id: PartId,
        timestamp: DateTime<Utc>,
        successful: bool,
        data: Option<TestData>,
    ) -> Self {
        Self {
            id,
            part_id,
            timestamp,
            successful,
            data,
        }
    }

    pub fn id(&self) -> TestId {
        self.id
    }

    pub fn part_id(&self) -> PartId {
        self.part_id
    }

    /// When the test was run.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn successful(&self) -> bool {
        self.successful
    }

    pub fn data(&self) -> Option<&TestData> {
        self.data.as_ref()
    }

    pub fn set_data(&mut self, data: Option<TestData>) {
        self.data = data;
    }

    pub fn set_success_state(&mut self, state: bool) {
        self.successful = state;
    }

    pub fn set_timestamp(&mut self, timestamp: DateTime<Utc>) {
        self.timestamp = timestamp;
    }
}

impl Domain for Test {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Display for Test {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let data = match &self.data {
            Some(data) => Value::Object(data.clone()).to_string(),
            None => "null".to_string(),
        };
        write!(
            f,
            "id={}, part_id={}, timestamp={}, successful={}, data={}",
            self.id, self.part_id, self.timestamp, self.successful, data
        )
    }
}
