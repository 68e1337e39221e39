//! Part domain object.

use super::Domain;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type PartId = Uuid;

/// A physical part that tests are run against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    id: PartId,
    name: String,
    modified_timestamp: DateTime<Utc>,
}

impl Part {
    /// Creates a part with a fresh v4 id, stamped with the current time.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), name, Utc::now())
    }

    /// Rebuilds a part whose identity already exists.
    pub fn with_id(id: PartId, name: impl Into<String>, modified_timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            name: name.into(),
            modified_timestamp,
        }
    }

    pub fn id(&self) -> PartId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn modified_timestamp(&self) -> DateTime<Utc> {
        self.modified_timestamp
    }

    pub fn set_modified_timestamp(&mut self, modified_timestamp: DateTime<Utc>) {
        self.modified_timestamp = modified_timestamp;
    }
}

impl Domain for Part {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Display for Part {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "id={}, name={}, modified_timestamp={}",
            self.id, self.name, self.modified_timestamp
        )
    }
}
