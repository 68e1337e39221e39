//! Conversion between domain objects and persistence records.
//!
//! # Invariants
//! - Mappers are the only code that sees both representations of an entity.
//! - `map_to_record` never changes a record's `id`; calling it with a domain
//!   object of a different id is a programming error and panics.

use crate::model::part::Part;
use crate::model::test_run::Test;
use crate::model::Domain;
use crate::record::{PartRecord, Table, TestRecord};

/// Bidirectional converter for one domain type and one record type.
pub trait EntityDomainMapper {
    type Domain: Domain;
    type Record: Table;

    fn to_domain(&self, record: &Self::Record) -> Self::Domain;
    fn to_entity(&self, domain: &Self::Domain) -> Self::Record;
    /// Copies every mutable field of `domain` onto `record` in place.
    fn map_to_record(&self, domain: &Self::Domain, record: &mut Self::Record);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PartMapper;

impl EntityDomainMapper for PartMapper {
    type Domain = Part;
    type Record = PartRecord;

    fn to_domain(&self, record: &PartRecord) -> Part {
        Part::with_id(record.id, record.name.clone(), record.modified_timestamp)
    }

    fn to_entity(&self, domain: &Part) -> PartRecord {
        PartRecord {
            id: domain.id(),
            name: domain.name().to_string(),
            modified_timestamp: domain.modified_timestamp(),
        }
    }

    fn map_to_record(&self, domain: &Part, record: &mut PartRecord) {
        assert_eq!(domain.id(), record.id, "part id mismatch in map_to_record");

        record.name = domain.name().to_string();
        record.modified_timestamp = domain.modified_timestamp();
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TestMapper;

impl EntityDomainMapper for TestMapper {
    type Domain = Test;
    type Record = TestRecord;

    fn to_domain(&self, record: &TestRecord) -> Test {
        Test::with_id(
            record.id,
            record.part_id,
            record.timestamp,
            record.successful,
            record.data.clone(),
        )
    }

    fn to_entity(&self, domain: &Test) -> TestRecord {
        TestRecord {
            id: domain.id(),
            part_id: domain.part_id(),
            timestamp: domain.timestamp(),
            successful: domain.successful(),
            data: domain.data().cloned(),
        }
    }

    fn map_to_record(&self, domain: &Test, record: &mut TestRecord) {
        assert_eq!(domain.id(), record.id, "test id mismatch in map_to_record");

        record.part_id = domain.part_id();
        record.timestamp = domain.timestamp();
        record.successful = domain.successful();
        record.data = domain.data().cloned();
    }
}
