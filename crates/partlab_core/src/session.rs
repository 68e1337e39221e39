//! Write-intent log shared by the repositories of one unit of work.
//!
//! # Responsibility
//! - Record intended inserts and deletes without touching storage.
//!
//! # Invariants
//! - Entries keep insertion order; nothing is merged or deduplicated.
//! - Staging the same record twice yields two entries. Whether the second
//!   one is valid is left to storage at replay time.

use crate::record::Record;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Remove,
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Add => f.write_str("add"),
            Self::Remove => f.write_str("remove"),
        }
    }
}

/// One staged intent: a record and what to do with it.
#[derive(Debug)]
pub struct SessionEntry {
    record: Box<dyn Record>,
    operation: Operation,
}

impl SessionEntry {
    pub fn record(&self) -> &dyn Record {
        self.record.as_ref()
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }
}

#[derive(Debug, Default)]
pub struct Session {
    entries: Vec<SessionEntry>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, record: impl Record + 'static) {
        self.push(Box::new(record), Operation::Add);
    }

    pub fn remove(&mut self, record: impl Record + 'static) {
        self.push(Box::new(record), Operation::Remove);
    }

    /// Staged entries in the order they will be replayed.
    pub fn entries(&self) -> &[SessionEntry] {
        &self.entries
    }

    /// Drains the log; each entry is handed out exactly once.
    pub fn take_entries(&mut self) -> Vec<SessionEntry> {
        std::mem::take(&mut self.entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(&mut self, record: Box<dyn Record>, operation: Operation) {
        self.entries.push(SessionEntry { record, operation });
    }
}

#[cfg(test)]
mod tests {
    use super::{Operation, Session};
    use crate::record::PartRecord;
    use chrono::Utc;
    use uuid::Uuid;

    fn part_record(name: &str) -> PartRecord {
        PartRecord {
            id: Uuid::new_v4(),
            name: name.to_string(),
            modified_timestamp: Utc::now(),
        }
    }

    #[test]
    fn add_then_remove_keeps_both_entries_in_order() {
        let mut session = Session::new();
        let first = part_record("a");
        let second = part_record("b");
        let (first_id, second_id) = (first.id, second.id);

        session.add(first);
        session.remove(second);

        let ops: Vec<_> = session
            .entries()
            .iter()
            .map(|entry| (entry.record().id(), entry.operation()))
            .collect();
        assert_eq!(
            ops,
            vec![(first_id, Operation::Add), (second_id, Operation::Remove)]
        );
    }

    #[test]
    fn same_record_staged_twice_is_not_merged() {
        let mut session = Session::new();
        let record = part_record("dup");

        session.add(record.clone());
        session.remove(record.clone());
        session.add(record);

        assert_eq!(session.len(), 3);
        let ids: Vec<_> = session.entries().iter().map(|e| e.record().id()).collect();
        assert!(ids.windows(2).all(|pair| pair[0] == pair[1]));
    }

    #[test]
    fn take_entries_empties_the_log() {
        let mut session = Session::new();
        session.add(part_record("x"));

        let drained = session.take_entries();
        assert_eq!(drained.len(), 1);
        assert!(session.is_empty());
        assert!(session.take_entries().is_empty());
    }

    #[test]
    fn operations_render_as_lowercase_words() {
        assert_eq!(Operation::Add.to_string(), "add");
        assert_eq!(Operation::Remove.to_string(), "remove");
    }
}
