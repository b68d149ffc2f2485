//! Named collections of records.
//!
//! A collection owns identifier allocation: new records always receive the
//! smallest positive id not already in use, so ids freed by deletion are
//! handed out again.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use thiserror::Error;

use super::record::{Record, RecordId};
use super::search::{SearchQuery, SearchResults};

/// Errors raised by collection operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionError {
    #[error("No record with id {0} in this collection")]
    NotFound(RecordId),

    #[error("Collection '{0}' is not empty; cannot load into it")]
    NotEmpty(String),

    #[error("Duplicate record id {id} while loading collection '{collection}'")]
    DuplicateId { collection: String, id: RecordId },
}

/// An ordered set of records under one name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    name: String,
    records: Vec<Record>,
}

impl Collection {
    /// Create an empty collection
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            records: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// All records in insertion order
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.records.iter().any(|r| r.id() == id)
    }

    /// Get a record by id
    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.records.iter().find(|r| r.id() == id)
    }

    /// Get a record by id for a status change
    pub fn get_mut(&mut self, id: RecordId) -> Option<&mut Record> {
        self.records.iter_mut().find(|r| r.id() == id)
    }

    /// Smallest positive id not used by any record
    pub fn next_id(&self) -> RecordId {
        let used: BTreeSet<RecordId> = self.records.iter().map(Record::id).collect();

        // Ascending walk: the first id that skips ahead leaves a gap
        let mut next = 1;
        for id in used {
            if id > next {
                break;
            }
            if id == next {
                next += 1;
            }
        }
        next
    }

    /// Add a new record and return it
    pub fn add(&mut self, title: impl Into<String>, author: impl Into<String>, year: i32) -> &Record {
        let id = self.next_id();
        self.records.push(Record::new(id, title, author, year));
        tracing::debug!(collection = %self.name, id, "Record added");
        &self.records[self.records.len() - 1]
    }

    /// Remove a record by id
    pub fn delete(&mut self, id: RecordId) -> Result<Record, CollectionError> {
        let pos = self
            .records
            .iter()
            .position(|r| r.id() == id)
            .ok_or(CollectionError::NotFound(id))?;

        Ok(self.records.remove(pos))
    }

    /// Bulk-load decoded records.
    ///
    /// The collection must be empty and the incoming ids unique. Either
    /// violation means the caller or the persisted data is broken, and
    /// nothing is loaded.
    pub fn load(&mut self, records: Vec<Record>) -> Result<(), CollectionError> {
        if !self.records.is_empty() {
            return Err(CollectionError::NotEmpty(self.name.clone()));
        }

        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.id()) {
                return Err(CollectionError::DuplicateId {
                    collection: self.name.clone(),
                    id: record.id(),
                });
            }
        }

        self.records = records;
        Ok(())
    }

    /// Stratified search over title, author and year
    pub fn search(&self, query: &SearchQuery) -> SearchResults<'_> {
        SearchResults::collect(&self.records, query)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.records.len();
        let noun = if count == 1 { "record" } else { "records" };
        write!(f, "Collection '{}' holding {} {}", self.name, count, noun)
    }
}
