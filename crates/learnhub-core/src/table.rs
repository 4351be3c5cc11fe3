//! # Entity Tables
//!
//! A `Table` emulates one relational table with an auto-increment primary
//! key. Rows are kept in a `BTreeMap` keyed by id, so iteration order is
//! ascending id, which is also insertion order because ids are never reused.

use crate::types::{HubError, Record, RecordId};
use std::collections::BTreeMap;

/// One auto-increment entity table.
#[derive(Debug, Clone)]
pub struct Table<T> {
    /// Row storage: RecordId -> row
    rows: BTreeMap<RecordId, T>,

    /// Next id to hand out. Only ever grows.
    next_id: RecordId,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: RecordId::FIRST,
        }
    }
}

impl<T: Record> Table<T> {
    /// Create a new empty table whose first id is 1.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a table from previously stored rows, preserving their ids.
    ///
    /// The counter resumes after the highest id present, so restored ids are
    /// never handed out again. Two rows sharing an id, or an id with no
    /// successor, are rejected.
    pub fn from_records(
        name: &'static str,
        records: impl IntoIterator<Item = T>,
    ) -> Result<Self, HubError> {
        let mut table = Self::new();
        for record in records {
            let id = record.id();
            if table.rows.contains_key(&id) {
                return Err(HubError::DuplicateKey {
                    table: name,
                    field: "id",
                    value: id.to_string(),
                });
            }
            if id >= table.next_id {
                table.next_id = id.checked_next().ok_or_else(|| {
                    HubError::Storage(format!("{}: id {} leaves no id to assign", name, id))
                })?;
            }
            table.rows.insert(id, record);
        }
        Ok(table)
    }

    /// Assign the next id, build the row with it and store it.
    ///
    /// Returns a clone of the stored row. Fails without storing anything
    /// once the id space is exhausted.
    pub fn insert_with(&mut self, build: impl FnOnce(RecordId) -> T) -> Result<T, HubError> {
        let id = self.next_id;
        let next = id
            .checked_next()
            .ok_or_else(|| HubError::Storage("id space exhausted".to_string()))?;
        self.next_id = next;
        let row = build(id);
        self.rows.insert(id, row.clone());
        Ok(row)
    }

    /// Lookup a row by primary key.
    #[must_use]
    pub fn get(&self, id: RecordId) -> Option<&T> {
        self.rows.get(&id)
    }

    /// All rows in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.rows.values()
    }

    /// Clone of every row in insertion order.
    #[must_use]
    pub fn all(&self) -> Vec<T> {
        self.rows.values().cloned().collect()
    }

    /// First row matching `predicate` (linear scan).
    #[must_use]
    pub fn find(&self, predicate: impl Fn(&T) -> bool) -> Option<&T> {
        self.rows.values().find(|row| predicate(row))
    }

    /// Every row matching `predicate`, in insertion order (linear scan).
    #[must_use]
    pub fn filter(&self, predicate: impl Fn(&T) -> bool) -> Vec<T> {
        self.rows
            .values()
            .filter(|row| predicate(row))
            .cloned()
            .collect()
    }

    /// Number of stored rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The id the next insert will receive.
    #[must_use]
    pub fn peek_next_id(&self) -> RecordId {
        self.next_id
    }
}

// =============================================================================
// TESTS
// =============================================================================
