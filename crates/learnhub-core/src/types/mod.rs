//! # Core Type Definitions
//!
//! This module contains the types shared by every layer of Learnhub:
//! - Record identifiers (`RecordId`) and timestamps (`Timestamp`)
//! - Entity records and their insert shapes (`records` submodule)
//! - The composite concept view (`ConceptDetail`)
//! - Error types (`HubError`)
//!
//! ## Wire Format
//!
//! Records serialize with the field names the browser client reads:
//! camelCase (`conceptId`, `updatedAt`), except `Paper::key_points`.

mod records;

pub use records::{
    CodeImplementation, Concept, ConceptDetail, Experiment, NewCodeImplementation, NewConcept,
    NewExperiment, NewPaper, NewTheoryContent, NewUser, Paper, TheoryContent, User,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Primary key of a row in one entity table.
///
/// Ids are assigned per table, start at 1 and are never reused within a
/// store's lifetime. Serialized as a bare JSON integer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct RecordId(pub u64);

impl RecordId {
    /// The first id handed out by an empty table.
    pub const FIRST: Self = Self(1);

    /// Get the raw id value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// The id following this one, or `None` once the id space is used up.
    #[must_use]
    pub const fn checked_next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(next) => Some(Self(next)),
            None => None,
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for RecordId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Creation/update instant stamped by the store.
pub type Timestamp = DateTime<Utc>;

// =============================================================================
// RECORD TRAIT
// =============================================================================

/// A row that can live in a [`crate::table::Table`].
pub trait Record: Clone {
    /// The row's primary key.
    fn id(&self) -> RecordId;
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the Learnhub store.
///
/// Missing records are not errors: lookups return `Ok(None)` or an empty
/// list. `HubError` covers genuine failures of a backend and the rejection
/// of duplicate natural keys.
#[derive(Debug, Error)]
pub enum HubError {
    /// A natural key (concept slug, username) is already taken.
    #[error("{table}.{field} '{value}' already exists")]
    DuplicateKey {
        /// Table holding the conflicting row.
        table: &'static str,
        /// Natural-key column.
        field: &'static str,
        /// The rejected value.
        value: String,
    },

    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(String),

    /// The storage backend failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<serde_json::Error> for HubError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_id_serializes_as_bare_integer() {
        let json = serde_json::to_string(&RecordId(7)).expect("serialize");
        assert_eq!(json, "7");

        let back: RecordId = serde_json::from_str("7").expect("deserialize");
        assert_eq!(back, RecordId(7));
    }

    #[test]
    fn record_id_next_stops_at_max() {
        assert_eq!(RecordId(1).checked_next(), Some(RecordId(2)));
        assert_eq!(RecordId(u64::MAX).checked_next(), None);
    }

    #[test]
    fn duplicate_key_message_names_the_key() {
        let err = HubError::DuplicateKey {
            table: "concepts",
            field: "slug",
            value: "contrastive-learning".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "concepts.slug 'contrastive-learning' already exists"
        );
    }
}
