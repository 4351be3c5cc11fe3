//! # learnhub-core
//!
//! The content store for Learnhub - THE DATA.
//!
//! Learnhub serves educational material on semi-supervised and
//! self-supervised learning: concepts, theory write-ups, code listings,
//! experiment runs and research papers. This crate holds all of it.
//!
//! ## Layout
//!
//! - `types`: records, insert shapes, ids and `HubError`
//! - `table`: one auto-increment table
//! - `store`: the `ContentStore` trait and the in-memory `MemStore`
//! - `schema`: validation of untyped JSON bodies into insert shapes
//! - `seed`: the built-in dataset
//! - `snapshot`: JSON image of a whole store
//!
//! ## Architectural Constraints
//!
//! - NO async, NO network, NO logging: the app crate owns those
//! - Missing records are `Ok(None)` / `Ok(vec![])`, never errors
//! - Ids start at 1 per table and are never reused

// =============================================================================
// MODULES
// =============================================================================

pub mod primitives;
pub mod schema;
pub mod seed;
pub mod snapshot;
pub mod store;
pub mod table;
pub mod types;

// =============================================================================
// RE-EXPORTS: Types
// =============================================================================

pub use types::{
    CodeImplementation, Concept, ConceptDetail, Experiment, HubError, NewCodeImplementation,
    NewConcept, NewExperiment, NewPaper, NewTheoryContent, NewUser, Paper, Record, RecordId,
    TheoryContent, Timestamp, User,
};

// =============================================================================
// RE-EXPORTS: Store
// =============================================================================

pub use schema::{FieldError, FieldErrorCode, InsertSchema, PathSegment, ValidationErrors};
pub use seed::{CONTRASTIVE_SLUG, SELF_SUPERVISED_SLUG, SEMI_SUPERVISED_SLUG};
pub use snapshot::{SNAPSHOT_VERSION, StoreSnapshot};
pub use store::{ContentStore, MemStore, NextIds, StoreCounts};
pub use table::Table;
