//! Entity records and their insert shapes.
//!
//! Every entity comes in two forms: the stored record (with `id` and a
//! timestamp assigned by the store) and the `New*` insert shape the caller
//! supplies. Records are immutable once created.

use super::{Record, RecordId, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

// =============================================================================
// USER
// =============================================================================

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: RecordId,
    /// Natural key, unique across the table.
    pub username: String,
    pub password: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub is_admin: bool,
    pub created_at: Timestamp,
}

/// Insert shape for [`User`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

impl NewUser {
    pub(crate) fn into_record(self, id: RecordId, at: Timestamp) -> User {
        User {
            id,
            username: self.username,
            password: self.password,
            name: self.name,
            email: self.email,
            is_admin: self.is_admin,
            created_at: at,
        }
    }
}

// =============================================================================
// CONCEPT
// =============================================================================

/// A named topic that theory, code and experiments attach to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Concept {
    pub id: RecordId,
    /// URL-safe natural key, unique across the table.
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    /// e.g. `semi-supervised`, `self-supervised`.
    pub category: String,
    pub updated_at: Timestamp,
}

/// Insert shape for [`Concept`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewConcept {
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
}

impl NewConcept {
    pub(crate) fn into_record(self, id: RecordId, at: Timestamp) -> Concept {
        Concept {
            id,
            slug: self.slug,
            title: self.title,
            description: self.description,
            category: self.category,
            updated_at: at,
        }
    }
}

// =============================================================================
// THEORY CONTENT
// =============================================================================

/// Long-form markdown (with LaTeX) explaining a concept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TheoryContent {
    pub id: RecordId,
    /// Loose reference to a [`Concept`]; never validated.
    pub concept_id: RecordId,
    pub content: String,
    pub references: Option<String>,
    pub updated_at: Timestamp,
}

/// Insert shape for [`TheoryContent`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTheoryContent {
    pub concept_id: RecordId,
    pub content: String,
    pub references: Option<String>,
}

impl NewTheoryContent {
    pub(crate) fn into_record(self, id: RecordId, at: Timestamp) -> TheoryContent {
        TheoryContent {
            id,
            concept_id: self.concept_id,
            content: self.content,
            references: self.references,
            updated_at: at,
        }
    }
}

// =============================================================================
// CODE IMPLEMENTATION
// =============================================================================

/// A source listing implementing a concept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeImplementation {
    pub id: RecordId,
    pub concept_id: RecordId,
    pub title: String,
    /// Language tag, e.g. `python`, `cpp`, `jupyter`.
    pub language: String,
    pub code: String,
    pub description: Option<String>,
    pub updated_at: Timestamp,
}

/// Insert shape for [`CodeImplementation`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCodeImplementation {
    pub concept_id: RecordId,
    pub title: String,
    pub language: String,
    pub code: String,
    pub description: Option<String>,
}

impl NewCodeImplementation {
    pub(crate) fn into_record(self, id: RecordId, at: Timestamp) -> CodeImplementation {
        CodeImplementation {
            id,
            concept_id: self.concept_id,
            title: self.title,
            language: self.language,
            code: self.code,
            description: self.description,
            updated_at: at,
        }
    }
}

// =============================================================================
// EXPERIMENT
// =============================================================================

/// A recorded training run with its results and per-epoch metrics.
///
/// `results` and `metrics` are free-form JSON: the client charts whatever
/// arrays (`epochs`, `train_loss`, `val_accuracy`, ...) it finds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experiment {
    pub id: RecordId,
    pub concept_id: RecordId,
    pub title: String,
    pub description: Option<String>,
    pub setup: Option<String>,
    pub results: Option<JsonValue>,
    pub metrics: Option<JsonValue>,
    pub updated_at: Timestamp,
}

/// Insert shape for [`Experiment`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExperiment {
    pub concept_id: RecordId,
    pub title: String,
    pub description: Option<String>,
    pub setup: Option<String>,
    pub results: Option<JsonValue>,
    pub metrics: Option<JsonValue>,
}

impl NewExperiment {
    pub(crate) fn into_record(self, id: RecordId, at: Timestamp) -> Experiment {
        Experiment {
            id,
            concept_id: self.concept_id,
            title: self.title,
            description: self.description,
            setup: self.setup,
            results: self.results,
            metrics: self.metrics,
            updated_at: at,
        }
    }
}

// =============================================================================
// PAPER
// =============================================================================

/// A research paper, loosely tagged with concept slugs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paper {
    pub id: RecordId,
    pub title: String,
    pub authors: String,
    pub year: i32,
    pub conference: Option<String>,
    pub link: Option<String>,
    pub r#abstract: Option<String>,
    #[serde(rename = "key_points")]
    pub key_points: Option<String>,
    /// Concept tags. Not checked against the concept table.
    pub concepts: Option<Vec<String>>,
    pub updated_at: Timestamp,
}

impl Paper {
    /// Whether the paper carries at least one of `tags`.
    #[must_use]
    pub fn shares_tag(&self, tags: &[String]) -> bool {
        self.concepts
            .as_deref()
            .is_some_and(|own| own.iter().any(|tag| tags.contains(tag)))
    }
}

/// Insert shape for [`Paper`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPaper {
    pub title: String,
    pub authors: String,
    pub year: i32,
    pub conference: Option<String>,
    pub link: Option<String>,
    pub r#abstract: Option<String>,
    #[serde(rename = "key_points")]
    pub key_points: Option<String>,
    pub concepts: Option<Vec<String>>,
}

impl NewPaper {
    pub(crate) fn into_record(self, id: RecordId, at: Timestamp) -> Paper {
        Paper {
            id,
            title: self.title,
            authors: self.authors,
            year: self.year,
            conference: self.conference,
            link: self.link,
            r#abstract: self.r#abstract,
            key_points: self.key_points,
            concepts: self.concepts,
            updated_at: at,
        }
    }
}

// =============================================================================
// COMPOSITE VIEW
// =============================================================================

/// A concept joined with everything attached to it.
///
/// `theory` is the first theory row for the concept, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptDetail {
    pub concept: Concept,
    pub theory: Option<TheoryContent>,
    pub code_implementations: Vec<CodeImplementation>,
    pub experiments: Vec<Experiment>,
}

// =============================================================================
// RECORD IMPLS
// =============================================================================

macro_rules! impl_record {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Record for $ty {
                fn id(&self) -> RecordId {
                    self.id
                }
            }
        )*
    };
}

impl_record!(
    User,
    Concept,
    TheoryContent,
    CodeImplementation,
    Experiment,
    Paper
);

// =============================================================================
// TESTS
// =============================================================================
