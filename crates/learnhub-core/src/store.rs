//! # Content Store
//!
//! The `ContentStore` trait is the data-access seam of Learnhub. The HTTP
//! layer talks only to this trait, so the in-memory `MemStore` can be
//! replaced by a persistent backend without touching the handlers.
//!
//! ## Lookup Semantics
//!
//! - Single-record lookups return `Ok(None)` when nothing matches.
//! - List lookups return `Ok(vec![])` when nothing matches.
//! - Criteria lookups are linear scans: first match for natural keys
//!   (`slug`, `username`) and the theory of a concept, every match for
//!   `category` and `conceptId`.
//! - `conceptId` references are recorded as given and never validated.

use crate::table::Table;
use crate::types::{
    CodeImplementation, Concept, ConceptDetail, Experiment, HubError, NewCodeImplementation,
    NewConcept, NewExperiment, NewPaper, NewTheoryContent, NewUser, Paper, RecordId,
    TheoryContent, Timestamp, User,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

// =============================================================================
// CONTENTSTORE TRAIT
// =============================================================================

/// Row counts per table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreCounts {
    pub users: usize,
    pub concepts: usize,
    pub theory_content: usize,
    pub code_implementations: usize,
    pub experiments: usize,
    pub papers: usize,
}

/// The ContentStore trait defines every data-access operation.
///
/// All operations return `Result<T, HubError>` so that in-memory and
/// persistent backends can be used uniformly.
pub trait ContentStore {
    // -------------------------------------------------------------------------
    // Users
    // -------------------------------------------------------------------------

    /// Insert a user. Fails with `DuplicateKey` if the username is taken.
    fn create_user(&mut self, input: NewUser) -> Result<User, HubError>;

    fn get_all_users(&self) -> Result<Vec<User>, HubError>;

    fn get_user_by_id(&self, id: RecordId) -> Result<Option<User>, HubError>;

    fn get_user_by_username(&self, username: &str) -> Result<Option<User>, HubError>;

    // -------------------------------------------------------------------------
    // Concepts
    // -------------------------------------------------------------------------

    /// Insert a concept. Fails with `DuplicateKey` if the slug is taken.
    fn create_concept(&mut self, input: NewConcept) -> Result<Concept, HubError>;

    fn get_all_concepts(&self) -> Result<Vec<Concept>, HubError>;

    fn get_concept_by_id(&self, id: RecordId) -> Result<Option<Concept>, HubError>;

    fn get_concept_by_slug(&self, slug: &str) -> Result<Option<Concept>, HubError>;

    fn get_concepts_by_category(&self, category: &str) -> Result<Vec<Concept>, HubError>;

    // -------------------------------------------------------------------------
    // Theory content
    // -------------------------------------------------------------------------

    fn create_theory_content(&mut self, input: NewTheoryContent)
    -> Result<TheoryContent, HubError>;

    fn get_all_theory_content(&self) -> Result<Vec<TheoryContent>, HubError>;

    fn get_theory_content_by_id(&self, id: RecordId) -> Result<Option<TheoryContent>, HubError>;

    /// First theory row attached to the concept.
    fn get_theory_by_concept_id(
        &self,
        concept_id: RecordId,
    ) -> Result<Option<TheoryContent>, HubError>;

    // -------------------------------------------------------------------------
    // Code implementations
    // -------------------------------------------------------------------------

    fn create_code_implementation(
        &mut self,
        input: NewCodeImplementation,
    ) -> Result<CodeImplementation, HubError>;

    fn get_all_code_implementations(&self) -> Result<Vec<CodeImplementation>, HubError>;

    fn get_code_implementation_by_id(
        &self,
        id: RecordId,
    ) -> Result<Option<CodeImplementation>, HubError>;

    fn get_code_implementations_by_concept_id(
        &self,
        concept_id: RecordId,
    ) -> Result<Vec<CodeImplementation>, HubError>;

    // -------------------------------------------------------------------------
    // Experiments
    // -------------------------------------------------------------------------

    fn create_experiment(&mut self, input: NewExperiment) -> Result<Experiment, HubError>;

    fn get_all_experiments(&self) -> Result<Vec<Experiment>, HubError>;

    fn get_experiment_by_id(&self, id: RecordId) -> Result<Option<Experiment>, HubError>;

    fn get_experiments_by_concept_id(
        &self,
        concept_id: RecordId,
    ) -> Result<Vec<Experiment>, HubError>;

    // -------------------------------------------------------------------------
    // Papers
    // -------------------------------------------------------------------------

    fn create_paper(&mut self, input: NewPaper) -> Result<Paper, HubError>;

    fn get_all_papers(&self) -> Result<Vec<Paper>, HubError>;

    fn get_paper_by_id(&self, id: RecordId) -> Result<Option<Paper>, HubError>;

    /// Papers tagged with at least one of `tags`.
    fn get_related_papers_by_concepts(&self, tags: &[String]) -> Result<Vec<Paper>, HubError>;

    // -------------------------------------------------------------------------
    // Provided
    // -------------------------------------------------------------------------

    /// Resolve a concept by slug and join its theory, code and experiments.
    ///
    /// Returns `Ok(None)` only when the slug is unknown; a concept with no
    /// attachments yields `theory: None` and empty lists.
    fn get_concept_detail(&self, slug: &str) -> Result<Option<ConceptDetail>, HubError> {
        let Some(concept) = self.get_concept_by_slug(slug)? else {
            return Ok(None);
        };

        let theory = self.get_theory_by_concept_id(concept.id)?;
        let code_implementations = self.get_code_implementations_by_concept_id(concept.id)?;
        let experiments = self.get_experiments_by_concept_id(concept.id)?;

        Ok(Some(ConceptDetail {
            concept,
            theory,
            code_implementations,
            experiments,
        }))
    }

    /// Row count of every table.
    fn counts(&self) -> Result<StoreCounts, HubError> {
        Ok(StoreCounts {
            users: self.get_all_users()?.len(),
            concepts: self.get_all_concepts()?.len(),
            theory_content: self.get_all_theory_content()?.len(),
            code_implementations: self.get_all_code_implementations()?.len(),
            experiments: self.get_all_experiments()?.len(),
            papers: self.get_all_papers()?.len(),
        })
    }
}

// =============================================================================
// MEMSTORE IMPLEMENTATION
// =============================================================================

/// In-memory store: one `Table` per entity kind.
///
/// State lives as long as the value; nothing is written anywhere.
#[derive(Debug, Clone, Default)]
pub struct MemStore {
    pub(crate) users: Table<User>,
    pub(crate) concepts: Table<Concept>,
    pub(crate) theory_content: Table<TheoryContent>,
    pub(crate) code_implementations: Table<CodeImplementation>,
    pub(crate) experiments: Table<Experiment>,
    pub(crate) papers: Table<Paper>,
}

impl MemStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store preloaded with the seed dataset.
    pub fn seeded() -> Result<Self, HubError> {
        let mut store = Self::new();
        crate::seed::load_into(&mut store)?;
        Ok(store)
    }

    /// The id the next insert into each table will receive.
    #[must_use]
    pub fn next_ids(&self) -> NextIds {
        NextIds {
            users: self.users.peek_next_id(),
            concepts: self.concepts.peek_next_id(),
            theory_content: self.theory_content.peek_next_id(),
            code_implementations: self.code_implementations.peek_next_id(),
            experiments: self.experiments.peek_next_id(),
            papers: self.papers.peek_next_id(),
        }
    }

    fn now() -> Timestamp {
        Utc::now()
    }
}

/// Next id per table, as reported by [`MemStore::next_ids`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NextIds {
    pub users: RecordId,
    pub concepts: RecordId,
    pub theory_content: RecordId,
    pub code_implementations: RecordId,
    pub experiments: RecordId,
    pub papers: RecordId,
}

impl ContentStore for MemStore {
    fn create_user(&mut self, input: NewUser) -> Result<User, HubError> {
        if self.users.find(|u| u.username == input.username).is_some() {
            return Err(HubError::DuplicateKey {
                table: "users",
                field: "username",
                value: input.username,
            });
        }
        let at = Self::now();
        self.users.insert_with(|id| input.into_record(id, at))
    }

    fn get_all_users(&self) -> Result<Vec<User>, HubError> {
        Ok(self.users.all())
    }

    fn get_user_by_id(&self, id: RecordId) -> Result<Option<User>, HubError> {
        Ok(self.users.get(id).cloned())
    }

    fn get_user_by_username(&self, username: &str) -> Result<Option<User>, HubError> {
        Ok(self.users.find(|u| u.username == username).cloned())
    }

    fn create_concept(&mut self, input: NewConcept) -> Result<Concept, HubError> {
        if self.concepts.find(|c| c.slug == input.slug).is_some() {
            return Err(HubError::DuplicateKey {
                table: "concepts",
                field: "slug",
                value: input.slug,
            });
        }
        let at = Self::now();
        self.concepts.insert_with(|id| input.into_record(id, at))
    }

    fn get_all_concepts(&self) -> Result<Vec<Concept>, HubError> {
        Ok(self.concepts.all())
    }

    fn get_concept_by_id(&self, id: RecordId) -> Result<Option<Concept>, HubError> {
        Ok(self.concepts.get(id).cloned())
    }

    fn get_concept_by_slug(&self, slug: &str) -> Result<Option<Concept>, HubError> {
        Ok(self.concepts.find(|c| c.slug == slug).cloned())
    }

    fn get_concepts_by_category(&self, category: &str) -> Result<Vec<Concept>, HubError> {
        Ok(self.concepts.filter(|c| c.category == category))
    }

    fn create_theory_content(
        &mut self,
        input: NewTheoryContent,
    ) -> Result<TheoryContent, HubError> {
        let at = Self::now();
        self.theory_content.insert_with(|id| input.into_record(id, at))
    }

    fn get_all_theory_content(&self) -> Result<Vec<TheoryContent>, HubError> {
        Ok(self.theory_content.all())
    }

    fn get_theory_content_by_id(&self, id: RecordId) -> Result<Option<TheoryContent>, HubError> {
        Ok(self.theory_content.get(id).cloned())
    }

    fn get_theory_by_concept_id(
        &self,
        concept_id: RecordId,
    ) -> Result<Option<TheoryContent>, HubError> {
        Ok(self
            .theory_content
            .find(|t| t.concept_id == concept_id)
            .cloned())
    }

    fn create_code_implementation(
        &mut self,
        input: NewCodeImplementation,
    ) -> Result<CodeImplementation, HubError> {
        let at = Self::now();
        self.code_implementations.insert_with(|id| input.into_record(id, at))
    }

    fn get_all_code_implementations(&self) -> Result<Vec<CodeImplementation>, HubError> {
        Ok(self.code_implementations.all())
    }

    fn get_code_implementation_by_id(
        &self,
        id: RecordId,
    ) -> Result<Option<CodeImplementation>, HubError> {
        Ok(self.code_implementations.get(id).cloned())
    }

    fn get_code_implementations_by_concept_id(
        &self,
        concept_id: RecordId,
    ) -> Result<Vec<CodeImplementation>, HubError> {
        Ok(self
            .code_implementations
            .filter(|c| c.concept_id == concept_id))
    }

    fn create_experiment(&mut self, input: NewExperiment) -> Result<Experiment, HubError> {
        let at = Self::now();
        self.experiments.insert_with(|id| input.into_record(id, at))
    }

    fn get_all_experiments(&self) -> Result<Vec<Experiment>, HubError> {
        Ok(self.experiments.all())
    }

    fn get_experiment_by_id(&self, id: RecordId) -> Result<Option<Experiment>, HubError> {
        Ok(self.experiments.get(id).cloned())
    }

    fn get_experiments_by_concept_id(
        &self,
        concept_id: RecordId,
    ) -> Result<Vec<Experiment>, HubError> {
        Ok(self.experiments.filter(|e| e.concept_id == concept_id))
    }

    fn create_paper(&mut self, input: NewPaper) -> Result<Paper, HubError> {
        let at = Self::now();
        self.papers.insert_with(|id| input.into_record(id, at))
    }

    fn get_all_papers(&self) -> Result<Vec<Paper>, HubError> {
        Ok(self.papers.all())
    }

    fn get_paper_by_id(&self, id: RecordId) -> Result<Option<Paper>, HubError> {
        Ok(self.papers.get(id).cloned())
    }

    fn get_related_papers_by_concepts(&self, tags: &[String]) -> Result<Vec<Paper>, HubError> {
        Ok(self.papers.filter(|p| p.shares_tag(tags)))
    }

    fn counts(&self) -> Result<StoreCounts, HubError> {
        Ok(StoreCounts {
            users: self.users.len(),
            concepts: self.concepts.len(),
            theory_content: self.theory_content.len(),
            code_implementations: self.code_implementations.len(),
            experiments: self.experiments.len(),
            papers: self.papers.len(),
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
