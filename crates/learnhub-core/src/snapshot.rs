//! # Store Snapshots
//!
//! A `StoreSnapshot` is the full content of a [`MemStore`] as plain JSON:
//! one array per table plus a small version header. The CLI writes one with
//! `export` and the server can start from one with `--data`.
//!
//! Restoring keeps every row's id and timestamp. Each table's counter
//! resumes after its highest id.

use crate::store::MemStore;
use crate::table::Table;
use crate::types::{
    CodeImplementation, Concept, Experiment, HubError, Paper, TheoryContent, User,
};
use serde::{Deserialize, Serialize};

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serializable image of every table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    pub version: u32,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub concepts: Vec<Concept>,
    #[serde(default)]
    pub theory_content: Vec<TheoryContent>,
    #[serde(default)]
    pub code_implementations: Vec<CodeImplementation>,
    #[serde(default)]
    pub experiments: Vec<Experiment>,
    #[serde(default)]
    pub papers: Vec<Paper>,
}

impl StoreSnapshot {
    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, HubError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and version-check a snapshot.
    pub fn from_json(text: &str) -> Result<Self, HubError> {
        let snapshot: Self = serde_json::from_str(text)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(HubError::Serialization(format!(
                "unsupported snapshot version {} (expected {})",
                snapshot.version, SNAPSHOT_VERSION
            )));
        }
        Ok(snapshot)
    }
}

impl MemStore {
    /// Copy every table into a snapshot.
    #[must_use]
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            version: SNAPSHOT_VERSION,
            users: self.users.all(),
            concepts: self.concepts.all(),
            theory_content: self.theory_content.all(),
            code_implementations: self.code_implementations.all(),
            experiments: self.experiments.all(),
            papers: self.papers.all(),
        }
    }

    /// Rebuild a store from a snapshot.
    ///
    /// Fails if a primary key or a natural key (concept slug, username)
    /// appears twice in one table, since the live store could never have
    /// produced such a snapshot.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Result<Self, HubError> {
        reject_duplicates("users", "username", snapshot.users.iter().map(|u| &u.username))?;
        reject_duplicates("concepts", "slug", snapshot.concepts.iter().map(|c| &c.slug))?;

        Ok(Self {
            users: Table::from_records("users", snapshot.users)?,
            concepts: Table::from_records("concepts", snapshot.concepts)?,
            theory_content: Table::from_records("theory_content", snapshot.theory_content)?,
            code_implementations: Table::from_records(
                "code_implementations",
                snapshot.code_implementations,
            )?,
            experiments: Table::from_records("experiments", snapshot.experiments)?,
            papers: Table::from_records("papers", snapshot.papers)?,
        })
    }
}

fn reject_duplicates<'a>(
    table: &'static str,
    field: &'static str,
    keys: impl Iterator<Item = &'a String>,
) -> Result<(), HubError> {
    let mut seen = std::collections::BTreeSet::new();
    for key in keys {
        if !seen.insert(key.as_str()) {
            return Err(HubError::DuplicateKey {
                table,
                field,
                value: key.clone(),
            });
        }
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ContentStore;
    use crate::types::{NewConcept, RecordId};

    fn concept(slug: &str) -> NewConcept {
        NewConcept {
            slug: slug.to_string(),
            title: slug.to_string(),
            description: None,
            category: "x".to_string(),
        }
    }

    #[test]
    fn restored_store_matches_and_resumes_ids() {
        let store = MemStore::seeded().expect("seed");
        let json = store.snapshot().to_json().expect("to json");

        let snapshot = StoreSnapshot::from_json(&json).expect("from json");
        let mut restored = MemStore::from_snapshot(snapshot).expect("restore");

        assert_eq!(restored.counts().expect("counts"), store.counts().expect("counts"));
        assert_eq!(
            restored.get_all_papers().expect("papers"),
            store.get_all_papers().expect("papers")
        );
        assert_eq!(restored.next_ids(), store.next_ids());

        let created = restored.create_concept(concept("fresh")).expect("create");
        assert_eq!(created.id, RecordId(4));
    }

    #[test]
    fn gaps_in_ids_are_preserved() {
        let mut store = MemStore::new();
        for slug in ["a", "b", "c"] {
            store.create_concept(concept(slug)).expect("create");
        }
        let mut snapshot = store.snapshot();
        snapshot.concepts.remove(1);

        let mut restored = MemStore::from_snapshot(snapshot).expect("restore");
        assert!(restored.get_concept_by_id(RecordId(2)).expect("get").is_none());
        let next = restored.create_concept(concept("d")).expect("create");
        assert_eq!(next.id, RecordId(4));
    }

    #[test]
    fn duplicate_slug_in_snapshot_is_rejected() {
        let mut store = MemStore::new();
        store.create_concept(concept("a")).expect("create");
        let mut snapshot = store.snapshot();
        let mut copy = snapshot.concepts[0].clone();
        copy.id = RecordId(2);
        snapshot.concepts.push(copy);

        assert!(matches!(
            MemStore::from_snapshot(snapshot),
            Err(HubError::DuplicateKey { field: "slug", .. })
        ));
    }

    #[test]
    fn repeated_id_in_snapshot_is_rejected() {
        let mut store = MemStore::new();
        store.create_concept(concept("a")).expect("create");
        let mut snapshot = store.snapshot();
        let mut other = snapshot.concepts[0].clone();
        other.slug = "b".to_string();
        snapshot.concepts.push(other);

        assert!(matches!(
            MemStore::from_snapshot(snapshot),
            Err(HubError::DuplicateKey {
                table: "concepts",
                field: "id",
                ..
            })
        ));
    }

    #[test]
    fn restored_max_id_never_gets_reused() {
        let mut store = MemStore::new();
        store.create_concept(concept("a")).expect("create");

        let mut snapshot = store.snapshot();
        snapshot.concepts[0].id = RecordId(u64::MAX);
        assert!(matches!(
            MemStore::from_snapshot(snapshot),
            Err(HubError::Storage(_))
        ));

        let mut snapshot = store.snapshot();
        snapshot.concepts[0].id = RecordId(u64::MAX - 1);
        let mut restored = MemStore::from_snapshot(snapshot).expect("restore");
        assert!(matches!(
            restored.create_concept(concept("new")),
            Err(HubError::Storage(_))
        ));

        let slugs: Vec<_> = restored
            .get_all_concepts()
            .expect("all")
            .into_iter()
            .map(|c| c.slug)
            .collect();
        assert_eq!(slugs, vec!["a"]);
    }

    #[test]
    fn wrong_version_is_rejected() {
        let json = r#"{ "version": 99 }"#;
        assert!(matches!(
            StoreSnapshot::from_json(json),
            Err(HubError::Serialization(_))
        ));

        let empty = StoreSnapshot::from_json(r#"{ "version": 1 }"#).expect("parse");
        assert!(empty.concepts.is_empty());
    }
}
