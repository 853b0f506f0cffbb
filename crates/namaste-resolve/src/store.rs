//! Authoritative terminology store interface.

use async_trait::async_trait;

use namaste_model::{CodeSystem, Concept, ConceptMap};

use crate::error::StoreError;

/// Identity of a code system held by a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSystem {
    pub id: String,
    pub url: String,
    pub name: String,
}

impl StoredSystem {
    /// The system URL when present, the id otherwise.
    pub fn canonical(&self) -> &str {
        if self.url.is_empty() {
            &self.id
        } else {
            &self.url
        }
    }
}

impl From<&CodeSystem> for StoredSystem {
    fn from(cs: &CodeSystem) -> Self {
        Self {
            id: cs.id.clone(),
            url: cs.url.clone(),
            name: cs.name.clone(),
        }
    }
}

/// Read access to curated CodeSystem and ConceptMap records.
#[async_trait]
pub trait TerminologyStore: Send + Sync {
    /// CodeSystem whose id or url equals `identifier`.
    async fn find_code_system(&self, identifier: &str) -> Result<Option<CodeSystem>, StoreError>;

    /// Concepts of `system` (id or url) whose code or display contains
    /// `query`, case-insensitively, at most `limit`.
    ///
    /// `None` when the store has no such system.
    async fn search_concepts(
        &self,
        system: &str,
        query: &str,
        limit: usize,
    ) -> Result<Option<Vec<Concept>>, StoreError>;

    /// Systems whose id, name or url contains `marker`, at most `limit`, in
    /// store order.
    async fn curated_systems(
        &self,
        marker: &str,
        limit: usize,
    ) -> Result<Vec<StoredSystem>, StoreError>;

    /// ConceptMaps holding a group from `source` to `target`.
    async fn concept_maps(&self, source: &str, target: &str)
    -> Result<Vec<ConceptMap>, StoreError>;
}
