//! Resolver tiers.
//!
//! The engine walks an ordered `Vec<Arc<dyn ResolverTier>>`; the stock order
//! is [`StoreTier`] then [`FallbackTier`]. A tier answers `None` (or an empty
//! list) when it has nothing, and `Err` when it failed.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use namaste_model::{CodeSystem, ConceptMap};

use crate::error::Result;
use crate::fallback::FallbackFiles;
use crate::response::{LookupResult, TranslationMatch};
use crate::store::TerminologyStore;

/// One source of answers for the three resolution operations.
#[async_trait]
pub trait ResolverTier: Send + Sync {
    /// Short name used in log fields.
    fn name(&self) -> &'static str;

    async fn code_system(&self, identifier: &str) -> Result<Option<CodeSystem>>;

    /// Search one named system.
    async fn search_system(
        &self,
        system: &str,
        query: &str,
        limit: usize,
    ) -> Result<Option<LookupResult>>;

    /// Search this tier's traditional-medicine systems, stopping at the
    /// first system with a hit.
    async fn search_curated(&self, query: &str, limit: usize) -> Result<Option<LookupResult>>;

    /// Every target recorded for `code` from `source` to `target`.
    async fn translate(
        &self,
        code: &str,
        source: &str,
        target: &str,
    ) -> Result<Vec<TranslationMatch>>;
}

/// Targets for `code` in every group of `map` connecting the pair.
pub fn collect_targets(
    map: &ConceptMap,
    code: &str,
    source: &str,
    target: &str,
    into: &mut Vec<TranslationMatch>,
) {
    into.extend(map.translate(code, source, target).map(|entry| TranslationMatch {
        code: entry.code.clone(),
        display: entry.display.clone(),
        relationship: entry.relationship,
    }));
}

/// Answers from the authoritative store.
pub struct StoreTier {
    store: Arc<dyn TerminologyStore>,
    domain_marker: String,
    curated_limit: usize,
}

impl StoreTier {
    pub fn new(
        store: Arc<dyn TerminologyStore>,
        domain_marker: impl Into<String>,
        curated_limit: usize,
    ) -> Self {
        Self {
            store,
            domain_marker: domain_marker.into(),
            curated_limit,
        }
    }
}

#[async_trait]
impl ResolverTier for StoreTier {
    fn name(&self) -> &'static str {
        "store"
    }

    async fn code_system(&self, identifier: &str) -> Result<Option<CodeSystem>> {
        Ok(self.store.find_code_system(identifier).await?)
    }

    async fn search_system(
        &self,
        system: &str,
        query: &str,
        limit: usize,
    ) -> Result<Option<LookupResult>> {
        let concepts = self.store.search_concepts(system, query, limit).await?;
        Ok(concepts.and_then(|concepts| LookupResult::from_concepts(&concepts, system)))
    }

    async fn search_curated(&self, query: &str, limit: usize) -> Result<Option<LookupResult>> {
        let systems = self
            .store
            .curated_systems(&self.domain_marker, self.curated_limit)
            .await?;
        for system in systems {
            let concepts = self
                .store
                .search_concepts(&system.id, query, limit)
                .await?
                .unwrap_or_default();
            if let Some(hits) = LookupResult::from_concepts(&concepts, system.canonical()) {
                return Ok(Some(hits));
            }
        }
        Ok(None)
    }

    async fn translate(
        &self,
        code: &str,
        source: &str,
        target: &str,
    ) -> Result<Vec<TranslationMatch>> {
        let mut matches = Vec::new();
        for map in self.store.concept_maps(source, target).await? {
            collect_targets(&map, code, source, target, &mut matches);
        }
        Ok(matches)
    }
}

/// Answers from static documents on disk.
pub struct FallbackTier {
    files: FallbackFiles,
}

impl FallbackTier {
    pub fn new(files: FallbackFiles) -> Self {
        Self { files }
    }

    fn system_label(code_system: &CodeSystem, path: &Path) -> String {
        let canonical = code_system.canonical();
        if canonical.is_empty() {
            path.display().to_string()
        } else {
            canonical.to_string()
        }
    }
}

#[async_trait]
impl ResolverTier for FallbackTier {
    fn name(&self) -> &'static str {
        "fallback"
    }

    async fn code_system(&self, identifier: &str) -> Result<Option<CodeSystem>> {
        Ok(self
            .files
            .code_system_for(identifier)
            .await?
            .map(Arc::unwrap_or_clone))
    }

    async fn search_system(
        &self,
        system: &str,
        query: &str,
        limit: usize,
    ) -> Result<Option<LookupResult>> {
        let Some(code_system) = self.files.code_system_for(system).await? else {
            return Ok(None);
        };
        let label = if code_system.url.is_empty() {
            system
        } else {
            &code_system.url
        };
        Ok(LookupResult::from_concepts(
            code_system.search(query, limit),
            label,
        ))
    }

    async fn search_curated(&self, query: &str, limit: usize) -> Result<Option<LookupResult>> {
        for path in self.files.code_system_files().await? {
            let code_system = match self.files.load_code_system(&path).await {
                Ok(Some(code_system)) => code_system,
                Ok(None) => continue,
                Err(err) => {
                    tracing::warn!(error = %err, "skipping unreadable fallback code system");
                    continue;
                }
            };
            let label = Self::system_label(&code_system, &path);
            if let Some(hits) = LookupResult::from_concepts(code_system.search(query, limit), &label)
            {
                return Ok(Some(hits));
            }
        }
        Ok(None)
    }

    async fn translate(
        &self,
        code: &str,
        source: &str,
        target: &str,
    ) -> Result<Vec<TranslationMatch>> {
        let mut matches = Vec::new();
        for path in self.files.concept_map_files() {
            match self.files.load_concept_map(path).await {
                Ok(Some(map)) => collect_targets(&map, code, source, target, &mut matches),
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(error = %err, "skipping unreadable fallback concept map");
                }
            }
        }
        Ok(matches)
    }
}
