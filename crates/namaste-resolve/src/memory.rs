//! In-process terminology store.
//!
//! Mirrors the import rules of the curated database: a CodeSystem whose
//! `(id, version)` is already present is skipped, concepts sharing a code are
//! collapsed with the last write winning, and ConceptMaps are replaced by id.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use namaste_model::{
    CODE_SYSTEM_RESOURCE, CONCEPT_MAP_RESOURCE, CodeSystem, Concept, ConceptMap,
};

use crate::error::StoreError;
use crate::store::{StoredSystem, TerminologyStore};

/// Result of importing one CodeSystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    /// Stored with this many distinct concepts.
    Imported { concepts: usize },
    /// Same id and version already present.
    Skipped,
}

/// Counts from [`MemoryStore::load_dir`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub code_systems: usize,
    pub concept_maps: usize,
    pub skipped: usize,
    /// JSON files with some other `resourceType`.
    pub ignored: Vec<PathBuf>,
}

#[derive(Debug, Default)]
struct State {
    code_systems: Vec<CodeSystem>,
    concept_maps: Vec<ConceptMap>,
}

/// A [`TerminologyStore`] held in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn import_code_system(&self, mut code_system: CodeSystem) -> ImportOutcome {
        let mut state = self.state.write().await;
        let exists = state
            .code_systems
            .iter()
            .any(|cs| cs.id == code_system.id && cs.version == code_system.version);
        if exists {
            tracing::info!(
                id = %code_system.id,
                version = %code_system.version,
                "code system version already imported, skipping"
            );
            return ImportOutcome::Skipped;
        }

        code_system.dedup_concepts();
        let concepts = code_system.concepts.len();
        tracing::info!(id = %code_system.id, version = %code_system.version, concepts, "imported code system");
        state.code_systems.push(code_system);
        ImportOutcome::Imported { concepts }
    }

    pub async fn import_concept_map(&self, concept_map: ConceptMap) {
        let mut state = self.state.write().await;
        state.concept_maps.retain(|existing| existing.id != concept_map.id);
        tracing::info!(
            id = %concept_map.id,
            elements = concept_map.element_count(),
            "imported concept map"
        );
        state.concept_maps.push(concept_map);
    }

    /// Import every `*.json` file in `dir` (file-name order), dispatching on
    /// `resourceType`.
    pub async fn load_dir(&self, dir: &Path) -> Result<ImportReport, StoreError> {
        let io_err = |source| StoreError::Io {
            path: dir.to_path_buf(),
            source,
        };
        let mut entries = tokio::fs::read_dir(dir).await.map_err(io_err)?;
        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }
        files.sort();

        let mut report = ImportReport::default();
        for path in files {
            let bytes = tokio::fs::read(&path).await.map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;
            let record_err = |source| StoreError::Record {
                path: path.clone(),
                source,
            };
            let value: Value = serde_json::from_slice(&bytes).map_err(record_err)?;
            let resource_type = value
                .get("resourceType")
                .and_then(Value::as_str)
                .map(str::to_string);
            match resource_type.as_deref() {
                Some(CODE_SYSTEM_RESOURCE) => {
                    let cs: CodeSystem = serde_json::from_value(value).map_err(record_err)?;
                    match self.import_code_system(cs).await {
                        ImportOutcome::Imported { .. } => report.code_systems += 1,
                        ImportOutcome::Skipped => report.skipped += 1,
                    }
                }
                Some(CONCEPT_MAP_RESOURCE) => {
                    let map: ConceptMap = serde_json::from_value(value).map_err(record_err)?;
                    self.import_concept_map(map).await;
                    report.concept_maps += 1;
                }
                other => {
                    tracing::debug!(path = %path.display(), resource_type = ?other, "ignoring resource");
                    report.ignored.push(path);
                }
            }
        }
        Ok(report)
    }

    pub async fn code_system_count(&self) -> usize {
        self.state.read().await.code_systems.len()
    }

    pub async fn concept_map_count(&self) -> usize {
        self.state.read().await.concept_maps.len()
    }
}

#[async_trait]
impl TerminologyStore for MemoryStore {
    async fn find_code_system(&self, identifier: &str) -> Result<Option<CodeSystem>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .code_systems
            .iter()
            .find(|cs| cs.is_identified_by(identifier))
            .cloned())
    }

    async fn search_concepts(
        &self,
        system: &str,
        query: &str,
        limit: usize,
    ) -> Result<Option<Vec<Concept>>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .code_systems
            .iter()
            .find(|cs| cs.is_identified_by(system))
            .map(|cs| cs.search(query, limit).into_iter().cloned().collect()))
    }

    async fn curated_systems(
        &self,
        marker: &str,
        limit: usize,
    ) -> Result<Vec<StoredSystem>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .code_systems
            .iter()
            .filter(|cs| cs.carries_marker(marker))
            .take(limit)
            .map(StoredSystem::from)
            .collect())
    }

    async fn concept_maps(
        &self,
        source: &str,
        target: &str,
    ) -> Result<Vec<ConceptMap>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .concept_maps
            .iter()
            .filter(|map| map.group.iter().any(|group| group.connects(source, target)))
            .cloned()
            .collect())
    }
}
