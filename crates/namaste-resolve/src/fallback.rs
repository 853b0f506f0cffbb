//! Static fallback documents on disk.
//!
//! CodeSystems live in one directory as `CodeSystem-*.json`; ConceptMaps are
//! read from a declared list of files. A missing file is a miss, a malformed
//! one is a [`ResolveError::ParseFailure`].

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

use namaste_model::{CodeSystem, ConceptMap};
use namaste_standards::{SystemFileTable, TerminologyConfig};

use crate::error::{ResolveError, Result};

const CODE_SYSTEM_PREFIX: &str = "CodeSystem-";

/// Process-lifetime memo of parsed documents keyed by path.
#[derive(Debug)]
struct DocumentCache<T> {
    entries: Mutex<HashMap<PathBuf, Arc<T>>>,
}

impl<T> Default for DocumentCache<T> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

/// Fallback document locations plus the optional parse memo.
#[derive(Debug)]
pub struct FallbackFiles {
    codesystem_dir: PathBuf,
    concept_map_files: Vec<PathBuf>,
    system_files: SystemFileTable,
    code_systems: Option<DocumentCache<CodeSystem>>,
    concept_maps: Option<DocumentCache<ConceptMap>>,
}

impl FallbackFiles {
    pub fn new(
        codesystem_dir: PathBuf,
        concept_map_files: Vec<PathBuf>,
        system_files: SystemFileTable,
    ) -> Self {
        Self {
            codesystem_dir,
            concept_map_files,
            system_files,
            code_systems: None,
            concept_maps: None,
        }
    }

    /// Keep parsed documents for the life of this value.
    pub fn with_cache(mut self) -> Self {
        self.code_systems = Some(DocumentCache::default());
        self.concept_maps = Some(DocumentCache::default());
        self
    }

    pub fn from_config(config: &TerminologyConfig) -> Self {
        let files = Self::new(
            config.codesystem_dir(),
            config.concept_map_paths(),
            config.system_files.clone(),
        );
        if config.fallback.cache_documents {
            files.with_cache()
        } else {
            files
        }
    }

    /// Fallback path for a system identifier.
    pub fn code_system_path(&self, identifier: &str) -> PathBuf {
        self.codesystem_dir
            .join(self.system_files.file_for(identifier))
    }

    pub fn concept_map_files(&self) -> &[PathBuf] {
        &self.concept_map_files
    }

    /// Load the fallback CodeSystem for `identifier`.
    pub async fn code_system_for(&self, identifier: &str) -> Result<Option<Arc<CodeSystem>>> {
        self.load_code_system(&self.code_system_path(identifier))
            .await
    }

    pub async fn load_code_system(&self, path: &Path) -> Result<Option<Arc<CodeSystem>>> {
        load_cached(self.code_systems.as_ref(), path).await
    }

    pub async fn load_concept_map(&self, path: &Path) -> Result<Option<Arc<ConceptMap>>> {
        load_cached(self.concept_maps.as_ref(), path).await
    }

    /// `CodeSystem-*.json` files in the fallback directory, by file name.
    ///
    /// A missing directory yields no files.
    pub async fn code_system_files(&self) -> Result<Vec<PathBuf>> {
        let io_err = |source| ResolveError::Io {
            path: self.codesystem_dir.clone(),
            source,
        };
        let mut entries = match tokio::fs::read_dir(&self.codesystem_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_err(e)),
        };
        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with(CODE_SYSTEM_PREFIX) && name.ends_with(".json") {
                files.push(entry.path());
            }
        }
        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(files)
    }
}

async fn load_cached<T: DeserializeOwned>(
    cache: Option<&DocumentCache<T>>,
    path: &Path,
) -> Result<Option<Arc<T>>> {
    if let Some(cache) = cache
        && let Some(hit) = cache.entries.lock().await.get(path)
    {
        return Ok(Some(Arc::clone(hit)));
    }

    let Some(document) = read_document::<T>(path).await? else {
        return Ok(None);
    };
    let document = Arc::new(document);
    if let Some(cache) = cache {
        cache
            .entries
            .lock()
            .await
            .insert(path.to_path_buf(), Arc::clone(&document));
    }
    Ok(Some(document))
}

/// Read and parse one JSON document. `None` when the file does not exist.
pub async fn read_document<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "fallback document absent");
            return Ok(None);
        }
        Err(source) => {
            return Err(ResolveError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|source| ResolveError::ParseFailure {
            path: path.to_path_buf(),
            source,
        })
}
