//! Wiring from configuration to the matching and resolution engines.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use namaste_map::{DomainKeywordSet, MatchingEngine, Materializer, SynonymTable};
use namaste_resolve::{MemoryStore, ResolutionEngine};
use namaste_standards::TerminologyConfig;
use namaste_standards::paths::{DEFAULT_CONFIG_FILE, data_root};

/// Load `explicit`, else `<data root>/namaste.toml` if present, else defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<TerminologyConfig> {
    if let Some(path) = explicit {
        return TerminologyConfig::load(path)
            .with_context(|| format!("load config {}", path.display()));
    }
    let candidate = data_root(Path::new(".")).join(DEFAULT_CONFIG_FILE);
    if candidate.is_file() {
        TerminologyConfig::load(&candidate)
            .with_context(|| format!("load config {}", candidate.display()))
    } else {
        tracing::debug!(path = %candidate.display(), "no config file, using defaults");
        Ok(TerminologyConfig::default())
    }
}

/// Matcher and materializer for the configured jobs.
pub fn build_materializer(config: &TerminologyConfig) -> Result<Materializer> {
    let synonyms = match &config.synonyms_file {
        Some(file) => {
            let path = config.resolve(file);
            SynonymTable::load_optional(&path)
                .with_context(|| format!("load synonyms {}", path.display()))?
        }
        None => SynonymTable::empty(),
    };
    let keywords = DomainKeywordSet::new(&config.keywords);
    tracing::debug!(
        synonyms = synonyms.len(),
        keywords = keywords.len(),
        "matching tables ready"
    );
    let engine = MatchingEngine::new(config.matching, synonyms, keywords);
    Ok(Materializer::new(
        engine,
        config.system_uris.clone(),
        config.concept_map.clone(),
        config.output_path(),
    ))
}

/// A memory store seeded from `store_dir`, or empty.
pub async fn load_store(store_dir: Option<&Path>) -> Result<MemoryStore> {
    let store = MemoryStore::new();
    if let Some(dir) = store_dir {
        let report = store
            .load_dir(dir)
            .await
            .with_context(|| format!("load store records from {}", dir.display()))?;
        tracing::info!(
            code_systems = report.code_systems,
            concept_maps = report.concept_maps,
            skipped = report.skipped,
            ignored = report.ignored.len(),
            "store loaded"
        );
    }
    Ok(store)
}

/// Resolution engine over `store` and the configured fallback files.
pub fn build_engine(store: MemoryStore, config: &TerminologyConfig) -> ResolutionEngine {
    let engine = ResolutionEngine::from_config(Arc::new(store), config);
    tracing::debug!(tiers = ?engine.tier_names(), "resolution engine ready");
    engine
}
