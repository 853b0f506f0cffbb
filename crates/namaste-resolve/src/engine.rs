//! Resolution engine: CodeSystem retrieval, concept search, code translation.
//!
//! Each operation walks the tiers in order. Tier faults are logged and
//! treated as a miss at that tier, so the only error a caller ever sees is
//! [`ResolveError::BadInput`].

use std::sync::Arc;

use namaste_model::CodeSystem;
use namaste_standards::{ResolutionConfig, SystemUriTable, TerminologyConfig};

use crate::error::{ResolveError, Result};
use crate::fallback::FallbackFiles;
use crate::response::{LookupResult, TranslateResult};
use crate::store::TerminologyStore;
use crate::strategy::{FallbackTier, ResolverTier, StoreTier};

/// Ordered tiers plus the read-only tables they share.
#[derive(Clone)]
pub struct ResolutionEngine {
    tiers: Vec<Arc<dyn ResolverTier>>,
    uris: SystemUriTable,
    config: ResolutionConfig,
}

impl ResolutionEngine {
    pub fn new(
        tiers: Vec<Arc<dyn ResolverTier>>,
        uris: SystemUriTable,
        config: ResolutionConfig,
    ) -> Self {
        Self {
            tiers,
            uris,
            config,
        }
    }

    /// Store tier followed by the configured fallback files.
    pub fn from_config(store: Arc<dyn TerminologyStore>, config: &TerminologyConfig) -> Self {
        let store_tier: Arc<dyn ResolverTier> = Arc::new(StoreTier::new(
            store,
            config.resolution.domain_marker.clone(),
            config.resolution.curated_system_limit,
        ));
        let fallback_tier: Arc<dyn ResolverTier> =
            Arc::new(FallbackTier::new(FallbackFiles::from_config(config)));
        Self::new(
            vec![store_tier, fallback_tier],
            config.system_uris.clone(),
            config.resolution.clone(),
        )
    }

    pub fn tier_names(&self) -> Vec<&'static str> {
        self.tiers.iter().map(|tier| tier.name()).collect()
    }

    /// CodeSystem by id or URL. `None` when no tier has it.
    pub async fn code_system(&self, identifier: &str) -> Result<Option<CodeSystem>> {
        let identifier = required(identifier, "code system identifier")?;
        for tier in &self.tiers {
            tracing::debug!(tier = tier.name(), identifier, "resolving code system");
            let outcome = tier.code_system(identifier).await;
            if let Some(Some(code_system)) = downgrade(tier.as_ref(), "codesystem", outcome) {
                return Ok(Some(code_system));
            }
        }
        tracing::debug!(identifier, "code system not found");
        Ok(None)
    }

    /// Concept search. With a system the named system is searched tier by
    /// tier; without one each tier scans its traditional-medicine systems.
    /// The first tier with a hit answers; an empty result means not found.
    pub async fn lookup(&self, query: &str, system: Option<&str>) -> Result<LookupResult> {
        let query = required(query, "search query")?;
        let system = system.map(str::trim).filter(|s| !s.is_empty());
        let limit = self.config.lookup_limit;

        for tier in &self.tiers {
            tracing::debug!(tier = tier.name(), query, system = ?system, "searching concepts");
            let outcome = match system {
                Some(system) => tier.search_system(system, query, limit).await,
                None => tier.search_curated(query, limit).await,
            };
            if let Some(Some(hits)) = downgrade(tier.as_ref(), "lookup", outcome) {
                return Ok(hits);
            }
        }
        Ok(LookupResult::default())
    }

    /// Translate `code` from `source` to `target`.
    ///
    /// Both systems are canonicalized first. Matches are aggregated across
    /// every map of the first tier that has any.
    pub async fn translate(&self, code: &str, source: &str, target: &str) -> Result<TranslateResult> {
        let code = required(code, "code")?;
        let source = self.uris.canonical_uri(required(source, "source system")?);
        let target = self.uris.canonical_uri(required(target, "target system")?);

        let mut result = TranslateResult {
            code: code.to_string(),
            source_system: source,
            target_system: target,
            result: Vec::new(),
        };
        for tier in &self.tiers {
            tracing::debug!(
                tier = tier.name(),
                code,
                source = %result.source_system,
                target = %result.target_system,
                "translating code"
            );
            let outcome = tier
                .translate(code, &result.source_system, &result.target_system)
                .await;
            if let Some(matches) = downgrade(tier.as_ref(), "translate", outcome)
                && !matches.is_empty()
            {
                result.result = matches;
                break;
            }
        }
        Ok(result)
    }
}

fn required<'a>(value: &'a str, what: &str) -> Result<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        Err(ResolveError::bad_input(format!("{what} is required")))
    } else {
        Ok(value)
    }
}

fn downgrade<T>(tier: &dyn ResolverTier, operation: &'static str, outcome: Result<T>) -> Option<T> {
    match outcome {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(tier = tier.name(), operation, error = %err, "tier failed, treating as miss");
            None
        }
    }
}
