//! Candidate ranking engine.
//!
//! For every source concept the engine either resolves curated synonyms or
//! filters, scores and ranks the target pool:
//!
//! 1. synonym hit → every resolvable listed target, similarity 1.0,
//!    equivalent (no filtering, no ranking);
//! 2. otherwise drop targets blocked by the domain keyword set, score the
//!    rest with [`hybrid_similarity`], stable-sort descending and keep the
//!    top `N`.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use namaste_model::{Concept, MapType, MappingCandidate};
use namaste_standards::MatchingConfig;

use crate::keywords::DomainKeywordSet;
use crate::score::{hybrid_similarity, normalize};
use crate::synonyms::SynonymTable;

/// Identity of a matching job, stamped on every candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchJob {
    pub dataset: String,
    pub source_system: String,
    pub target_system: String,
}

impl MatchJob {
    pub fn new(
        dataset: impl Into<String>,
        source_system: impl Into<String>,
        target_system: impl Into<String>,
    ) -> Self {
        Self {
            dataset: dataset.into(),
            source_system: source_system.into(),
            target_system: target_system.into(),
        }
    }
}

/// A target concept with its score against one source.
#[derive(Debug, Clone, Copy)]
pub struct ScoredTarget<'a> {
    pub concept: &'a Concept,
    pub score: f64,
}

/// Engine for generating candidate mappings between two concept lists.
#[derive(Debug, Clone)]
pub struct MatchingEngine {
    config: MatchingConfig,
    synonyms: SynonymTable,
    keywords: DomainKeywordSet,
}

impl MatchingEngine {
    pub fn new(config: MatchingConfig, synonyms: SynonymTable, keywords: DomainKeywordSet) -> Self {
        Self {
            config,
            synonyms,
            keywords,
        }
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Classify a ranked score.
    pub fn classify(&self, score: f64) -> MapType {
        if score > self.config.equivalence_cutoff {
            MapType::Equivalent
        } else {
            MapType::Related
        }
    }

    /// Generate candidates for every source concept, in source order.
    pub fn match_all(
        &self,
        job: &MatchJob,
        sources: &[Concept],
        targets: &[Concept],
    ) -> Vec<MappingCandidate> {
        let by_display = display_index(targets);
        let mut candidates = Vec::new();
        let mut synonym_hits = 0usize;
        for source in sources {
            if let Some(resolved) = self.resolve_synonyms(job, source, &by_display) {
                synonym_hits += 1;
                candidates.extend(resolved);
                continue;
            }
            candidates.extend(self.rank_source(job, source, targets));
        }
        tracing::debug!(
            dataset = %job.dataset,
            sources = sources.len(),
            targets = targets.len(),
            synonym_hits,
            candidates = candidates.len(),
            "matched dataset"
        );
        candidates
    }

    /// Synonym path for one source. `None` when the table has no entry.
    ///
    /// Listed targets without an exact (case-insensitive) display match in
    /// the pool are dropped.
    pub fn resolve_synonyms(
        &self,
        job: &MatchJob,
        source: &Concept,
        by_display: &BTreeMap<String, &Concept>,
    ) -> Option<Vec<MappingCandidate>> {
        let source_display = source.label();
        let listed = self.synonyms.get(source_display)?;
        Some(
            listed
                .iter()
                .filter_map(|text| by_display.get(&normalize(text)))
                .map(|target| candidate(job, source, target, 1.0, MapType::Equivalent))
                .collect(),
        )
    }

    /// Filter, score and rank the pool against one source (no synonyms).
    pub fn rank_source(
        &self,
        job: &MatchJob,
        source: &Concept,
        targets: &[Concept],
    ) -> Vec<MappingCandidate> {
        self.ranked_targets(source, targets)
            .into_iter()
            .map(|scored| {
                candidate(
                    job,
                    source,
                    scored.concept,
                    scored.score,
                    self.classify(scored.score),
                )
            })
            .collect()
    }

    /// Top-N surviving targets, non-increasing by score, ties in pool order.
    pub fn ranked_targets<'a>(
        &self,
        source: &Concept,
        targets: &'a [Concept],
    ) -> Vec<ScoredTarget<'a>> {
        let source_display = source.label();
        let mut scored: Vec<ScoredTarget<'a>> = targets
            .iter()
            .filter(|target| self.keywords.allows(source_display, target.label()))
            .map(|target| ScoredTarget {
                concept: target,
                score: hybrid_similarity(source_display, target.label()),
            })
            .collect();

        // sort_by is stable: equal scores keep pool order
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        scored.truncate(self.config.top_n);
        scored
    }
}

/// Normalized display → target concept. Later duplicates win.
pub fn display_index(targets: &[Concept]) -> BTreeMap<String, &Concept> {
    targets
        .iter()
        .map(|target| (normalize(&target.display), target))
        .collect()
}

fn candidate(
    job: &MatchJob,
    source: &Concept,
    target: &Concept,
    similarity: f64,
    map_type: MapType,
) -> MappingCandidate {
    MappingCandidate {
        dataset: job.dataset.clone(),
        source_system: job.source_system.clone(),
        source_code: source.code.clone(),
        source_display: source.label().to_string(),
        target_system: job.target_system.clone(),
        target_code: target.code.clone(),
        target_display: target.display.clone(),
        similarity,
        map_type,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(top_n: usize) -> MatchingEngine {
        MatchingEngine::new(
            MatchingConfig {
                top_n,
                ..MatchingConfig::default()
            },
            SynonymTable::empty(),
            DomainKeywordSet::standard(),
        )
    }

    #[test]
    fn classify_uses_strict_cutoff() {
        let engine = engine(3);
        assert_eq!(engine.classify(0.85), MapType::Related);
        assert_eq!(engine.classify(0.851), MapType::Equivalent);
    }

    #[test]
    fn display_index_last_duplicate_wins() {
        let targets = vec![Concept::new("T1", "Fever"), Concept::new("T2", "fever")];
        assert_eq!(display_index(&targets)["fever"].code, "T2");
    }

    #[test]
    fn ties_keep_pool_order() {
        let engine = engine(2);
        let source = Concept::new("S", "abc");
        let targets = vec![
            Concept::new("T1", "abx"),
            Concept::new("T2", "xbc"),
            Concept::new("T3", "axc"),
        ];
        let ranked = engine.ranked_targets(&source, &targets);
        let codes: Vec<_> = ranked.iter().map(|s| s.concept.code.as_str()).collect();
        assert_eq!(codes, vec!["T1", "T2"]);
    }
}
