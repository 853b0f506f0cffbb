//! Structured resolution results.
//!
//! These are the source of truth; [`crate::render`] projects them into
//! FHIR-shaped resources.

use serde::Serialize;

use namaste_model::{Concept, Relationship};

/// A concept matched by a search, tagged with its system.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConceptHit {
    pub code: String,
    pub display: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
    pub system: String,
}

impl ConceptHit {
    pub fn new(concept: &Concept, system: &str) -> Self {
        Self {
            code: concept.code.clone(),
            display: concept.display.clone(),
            definition: concept.definition.clone(),
            system: system.to_string(),
        }
    }
}

/// Bounded concept search result. Empty means not found.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LookupResult {
    pub results: Vec<ConceptHit>,
}

impl LookupResult {
    /// Hits for `concepts` in `system`; `None` when there are none.
    pub fn from_concepts<'a, I>(concepts: I, system: &str) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Concept>,
    {
        let results: Vec<_> = concepts
            .into_iter()
            .map(|concept| ConceptHit::new(concept, system))
            .collect();
        if results.is_empty() {
            None
        } else {
            Some(Self { results })
        }
    }

    /// The first hit.
    pub fn best(&self) -> Option<&ConceptHit> {
        self.results.first()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// One target found for a translated code.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranslationMatch {
    pub code: String,
    pub display: String,
    pub relationship: Relationship,
}

/// Translation of one code between two canonical system URIs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateResult {
    pub code: String,
    pub source_system: String,
    pub target_system: String,
    pub result: Vec<TranslationMatch>,
}

impl TranslateResult {
    pub fn found(&self) -> bool {
        !self.result.is_empty()
    }
}
