//! CodeSystem and Concept model.
//!
//! Both NAMASTE sub-terminologies (Ayurveda, Siddha, Unani) and the ICD-11
//! modules (TM2, Biomedicine) are carried as FHIR-shaped `CodeSystem`
//! documents. The serde layout matches the JSON stored in the fallback
//! directory so the same type reads store records and fallback files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::lenient;

/// FHIR resource type tag for code systems.
pub const CODE_SYSTEM_RESOURCE: &str = "CodeSystem";

/// A single concept within a code system.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Concept {
    /// Code, unique within the owning code system. Numeric codes are read
    /// as text.
    #[serde(deserialize_with = "lenient::text")]
    pub code: String,

    /// Human-readable display text; `null` reads as empty.
    #[serde(default, deserialize_with = "lenient::text")]
    pub display: String,

    /// Optional free-text definition.
    #[serde(
        default,
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub definition: Option<String>,

    /// Designations as stored (language/use/value objects).
    #[serde(
        default,
        rename = "designation",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub designations: Vec<Value>,

    /// Concept properties as stored.
    #[serde(default, rename = "property", skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<Value>,
}

impl Concept {
    /// Create a concept with only code and display set.
    pub fn new(code: impl Into<String>, display: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            display: display.into(),
            ..Self::default()
        }
    }

    /// Display text, or the code when no display is recorded.
    pub fn label(&self) -> &str {
        if self.display.trim().is_empty() {
            &self.code
        } else {
            &self.display
        }
    }

    /// Case-insensitive substring match against code or display.
    ///
    /// `needle_lower` must already be lower-cased.
    pub fn matches_query(&self, needle_lower: &str) -> bool {
        self.code.to_lowercase().contains(needle_lower)
            || self.display.to_lowercase().contains(needle_lower)
    }
}

/// An enumeration of one coding system's concepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeSystem {
    #[serde(default = "code_system_resource_type")]
    pub resource_type: String,
    pub id: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, rename = "concept")]
    pub concepts: Vec<Concept>,
}

fn code_system_resource_type() -> String {
    CODE_SYSTEM_RESOURCE.to_string()
}

impl CodeSystem {
    /// Create an empty, active, complete code system.
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            resource_type: code_system_resource_type(),
            id: id.into(),
            url: url.into(),
            version: String::new(),
            name: String::new(),
            status: "active".to_string(),
            content: "complete".to_string(),
            concepts: Vec::new(),
        }
    }

    /// True if `identifier` equals this system's id or url.
    pub fn is_identified_by(&self, identifier: &str) -> bool {
        self.id == identifier || (!self.url.is_empty() && self.url == identifier)
    }

    /// True if id, name or url contains `marker` (case-insensitive).
    pub fn carries_marker(&self, marker: &str) -> bool {
        let marker = marker.to_lowercase();
        [&self.id, &self.name, &self.url]
            .iter()
            .any(|field| field.to_lowercase().contains(&marker))
    }

    /// The system URL when present, the id otherwise.
    pub fn canonical(&self) -> &str {
        if self.url.is_empty() {
            &self.id
        } else {
            &self.url
        }
    }

    /// Concepts whose code or display contains `query`, at most `limit`.
    pub fn search(&self, query: &str, limit: usize) -> Vec<&Concept> {
        let needle = query.trim().to_lowercase();
        self.concepts
            .iter()
            .filter(|concept| concept.matches_query(&needle))
            .take(limit)
            .collect()
    }

    /// Collapse concepts sharing a code. The last occurrence wins but keeps
    /// the position of the first.
    pub fn dedup_concepts(&mut self) {
        let mut latest: BTreeMap<String, Concept> = BTreeMap::new();
        let mut order = Vec::new();
        for concept in self.concepts.drain(..) {
            if !latest.contains_key(&concept.code) {
                order.push(concept.code.clone());
            }
            latest.insert(concept.code.clone(), concept);
        }
        self.concepts = order
            .into_iter()
            .filter_map(|code| latest.remove(&code))
            .collect();
    }
}
