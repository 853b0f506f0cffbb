//! ConceptMap model (FHIR R5 shape).

use serde::{Deserialize, Serialize};

use crate::candidate::MapType;
use crate::lenient;

/// FHIR resource type tag for concept maps.
pub const CONCEPT_MAP_RESOURCE: &str = "ConceptMap";

/// R5 relationship token between a source and a target concept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Relationship {
    #[default]
    Equivalent,
    SourceIsNarrowerThanTarget,
    SourceIsBroaderThanTarget,
    RelatedTo,
    NotRelatedTo,
}

impl Relationship {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Equivalent => "equivalent",
            Self::SourceIsNarrowerThanTarget => "source-is-narrower-than-target",
            Self::SourceIsBroaderThanTarget => "source-is-broader-than-target",
            Self::RelatedTo => "related-to",
            Self::NotRelatedTo => "not-related-to",
        }
    }

    /// Parse a relationship token, also accepting R4 equivalence codes.
    ///
    /// Blank means equivalent; anything unrecognized is related-to.
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "" | "equivalent" | "equal" | "exact" => Self::Equivalent,
            "source-is-narrower-than-target" | "narrower" | "specializes" => {
                Self::SourceIsNarrowerThanTarget
            }
            "source-is-broader-than-target" | "broader" | "wider" | "subsumes" => {
                Self::SourceIsBroaderThanTarget
            }
            "not-related-to" | "unmatched" | "disjoint" => Self::NotRelatedTo,
            _ => Self::RelatedTo,
        }
    }
}

impl From<MapType> for Relationship {
    fn from(map_type: MapType) -> Self {
        match map_type {
            MapType::Equivalent => Self::Equivalent,
            MapType::Narrower => Self::SourceIsNarrowerThanTarget,
            MapType::Broader => Self::SourceIsBroaderThanTarget,
            MapType::Related => Self::RelatedTo,
        }
    }
}

impl std::fmt::Display for Relationship {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One target of a mapped source code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetEntry {
    #[serde(deserialize_with = "lenient::text")]
    pub code: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub display: String,
    /// Missing or `null` reads as equivalent.
    #[serde(default, deserialize_with = "lenient::relationship")]
    pub relationship: Relationship,
}

/// A mapped source code with its targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    #[serde(deserialize_with = "lenient::text")]
    pub code: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub display: String,
    #[serde(default)]
    pub target: Vec<TargetEntry>,
}

/// All mappings between one source system and one target system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub element: Vec<Element>,
}

impl Group {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            element: Vec::new(),
        }
    }

    /// True if this group maps exactly `source` to `target`.
    pub fn connects(&self, source: &str, target: &str) -> bool {
        self.source == source && self.target == target
    }

    /// Append a target under `code`, creating the element on first sight.
    ///
    /// Keeps at most one element per source code.
    pub fn push_target(&mut self, code: &str, display: &str, entry: TargetEntry) {
        if let Some(element) = self.element.iter_mut().find(|e| e.code == code) {
            element.target.push(entry);
            return;
        }
        self.element.push(Element {
            code: code.to_string(),
            display: display.to_string(),
            target: vec![entry],
        });
    }

    /// Targets recorded for `code` in this group.
    pub fn targets_for<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a TargetEntry> + 'a {
        self.element
            .iter()
            .filter(move |element| element.code == code)
            .flat_map(|element| element.target.iter())
    }
}

/// A grouped mapping resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptMap {
    #[serde(default = "concept_map_resource_type")]
    pub resource_type: String,
    pub id: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experimental: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub group: Vec<Group>,
}

fn concept_map_resource_type() -> String {
    CONCEPT_MAP_RESOURCE.to_string()
}

impl ConceptMap {
    pub fn new(id: impl Into<String>, url: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            resource_type: concept_map_resource_type(),
            id: id.into(),
            url: url.into(),
            version: version.into(),
            name: None,
            title: None,
            status: None,
            experimental: None,
            date: None,
            publisher: None,
            description: None,
            group: Vec::new(),
        }
    }

    /// Targets for `code` across every group mapping `source` to `target`.
    pub fn translate<'a>(
        &'a self,
        code: &'a str,
        source: &'a str,
        target: &'a str,
    ) -> impl Iterator<Item = &'a TargetEntry> + 'a {
        self.group
            .iter()
            .filter(move |group| group.connects(source, target))
            .flat_map(move |group| group.targets_for(code))
    }

    /// Total number of elements across all groups.
    pub fn element_count(&self) -> usize {
        self.group.iter().map(|g| g.element.len()).sum()
    }

    /// Total number of target entries across all groups.
    pub fn target_count(&self) -> usize {
        self.group
            .iter()
            .flat_map(|g| g.element.iter())
            .map(|e| e.target.len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(code: &str) -> TargetEntry {
        TargetEntry {
            code: code.to_string(),
            display: String::new(),
            relationship: Relationship::RelatedTo,
        }
    }

    #[test]
    fn push_target_groups_by_code() {
        let mut group = Group::new("a", "b");
        group.push_target("S1", "one", entry("T1"));
        group.push_target("S2", "two", entry("T2"));
        group.push_target("S1", "one again", entry("T3"));

        assert_eq!(group.element.len(), 2);
        assert_eq!(group.element[0].display, "one");
        assert_eq!(group.element[0].target.len(), 2);
    }

    #[test]
    fn translate_requires_exact_pair() {
        let mut map = ConceptMap::new("m", "", "1.0.0");
        let mut good = Group::new("src", "tgt");
        good.push_target("S1", "", entry("T1"));
        let mut other = Group::new("src", "elsewhere");
        other.push_target("S1", "", entry("X1"));
        map.group = vec![good, other];

        let codes: Vec<_> = map.translate("S1", "src", "tgt").map(|t| &t.code).collect();
        assert_eq!(codes, vec!["T1"]);
        assert_eq!(map.element_count(), 2);
    }

    #[test]
    fn relationship_tokens_serialize_kebab_case() {
        let json = serde_json::to_string(&Relationship::SourceIsNarrowerThanTarget).unwrap();
        assert_eq!(json, "\"source-is-narrower-than-target\"");
        let parsed: Relationship = serde_json::from_str("\"related-to\"").unwrap();
        assert_eq!(parsed, Relationship::RelatedTo);
    }

    #[test]
    fn target_fields_are_read_leniently() {
        let element: Element = serde_json::from_str(
            r#"{
                "code": 101,
                "display": null,
                "target": [
                    {"code": "TM2-55", "display": "Vata dosha imbalance"},
                    {"code": "TM2-60", "relationship": null},
                    {"code": "TM2-70", "relationship": "wider"}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(element.code, "101");
        assert_eq!(element.display, "");
        let relationships: Vec<_> = element.target.iter().map(|t| t.relationship).collect();
        assert_eq!(
            relationships,
            [
                Relationship::Equivalent,
                Relationship::Equivalent,
                Relationship::SourceIsBroaderThanTarget
            ]
        );
    }

    #[test]
    fn composite_code_is_still_rejected() {
        let parsed = serde_json::from_str::<TargetEntry>(r#"{"code": ["TM2-55"]}"#);
        assert!(parsed.is_err());
    }
}
