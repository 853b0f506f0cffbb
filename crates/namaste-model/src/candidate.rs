//! Candidate mappings produced by a materialization run.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Classification of a candidate mapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapType {
    Equivalent,
    Narrower,
    Broader,
    #[default]
    Related,
}

impl MapType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Equivalent => "equivalent",
            Self::Narrower => "narrower",
            Self::Broader => "broader",
            Self::Related => "related",
        }
    }

    /// Lenient parse: `equal`/`exact` mean equivalent, anything unknown is
    /// related.
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "equivalent" | "equal" | "exact" => Self::Equivalent,
            "narrower" => Self::Narrower,
            "broader" => Self::Broader,
            _ => Self::Related,
        }
    }
}

impl FromStr for MapType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse_lenient(s))
    }
}

impl std::fmt::Display for MapType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One proposed source → target code pairing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingCandidate {
    pub dataset: String,
    pub source_system: String,
    pub source_code: String,
    pub source_display: String,
    pub target_system: String,
    pub target_code: String,
    pub target_display: String,
    /// Similarity in `[0, 1]`.
    pub similarity: f64,
    pub map_type: MapType,
}

impl MappingCandidate {
    /// True if the candidate qualifies for publication at `threshold`.
    ///
    /// Equivalent candidates always qualify.
    pub fn is_publishable(&self, threshold: f64) -> bool {
        self.similarity >= threshold || self.map_type == MapType::Equivalent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lenient_parse() {
        assert_eq!(MapType::parse_lenient(" Exact "), MapType::Equivalent);
        assert_eq!(MapType::parse_lenient("narrower"), MapType::Narrower);
        assert_eq!(MapType::parse_lenient("related-to"), MapType::Related);
        assert_eq!(MapType::parse_lenient("whatever"), MapType::Related);
    }
}
