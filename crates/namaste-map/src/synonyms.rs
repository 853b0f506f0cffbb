//! Curated synonym overrides.
//!
//! A synonym hit is authoritative: the listed target displays are emitted as
//! equivalent mappings with similarity 1.0 and the source never reaches the
//! keyword filter or the ranker.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{MapError, Result};
use crate::score::normalize;

/// Normalized source display → ordered target display texts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SynonymTable {
    entries: BTreeMap<String, Vec<String>>,
}

impl SynonymTable {
    /// An empty table (every lookup misses).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a table, normalizing keys.
    pub fn from_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Vec<String>)>,
        K: AsRef<str>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(key, targets)| (normalize(key.as_ref()), targets))
                .collect(),
        }
    }

    /// Load a JSON object of `"source display": ["target display", ...]`.
    pub fn load(path: &Path) -> Result<Self> {
        let raw: BTreeMap<String, Vec<String>> = namaste_standards::read_json(path)?;
        if raw.keys().any(|key| key.trim().is_empty()) {
            return Err(MapError::Synonyms {
                path: path.to_path_buf(),
                message: "empty source display key".to_string(),
            });
        }
        let table = Self::from_entries(raw);
        tracing::info!(path = %path.display(), entries = table.len(), "loaded synonyms");
        Ok(table)
    }

    /// Load `path` if it exists, otherwise return an empty table.
    pub fn load_optional(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "no synonym table");
            Ok(Self::empty())
        }
    }

    /// Target texts listed for a source display.
    pub fn get(&self, source_display: &str) -> Option<&[String]> {
        self.entries
            .get(&normalize(source_display))
            .map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn lookup_is_normalized() {
        let table = SynonymTable::from_entries([(
            "  Amavata ",
            vec!["Rheumatoid arthritis".to_string()],
        )]);
        assert_eq!(table.get("AMAVATA").unwrap().len(), 1);
        assert!(table.get("amavata jvara").is_none());
    }

    #[test]
    fn load_reads_json_object() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("synonyms.json");
        std::fs::write(&path, r#"{"Jvara": ["Fever", "Pyrexia"]}"#).unwrap();

        let table = SynonymTable::load(&path).unwrap();
        assert_eq!(table.get("jvara").unwrap(), ["Fever", "Pyrexia"]);
    }

    #[test]
    fn load_optional_tolerates_absence() {
        let dir = tempdir().unwrap();
        let table = SynonymTable::load_optional(&dir.path().join("missing.json")).unwrap();
        assert!(table.is_empty());
    }
}
