//! Canonical identifier tables.
//!
//! Two tables translate the identifiers callers use into what the rest of
//! the system needs:
//!
//! - [`SystemFileTable`]: identifier or URL → fallback CodeSystem filename.
//! - [`SystemUriTable`]: short system key → canonical system URI, used both
//!   when assembling ConceptMaps and when matching translation requests.
//!
//! Both are plain data loaded from configuration, so deployments can add
//! identifiers without touching code.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Base for NAMASTE code system URIs.
pub const NAMASTE_CODE_SYSTEM_BASE: &str = "http://namaste.gov.in/fhir/CodeSystem";

/// WHO ICD-11 MMS release URI, used for the TM2 module.
pub const ICD11_MMS_URI: &str = "http://id.who.int/icd/release/11/mms";

/// ICD-11 release URI used for the Biomedicine module. Distinct from
/// [`ICD11_MMS_URI`] so TM2 and Biomedicine maps never share a group key.
pub const ICD11_BIOMEDICINE_URI: &str = "http://id.who.int/icd/release/11";

/// Last `/`-separated segment of an identifier.
pub fn last_segment(identifier: &str) -> &str {
    identifier
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(identifier)
}

/// True if the identifier already looks like a URI.
pub fn is_uri(identifier: &str) -> bool {
    identifier.starts_with("http://")
        || identifier.starts_with("https://")
        || identifier.starts_with("urn:")
}

/// Identifier → fallback filename table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SystemFileTable {
    entries: BTreeMap<String, String>,
}

impl SystemFileTable {
    pub fn new(entries: BTreeMap<String, String>) -> Self {
        Self { entries }
    }

    /// Fallback filename for a system identifier.
    ///
    /// Tries the full identifier, then its last path segment, then derives
    /// `CodeSystem-<last segment>.json`.
    pub fn file_for(&self, identifier: &str) -> String {
        if let Some(file) = self.entries.get(identifier) {
            return file.clone();
        }
        let last = last_segment(identifier);
        if let Some(file) = self.entries.get(last) {
            return file.clone();
        }
        format!("CodeSystem-{last}.json")
    }

    pub fn insert(&mut self, identifier: impl Into<String>, file: impl Into<String>) {
        self.entries.insert(identifier.into(), file.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SystemFileTable {
    fn default() -> Self {
        let pairs = [
            (
                "http://namaste.gov.in/fhir/CodeSystem/namaste-ayurveda",
                "CodeSystem-ayurveda.json",
            ),
            (
                "http://namaste.gov.in/fhir/CodeSystem/namaste-siddha",
                "CodeSystem-siddha.json",
            ),
            (
                "http://namaste.gov.in/fhir/CodeSystem/namaste-unani",
                "CodeSystem-unani.json",
            ),
            ("namaste-ayurveda", "CodeSystem-ayurveda.json"),
            ("namaste-siddha", "CodeSystem-siddha.json"),
            ("namaste-unani", "CodeSystem-unani.json"),
            ("ayurveda", "CodeSystem-ayurveda.json"),
            ("siddha", "CodeSystem-siddha.json"),
            ("unani", "CodeSystem-unani.json"),
            (ICD11_MMS_URI, "CodeSystem-icd11-tm2.json"),
            (
                "http://id.who.int/icd/entity/146209201",
                "CodeSystem-icd11-tm2.json",
            ),
            ("icd11-tm2", "CodeSystem-icd11-tm2.json"),
            ("icd11-biomed", "CodeSystem-icd11-biomedicine.json"),
            (ICD11_BIOMEDICINE_URI, "CodeSystem-icd11-biomedicine.json"),
        ];
        Self::new(
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

/// System key → canonical URI table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemUriTable {
    /// Base URI for keys without an explicit entry.
    pub namaste_base: String,
    /// URI for unmapped keys that name an ICD module.
    pub icd_uri: String,
    /// Explicit key → URI entries.
    pub entries: BTreeMap<String, String>,
}

impl Default for SystemUriTable {
    fn default() -> Self {
        let mut entries = BTreeMap::new();
        for key in ["namaste-ayurveda", "namaste-siddha", "namaste-unani"] {
            entries.insert(key.to_string(), format!("{NAMASTE_CODE_SYSTEM_BASE}/{key}"));
        }
        entries.insert("icd11-tm2".to_string(), ICD11_MMS_URI.to_string());
        entries.insert("icd11-biomed".to_string(), ICD11_BIOMEDICINE_URI.to_string());
        Self {
            namaste_base: NAMASTE_CODE_SYSTEM_BASE.to_string(),
            icd_uri: ICD11_MMS_URI.to_string(),
            entries,
        }
    }
}

impl SystemUriTable {
    /// Canonical URI for a system key. URIs pass through unchanged.
    pub fn canonical_uri(&self, key: &str) -> String {
        let key = key.trim();
        if is_uri(key) {
            return key.to_string();
        }
        if let Some(uri) = self.entries.get(key) {
            return uri.clone();
        }
        let lower = key.to_lowercase();
        if lower.contains("icd") {
            return self.icd_uri.clone();
        }
        format!("{}/{key}", self.namaste_base.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_for_prefers_explicit_entries() {
        let table = SystemFileTable::default();
        assert_eq!(
            table.file_for("http://namaste.gov.in/fhir/CodeSystem/namaste-unani"),
            "CodeSystem-unani.json"
        );
        assert_eq!(table.file_for("icd11-biomed"), "CodeSystem-icd11-biomedicine.json");
    }

    #[test]
    fn file_for_falls_back_to_last_segment() {
        let table = SystemFileTable::default();
        assert_eq!(
            table.file_for("http://other.host/fhir/CodeSystem/ayurveda"),
            "CodeSystem-ayurveda.json"
        );
        assert_eq!(
            table.file_for("http://other.host/CodeSystem/who-ayurveda"),
            "CodeSystem-who-ayurveda.json"
        );
        assert_eq!(table.file_for("custom"), "CodeSystem-custom.json");
    }

    #[test]
    fn canonical_uri_rules() {
        let table = SystemUriTable::default();
        assert_eq!(
            table.canonical_uri("namaste-ayurveda"),
            "http://namaste.gov.in/fhir/CodeSystem/namaste-ayurveda"
        );
        assert_eq!(table.canonical_uri("icd11-tm2"), ICD11_MMS_URI);
        assert_eq!(table.canonical_uri("icd11-biomed"), ICD11_BIOMEDICINE_URI);
        assert_eq!(table.canonical_uri("ICD-11-other"), ICD11_MMS_URI);
        assert_eq!(
            table.canonical_uri("who-ayurveda"),
            "http://namaste.gov.in/fhir/CodeSystem/who-ayurveda"
        );
        assert_eq!(table.canonical_uri("http://x.org/cs"), "http://x.org/cs");
    }
}
