//! Terminology configuration (`namaste.toml`).
//!
//! Every field has a default, so an empty file (or no file at all) yields the
//! stock NAMASTE ↔ ICD-11 setup: six mapping jobs, the known identifier
//! tables and the stock thresholds.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::canonical::{SystemFileTable, SystemUriTable};
use crate::error::{Result, StandardsError};
use crate::paths::{data_root, resolve_under};

/// Default number of ranked candidates kept per source concept.
pub const DEFAULT_TOP_N: usize = 3;
/// Default score above which a ranked candidate is classified equivalent.
pub const DEFAULT_EQUIVALENCE_CUTOFF: f64 = 0.85;
/// Default minimum similarity for a candidate to be published.
pub const DEFAULT_PUBLISH_THRESHOLD: f64 = 0.75;
/// Default bound on concept search results.
pub const DEFAULT_LOOKUP_LIMIT: usize = 20;
/// Default number of curated store systems scanned by system-less search.
pub const DEFAULT_CURATED_SYSTEM_LIMIT: usize = 5;
/// Marker identifying traditional-medicine systems.
pub const DEFAULT_DOMAIN_MARKER: &str = "namaste";

/// Marker terms blocking cross-domain matches.
pub const DEFAULT_DOMAIN_KEYWORDS: &[&str] = &[
    "vata", "pitta", "kapha", "sukra", "dosha", "mamsa", "rakt", "meda",
];

/// Offline matching parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    pub top_n: usize,
    pub equivalence_cutoff: f64,
    pub publish_threshold: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            equivalence_cutoff: DEFAULT_EQUIVALENCE_CUTOFF,
            publish_threshold: DEFAULT_PUBLISH_THRESHOLD,
        }
    }
}

/// Runtime resolution parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionConfig {
    pub lookup_limit: usize,
    pub curated_system_limit: usize,
    pub domain_marker: String,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            lookup_limit: DEFAULT_LOOKUP_LIMIT,
            curated_system_limit: DEFAULT_CURATED_SYSTEM_LIMIT,
            domain_marker: DEFAULT_DOMAIN_MARKER.to_string(),
        }
    }
}

/// Declared fallback file locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    /// Directory holding `CodeSystem-*.json` documents.
    pub codesystem_dir: PathBuf,
    /// Directory holding per-dataset ConceptMap documents.
    pub mapping_dir: PathBuf,
    /// ConceptMap files scanned by translation, relative to `mapping_dir`.
    pub concept_map_files: Vec<PathBuf>,
    /// Memoize parsed fallback documents for the process lifetime.
    pub cache_documents: bool,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        let concept_map_files = [
            "ayurveda-to-icd11-biomed",
            "ayurveda-to-icd11-tm2",
            "siddha-to-icd11-biomed",
            "siddha-to-icd11-tm2",
            "unani-to-icd11-biomed",
            "unani-to-icd11-tm2",
        ]
        .into_iter()
        .map(|dataset| Path::new(dataset).join("ConceptMap.json"))
        .collect();
        Self {
            codesystem_dir: PathBuf::from("fhir"),
            mapping_dir: PathBuf::from("mappings"),
            concept_map_files,
            cache_documents: false,
        }
    }
}

/// Metadata stamped on generated ConceptMaps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConceptMapMeta {
    pub url_base: String,
    pub version: String,
    pub publisher: String,
}

impl Default for ConceptMapMeta {
    fn default() -> Self {
        Self {
            url_base: "http://namaste.gov.in/fhir/ConceptMap".to_string(),
            version: "1.0.0".to_string(),
            publisher: "NAMASTE Terms Team".to_string(),
        }
    }
}

/// One source → target materialization job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobConfig {
    pub dataset: String,
    pub source_key: String,
    pub source_file: PathBuf,
    pub target_key: String,
    pub target_file: PathBuf,
}

fn default_jobs() -> Vec<JobConfig> {
    let sources = [
        ("ayurveda", "namaste-ayurveda", "fhir/CodeSystem-ayurveda.json"),
        ("siddha", "namaste-siddha", "fhir/CodeSystem-siddha.json"),
        ("unani", "namaste-unani", "fhir/CodeSystem-unani.json"),
    ];
    let targets = [
        ("icd11-tm2", "icd11-tm2", "icd11/parsed/CodeSystem-icd11-tm2.json"),
        (
            "icd11-biomed",
            "icd11-biomed",
            "icd11/parsed/CodeSystem-icd11-biomedicine.json",
        ),
    ];
    let mut jobs = Vec::new();
    for (target_name, target_key, target_file) in targets {
        for (source_name, source_key, source_file) in sources {
            jobs.push(JobConfig {
                dataset: format!("{source_name}-to-{target_name}"),
                source_key: source_key.to_string(),
                source_file: PathBuf::from(source_file),
                target_key: target_key.to_string(),
                target_file: PathBuf::from(target_file),
            });
        }
    }
    jobs
}

/// Complete configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminologyConfig {
    /// Base directory for every relative path below.
    pub data_dir: PathBuf,
    /// Where materialized artifacts are written.
    pub output_dir: PathBuf,
    /// Optional synonym override table (JSON object of string → [string]).
    pub synonyms_file: Option<PathBuf>,
    pub keywords: Vec<String>,
    pub matching: MatchingConfig,
    pub resolution: ResolutionConfig,
    pub fallback: FallbackConfig,
    pub concept_map: ConceptMapMeta,
    pub system_files: SystemFileTable,
    pub system_uris: SystemUriTable,
    pub jobs: Vec<JobConfig>,
}

impl Default for TerminologyConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            output_dir: PathBuf::from("mappings"),
            synonyms_file: Some(PathBuf::from("synonyms.json")),
            keywords: DEFAULT_DOMAIN_KEYWORDS
                .iter()
                .map(ToString::to_string)
                .collect(),
            matching: MatchingConfig::default(),
            resolution: ResolutionConfig::default(),
            fallback: FallbackConfig::default(),
            concept_map: ConceptMapMeta::default(),
            system_files: SystemFileTable::default(),
            system_uris: SystemUriTable::default(),
            jobs: default_jobs(),
        }
    }
}

impl TerminologyConfig {
    /// Load configuration from a TOML file and validate it.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| StandardsError::io(path, e))?;
        let config = Self::from_toml_str(&text).map_err(|e| match e {
            StandardsError::Toml { source, .. } => StandardsError::Toml {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        tracing::debug!(path = %path.display(), jobs = config.jobs.len(), "loaded config");
        Ok(config)
    }

    /// Parse and validate configuration text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|source| StandardsError::Toml {
            path: PathBuf::new(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        let unit = 0.0..=1.0;
        if self.matching.top_n == 0 {
            return Err(invalid("matching.top_n must be at least 1"));
        }
        if !unit.contains(&self.matching.equivalence_cutoff) {
            return Err(invalid("matching.equivalence_cutoff must be within [0, 1]"));
        }
        if !unit.contains(&self.matching.publish_threshold) {
            return Err(invalid("matching.publish_threshold must be within [0, 1]"));
        }
        if self.resolution.lookup_limit == 0 {
            return Err(invalid("resolution.lookup_limit must be at least 1"));
        }
        if let Some(job) = self.jobs.iter().find(|j| j.dataset.trim().is_empty()) {
            return Err(invalid(&format!(
                "job for {} -> {} has an empty dataset name",
                job.source_key, job.target_key
            )));
        }
        Ok(())
    }

    /// Effective data root (honours `NAMASTE_DATA_DIR`).
    pub fn root(&self) -> PathBuf {
        data_root(&self.data_dir)
    }

    /// Resolve a configured path against the data root.
    pub fn resolve(&self, relative: &Path) -> PathBuf {
        resolve_under(&self.root(), relative)
    }

    pub fn output_path(&self) -> PathBuf {
        self.resolve(&self.output_dir)
    }

    pub fn codesystem_dir(&self) -> PathBuf {
        self.resolve(&self.fallback.codesystem_dir)
    }

    pub fn mapping_dir(&self) -> PathBuf {
        self.resolve(&self.fallback.mapping_dir)
    }

    /// Fallback ConceptMap files as absolute (root-resolved) paths.
    pub fn concept_map_paths(&self) -> Vec<PathBuf> {
        let dir = self.mapping_dir();
        self.fallback
            .concept_map_files
            .iter()
            .map(|file| resolve_under(&dir, file))
            .collect()
    }
}

fn invalid(message: &str) -> StandardsError {
    StandardsError::InvalidConfig {
        message: message.to_string(),
    }
}
