//! Mapping materialization.
//!
//! Each job produces, under `<output>/<dataset>/`:
//!
//! ```text
//! full.csv          every candidate
//! clean.csv         candidates with similarity >= threshold, or equivalent
//! ConceptMap.json   assembled from the clean rows only
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use namaste_model::{ConceptMap, Group, MappingCandidate, Relationship, TargetEntry};
use namaste_standards::{ConceptMapMeta, JobConfig, SystemUriTable, load_code_system};

use crate::engine::{MatchJob, MatchingEngine};
use crate::error::{MapError, Result};

pub const FULL_CSV: &str = "full.csv";
pub const CLEAN_CSV: &str = "clean.csv";
pub const CONCEPT_MAP_JSON: &str = "ConceptMap.json";

/// CSV row layout shared by `full.csv` and `clean.csv`.
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    dataset: &'a str,
    source_system: &'a str,
    source_code: &'a str,
    source_display: &'a str,
    target_system: &'a str,
    target_code: &'a str,
    target_display: &'a str,
    similarity: String,
    map_type: &'static str,
}

impl<'a> From<&'a MappingCandidate> for CsvRow<'a> {
    fn from(c: &'a MappingCandidate) -> Self {
        Self {
            dataset: &c.dataset,
            source_system: &c.source_system,
            source_code: &c.source_code,
            source_display: &c.source_display,
            target_system: &c.target_system,
            target_code: &c.target_code,
            target_display: &c.target_display,
            similarity: format!("{:.3}", c.similarity),
            map_type: c.map_type.as_str(),
        }
    }
}

/// Candidates that qualify for publication.
pub fn clean_candidates(candidates: &[MappingCandidate], threshold: f64) -> Vec<&MappingCandidate> {
    candidates
        .iter()
        .filter(|c| c.is_publishable(threshold))
        .collect()
}

/// Write candidates as CSV with a header row (written even when empty).
pub fn write_candidates_csv<'a, I>(path: &Path, rows: I) -> Result<usize>
where
    I: IntoIterator<Item = &'a MappingCandidate>,
{
    let csv_err = |source| MapError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(csv_err)?;
    writer
        .write_record([
            "dataset",
            "source_system",
            "source_code",
            "source_display",
            "target_system",
            "target_code",
            "target_display",
            "similarity",
            "map_type",
        ])
        .map_err(csv_err)?;
    let mut count = 0;
    for row in rows {
        writer.serialize(CsvRow::from(row)).map_err(csv_err)?;
        count += 1;
    }
    writer.flush().map_err(|source| MapError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(count)
}

/// Paths and row counts of a dual CSV write.
#[derive(Debug, Clone)]
pub struct DualCsv {
    pub full: PathBuf,
    pub clean: PathBuf,
    pub full_rows: usize,
    pub clean_rows: usize,
}

/// Write `full.csv` and `clean.csv` into `dir`, creating it if needed.
pub fn write_dual_csv(dir: &Path, candidates: &[MappingCandidate], threshold: f64) -> Result<DualCsv> {
    fs::create_dir_all(dir).map_err(|source| MapError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let full = dir.join(FULL_CSV);
    let clean = dir.join(CLEAN_CSV);
    let full_rows = write_candidates_csv(&full, candidates)?;
    let clean_rows = write_candidates_csv(&clean, clean_candidates(candidates, threshold))?;
    Ok(DualCsv {
        full,
        clean,
        full_rows,
        clean_rows,
    })
}

/// `ayurveda-to-icd11-tm2` → `AyurvedaToIcd11Tm2`.
pub fn machine_name(dataset: &str) -> String {
    dataset
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// Inputs stamped on an assembled ConceptMap.
#[derive(Debug, Clone)]
pub struct AssemblyContext<'a> {
    pub dataset: &'a str,
    pub source_key: &'a str,
    pub target_key: &'a str,
    pub uris: &'a SystemUriTable,
    pub meta: &'a ConceptMapMeta,
    /// ISO-8601 timestamp.
    pub date: String,
}

/// Assemble a ConceptMap from clean candidates.
///
/// One element per distinct source code (first-seen order), one target per
/// row.
pub fn assemble_concept_map<'a, I>(ctx: &AssemblyContext<'_>, clean: I) -> ConceptMap
where
    I: IntoIterator<Item = &'a MappingCandidate>,
{
    let mut group = Group::new(
        ctx.uris.canonical_uri(ctx.source_key),
        ctx.uris.canonical_uri(ctx.target_key),
    );
    for row in clean {
        if row.source_code.is_empty() {
            continue;
        }
        group.push_target(
            &row.source_code,
            &row.source_display,
            TargetEntry {
                code: row.target_code.clone(),
                display: row.target_display.clone(),
                relationship: Relationship::from(row.map_type),
            },
        );
    }

    let name = machine_name(ctx.dataset);
    let mut map = ConceptMap::new(
        ctx.dataset,
        format!("{}/{}", ctx.meta.url_base.trim_end_matches('/'), ctx.dataset),
        ctx.meta.version.clone(),
    );
    map.title = Some(format!("{name} ConceptMap"));
    map.name = Some(name);
    map.status = Some("draft".to_string());
    map.experimental = Some(true);
    map.date = Some(ctx.date.clone());
    map.publisher = Some(ctx.meta.publisher.clone());
    map.description = Some(format!("Auto-generated ConceptMap for {}", ctx.dataset));
    map.group = vec![group];
    map
}

/// Outcome of one materialized job.
#[derive(Debug, Clone)]
pub struct JobSummary {
    pub dataset: String,
    pub csv: DualCsv,
    pub concept_map: PathBuf,
    pub elements: usize,
    pub targets: usize,
}

/// Runs configured jobs end to end.
#[derive(Debug, Clone)]
pub struct Materializer {
    engine: MatchingEngine,
    uris: SystemUriTable,
    meta: ConceptMapMeta,
    output_dir: PathBuf,
}

impl Materializer {
    pub fn new(
        engine: MatchingEngine,
        uris: SystemUriTable,
        meta: ConceptMapMeta,
        output_dir: PathBuf,
    ) -> Self {
        Self {
            engine,
            uris,
            meta,
            output_dir,
        }
    }

    /// Load the job's datasets from `root` and materialize them.
    ///
    /// A missing or malformed input aborts the job with an error.
    pub fn run_job(&self, job: &JobConfig, root: &Path) -> Result<JobSummary> {
        let sources = load_code_system(&root.join(&job.source_file))?;
        let targets = load_code_system(&root.join(&job.target_file))?;
        let match_job = MatchJob::new(&job.dataset, &job.source_key, &job.target_key);
        let candidates = self
            .engine
            .match_all(&match_job, &sources.concepts, &targets.concepts);
        self.write_job(job, &candidates)
    }

    /// Write the dual CSV and ConceptMap for already-computed candidates.
    pub fn write_job(&self, job: &JobConfig, candidates: &[MappingCandidate]) -> Result<JobSummary> {
        let dir = self.output_dir.join(&job.dataset);
        let threshold = self.engine.config().publish_threshold;
        let csv = write_dual_csv(&dir, candidates, threshold)?;

        let ctx = AssemblyContext {
            dataset: &job.dataset,
            source_key: &job.source_key,
            target_key: &job.target_key,
            uris: &self.uris,
            meta: &self.meta,
            date: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };
        let map = assemble_concept_map(&ctx, clean_candidates(candidates, threshold));
        let concept_map = dir.join(CONCEPT_MAP_JSON);
        let json = serde_json::to_vec_pretty(&map).map_err(|source| MapError::Json {
            path: concept_map.clone(),
            source,
        })?;
        fs::write(&concept_map, json).map_err(|source| MapError::Io {
            path: concept_map.clone(),
            source,
        })?;

        tracing::info!(
            dataset = %job.dataset,
            kept = csv.clean_rows,
            total = csv.full_rows,
            threshold,
            elements = map.element_count(),
            "materialized dataset"
        );
        Ok(JobSummary {
            dataset: job.dataset.clone(),
            elements: map.element_count(),
            targets: map.target_count(),
            csv,
            concept_map,
        })
    }

    /// Run every job in order, stopping at the first failure.
    pub fn run_all(&self, jobs: &[JobConfig], root: &Path) -> Result<Vec<JobSummary>> {
        jobs.iter()
            .map(|job| {
                let span = tracing::info_span!("job", dataset = %job.dataset);
                span.in_scope(|| self.run_job(job, root))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn machine_name_camel_cases_dataset() {
        assert_eq!(machine_name("ayurveda-to-icd11-tm2"), "AyurvedaToIcd11Tm2");
        assert_eq!(machine_name("unani to  icd11_biomed"), "UnaniToIcd11Biomed");
    }
}
