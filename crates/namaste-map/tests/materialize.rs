use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use namaste_map::{
    AssemblyContext, DomainKeywordSet, MapError, MatchingEngine, Materializer, SynonymTable,
    assemble_concept_map, clean_candidates, write_dual_csv,
};
use namaste_model::{MapType, MappingCandidate, Relationship};
use namaste_standards::{
    ConceptMapMeta, JobConfig, MatchingConfig, StandardsError, SystemUriTable, load_concept_map,
};
use tempfile::tempdir;

fn row(source: &str, target: &str, similarity: f64, map_type: MapType) -> MappingCandidate {
    MappingCandidate {
        dataset: "ayurveda-to-icd11-tm2".to_string(),
        source_system: "namaste-ayurveda".to_string(),
        source_code: source.to_string(),
        source_display: format!("{source} display"),
        target_system: "icd11-tm2".to_string(),
        target_code: target.to_string(),
        target_display: format!("{target} display"),
        similarity,
        map_type,
    }
}

fn sample_rows() -> Vec<MappingCandidate> {
    vec![
        row("AYU001", "TM2-55", 1.0, MapType::Equivalent),
        row("AYU001", "TM2-60", 0.8, MapType::Related),
        row("AYU001", "TM2-70", 0.4, MapType::Related),
        row("AYU002", "TM2-10", 0.75, MapType::Related),
        row("AYU003", "TM2-11", 0.2, MapType::Equivalent),
        row("AYU004", "TM2-12", 0.749, MapType::Related),
    ]
}

#[test]
fn clean_partitions_full() {
    let rows = sample_rows();
    let clean = clean_candidates(&rows, 0.75);

    let clean_keys: BTreeSet<_> = clean
        .iter()
        .map(|c| (c.source_code.as_str(), c.target_code.as_str()))
        .collect();
    for candidate in &rows {
        let qualifies = candidate.similarity >= 0.75 || candidate.map_type == MapType::Equivalent;
        let key = (candidate.source_code.as_str(), candidate.target_code.as_str());
        assert_eq!(clean_keys.contains(&key), qualifies, "{key:?}");
    }
    assert_eq!(clean.len(), 4);
}

#[test]
fn concept_map_counts_match_clean_rows() {
    let rows = sample_rows();
    let clean = clean_candidates(&rows, 0.75);
    let uris = SystemUriTable::default();
    let meta = ConceptMapMeta::default();
    let ctx = AssemblyContext {
        dataset: "ayurveda-to-icd11-tm2",
        source_key: "namaste-ayurveda",
        target_key: "icd11-tm2",
        uris: &uris,
        meta: &meta,
        date: "2025-01-01T00:00:00.000Z".to_string(),
    };
    let map = assemble_concept_map(&ctx, clean.iter().copied());

    let distinct: BTreeSet<_> = clean.iter().map(|c| &c.source_code).collect();
    assert_eq!(map.element_count(), distinct.len());
    assert_eq!(map.target_count(), clean.len());

    let group = &map.group[0];
    assert_eq!(group.source, "http://namaste.gov.in/fhir/CodeSystem/namaste-ayurveda");
    assert_eq!(group.target, "http://id.who.int/icd/release/11/mms");
    assert_eq!(group.element[0].code, "AYU001");
    assert_eq!(group.element[0].display, "AYU001 display");
    assert_eq!(
        group.element[0].target[0].relationship,
        Relationship::Equivalent
    );
    assert_eq!(
        group.element[0].target[1].relationship,
        Relationship::RelatedTo
    );
    assert_eq!(map.name.as_deref(), Some("AyurvedaToIcd11Tm2"));
    assert_eq!(map.url, "http://namaste.gov.in/fhir/ConceptMap/ayurveda-to-icd11-tm2");
    assert_eq!(map.status.as_deref(), Some("draft"));
}

#[test]
fn dual_csv_has_header_and_three_decimals() {
    let dir = tempdir().unwrap();
    let rows = sample_rows();
    let out = write_dual_csv(dir.path(), &rows, 0.75).unwrap();
    assert_eq!(out.full_rows, 6);
    assert_eq!(out.clean_rows, 4);

    let mut reader = csv::Reader::from_path(&out.full).unwrap();
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(
        headers,
        [
            "dataset",
            "source_system",
            "source_code",
            "source_display",
            "target_system",
            "target_code",
            "target_display",
            "similarity",
            "map_type"
        ]
    );
    let records: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(records.len(), 6);
    assert_eq!(&records[0][7], "1.000");
    assert_eq!(&records[0][8], "equivalent");
    assert_eq!(&records[5][7], "0.749");

    let clean = fs::read_to_string(&out.clean).unwrap();
    assert_eq!(clean.lines().count(), 5);
}

#[test]
fn empty_job_still_writes_headers() {
    let dir = tempdir().unwrap();
    let out = write_dual_csv(&dir.path().join("nested"), &[], 0.75).unwrap();
    let text = fs::read_to_string(out.clean).unwrap();
    assert!(text.starts_with("dataset,source_system"));
}

fn write_code_system(path: &Path, id: &str, concepts: &[(&str, &str)]) {
    let concepts: Vec<_> = concepts
        .iter()
        .map(|(code, display)| serde_json::json!({"code": code, "display": display}))
        .collect();
    let doc = serde_json::json!({"resourceType": "CodeSystem", "id": id, "concept": concepts});
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, serde_json::to_vec(&doc).unwrap()).unwrap();
}

fn materializer(output: &Path) -> Materializer {
    Materializer::new(
        MatchingEngine::new(
            MatchingConfig::default(),
            SynonymTable::empty(),
            DomainKeywordSet::standard(),
        ),
        SystemUriTable::default(),
        ConceptMapMeta::default(),
        output.to_path_buf(),
    )
}

fn job() -> JobConfig {
    JobConfig {
        dataset: "ayurveda-to-icd11-tm2".to_string(),
        source_key: "namaste-ayurveda".to_string(),
        source_file: "fhir/CodeSystem-ayurveda.json".into(),
        target_key: "icd11-tm2".to_string(),
        target_file: "icd11/CodeSystem-icd11-tm2.json".into(),
    }
}

#[test]
fn run_job_writes_all_artifacts() {
    let root = tempdir().unwrap();
    write_code_system(
        &root.path().join("fhir/CodeSystem-ayurveda.json"),
        "namaste-ayurveda",
        &[("AYU001", "Vata Dosha Imbalance"), ("AYU002", "Kapha jvara")],
    );
    write_code_system(
        &root.path().join("icd11/CodeSystem-icd11-tm2.json"),
        "icd11-tm2",
        &[("TM2-55", "Vata dosha imbalance"), ("TM2-10", "Pitta imbalance")],
    );

    let output = root.path().join("mappings");
    let summary = materializer(&output).run_job(&job(), root.path()).unwrap();

    assert!(summary.csv.full.exists());
    assert!(summary.csv.clean.exists());
    assert_eq!(
        summary.concept_map,
        output.join("ayurveda-to-icd11-tm2").join("ConceptMap.json")
    );

    let map = load_concept_map(&summary.concept_map).unwrap();
    let targets: Vec<_> = map
        .translate(
            "AYU001",
            "http://namaste.gov.in/fhir/CodeSystem/namaste-ayurveda",
            "http://id.who.int/icd/release/11/mms",
        )
        .map(|t| t.code.as_str())
        .collect();
    assert_eq!(targets, vec!["TM2-55"]);
    assert_eq!(summary.targets, summary.csv.clean_rows);
}

#[test]
fn malformed_input_aborts_job() {
    let root = tempdir().unwrap();
    let source = root.path().join("fhir/CodeSystem-ayurveda.json");
    fs::create_dir_all(source.parent().unwrap()).unwrap();
    fs::write(&source, "{ truncated").unwrap();

    let output = root.path().join("mappings");
    let err = materializer(&output).run_job(&job(), root.path()).unwrap_err();

    assert!(matches!(err, MapError::Input(StandardsError::Json { .. })));
    assert!(!output.join("ayurveda-to-icd11-tm2").exists());
}
