use std::fs;
use std::path::Path;

use namaste_cli::context::{build_engine, build_materializer, load_config, load_store};
use serde_json::json;
use tempfile::{TempDir, tempdir};

fn write_json(path: &Path, value: &serde_json::Value) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, serde_json::to_vec_pretty(value).unwrap()).unwrap();
}

/// Data dir with one Ayurveda and one TM2 code system and a single-job config.
fn workspace() -> TempDir {
    let dir = tempdir().unwrap();
    write_json(
        &dir.path().join("fhir/CodeSystem-ayurveda.json"),
        &json!({
            "resourceType": "CodeSystem",
            "id": "namaste-ayurveda",
            "url": "http://namaste.gov.in/fhir/CodeSystem/namaste-ayurveda",
            "concept": [
                {"code": "AYU001", "display": "Vata Dosha Imbalance"},
                {"code": "AYU002", "display": "Kapha jvara"}
            ]
        }),
    );
    write_json(
        &dir.path().join("icd11/CodeSystem-tm2.json"),
        &json!({
            "resourceType": "CodeSystem",
            "id": "icd11-tm2",
            "url": "http://id.who.int/icd/release/11/mms",
            "concept": [
                {"code": "TM2-55", "display": "Vata dosha imbalance"},
                {"code": "TM2-90", "display": "Kapha pattern fever"}
            ]
        }),
    );
    fs::write(
        dir.path().join("namaste.toml"),
        format!(
            r#"
data_dir = "{}"
output_dir = "out"

[[jobs]]
dataset = "ayurveda-to-icd11-tm2"
source_key = "namaste-ayurveda"
source_file = "fhir/CodeSystem-ayurveda.json"
target_key = "icd11-tm2"
target_file = "icd11/CodeSystem-tm2.json"
"#,
            dir.path().display()
        ),
    )
    .unwrap();
    dir
}

fn data_dir_overridden() -> bool {
    std::env::var_os("NAMASTE_DATA_DIR").is_some()
}

#[test]
fn explicit_config_is_loaded() {
    let dir = workspace();
    let config = load_config(Some(&dir.path().join("namaste.toml"))).unwrap();
    assert_eq!(config.jobs.len(), 1);
    assert_eq!(config.jobs[0].dataset, "ayurveda-to-icd11-tm2");
}

#[test]
fn broken_explicit_config_names_the_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("namaste.toml");
    fs::write(&path, "[matching]\ntop_n = 0\n").unwrap();

    let err = load_config(Some(&path)).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("namaste.toml"), "{message}");
    assert!(message.contains("top_n"), "{message}");
}

#[tokio::test]
async fn materialized_map_resolves_through_the_store() {
    if data_dir_overridden() {
        return;
    }
    let dir = workspace();
    let config = load_config(Some(&dir.path().join("namaste.toml"))).unwrap();

    let materializer = build_materializer(&config).unwrap();
    let summaries = materializer.run_all(&config.jobs, &config.root()).unwrap();
    assert_eq!(summaries.len(), 1);
    let job_dir = dir.path().join("out/ayurveda-to-icd11-tm2");
    assert!(job_dir.join("full.csv").is_file());
    assert!(job_dir.join("clean.csv").is_file());
    assert_eq!(summaries[0].concept_map, job_dir.join("ConceptMap.json"));

    let store = load_store(Some(&job_dir)).await.unwrap();
    assert_eq!(store.concept_map_count().await, 1);
    let engine = build_engine(store, &config);

    let result = engine
        .translate("AYU001", "namaste-ayurveda", "icd11-tm2")
        .await
        .unwrap();
    assert!(result.found());
    assert_eq!(result.result[0].code, "TM2-55");
}

#[tokio::test]
async fn empty_store_falls_back_to_code_system_files() {
    if data_dir_overridden() {
        return;
    }
    let dir = workspace();
    let config = load_config(Some(&dir.path().join("namaste.toml"))).unwrap();
    let engine = build_engine(load_store(None).await.unwrap(), &config);
    assert_eq!(engine.tier_names(), ["store", "fallback"]);

    let code_system = engine.code_system("namaste-ayurveda").await.unwrap();
    assert_eq!(code_system.map(|cs| cs.concepts.len()), Some(2));

    let result = engine.lookup("jvara", None).await.unwrap();
    assert_eq!(result.best().map(|hit| hit.code.as_str()), Some("AYU002"));
}
