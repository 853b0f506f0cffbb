//! Blocking loaders for CodeSystem and ConceptMap JSON documents.
//!
//! The offline pipeline reads its inputs through these; a malformed document
//! is an error here, never a silent skip.

use std::path::Path;

use serde::de::DeserializeOwned;

use namaste_model::{CODE_SYSTEM_RESOURCE, CONCEPT_MAP_RESOURCE, CodeSystem, ConceptMap};

use crate::error::{Result, StandardsError};

/// Read and deserialize a JSON document.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = std::fs::read(path).map_err(|e| StandardsError::io(path, e))?;
    serde_json::from_slice(&bytes).map_err(|e| StandardsError::json(path, e))
}

/// Load a CodeSystem document.
pub fn load_code_system(path: &Path) -> Result<CodeSystem> {
    let code_system: CodeSystem = read_json(path)?;
    check_resource_type(path, CODE_SYSTEM_RESOURCE, &code_system.resource_type)?;
    tracing::debug!(
        path = %path.display(),
        id = %code_system.id,
        concepts = code_system.concepts.len(),
        "loaded code system"
    );
    Ok(code_system)
}

/// Load a ConceptMap document.
pub fn load_concept_map(path: &Path) -> Result<ConceptMap> {
    let concept_map: ConceptMap = read_json(path)?;
    check_resource_type(path, CONCEPT_MAP_RESOURCE, &concept_map.resource_type)?;
    Ok(concept_map)
}

fn check_resource_type(path: &Path, expected: &'static str, found: &str) -> Result<()> {
    if found == expected {
        Ok(())
    } else {
        Err(StandardsError::ResourceType {
            path: path.to_path_buf(),
            expected,
            found: found.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn loads_code_system() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("CodeSystem-ayurveda.json");
        std::fs::write(
            &path,
            r#"{"resourceType":"CodeSystem","id":"namaste-ayurveda","concept":[{"code":"AYU001","display":"Vata Dosha Imbalance"}]}"#,
        )
        .unwrap();

        let cs = load_code_system(&path).unwrap();
        assert_eq!(cs.concepts.len(), 1);
        assert_eq!(cs.concepts[0].code, "AYU001");
    }

    #[test]
    fn malformed_document_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = load_code_system(&path).unwrap_err();
        assert!(matches!(err, StandardsError::Json { .. }));
    }

    #[test]
    fn wrong_resource_type_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("map.json");
        std::fs::write(&path, r#"{"resourceType":"ConceptMap","id":"m"}"#).unwrap();

        let err = load_code_system(&path).unwrap_err();
        assert!(matches!(err, StandardsError::ResourceType { .. }));
        assert!(load_concept_map(&path).is_ok());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_code_system(Path::new("/nonexistent/CodeSystem-x.json")).unwrap_err();
        assert!(err.to_string().contains("CodeSystem-x.json"));
    }
}
