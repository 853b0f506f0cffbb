//! Standards-shaped (FHIR) projections of structured results.
//!
//! Every function here is a pure function of its structured input.

use serde_json::{Value, json};

use namaste_model::CodeSystem;

use crate::response::{ConceptHit, LookupResult, TranslateResult};

/// The CodeSystem as a FHIR resource.
pub fn code_system(code_system: &CodeSystem) -> serde_json::Result<Value> {
    serde_json::to_value(code_system)
}

/// `$lookup` output: Parameters for the best hit, or a not-found outcome.
pub fn lookup(result: &LookupResult) -> Value {
    match result.best() {
        Some(hit) => lookup_parameters(hit),
        None => not_found("No match found"),
    }
}

fn lookup_parameters(hit: &ConceptHit) -> Value {
    json!({
        "parameter": [
            { "name": "name", "valueString": hit.system },
            { "name": "display", "valueString": hit.display },
            { "name": "code", "valueCode": hit.code },
            {
                "name": "designation",
                "part": [
                    { "name": "language", "valueCode": "en" },
                    { "name": "value", "valueString": hit.display }
                ]
            },
            { "name": "definition", "valueString": hit.definition.as_deref().unwrap_or_default() }
        ],
        "resourceType": "Parameters"
    })
}

/// `$translate` output: `result` flag plus one `match` per target.
pub fn translate(result: &TranslateResult) -> Value {
    let mut parameter = vec![json!({ "name": "result", "valueBoolean": result.found() })];
    if result.found() {
        parameter.extend(result.result.iter().map(|m| {
            json!({
                "name": "match",
                "part": [
                    { "name": "equivalence", "valueCode": m.relationship.as_str() },
                    {
                        "name": "concept",
                        "valueCoding": {
                            "code": m.code,
                            "display": m.display,
                            "system": result.target_system
                        }
                    }
                ]
            })
        }));
    } else {
        parameter.push(json!({ "name": "message", "valueString": "No match for code" }));
    }
    json!({ "parameter": parameter, "resourceType": "Parameters" })
}

/// OperationOutcome reporting a miss.
pub fn not_found(diagnostics: &str) -> Value {
    json!({
        "issue": [
            { "code": "not-found", "diagnostics": diagnostics, "severity": "error" }
        ],
        "resourceType": "OperationOutcome"
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::TranslationMatch;
    use namaste_model::Relationship;

    #[test]
    fn lookup_uses_first_hit() {
        let result = LookupResult {
            results: vec![
                ConceptHit {
                    code: "AYU001".to_string(),
                    display: "Vata Dosha Imbalance".to_string(),
                    definition: None,
                    system: "namaste-ayurveda".to_string(),
                },
                ConceptHit {
                    code: "AYU002".to_string(),
                    display: "Vataja Jvara".to_string(),
                    definition: None,
                    system: "namaste-ayurveda".to_string(),
                },
            ],
        };
        let value = lookup(&result);
        assert_eq!(value["resourceType"], "Parameters");
        assert_eq!(value["parameter"][2]["valueCode"], "AYU001");
        assert_eq!(value["parameter"][4]["valueString"], "");
    }

    #[test]
    fn empty_lookup_is_operation_outcome() {
        let value = lookup(&LookupResult::default());
        assert_eq!(value["resourceType"], "OperationOutcome");
        assert_eq!(value["issue"][0]["code"], "not-found");
    }

    #[test]
    fn translate_miss_reports_false() {
        let result = TranslateResult {
            code: "AYU999".to_string(),
            source_system: "s".to_string(),
            target_system: "t".to_string(),
            result: Vec::new(),
        };
        let value = translate(&result);
        assert_eq!(value["parameter"][0]["valueBoolean"], false);
        assert_eq!(value["parameter"][1]["name"], "message");
    }

    #[test]
    fn translate_hit_lists_every_match() {
        let result = TranslateResult {
            code: "AYU001".to_string(),
            source_system: "s".to_string(),
            target_system: "t".to_string(),
            result: vec![
                TranslationMatch {
                    code: "TM2-55".to_string(),
                    display: "Vata dosha imbalance".to_string(),
                    relationship: Relationship::Equivalent,
                },
                TranslationMatch {
                    code: "TM2-60".to_string(),
                    display: "Vata dosha disorder".to_string(),
                    relationship: Relationship::RelatedTo,
                },
            ],
        };
        let value = translate(&result);
        assert_eq!(value["parameter"].as_array().unwrap().len(), 3);
        assert_eq!(value["parameter"][2]["part"][0]["valueCode"], "related-to");
        assert_eq!(value["parameter"][1]["part"][1]["valueCoding"]["system"], "t");
    }
}
