//! Tolerant field readers for hand-edited terminology documents.
//!
//! Scalars are accepted wherever text is expected (`"code": 101` reads as
//! `"101"`) and `null` reads as empty. Arrays and objects are still errors.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::concept_map::Relationship;

fn scalar_text<E: serde::de::Error>(value: Value) -> Result<Option<String>, E> {
    match value {
        Value::Null => Ok(None),
        Value::String(text) => Ok(Some(text)),
        Value::Number(number) => Ok(Some(number.to_string())),
        Value::Bool(flag) => Ok(Some(flag.to_string())),
        Value::Array(_) | Value::Object(_) => Err(E::custom("expected text, found a composite value")),
    }
}

/// Text field; `null` becomes empty.
pub(crate) fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_text::<D::Error>(value)?.unwrap_or_default())
}

/// Optional text field; `null` becomes `None`.
pub(crate) fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    scalar_text(Value::deserialize(deserializer)?)
}

/// Relationship token; `null` or blank means equivalent, unknown tokens
/// are parsed leniently.
pub(crate) fn relationship<'de, D>(deserializer: D) -> Result<Relationship, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(Relationship::default()),
        Value::String(token) => Ok(Relationship::parse_lenient(&token)),
        other => Err(D::Error::custom(format!(
            "expected a relationship token, found {other}"
        ))),
    }
}
