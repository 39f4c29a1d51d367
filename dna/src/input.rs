//! Decoding of the polymorphic `rsids` parameter.
//!
//! Callers may send a bare identifier, a proper list, or a string that is
//! itself a serialized list (some clients stringify arrays before sending).
//! [`RsidInput`] captures the first two shapes; [`RsidInput::normalize`]
//! resolves the third, so the rest of the pipeline only ever sees a list.

use std::borrow::Cow;

use schemars::{JsonSchema, Schema, SchemaGenerator, json_schema};
use serde::Deserialize;
use serde_json::Value;

use crate::privacy::MAX_RSIDS_PER_QUERY;

/// One identifier or many, as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "Value")]
pub enum RsidInput {
    Single(String),
    Many(Vec<String>),
}

impl RsidInput {
    /// Produce the ordered identifier list.
    ///
    /// - `Many` is returned unchanged; element validation happens later.
    /// - `Single` whose trimmed form looks like `[...]` is parsed as a JSON
    ///   array. If that fails, or yields something other than an array, the
    ///   original string becomes a one-element list.
    /// - Any other `Single` becomes a one-element list.
    ///
    /// Never fails.
    #[must_use]
    pub fn normalize(self) -> Vec<String> {
        match self {
            Self::Many(list) => list,
            Self::Single(s) => {
                let trimmed = s.trim();
                if trimmed.starts_with('[')
                    && trimmed.ends_with(']')
                    && let Ok(Value::Array(items)) = serde_json::from_str::<Value>(trimmed)
                {
                    return items.into_iter().map(element_to_string).collect();
                }
                vec![s]
            }
        }
    }
}

impl From<Value> for RsidInput {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => Self::Single(s),
            Value::Array(items) => Self::Many(items.into_iter().map(element_to_string).collect()),
            other => Self::Single(other.to_string()),
        }
    }
}

impl From<&str> for RsidInput {
    fn from(s: &str) -> Self {
        Self::Single(s.to_owned())
    }
}

impl From<String> for RsidInput {
    fn from(s: String) -> Self {
        Self::Single(s)
    }
}

impl From<Vec<String>> for RsidInput {
    fn from(list: Vec<String>) -> Self {
        Self::Many(list)
    }
}

impl From<Vec<&str>> for RsidInput {
    fn from(list: Vec<&str>) -> Self {
        Self::Many(list.into_iter().map(str::to_owned).collect())
    }
}

// Non-string elements keep their JSON text so they fail RSID validation
// with a recognizable value instead of disappearing.
fn element_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

impl JsonSchema for RsidInput {
    fn schema_name() -> Cow<'static, str> {
        Cow::Borrowed("RsidInput")
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "description": "A single RSID (e.g. \"rs3131972\") or a list of 1-10 RSIDs",
            "anyOf": [
                { "type": "string" },
                {
                    "type": "array",
                    "items": { "type": "string" },
                    "minItems": 1,
                    "maxItems": MAX_RSIDS_PER_QUERY
                }
            ]
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn normalize(value: Value) -> Vec<String> {
        RsidInput::from(value).normalize()
    }

    #[test]
    fn test_bare_identifier() {
        assert_eq!(normalize(json!("rs1")), vec!["rs1"]);
    }

    #[test]
    fn test_list_passes_through_unchanged() {
        assert_eq!(
            normalize(json!(["rs2", "rs1", "rs2", " bogus "])),
            vec!["rs2", "rs1", "rs2", " bogus "]
        );
    }

    #[test]
    fn test_serialized_list_string() {
        assert_eq!(normalize(json!("[\"rs1\",\"rs2\"]")), vec!["rs1", "rs2"]);
        assert_eq!(normalize(json!("  [\"rs1\", \"rs2\"]  ")), vec!["rs1", "rs2"]);
        assert_eq!(normalize(json!("[]")), Vec::<String>::new());
    }

    #[test]
    fn test_malformed_bracketed_string_is_single() {
        assert_eq!(normalize(json!("[rs1, rs2]")), vec!["[rs1, rs2]"]);
        assert_eq!(normalize(json!("['rs1']")), vec!["['rs1']"]);
    }

    #[test]
    fn test_half_bracketed_string_is_single() {
        assert_eq!(normalize(json!("[\"rs1\"")), vec!["[\"rs1\""]);
        assert_eq!(normalize(json!("[\"rs1\",]")), vec!["[\"rs1\",]"]);
    }

    #[test]
    fn test_non_string_values_are_stringified() {
        assert_eq!(normalize(json!(123)), vec!["123"]);
        assert_eq!(normalize(json!(null)), vec!["null"]);
        assert_eq!(normalize(json!({"rsid": "rs1"})), vec!["{\"rsid\":\"rs1\"}"]);
        assert_eq!(normalize(json!(["rs1", 7])), vec!["rs1", "7"]);
        assert_eq!(normalize(json!("[\"rs1\", 7]")), vec!["rs1", "7"]);
    }

    #[test]
    fn test_idempotent_on_lists() {
        let once = normalize(json!(["rs1", "[\"rs2\"]"]));
        let twice = RsidInput::Many(once.clone()).normalize();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_deserialize_from_json() {
        let single: RsidInput = serde_json::from_value(json!("rs5")).unwrap();
        assert_eq!(single, RsidInput::Single("rs5".to_owned()));
        let many: RsidInput = serde_json::from_value(json!(["rs5", "rs6"])).unwrap();
        assert_eq!(many, RsidInput::from(vec!["rs5", "rs6"]));
    }

    #[test]
    fn test_schema_advertises_both_shapes() {
        let schema = schemars::schema_for!(RsidInput);
        let value = serde_json::to_value(&schema).unwrap();
        let any_of = value["anyOf"].as_array().unwrap();
        assert_eq!(any_of.len(), 2);
        assert_eq!(any_of[1]["maxItems"], json!(10));
    }
}
