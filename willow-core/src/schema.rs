use chrono::{DateTime, NaiveDate, NaiveDateTime};
use jsonschema::Validator as JsonSchemaValidator;
use serde_json::Value;

const REQUIRED_FIELDS: [&str; 5] = [
    "scenario_id",
    "title",
    "description",
    "vulnerabilities",
    "metadata",
];

const REQUIRED_METADATA_FIELDS: [&str; 3] = ["created_at", "last_updated", "validation_status"];

const TIMESTAMP_FIELDS: [&str; 2] = ["created_at", "last_updated"];

#[derive(Debug, thiserror::Error)]
#[error("invalid JSON schema definition: {0}")]
pub struct SchemaDefinitionError(String);

/// Structural checks over the raw record shape, independent of semantic
/// content. Failures accumulate; the validator never stops at the first
/// error.
pub struct SchemaValidator {
    json_schema: Option<JsonSchemaValidator>,
}

impl SchemaValidator {
    pub fn new() -> Self {
        Self { json_schema: None }
    }

    /// Layer an externally supplied JSON Schema document on top of the
    /// built-in field checks.
    pub fn with_json_schema(schema: &Value) -> Result<Self, SchemaDefinitionError> {
        let compiled = JsonSchemaValidator::new(schema)
            .map_err(|e| SchemaDefinitionError(e.to_string()))?;
        Ok(Self {
            json_schema: Some(compiled),
        })
    }

    /// Validate one record. Returns `(is_valid, errors)` where every error
    /// reads `field='<name>': <reason>` and `is_valid == errors.is_empty()`.
    pub fn validate_value(&self, record: &Value) -> (bool, Vec<String>) {
        let mut errors = Vec::new();

        let Some(obj) = record.as_object() else {
            errors.push("field='<record>': record is not a JSON object".to_string());
            return (false, errors);
        };

        for field in REQUIRED_FIELDS {
            if !obj.contains_key(field) {
                errors.push(format!("field='{field}': required field is missing"));
            }
        }

        for field in ["scenario_id", "title", "description"] {
            if let Some(v) = obj.get(field) {
                if !v.is_string() {
                    errors.push(format!("field='{field}': must be a string"));
                }
            }
        }

        if let Some(v) = obj.get("vulnerabilities") {
            if !v.is_array() {
                errors.push("field='vulnerabilities': must be an array".to_string());
            }
        }

        if let Some(metadata) = obj.get("metadata") {
            match metadata.as_object() {
                Some(meta) => {
                    for field in REQUIRED_METADATA_FIELDS {
                        if !meta.contains_key(field) {
                            errors.push(format!(
                                "field='metadata.{field}': required field is missing"
                            ));
                        }
                    }
                    for field in TIMESTAMP_FIELDS {
                        if let Some(ts) = meta.get(field) {
                            match ts.as_str() {
                                Some(raw) if parse_iso8601(raw) => {}
                                Some(raw) => errors.push(format!(
                                    "field='metadata.{field}': invalid ISO-8601 timestamp '{raw}'"
                                )),
                                None => errors.push(format!(
                                    "field='metadata.{field}': timestamp must be a string"
                                )),
                            }
                        }
                    }
                }
                None => errors.push("field='metadata': must be an object".to_string()),
            }
        }

        if let Some(messages) = obj.get("messages") {
            match messages.as_array() {
                Some(items) => {
                    for (i, msg) in items.iter().enumerate() {
                        match msg.as_object() {
                            Some(entry) => {
                                for field in ["role", "content"] {
                                    if !entry.contains_key(field) {
                                        errors.push(format!(
                                            "field='messages[{i}].{field}': required field is missing"
                                        ));
                                    }
                                }
                            }
                            None => errors
                                .push(format!("field='messages[{i}]': must be an object")),
                        }
                    }
                }
                None => errors.push("field='messages': must be an array".to_string()),
            }
        }

        if let Some(validator) = &self.json_schema {
            for err in validator.iter_errors(record) {
                errors.push(format!("field='{}': {err}", err.instance_path));
            }
        }

        (errors.is_empty(), errors)
    }
}

impl Default for SchemaValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Accepts RFC 3339 timestamps, a trailing `Z` normalized to an explicit
/// UTC offset first, plus offset-less ISO-8601 datetimes and bare dates.
pub fn parse_iso8601(raw: &str) -> bool {
    let normalized = match raw.strip_suffix('Z') {
        Some(prefix) => format!("{prefix}+00:00"),
        None => raw.to_string(),
    };
    DateTime::parse_from_rfc3339(&normalized).is_ok()
        || NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        || NaiveDate::parse_from_str(&normalized, "%Y-%m-%d").is_ok()
}
