//! JSON Schema validation for externally supplied JSON documents.
//!
//! Both the run configuration and the product type map are checked against
//! a JSON Schema (Draft 7) before they are deserialized, so a malformed file
//! is reported with every offending path at once instead of serde's first
//! error.
//!
//! # Embedded Schemas
//!
//! Schemas are embedded at compile time from the `schemas/` directory and
//! parsed on first use:
//! - `translator-config.json`
//! - `type-map.json`

use once_cell::sync::Lazy;
use serde_json::Value;

type EmbeddedSchema = Lazy<Result<Value, String>>;

static CONFIG_SCHEMA: EmbeddedSchema = Lazy::new(|| {
    serde_json::from_str(include_str!("../../schemas/translator-config.json"))
        .map_err(|e| e.to_string())
});

static TYPE_MAP_SCHEMA: EmbeddedSchema = Lazy::new(|| {
    serde_json::from_str(include_str!("../../schemas/type-map.json")).map_err(|e| e.to_string())
});

/// Validate a JSON value against a JSON schema.
///
/// # Returns
/// * `Ok(())` if valid
/// * `Err(Vec<String>)` with one message per violation
///
/// # Example
/// ```ignore
/// use serde_json::json;
/// use usage_translator::validation::validate;
///
/// let schema = json!({ "type": "object", "required": ["name"] });
/// assert!(validate(&schema, &json!({ "name": "x" })).is_ok());
/// assert!(validate(&schema, &json!({})).is_err());
/// ```
pub fn validate(schema: &Value, data: &Value) -> Result<(), Vec<String>> {
    let validator = jsonschema::draft7::new(schema)
        .map_err(|e| vec![format!("invalid schema: {}", e)])?;

    let errors: Vec<String> = validator
        .iter_errors(data)
        .map(|e| e.to_string())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_embedded(schema: &EmbeddedSchema, data: &Value) -> Result<(), Vec<String>> {
    match Lazy::force(schema) {
        Ok(schema) => validate(schema, data),
        Err(e) => Err(vec![format!("embedded schema is not valid JSON: {}", e)]),
    }
}

/// Validate a run configuration document.
pub fn validate_config(data: &Value) -> Result<(), Vec<String>> {
    validate_embedded(&CONFIG_SCHEMA, data)
}

/// Validate a product type map document.
pub fn validate_type_map(data: &Value) -> Result<(), Vec<String>> {
    validate_embedded(&TYPE_MAP_SCHEMA, data)
}
