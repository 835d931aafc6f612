//! JSON Schema for the configuration file.

use crate::config::CasementConfig;

/// Generates a JSON Schema for the Casement configuration.
///
/// The schema includes all configuration options with their types,
/// descriptions, and default values.
#[must_use]
pub fn generate_schema() -> schemars::Schema {
    let mut schema = schemars::schema_for!(CasementConfig);

    if let Some(obj) = schema.as_object_mut() {
        obj.insert("$id".to_string(), serde_json::json!("casement.schema.json"));
    }

    schema
}

/// Pretty-printed JSON Schema, suitable for redirecting to a file.
#[must_use]
pub fn print_schema() -> String {
    let schema = generate_schema();
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}
