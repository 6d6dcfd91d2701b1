use jsonschema::JSONSchema;
use schemars::schema::RootSchema;
use schemars::schema_for;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::registry::ShapeRegistry;

/// Emit the JSON Schema for registry documents.
pub fn registry_json_schema() -> RootSchema {
    schema_for!(ShapeRegistry)
}

/// Structural problem found in a registry document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryIssue {
    /// JSON pointer to the offending node (`/` for the document root).
    pub path: String,
    pub message: String,
}

/// Validate a registry JSON document against the registry JSON Schema.
pub fn validate_registry_json(document: &Value, schema: &Value) -> Result<Vec<RegistryIssue>> {
    let compiled = JSONSchema::compile(schema).map_err(|err| Error::Schema(err.to_string()))?;

    let mut issues = Vec::new();
    if let Err(errors) = compiled.validate(document) {
        for error in errors {
            issues.push(RegistryIssue {
                path: normalized_json_pointer(&error.instance_path.to_string()),
                message: error.to_string(),
            });
        }
    }

    Ok(issues)
}

fn normalized_json_pointer(pointer: &str) -> String {
    if pointer.is_empty() {
        "/".to_string()
    } else {
        pointer.to_string()
    }
}
