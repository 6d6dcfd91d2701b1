use thiserror::Error;

use fixtura_core::UnsupportedReason;

use crate::paths::{display_path, override_hint};

/// Errors emitted while generating a test object.
///
/// Every variant names the full field path so the caller can add a targeted
/// override; overrides are the only way to recover from these errors.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(
        "cannot generate `{type_name}` at {}: the type has no canonical constructor. \
         Add an override for this path, e.g. (r\"{}\", value)",
        display_path(.path),
        override_hint(.path)
    )]
    NotConstructible { path: String, type_name: String },

    #[error(
        "could not construct `{type_name}` at {}: {cause}. One of the generated values or \
         one of the overrides does not fit the declared field type; supply an override of the \
         correct type, e.g. (r\"{}\", value)",
        display_path(.path),
        override_hint(.path)
    )]
    ConstructionFailed {
        path: String,
        type_name: String,
        cause: serde_json::Error,
    },

    #[error(
        "unsupported container `{container}` at {}: {reason}. \
         Add an override for this path, e.g. (r\"{}\", value)",
        display_path(.path),
        override_hint(.path)
    )]
    UnsupportedContainerType {
        path: String,
        container: String,
        reason: UnsupportedReason,
    },

    #[error(
        "type graph of `{type_name}` exceeds the maximum depth of {max_depth} at {}; \
         the type is probably self-referential. Add an override for this path, e.g. (r\"{}\", value)",
        display_path(.path),
        override_hint(.path)
    )]
    CyclicTypeGraph {
        path: String,
        type_name: String,
        max_depth: usize,
    },

    #[error("invalid override pattern '{pattern}': {cause}")]
    InvalidOverridePattern {
        pattern: String,
        cause: regex::Error,
    },

    #[error("override value for '{pattern}' could not be serialized: {cause}")]
    InvalidOverrideValue {
        pattern: String,
        cause: serde_json::Error,
    },

    #[error(
        "reference instant cannot be encoded for the date field at {}: {cause}",
        display_path(.path)
    )]
    TemporalEncoding {
        path: String,
        cause: serde_json::Error,
    },
}

impl GenerationError {
    /// Field path the error refers to, when it has one.
    pub fn path(&self) -> Option<&str> {
        match self {
            GenerationError::NotConstructible { path, .. }
            | GenerationError::ConstructionFailed { path, .. }
            | GenerationError::UnsupportedContainerType { path, .. }
            | GenerationError::CyclicTypeGraph { path, .. }
            | GenerationError::TemporalEncoding { path, .. } => Some(path),
            GenerationError::InvalidOverridePattern { .. }
            | GenerationError::InvalidOverrideValue { .. } => None,
        }
    }
}
