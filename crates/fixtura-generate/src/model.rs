use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::GenerationError;

/// Collection size used when none (or zero) is configured.
pub const DEFAULT_COLLECTION_SIZE: usize = 3;
/// Maximum record nesting before generation fails with a cyclic-graph error.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Options for a generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct GenerateOptions {
    /// Path prefix for the top-level fields (`order` turns `id` into `order.id`).
    pub prefix: String,
    /// Ordered overrides; the first pattern matching a field path wins.
    pub overrides: Vec<OverrideRule>,
    /// Instant used for every date/time field instead of the epoch.
    pub reference_instant: Option<DateTime<Utc>>,
    /// Set optional fields to null unless an override matches them.
    pub use_null_for_optional_fields: bool,
    /// Element count for every list, set and map; zero or negative resets to
    /// the default.
    pub collection_size: i64,
    /// Maximum record nesting depth; zero resets to the default.
    pub max_depth: usize,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            overrides: Vec::new(),
            reference_instant: None,
            use_null_for_optional_fields: false,
            collection_size: DEFAULT_COLLECTION_SIZE as i64,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl GenerateOptions {
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Append an override. `pattern` must match the whole field path.
    pub fn with_override(mut self, pattern: impl Into<String>, value: impl Into<Value>) -> Self {
        self.overrides.push(OverrideRule {
            pattern: pattern.into(),
            value: value.into(),
        });
        self
    }

    /// Append an override whose value is any serializable type.
    pub fn try_with_override<T: Serialize + ?Sized>(
        self,
        pattern: impl Into<String>,
        value: &T,
    ) -> Result<Self, GenerationError> {
        let pattern = pattern.into();
        match serde_json::to_value(value) {
            Ok(value) => Ok(self.with_override(pattern, value)),
            Err(cause) => Err(GenerationError::InvalidOverrideValue { pattern, cause }),
        }
    }

    pub fn with_reference_instant(mut self, instant: DateTime<Utc>) -> Self {
        self.reference_instant = Some(instant);
        self
    }

    pub fn with_null_optionals(mut self, enabled: bool) -> Self {
        self.use_null_for_optional_fields = enabled;
        self
    }

    pub fn with_collection_size(mut self, size: i64) -> Self {
        self.collection_size = size;
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}

/// Override entry as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct OverrideRule {
    /// Regular expression matched against the full dotted field path.
    pub pattern: String,
    /// Value used verbatim for matching fields.
    pub value: Value,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::params::GenerationParameters;

    #[test]
    fn defaults_follow_documented_values() {
        let options = GenerateOptions::default();
        assert_eq!(options.collection_size, 3);
        assert_eq!(options.max_depth, 64);
        assert!(options.overrides.is_empty());
        assert!(!options.use_null_for_optional_fields);
    }

    #[test]
    fn partial_config_uses_defaults() {
        let options: GenerateOptions = toml::from_str(
            r#"
            collection_size = 5
            reference_instant = "2024-01-01T00:00:00Z"

            [[overrides]]
            pattern = "intField"
            value = 42
            "#,
        )
        .expect("parse options");
        assert_eq!(options.collection_size, 5);
        assert_eq!(options.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(options.overrides[0].value, json!(42));
        assert!(options.reference_instant.is_some());
    }

    #[test]
    fn negative_collection_size_in_config_resets_to_default() {
        let options: GenerateOptions =
            toml::from_str("collection_size = -1").expect("parse options");
        assert_eq!(options.collection_size, -1);
        let params = GenerationParameters::from_options(&options).expect("params");
        assert_eq!(params.collection_size, DEFAULT_COLLECTION_SIZE);
    }

    #[test]
    fn builder_keeps_override_order() {
        let options = GenerateOptions::default()
            .with_override("a", "first")
            .with_override(".*", 7)
            .try_with_override("b", &vec![1, 2])
            .expect("serializable");
        let patterns: Vec<_> = options
            .overrides
            .iter()
            .map(|rule| rule.pattern.as_str())
            .collect();
        assert_eq!(patterns, ["a", ".*", "b"]);
        assert_eq!(options.overrides[2].value, json!([1, 2]));
    }
}
