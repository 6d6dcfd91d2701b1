use std::path::Path;

use fixtura_generate::{GenerateOptions, OverrideRule};
use serde_json::Value;

use crate::CliError;

/// Load generation options from a TOML file, or the defaults when no file is given.
pub fn load_options(path: Option<&Path>) -> Result<GenerateOptions, CliError> {
    let Some(path) = path else {
        return Ok(GenerateOptions::default());
    };
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Parse `PATTERN=VALUE`. The value is read as JSON, falling back to a plain
/// string when it is not valid JSON.
pub fn parse_override(raw: &str) -> Result<OverrideRule, String> {
    let Some((pattern, value)) = raw.split_once('=') else {
        return Err(format!("expected PATTERN=VALUE, got '{raw}'"));
    };
    if pattern.is_empty() {
        return Err("override pattern must not be empty".to_string());
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok(OverrideRule {
        pattern: pattern.to_string(),
        value,
    })
}

/// Read a registry document as JSON, converting TOML files on the way.
pub fn load_document(path: &Path) -> Result<Value, CliError> {
    let content = std::fs::read_to_string(path)?;
    let is_toml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    if is_toml {
        Ok(toml::from_str(&content)?)
    } else {
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn override_values_are_json_or_text() {
        let rule = parse_override("intField=42").expect("parse");
        assert_eq!(rule.pattern, "intField");
        assert_eq!(rule.value, json!(42));

        let rule = parse_override(r"inner\.one=plain text").expect("parse");
        assert_eq!(rule.value, json!("plain text"));

        let rule = parse_override("tags=[\"a\",\"b\"]").expect("parse");
        assert_eq!(rule.value, json!(["a", "b"]));

        let rule = parse_override("eq=a=b").expect("parse");
        assert_eq!(rule.pattern, "eq");
        assert_eq!(rule.value, json!("a=b"));
    }

    #[test]
    fn malformed_overrides_are_rejected() {
        assert!(parse_override("no-separator").is_err());
        assert!(parse_override("=1").is_err());
    }
}
