use std::time::SystemTime;

use serde_json::{Map, Value};
use tracing::warn;

use fixtura_core::{ArrayLen, EnumShape, ScalarKind, Shape, TemporalKind, UnsupportedReason};

use crate::assemble::assemble;
use crate::errors::GenerationError;
use crate::params::GenerationContext;
use crate::paths::{element_path, entry_key_path, entry_value_path};

/// Produce the value for one field path.
///
/// `depth` is the number of records entered above this path; nested records
/// go back through the assembler, which enforces the depth limit.
pub fn synthesize(
    shape: &Shape,
    path: &str,
    ctx: &GenerationContext<'_>,
    depth: usize,
) -> Result<Value, GenerationError> {
    match shape {
        Shape::Enum(shape) => Ok(first_variant(shape)),
        Shape::Text => Ok(Value::String(format!("{path}Value"))),
        Shape::Bool => Ok(scalar_default(ScalarKind::Bool)),
        Shape::Int(kind) => Ok(scalar_default(ScalarKind::Int(*kind))),
        Shape::Float(kind) => Ok(scalar_default(ScalarKind::Float(*kind))),
        Shape::Char => Ok(scalar_default(ScalarKind::Char)),
        Shape::Temporal(kind) => temporal_value(*kind, path, ctx),
        Shape::Array { element, len } => {
            let len = match len {
                ArrayLen::Fixed(len) => *len,
                ArrayLen::Configured => ctx.params.collection_size,
            };
            Ok(Value::Array(vec![scalar_default(*element); len]))
        }
        Shape::List(element) => Ok(Value::Array(sequence(element, path, ctx, depth)?)),
        Shape::Set(element) => {
            let values = sequence(element, path, ctx, depth)?;
            let mut unique: Vec<Value> = Vec::with_capacity(values.len());
            for value in values {
                if !unique.contains(&value) {
                    unique.push(value);
                }
            }
            if unique.len() < ctx.params.collection_size {
                warn!(
                    path = %path,
                    requested = ctx.params.collection_size,
                    generated = unique.len(),
                    "set elements collapsed to fewer unique values"
                );
            }
            Ok(Value::Array(unique))
        }
        Shape::Map(key, value) => mapping(key, value, path, ctx, depth),
        Shape::Optional(inner) => synthesize(inner, path, ctx, depth),
        Shape::Unsupported { container, reason } => {
            Err(GenerationError::UnsupportedContainerType {
                path: path.to_string(),
                container: container.clone(),
                reason: reason.clone(),
            })
        }
        Shape::Record(_) | Shape::Named(_) | Shape::Opaque(_) => assemble(shape, path, ctx, depth),
    }
}

/// First declared variant; null when the enum has none.
fn first_variant(shape: &EnumShape) -> Value {
    shape
        .variants
        .first()
        .map_or(Value::Null, |variant| Value::String(variant.clone()))
}

/// Exact default for a primitive kind.
pub fn scalar_default(kind: ScalarKind) -> Value {
    match kind {
        ScalarKind::Bool => Value::Bool(false),
        ScalarKind::Int(_) => Value::from(0),
        ScalarKind::Float(_) => Value::from(0.0),
        ScalarKind::Char => Value::String("a".to_string()),
    }
}

/// Encode the reference instant (or the epoch) in the serde form of the
/// flavor, so every flavor deserializes to the same point in time.
fn temporal_value(
    kind: TemporalKind,
    path: &str,
    ctx: &GenerationContext<'_>,
) -> Result<Value, GenerationError> {
    let instant = ctx.params.instant();
    let encoded = match kind {
        TemporalKind::SystemTime => serde_json::to_value(SystemTime::from(instant)),
        TemporalKind::Instant => serde_json::to_value(instant),
        TemporalKind::NaiveDateTime => serde_json::to_value(instant.naive_utc()),
        TemporalKind::NaiveDate => serde_json::to_value(instant.date_naive()),
    };
    encoded.map_err(|cause| GenerationError::TemporalEncoding {
        path: path.to_string(),
        cause,
    })
}

fn sequence(
    element: &Shape,
    path: &str,
    ctx: &GenerationContext<'_>,
    depth: usize,
) -> Result<Vec<Value>, GenerationError> {
    (0..ctx.params.collection_size)
        .map(|index| synthesize(element, &element_path(path, index), ctx, depth))
        .collect()
}

fn mapping(
    key: &Shape,
    value: &Shape,
    path: &str,
    ctx: &GenerationContext<'_>,
    depth: usize,
) -> Result<Value, GenerationError> {
    let mut entries = Map::new();
    for index in 0..ctx.params.collection_size {
        let generated_key = synthesize(key, &entry_key_path(path, index), ctx, depth)?;
        let generated_key = map_key(generated_key, key, path)?;
        let generated_value = synthesize(value, &entry_value_path(path, index), ctx, depth)?;
        entries.insert(generated_key, generated_value);
    }
    if entries.len() < ctx.params.collection_size {
        warn!(
            path = %path,
            requested = ctx.params.collection_size,
            generated = entries.len(),
            "map keys collapsed to fewer unique entries"
        );
    }
    Ok(Value::Object(entries))
}

/// JSON object key for a generated map key. Keys must be scalars.
fn map_key(key: Value, shape: &Shape, path: &str) -> Result<String, GenerationError> {
    match key {
        Value::String(key) => Ok(key),
        Value::Number(key) => Ok(key.to_string()),
        Value::Bool(key) => Ok(key.to_string()),
        _ => Err(GenerationError::UnsupportedContainerType {
            path: path.to_string(),
            container: "map".to_string(),
            reason: UnsupportedReason::AmbiguousGenericArgument(format!(
                "map key `{}` is not a string, number or boolean",
                shape.type_name()
            )),
        }),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    use fixtura_core::{EnumShape, FloatKind, IntKind};

    use super::*;
    use crate::params::GenerationParameters;

    fn generate(shape: &Shape, path: &str, params: &GenerationParameters) -> Value {
        synthesize(shape, path, &GenerationContext::new(params), 0).expect("synthesize")
    }

    #[test]
    fn scalars_are_exact() {
        let params = GenerationParameters::default();
        assert_eq!(generate(&Shape::Text, "inner.one", &params), json!("inner.oneValue"));
        assert_eq!(generate(&Shape::Bool, "flag", &params), json!(false));
        assert_eq!(generate(&Shape::Int(IntKind::I8), "n", &params), json!(0));
        assert_eq!(generate(&Shape::Float(FloatKind::F32), "x", &params), json!(0.0));
        assert_eq!(generate(&Shape::Char, "c", &params), json!("a"));
    }

    #[test]
    fn enums_use_first_variant_or_null() {
        let params = GenerationParameters::default();
        let status = Shape::Enum(EnumShape::new("Status", ["Open", "Closed"]));
        assert_eq!(generate(&status, "status", &params), json!("Open"));
        let empty = Shape::Enum(EnumShape::new("Never", Vec::<String>::new()));
        assert_eq!(generate(&empty, "never", &params), Value::Null);
    }

    #[test]
    fn lists_name_elements_by_index() {
        let params = GenerationParameters::default();
        let list = Shape::List(Box::new(Shape::Text));
        assert_eq!(
            generate(&list, "three", &params),
            json!(["three0Value", "three1Value", "three2Value"])
        );
    }

    #[test]
    fn arrays_are_flat_fills() {
        let params = GenerationParameters {
            collection_size: 4,
            ..GenerationParameters::default()
        };
        let configured = Shape::Array {
            element: ScalarKind::Char,
            len: ArrayLen::Configured,
        };
        assert_eq!(generate(&configured, "chars", &params), json!(["a", "a", "a", "a"]));
        let fixed = Shape::Array {
            element: ScalarKind::Bool,
            len: ArrayLen::Fixed(2),
        };
        assert_eq!(generate(&fixed, "flags", &params), json!([false, false]));
    }

    #[test]
    fn sets_deduplicate() {
        let params = GenerationParameters::default();
        let set = Shape::Set(Box::new(Shape::Bool));
        assert_eq!(generate(&set, "flags", &params), json!([false]));
    }

    #[test]
    fn maps_name_keys_and_values() {
        let params = GenerationParameters {
            collection_size: 2,
            ..GenerationParameters::default()
        };
        let map = Shape::Map(Box::new(Shape::Text), Box::new(Shape::Text));
        assert_eq!(
            generate(&map, "labels", &params),
            json!({
                "labels0keyValue": "labels0valueValue",
                "labels1keyValue": "labels1valueValue",
            })
        );
    }

    #[test]
    fn record_map_keys_are_rejected() {
        let params = GenerationParameters::default();
        let map = Shape::Map(
            Box::new(Shape::List(Box::new(Shape::Text))),
            Box::new(Shape::Bool),
        );
        let err = synthesize(&map, "index", &GenerationContext::new(&params), 0)
            .expect_err("list keys");
        assert!(matches!(
            err,
            GenerationError::UnsupportedContainerType {
                reason: UnsupportedReason::AmbiguousGenericArgument(_),
                ..
            }
        ));
    }

    #[test]
    fn temporal_flavors_share_the_reference_instant() {
        let instant = Utc.with_ymd_and_hms(2024, 3, 9, 16, 30, 0).unwrap();
        let params = GenerationParameters {
            reference_instant: Some(instant),
            ..GenerationParameters::default()
        };
        assert_eq!(
            generate(&Shape::Temporal(TemporalKind::Instant), "at", &params),
            json!("2024-03-09T16:30:00Z")
        );
        assert_eq!(
            generate(&Shape::Temporal(TemporalKind::NaiveDate), "on", &params),
            json!("2024-03-09")
        );
        assert_eq!(
            generate(&Shape::Temporal(TemporalKind::SystemTime), "legacy", &params),
            json!({ "secs_since_epoch": instant.timestamp(), "nanos_since_epoch": 0 })
        );
    }

    #[test]
    fn unsupported_containers_name_the_path() {
        let params = GenerationParameters::default();
        let shape = Shape::Unsupported {
            container: "Mutex".to_string(),
            reason: UnsupportedReason::ContainerKind,
        };
        let err = synthesize(&shape, "lock", &GenerationContext::new(&params), 0)
            .expect_err("unsupported");
        assert_eq!(err.path(), Some("lock"));
    }
}
