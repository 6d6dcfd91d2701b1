use serde::de::Error as _;
use serde_json::{Map, Value};
use tracing::trace;

use fixtura_core::{RecordShape, Shape};

use crate::conform::mismatch;
use crate::errors::GenerationError;
use crate::params::GenerationContext;
use crate::paths::child_path;
use crate::synthesize::synthesize;

/// Build the value of a record (or named/opaque type) rooted at `prefix`.
///
/// Non-record shapes are handed to the synthesizer, so any shape can be used
/// as a generation root.
pub fn assemble(
    shape: &Shape,
    prefix: &str,
    ctx: &GenerationContext<'_>,
    depth: usize,
) -> Result<Value, GenerationError> {
    match shape {
        Shape::Record(record) => assemble_record(record, prefix, ctx, depth),
        Shape::Named(name) => match ctx.resolve(name) {
            Some(Shape::Named(_)) | None => Err(GenerationError::NotConstructible {
                path: prefix.to_string(),
                type_name: name.clone(),
            }),
            Some(resolved) => assemble(&resolved, prefix, ctx, depth),
        },
        Shape::Opaque(name) => Err(GenerationError::NotConstructible {
            path: prefix.to_string(),
            type_name: name.clone(),
        }),
        other => synthesize(other, prefix, ctx, depth),
    }
}

fn assemble_record(
    record: &RecordShape,
    prefix: &str,
    ctx: &GenerationContext<'_>,
    depth: usize,
) -> Result<Value, GenerationError> {
    let params = ctx.params;
    if depth >= params.max_depth {
        return Err(GenerationError::CyclicTypeGraph {
            path: prefix.to_string(),
            type_name: record.name.clone(),
            max_depth: params.max_depth,
        });
    }

    let mut fields = Map::new();
    for field in &record.fields {
        let path = child_path(prefix, &field.name);
        let shape = field.shape();
        let value = if let Some(value) = params.overrides.find(&path) {
            trace!(path = %path, source = "override", "field resolved");
            // Compiled records verify overrides through their construct check.
            if record.check.is_none()
                && let Some(reason) = mismatch(&shape, value, ctx)
            {
                return Err(GenerationError::ConstructionFailed {
                    path: prefix.to_string(),
                    type_name: record.name.clone(),
                    cause: serde_json::Error::custom(format!(
                        "field `{}`: {reason}",
                        field.name
                    )),
                });
            }
            value.clone()
        } else if params.use_null_for_optional_fields && shape.is_optional() {
            trace!(path = %path, source = "null", "field resolved");
            Value::Null
        } else {
            let value = synthesize(&shape, &path, ctx, depth + 1)?;
            trace!(path = %path, source = "synthesized", "field resolved");
            value
        };
        fields.insert(field.name.clone(), value);
    }

    let value = Value::Object(fields);
    if let Some(check) = record.check {
        check(&value).map_err(|cause| GenerationError::ConstructionFailed {
            path: prefix.to_string(),
            type_name: record.name.clone(),
            cause,
        })?;
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use fixtura_core::{FieldShape, IntKind, ShapeRegistry};

    use super::*;
    use crate::model::GenerateOptions;
    use crate::params::GenerationParameters;

    fn inner() -> Shape {
        Shape::Record(RecordShape::new(
            "Inner",
            vec![FieldShape::owned("one", Shape::Text)],
        ))
    }

    fn outer() -> Shape {
        Shape::Record(RecordShape::new(
            "Outer",
            vec![
                FieldShape::owned("inner", inner()),
                FieldShape::owned("one", Shape::Text),
                FieldShape::owned("count", Shape::Optional(Box::new(Shape::Int(IntKind::I32)))),
            ],
        ))
    }

    fn params(options: GenerateOptions) -> GenerationParameters {
        GenerationParameters::from_options(&options).expect("params")
    }

    #[test]
    fn nested_fields_extend_the_prefix() {
        let params = params(GenerateOptions::default());
        let value = assemble(&outer(), "root", &GenerationContext::new(&params), 0)
            .expect("assemble");
        assert_eq!(
            value,
            json!({
                "inner": { "one": "root.inner.oneValue" },
                "one": "root.oneValue",
                "count": 0,
            })
        );
    }

    #[test]
    fn overrides_apply_at_every_level() {
        let params = params(GenerateOptions::default().with_override(r".*\.?one", "MyValue"));
        let value =
            assemble(&outer(), "", &GenerationContext::new(&params), 0).expect("assemble");
        assert_eq!(value["inner"]["one"], json!("MyValue"));
        assert_eq!(value["one"], json!("MyValue"));
        assert_eq!(value["count"], json!(0));
    }

    #[test]
    fn null_optionals_only_touch_optional_fields() {
        let params = params(GenerateOptions::default().with_null_optionals(true));
        let value =
            assemble(&outer(), "", &GenerationContext::new(&params), 0).expect("assemble");
        assert_eq!(value["count"], Value::Null);
        assert_eq!(value["one"], json!("oneValue"));
    }

    #[test]
    fn opaque_and_unresolved_names_are_not_constructible() {
        let params = GenerationParameters::default();
        let ctx = GenerationContext::new(&params);
        let err = assemble(&Shape::Opaque("Uuid".to_string()), "id", &ctx, 0)
            .expect_err("opaque");
        assert!(matches!(err, GenerationError::NotConstructible { ref path, .. } if path == "id"));

        let registry = ShapeRegistry::default();
        let ctx = ctx.with_resolver(&registry);
        let err = assemble(&Shape::Named("Ghost".to_string()), "ghost", &ctx, 0)
            .expect_err("unknown name");
        assert!(matches!(
            err,
            GenerationError::NotConstructible { ref type_name, .. } if type_name == "Ghost"
        ));
    }

    #[test]
    fn mistyped_override_fails_unchecked_records() {
        let bad_params = params(GenerateOptions::default().with_override("count", "many"));
        let err = assemble(&outer(), "", &GenerationContext::new(&bad_params), 0)
            .expect_err("mistyped override");
        assert!(matches!(
            err,
            GenerationError::ConstructionFailed { ref path, ref type_name, .. }
                if path.is_empty() && type_name == "Outer"
        ));
        assert!(err.to_string().contains("field `count`"));

        let params = params(GenerateOptions::default().with_override("count", Value::Null));
        let value =
            assemble(&outer(), "", &GenerationContext::new(&params), 0).expect("null optional");
        assert_eq!(value["count"], Value::Null);
    }

    #[test]
    fn depth_limit_stops_runaway_nesting() {
        let params = params(GenerateOptions::default().with_max_depth(1));
        let err = assemble(&outer(), "", &GenerationContext::new(&params), 0)
            .expect_err("too deep");
        assert!(matches!(
            err,
            GenerationError::CyclicTypeGraph { ref path, max_depth: 1, .. } if path == "inner"
        ));
    }
}
