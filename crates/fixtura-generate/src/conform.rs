use serde_json::Value;

use fixtura_core::{IntKind, ScalarKind, Shape, TemporalKind};

use crate::params::GenerationContext;

/// Describe why `value` cannot stand for `shape`, or `None` when it fits.
///
/// Used for records without a typed construct check (registry records), so a
/// mistyped override fails the same way it does for compiled records.
pub fn mismatch(shape: &Shape, value: &Value, ctx: &GenerationContext<'_>) -> Option<String> {
    match shape {
        Shape::Text => expect(value.is_string(), "a string", value),
        Shape::Bool => expect(value.is_boolean(), "a boolean", value),
        Shape::Int(kind) => int_mismatch(*kind, value),
        Shape::Float(_) => expect(value.is_number(), "a number", value),
        Shape::Char => expect(
            value.as_str().is_some_and(|text| text.chars().count() == 1),
            "a single character",
            value,
        ),
        Shape::Temporal(TemporalKind::SystemTime) => {
            expect(value.is_object(), "a system time", value)
        }
        Shape::Temporal(kind) => expect(value.is_string(), &format!("a {kind} string"), value),
        Shape::Enum(shape) => expect(
            value
                .as_str()
                .is_some_and(|variant| shape.variants.iter().any(|known| known == variant)),
            &format!("a variant of `{}`", shape.name),
            value,
        ),
        Shape::Optional(_) if value.is_null() => None,
        Shape::Optional(inner) => mismatch(inner, value, ctx),
        Shape::Array { element, .. } => elements(value, |item| scalar_mismatch(*element, item)),
        Shape::List(element) | Shape::Set(element) => {
            elements(value, |item| mismatch(element, item, ctx))
        }
        Shape::Map(_, entry) => match value.as_object() {
            Some(entries) => entries.iter().find_map(|(key, item)| {
                mismatch(entry, item, ctx).map(|why| format!("[{key}]: {why}"))
            }),
            None => Some(found("an object", value)),
        },
        Shape::Record(record) => match value.as_object() {
            Some(fields) => record.fields.iter().find_map(|field| match fields.get(&field.name) {
                Some(item) => mismatch(&field.shape(), item, ctx)
                    .map(|why| format!("{}: {why}", field.name)),
                None if field.shape().is_optional() => None,
                None => Some(format!("missing field `{}`", field.name)),
            }),
            None => Some(found(&format!("a `{}` object", record.name), value)),
        },
        Shape::Named(name) => match ctx.resolve(name) {
            Some(Shape::Named(_)) | None => None,
            Some(resolved) => mismatch(&resolved, value, ctx),
        },
        // Overrides are the only way to supply these, so any value is taken.
        Shape::Opaque(_) | Shape::Unsupported { .. } => None,
    }
}

fn scalar_mismatch(kind: ScalarKind, value: &Value) -> Option<String> {
    match kind {
        ScalarKind::Bool => expect(value.is_boolean(), "a boolean", value),
        ScalarKind::Int(kind) => int_mismatch(kind, value),
        ScalarKind::Float(_) => expect(value.is_number(), "a number", value),
        ScalarKind::Char => expect(
            value.as_str().is_some_and(|text| text.chars().count() == 1),
            "a single character",
            value,
        ),
    }
}

fn int_mismatch(kind: IntKind, value: &Value) -> Option<String> {
    let unsigned = matches!(
        kind,
        IntKind::U8 | IntKind::U16 | IntKind::U32 | IntKind::U64 | IntKind::Usize
    );
    if unsigned {
        expect(value.is_u64(), &format!("an unsigned integer ({kind})"), value)
    } else {
        expect(value.is_i64(), &format!("an integer ({kind})"), value)
    }
}

fn elements(value: &Value, check: impl Fn(&Value) -> Option<String>) -> Option<String> {
    match value.as_array() {
        Some(items) => items
            .iter()
            .enumerate()
            .find_map(|(index, item)| check(item).map(|why| format!("[{index}]: {why}"))),
        None => Some(found("an array", value)),
    }
}

fn expect(ok: bool, expected: &str, value: &Value) -> Option<String> {
    (!ok).then(|| found(expected, value))
}

fn found(expected: &str, value: &Value) -> String {
    format!("expected {expected}, found {value}")
}
