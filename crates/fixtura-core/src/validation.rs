use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::registry::{CompositeRef, ShapeRegistry, TypeRef, scalar_shape};

/// Validate internal consistency of a shape registry.
///
/// This checks:
/// - duplicate record/enum/opaque names and names shadowing scalars
/// - duplicate field names and enum variants
/// - type references to undeclared names
pub fn validate_registry(registry: &ShapeRegistry) -> Result<()> {
    let mut declared = BTreeSet::new();
    let names = registry
        .records
        .iter()
        .map(|record| record.name.as_str())
        .chain(registry.enums.iter().map(|def| def.name.as_str()))
        .chain(registry.opaque.iter().map(String::as_str));

    for name in names {
        if scalar_shape(name).is_some() {
            return Err(Error::InvalidRegistry(format!(
                "type name shadows a built-in scalar: {name}"
            )));
        }
        if !declared.insert(name) {
            return Err(Error::InvalidRegistry(format!(
                "duplicate type name: {name}"
            )));
        }
    }

    for def in &registry.enums {
        let mut variants = BTreeSet::new();
        for variant in &def.variants {
            if !variants.insert(variant.as_str()) {
                return Err(Error::InvalidRegistry(format!(
                    "duplicate enum variant: {}.{}",
                    def.name, variant
                )));
            }
        }
    }

    for record in &registry.records {
        let mut fields = BTreeSet::new();
        for field in &record.fields {
            if !fields.insert(field.name.as_str()) {
                return Err(Error::InvalidRegistry(format!(
                    "duplicate field name: {}.{}",
                    record.name, field.name
                )));
            }
            check_references(&field.ty, &declared).map_err(|name| {
                Error::InvalidRegistry(format!(
                    "field {}.{} references undeclared type: {}",
                    record.name, field.name, name
                ))
            })?;
        }
    }

    Ok(())
}

fn check_references<'a>(
    ty: &'a TypeRef,
    declared: &BTreeSet<&str>,
) -> std::result::Result<(), &'a str> {
    match ty {
        TypeRef::Name(name) => {
            if scalar_shape(name).is_some() || declared.contains(name.as_str()) {
                Ok(())
            } else {
                Err(name.as_str())
            }
        }
        TypeRef::Composite(composite) => match composite {
            CompositeRef::List(inner) | CompositeRef::Set(inner) | CompositeRef::Optional(inner) => {
                check_references(inner, declared)
            }
            CompositeRef::Array { of, .. } => check_references(of, declared),
            CompositeRef::Map(args) | CompositeRef::Container { args, .. } => args
                .iter()
                .try_for_each(|arg| check_references(arg, declared)),
        },
    }
}
