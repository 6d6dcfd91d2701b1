use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::shape::{
    ArrayLen, EnumShape, FieldShape, FloatKind, IntKind, RecordShape, Shape, TemporalKind,
    UnsupportedReason,
};

/// Resolves named record and enum shapes at generation time.
pub trait ShapeResolver: Send + Sync {
    fn resolve(&self, name: &str) -> Option<Shape>;
}

/// Registry document describing records and enums that are not known at
/// compile time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ShapeRegistry {
    /// Record types with their canonical field lists.
    #[serde(default)]
    pub records: Vec<RecordDef>,
    /// Unit-variant enumerations.
    #[serde(default)]
    pub enums: Vec<EnumDef>,
    /// Type names without a canonical constructor.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub opaque: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct RecordDef {
    pub name: String,
    /// Fields in constructor order.
    pub fields: Vec<FieldDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct EnumDef {
    pub name: String,
    pub variants: Vec<String>,
}

/// Type reference: a scalar or declared type name, or a composite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum TypeRef {
    Name(String),
    Composite(CompositeRef),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum CompositeRef {
    List(Box<TypeRef>),
    Set(Box<TypeRef>),
    /// Key and value types, in that order.
    Map(Vec<TypeRef>),
    Optional(Box<TypeRef>),
    Array {
        of: Box<TypeRef>,
        /// Fixed length; the configured collection size when absent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        len: Option<usize>,
    },
    /// Any other generic container; never generatable.
    Container {
        kind: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        args: Vec<TypeRef>,
    },
}

/// Shape of a built-in scalar name, if `name` is one.
pub fn scalar_shape(name: &str) -> Option<Shape> {
    let shape = match name {
        "string" => Shape::Text,
        "bool" => Shape::Bool,
        "char" => Shape::Char,
        "i8" => Shape::Int(IntKind::I8),
        "i16" => Shape::Int(IntKind::I16),
        "i32" => Shape::Int(IntKind::I32),
        "i64" => Shape::Int(IntKind::I64),
        "isize" => Shape::Int(IntKind::Isize),
        "u8" => Shape::Int(IntKind::U8),
        "u16" => Shape::Int(IntKind::U16),
        "u32" => Shape::Int(IntKind::U32),
        "u64" => Shape::Int(IntKind::U64),
        "usize" => Shape::Int(IntKind::Usize),
        "f32" => Shape::Float(FloatKind::F32),
        "f64" => Shape::Float(FloatKind::F64),
        "system_time" => Shape::Temporal(TemporalKind::SystemTime),
        "instant" => Shape::Temporal(TemporalKind::Instant),
        "naive_date_time" => Shape::Temporal(TemporalKind::NaiveDateTime),
        "naive_date" => Shape::Temporal(TemporalKind::NaiveDate),
        _ => return None,
    };
    Some(shape)
}

impl ShapeRegistry {
    pub fn from_json_str(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Load a registry from disk; `.toml` files are parsed as TOML, anything
    /// else as JSON.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let is_toml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        if is_toml {
            Self::from_toml_str(&contents)
        } else {
            Self::from_json_str(&contents)
        }
    }

    pub fn record(&self, name: &str) -> Option<&RecordDef> {
        self.records.iter().find(|record| record.name == name)
    }

    pub fn enum_def(&self, name: &str) -> Option<&EnumDef> {
        self.enums.iter().find(|def| def.name == name)
    }

    pub fn is_opaque(&self, name: &str) -> bool {
        self.opaque.iter().any(|opaque| opaque == name)
    }

    /// Convert a type reference into a shape. Declared records and enums stay
    /// [`Shape::Named`] so recursive registries do not expand eagerly.
    pub fn type_shape(&self, ty: &TypeRef) -> Shape {
        match ty {
            TypeRef::Name(name) => self.name_shape(name),
            TypeRef::Composite(composite) => self.composite_shape(composite),
        }
    }

    fn name_shape(&self, name: &str) -> Shape {
        if let Some(shape) = scalar_shape(name) {
            return shape;
        }
        if self.is_opaque(name) {
            return Shape::Opaque(name.to_string());
        }
        Shape::Named(name.to_string())
    }

    fn composite_shape(&self, composite: &CompositeRef) -> Shape {
        match composite {
            CompositeRef::List(element) => Shape::List(Box::new(self.type_shape(element))),
            CompositeRef::Set(element) => Shape::Set(Box::new(self.type_shape(element))),
            CompositeRef::Optional(inner) => Shape::Optional(Box::new(self.type_shape(inner))),
            CompositeRef::Map(args) => match args.as_slice() {
                [key, value] => Shape::Map(
                    Box::new(self.type_shape(key)),
                    Box::new(self.type_shape(value)),
                ),
                _ => Shape::Unsupported {
                    container: "map".to_string(),
                    reason: UnsupportedReason::AmbiguousGenericArgument(format!(
                        "map needs exactly 2 type arguments, found {}",
                        args.len()
                    )),
                },
            },
            CompositeRef::Array { of, len } => {
                let element = self.type_shape(of);
                let len = len.map_or(ArrayLen::Configured, ArrayLen::Fixed);
                match element.scalar_kind() {
                    Some(element) => Shape::Array { element, len },
                    None => Shape::Unsupported {
                        container: "array".to_string(),
                        reason: UnsupportedReason::AmbiguousGenericArgument(format!(
                            "array element `{}` is not a primitive",
                            element.type_name()
                        )),
                    },
                }
            }
            CompositeRef::Container { kind, .. } => Shape::Unsupported {
                container: kind.clone(),
                reason: UnsupportedReason::ContainerKind,
            },
        }
    }
}

impl ShapeResolver for ShapeRegistry {
    fn resolve(&self, name: &str) -> Option<Shape> {
        if let Some(record) = self.record(name) {
            let fields = record
                .fields
                .iter()
                .map(|field| FieldShape::owned(field.name.clone(), self.type_shape(&field.ty)))
                .collect();
            return Some(Shape::Record(RecordShape::new(record.name.clone(), fields)));
        }
        self.enum_def(name)
            .map(|def| Shape::Enum(EnumShape::new(def.name.clone(), def.variants.clone())))
    }
}
