use std::fmt;

use serde_json::Value;

/// Probe that checks whether a generated JSON tree can build the described type.
pub type ConstructCheck = fn(&Value) -> Result<(), serde_json::Error>;

/// Description of a generatable type.
///
/// Dispatch over this union replaces runtime reflection: every supported kind
/// has its own variant, and new kinds are added here rather than by comparing
/// type identities.
#[derive(Debug, Clone)]
pub enum Shape {
    Enum(EnumShape),
    Text,
    Bool,
    Int(IntKind),
    Float(FloatKind),
    Char,
    Temporal(TemporalKind),
    /// Primitive array filled with a flat scalar default.
    Array { element: ScalarKind, len: ArrayLen },
    List(Box<Shape>),
    Set(Box<Shape>),
    Map(Box<Shape>, Box<Shape>),
    Optional(Box<Shape>),
    /// Generic container that the generator cannot fill.
    Unsupported {
        container: String,
        reason: UnsupportedReason,
    },
    Record(RecordShape),
    /// Reference to a record or enum resolved through a registry.
    Named(String),
    /// Type without a canonical constructor.
    Opaque(String),
}

impl Shape {
    pub fn is_optional(&self) -> bool {
        matches!(self, Shape::Optional(_))
    }

    /// Scalar kind usable as a primitive array element.
    pub fn scalar_kind(&self) -> Option<ScalarKind> {
        match self {
            Shape::Bool => Some(ScalarKind::Bool),
            Shape::Int(kind) => Some(ScalarKind::Int(*kind)),
            Shape::Float(kind) => Some(ScalarKind::Float(*kind)),
            Shape::Char => Some(ScalarKind::Char),
            _ => None,
        }
    }

    /// Short human-readable type description used in error messages.
    pub fn type_name(&self) -> String {
        match self {
            Shape::Enum(shape) => shape.name.clone(),
            Shape::Text => "string".to_string(),
            Shape::Bool => "bool".to_string(),
            Shape::Int(kind) => kind.to_string(),
            Shape::Float(kind) => kind.to_string(),
            Shape::Char => "char".to_string(),
            Shape::Temporal(kind) => kind.to_string(),
            Shape::Array { element, len } => match len {
                ArrayLen::Fixed(len) => format!("[{element}; {len}]"),
                ArrayLen::Configured => format!("[{element}]"),
            },
            Shape::List(element) => format!("list<{}>", element.type_name()),
            Shape::Set(element) => format!("set<{}>", element.type_name()),
            Shape::Map(key, value) => format!("map<{}, {}>", key.type_name(), value.type_name()),
            Shape::Optional(inner) => format!("optional<{}>", inner.type_name()),
            Shape::Unsupported { container, .. } => container.clone(),
            Shape::Record(record) => record.name.clone(),
            Shape::Named(name) | Shape::Opaque(name) => name.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntKind {
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
}

impl fmt::Display for IntKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IntKind::I8 => "i8",
            IntKind::I16 => "i16",
            IntKind::I32 => "i32",
            IntKind::I64 => "i64",
            IntKind::Isize => "isize",
            IntKind::U8 => "u8",
            IntKind::U16 => "u16",
            IntKind::U32 => "u32",
            IntKind::U64 => "u64",
            IntKind::Usize => "usize",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatKind {
    F32,
    F64,
}

impl fmt::Display for FloatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FloatKind::F32 => f.write_str("f32"),
            FloatKind::F64 => f.write_str("f64"),
        }
    }
}

/// Flavors of date/time values. All flavors resolve to the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemporalKind {
    /// `std::time::SystemTime`, the legacy date flavor.
    SystemTime,
    /// `chrono::DateTime<Utc>`.
    Instant,
    /// `chrono::NaiveDateTime`, read as UTC.
    NaiveDateTime,
    /// `chrono::NaiveDate`, the UTC calendar date of the instant.
    NaiveDate,
}

impl fmt::Display for TemporalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TemporalKind::SystemTime => "system_time",
            TemporalKind::Instant => "instant",
            TemporalKind::NaiveDateTime => "naive_date_time",
            TemporalKind::NaiveDate => "naive_date",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Bool,
    Int(IntKind),
    Float(FloatKind),
    Char,
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarKind::Bool => f.write_str("bool"),
            ScalarKind::Int(kind) => kind.fmt(f),
            ScalarKind::Float(kind) => kind.fmt(f),
            ScalarKind::Char => f.write_str("char"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayLen {
    /// Length fixed by the type, e.g. `[u8; 4]`.
    Fixed(usize),
    /// Length taken from the configured collection size.
    Configured,
}

/// Why a container shape cannot be generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnsupportedReason {
    /// The container kind is outside {sequence, set, mapping}.
    ContainerKind,
    /// A type argument could not be resolved to a usable type.
    AmbiguousGenericArgument(String),
}

impl fmt::Display for UnsupportedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnsupportedReason::ContainerKind => {
                f.write_str("only sequences, sets, maps and primitive arrays are supported")
            }
            UnsupportedReason::AmbiguousGenericArgument(detail) => {
                write!(f, "ambiguous generic argument: {detail}")
            }
        }
    }
}

/// Unit-variant enumeration with variants in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumShape {
    pub name: String,
    pub variants: Vec<String>,
}

impl EnumShape {
    pub fn new<I, S>(name: impl Into<String>, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            variants: variants.into_iter().map(Into::into).collect(),
        }
    }
}

/// Record with one canonical, ordered set of named fields.
#[derive(Debug, Clone)]
pub struct RecordShape {
    pub name: String,
    pub fields: Vec<FieldShape>,
    pub check: Option<ConstructCheck>,
}

impl RecordShape {
    pub fn new(name: impl Into<String>, fields: Vec<FieldShape>) -> Self {
        Self {
            name: name.into(),
            fields,
            check: None,
        }
    }

    pub fn with_check(mut self, check: ConstructCheck) -> Self {
        self.check = Some(check);
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldShape> {
        self.fields.iter().find(|field| field.name == name)
    }
}

#[derive(Debug, Clone)]
pub struct FieldShape {
    pub name: String,
    pub ty: FieldType,
}

impl FieldShape {
    /// Field whose shape comes from a `Describe` implementation.
    pub fn of<T: crate::Describe + ?Sized>(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: FieldType::Deferred(<T as crate::Describe>::shape),
        }
    }

    pub fn owned(name: impl Into<String>, shape: Shape) -> Self {
        Self {
            name: name.into(),
            ty: FieldType::Owned(Box::new(shape)),
        }
    }

    pub fn shape(&self) -> Shape {
        self.ty.shape()
    }
}

/// Field type storage.
///
/// `Deferred` keeps self-referential records describable: the nested shape is
/// only built when the generator reaches the field.
#[derive(Debug, Clone)]
pub enum FieldType {
    Deferred(fn() -> Shape),
    Owned(Box<Shape>),
}

impl FieldType {
    pub fn shape(&self) -> Shape {
        match self {
            FieldType::Deferred(shape) => shape(),
            FieldType::Owned(shape) => shape.as_ref().clone(),
        }
    }
}
