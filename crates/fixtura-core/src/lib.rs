//! Type descriptions for Fixtura.
//!
//! This crate defines the `Shape` model that drives test-object generation,
//! the `Describe` trait (with macros for user records and enums), and the
//! shape registry used when types are only known at runtime.

pub mod describe;
pub mod error;
pub mod registry;
pub mod schema;
pub mod shape;
pub mod validation;

pub use describe::Describe;
pub use error::{Error, Result};
pub use registry::{
    CompositeRef, EnumDef, FieldDef, RecordDef, ShapeRegistry, ShapeResolver, TypeRef,
    scalar_shape,
};
pub use schema::{RegistryIssue, registry_json_schema, validate_registry_json};
pub use shape::{
    ArrayLen, ConstructCheck, EnumShape, FieldShape, FieldType, FloatKind, IntKind, RecordShape,
    ScalarKind, Shape, TemporalKind, UnsupportedReason,
};
pub use validation::validate_registry;

#[doc(hidden)]
pub mod __private {
    pub use serde;
}
