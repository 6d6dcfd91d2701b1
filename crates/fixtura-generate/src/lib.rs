//! Deterministic test-object generation for Fixtura.
//!
//! Every field of a generated object gets a distinguishable value derived from
//! its dotted path: strings become `<path>Value`, numbers zero, booleans
//! `false`, characters `'a'`, and collections hold `collection_size` elements
//! named by index. Overrides keyed by path regex replace generated values.
//!
//! ```
//! use fixtura_core::describe_record;
//! use fixtura_generate::{GenerateOptions, generate_test_object_with};
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize)]
//! struct Order {
//!     id: i64,
//!     note: String,
//!     tags: Vec<String>,
//! }
//!
//! describe_record!(Order { id: i64, note: String, tags: Vec<String> });
//!
//! let order: Order =
//!     generate_test_object_with(GenerateOptions::default().with_override("id", 42)).unwrap();
//! assert_eq!(order.id, 42);
//! assert_eq!(order.note, "noteValue");
//! assert_eq!(order.tags, ["tags0Value", "tags1Value", "tags2Value"]);
//! ```

pub mod assemble;
pub mod conform;
pub mod engine;
pub mod errors;
pub mod model;
pub mod params;
pub mod paths;
pub mod synthesize;

pub use engine::{FixtureEngine, generate_test_object, generate_test_object_with};
pub use errors::GenerationError;
pub use model::{DEFAULT_COLLECTION_SIZE, DEFAULT_MAX_DEPTH, GenerateOptions, OverrideRule};
pub use params::{GenerationContext, GenerationParameters, Overrides};
