use chrono::{DateTime, Utc};
use regex::Regex;
use serde_json::Value;

use fixtura_core::{Shape, ShapeResolver};

use crate::errors::GenerationError;
use crate::model::{DEFAULT_COLLECTION_SIZE, DEFAULT_MAX_DEPTH, GenerateOptions, OverrideRule};

/// Compiled, ordered override list. Read-only during generation.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    entries: Vec<OverrideEntry>,
}

#[derive(Debug, Clone)]
struct OverrideEntry {
    regex: Regex,
    value: Value,
}

impl Overrides {
    /// Compile override rules. Patterns are anchored so they must match the
    /// entire field path.
    pub fn compile(rules: &[OverrideRule]) -> Result<Self, GenerationError> {
        let entries = rules
            .iter()
            .map(|rule| {
                Regex::new(&format!("^(?:{})$", rule.pattern))
                    .map(|regex| OverrideEntry {
                        regex,
                        value: rule.value.clone(),
                    })
                    .map_err(|cause| GenerationError::InvalidOverridePattern {
                        pattern: rule.pattern.clone(),
                        cause,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { entries })
    }

    /// Value of the first override whose pattern matches `path`.
    pub fn find(&self, path: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|entry| entry.regex.is_match(path))
            .map(|entry| &entry.value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Immutable configuration threaded through every recursive call.
#[derive(Debug, Clone)]
pub struct GenerationParameters {
    pub overrides: Overrides,
    pub reference_instant: Option<DateTime<Utc>>,
    pub use_null_for_optional_fields: bool,
    pub collection_size: usize,
    pub max_depth: usize,
}

impl GenerationParameters {
    pub fn from_options(options: &GenerateOptions) -> Result<Self, GenerationError> {
        Ok(Self {
            overrides: Overrides::compile(&options.overrides)?,
            reference_instant: options.reference_instant,
            use_null_for_optional_fields: options.use_null_for_optional_fields,
            collection_size: normalize_collection_size(options.collection_size),
            max_depth: if options.max_depth == 0 {
                DEFAULT_MAX_DEPTH
            } else {
                options.max_depth
            },
        })
    }

    /// Instant used for date/time fields.
    pub fn instant(&self) -> DateTime<Utc> {
        self.reference_instant.unwrap_or(DateTime::UNIX_EPOCH)
    }
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            overrides: Overrides::default(),
            reference_instant: None,
            use_null_for_optional_fields: false,
            collection_size: DEFAULT_COLLECTION_SIZE,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Zero and negative sizes fall back to [`DEFAULT_COLLECTION_SIZE`].
pub fn normalize_collection_size(size: i64) -> usize {
    usize::try_from(size)
        .ok()
        .filter(|size| *size > 0)
        .unwrap_or(DEFAULT_COLLECTION_SIZE)
}

/// Parameters plus the optional registry used to resolve named shapes.
#[derive(Clone, Copy)]
pub struct GenerationContext<'a> {
    pub params: &'a GenerationParameters,
    pub resolver: Option<&'a dyn ShapeResolver>,
}

impl<'a> GenerationContext<'a> {
    pub fn new(params: &'a GenerationParameters) -> Self {
        Self {
            params,
            resolver: None,
        }
    }

    pub fn with_resolver(mut self, resolver: &'a dyn ShapeResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn resolve(&self, name: &str) -> Option<Shape> {
        self.resolver.and_then(|resolver| resolver.resolve(name))
    }
}
