use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use fixtura_core::{Describe, Shape, ShapeResolver};

use crate::assemble::assemble;
use crate::errors::GenerationError;
use crate::model::GenerateOptions;
use crate::params::{GenerationContext, GenerationParameters};

/// Entry point for generating test objects.
///
/// The engine is immutable after construction and can be shared between
/// threads; every call is an independent generation.
#[derive(Clone)]
pub struct FixtureEngine {
    prefix: String,
    params: GenerationParameters,
    resolver: Option<Arc<dyn ShapeResolver>>,
}

impl FixtureEngine {
    /// Compile the options. Fails only on an invalid override pattern.
    pub fn new(options: GenerateOptions) -> Result<Self, GenerationError> {
        let params = GenerationParameters::from_options(&options)?;
        Ok(Self {
            prefix: options.prefix,
            params,
            resolver: None,
        })
    }

    /// Attach a registry used to resolve [`Shape::Named`] references.
    pub fn with_resolver(mut self, resolver: Arc<dyn ShapeResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn parameters(&self) -> &GenerationParameters {
        &self.params
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Generate a fully populated `T`.
    pub fn generate<T>(&self) -> Result<T, GenerationError>
    where
        T: Describe + DeserializeOwned,
    {
        let type_name = std::any::type_name::<T>();
        let value = self.generate_root(&T::shape(), type_name)?;
        serde_json::from_value(value).map_err(|cause| GenerationError::ConstructionFailed {
            path: self.prefix.clone(),
            type_name: type_name.to_string(),
            cause,
        })
    }

    /// Generate the JSON value for an arbitrary shape.
    pub fn generate_value(&self, shape: &Shape) -> Result<Value, GenerationError> {
        self.generate_root(shape, &shape.type_name())
    }

    /// Generate a record or enum declared in the attached registry.
    pub fn generate_named(&self, name: &str) -> Result<Value, GenerationError> {
        self.generate_root(&Shape::Named(name.to_string()), name)
    }

    fn generate_root(&self, shape: &Shape, type_name: &str) -> Result<Value, GenerationError> {
        let mut ctx = GenerationContext::new(&self.params);
        if let Some(resolver) = self.resolver.as_deref() {
            ctx = ctx.with_resolver(resolver);
        }

        debug!(
            root = %type_name,
            prefix = %self.prefix,
            collection_size = self.params.collection_size,
            overrides = self.params.overrides.len(),
            "generation started"
        );
        let result = assemble(shape, &self.prefix, &ctx, 0);
        match &result {
            Ok(_) => debug!(root = %type_name, "generation finished"),
            Err(err) => debug!(root = %type_name, error = %err, "generation failed"),
        }
        result
    }
}

/// Generate `T` with default options.
pub fn generate_test_object<T>() -> Result<T, GenerationError>
where
    T: Describe + DeserializeOwned,
{
    generate_test_object_with(GenerateOptions::default())
}

/// Generate `T` with the given options.
pub fn generate_test_object_with<T>(options: GenerateOptions) -> Result<T, GenerationError>
where
    T: Describe + DeserializeOwned,
{
    FixtureEngine::new(options)?.generate()
}
