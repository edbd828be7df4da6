//! Model registry: which schemas are served, and by which store.

use indexmap::IndexMap;
use std::sync::Arc;

use crate::config::QueryConfig;
use crate::core::ResourceStore;
use crate::schema::{Model, Schema};

/// A schema together with the store that answers queries for it.
#[derive(Clone)]
pub struct RegisteredModel {
    pub schema: Schema,
    pub store: Arc<dyn ResourceStore>,
}

/// Registry of every model exposed over HTTP, keyed by path segment.
///
/// Built once at startup and read-only afterwards, so it can be shared between
/// requests behind an `Arc` without locking.
#[derive(Clone, Default)]
pub struct ModelRegistry {
    models: IndexMap<String, RegisteredModel>,
    config: QueryConfig,
}

impl ModelRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the query limits used when parsing requests.
    #[must_use]
    pub fn with_config(mut self, config: QueryConfig) -> Self {
        self.config = config;
        self
    }

    /// Register `schema` under its own name. A later registration with the same
    /// name replaces the earlier one.
    #[must_use]
    pub fn register(mut self, schema: Schema, store: impl ResourceStore + 'static) -> Self {
        let path = schema.name().to_string();
        tracing::debug!(model = %path, properties = schema.properties().len(), "Registered model");
        self.models.insert(
            path,
            RegisteredModel {
                schema,
                store: Arc::new(store),
            },
        );
        self
    }

    /// Register a [`Model`] type using its static schema.
    #[must_use]
    pub fn register_model<M: Model>(self, store: impl ResourceStore + 'static) -> Self {
        self.register(M::schema(), store)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RegisteredModel> {
        self.models.get(name)
    }

    /// Registered model names, in registration order.
    pub fn model_names(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    #[must_use]
    pub const fn config(&self) -> &QueryConfig {
        &self.config
    }
}
