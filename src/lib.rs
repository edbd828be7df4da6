//! Backend-agnostic query translation and pagination for schema-driven list endpoints.
//!
//! A request such as
//!
//! ```text
//! GET /resources?id_equals=4&unique_contains=filter&q=ilterUni&sort=id,DESC&pageSize=25
//! ```
//!
//! is parsed against a [`Schema`] into an immutable [`Query`] and handed to a
//! [`ResourceStore`], which returns a [`Page`].
//!
//! ```rust,ignore
//! let schema = Schema::builder("resources")
//!     .property("id", PropertyType::Number, |p| p.sortable())
//!     .property("unique", PropertyType::String, |p| p.searchable().sortable())
//!     .build()?;
//!
//! let registry = ModelRegistry::new().register(schema, SeaOrmStore::<resource::Entity>::new(db));
//! let app = elepy::routes::router(Arc::new(registry));
//! ```

pub mod config;
pub mod core;
pub mod errors;
pub mod filtering;
pub mod models;
pub mod query;
pub mod registry;
pub mod routes;
pub mod schema;

pub use config::QueryConfig;
pub use crate::core::{InMemoryStore, ResourceStore, SeaOrmStore};
pub use errors::{ApiError, QueryError, SchemaError};
pub use models::{Page, QueryParams};
pub use query::{Query, parse_id, parse_query, parse_query_with_config};
pub use registry::ModelRegistry;
pub use schema::{Model, Property, PropertyType, Schema};
