use async_trait::async_trait;
use serde_json::Value;

use crate::errors::ApiError;
use crate::models::Page;
use crate::query::Query;
use crate::schema::Schema;

/// A storage backend able to answer a parsed [`Query`].
///
/// Implementations must honor the query's expression, every sort entry in order,
/// and the page. `total_count` is the number of records matching the expression
/// before paging. For a given data snapshot the same query must yield the same page.
#[async_trait]
pub trait ResourceStore: Send + Sync {
    async fn find(&self, schema: &Schema, query: &Query) -> Result<Page<Value>, ApiError>;

    /// Fetch the single record whose identifier field equals `id`.
    ///
    /// Answers [`ApiError::NotFound`] when no record has that identifier.
    async fn find_by_id(&self, schema: &Schema, id: &str) -> Result<Value, ApiError>;
}
