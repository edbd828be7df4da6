use axum::{
    Json, Router,
    extract::{Path, RawQuery, State},
    http::HeaderMap,
    routing::get,
};
use serde_json::Value;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::errors::ApiError;
use crate::filtering::calculate_content_range;
use crate::models::{ListParams, Page, QueryParams};
use crate::query::parse_query_with_config;
use crate::registry::ModelRegistry;

/// List records of a registered model.
///
/// Filters, search, sort and paging are read from the query string. The
/// `Content-Range` header reports which slice of the matching records was returned.
#[utoipa::path(
    get,
    path = "/{model}",
    params(
        ("model" = String, Path, description = "Name of a registered model"),
        ListParams
    ),
    responses(
        (status = 200, description = "One page of matching records with totalCount, pageNumber and pageSize"),
        (status = axum::http::StatusCode::BAD_REQUEST, description = "Malformed filter, search, sort or paging parameter"),
        (status = axum::http::StatusCode::NOT_FOUND, description = "No model registered under this name")
    )
)]
pub async fn list(
    State(registry): State<Arc<ModelRegistry>>,
    Path(model): Path<String>,
    RawQuery(raw): RawQuery,
) -> Result<(HeaderMap, Json<Page<Value>>), ApiError> {
    let registered = registry
        .get(&model)
        .ok_or_else(|| ApiError::not_found(format!("Model '{model}'"), None))?;

    let params = QueryParams::from_query_string(raw.as_deref().unwrap_or_default());
    let query = parse_query_with_config(&params, &registered.schema, registry.config())?;
    let page = registered.store.find(&registered.schema, &query).await?;

    let headers = calculate_content_range(
        query.pagination().offset(),
        page.values.len() as u64,
        page.total_count,
        registered.schema.name(),
    );
    Ok((headers, Json(page)))
}

/// Fetch one record of a registered model by the value of its identifier field.
#[utoipa::path(
    get,
    path = "/{model}/{id}",
    params(
        ("model" = String, Path, description = "Name of a registered model"),
        ("id" = String, Path, description = "Value of the model's identifier field")
    ),
    responses(
        (status = 200, description = "The requested record"),
        (status = axum::http::StatusCode::BAD_REQUEST, description = "Identifier is not valid for the model's identifier type"),
        (status = axum::http::StatusCode::NOT_FOUND, description = "Unknown model, or no record with this identifier")
    )
)]
pub async fn get_one(
    State(registry): State<Arc<ModelRegistry>>,
    Path((model, id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let registered = registry
        .get(&model)
        .ok_or_else(|| ApiError::not_found(format!("Model '{model}'"), None))?;

    let record = registered.store.find_by_id(&registered.schema, &id).await?;
    Ok(Json(record))
}

/// Router serving `GET /{model}` and `GET /{model}/{id}` for every model in `registry`.
pub fn router(registry: Arc<ModelRegistry>) -> Router {
    Router::new()
        .route("/{model}", get(list))
        .route("/{model}/{id}", get(get_one))
        .with_state(registry)
}

#[derive(OpenApi)]
#[openapi(
    paths(list, get_one),
    info(
        title = "Elepy query API",
        description = "Schema-driven list endpoints with field filters, free-text search, multi-key sorting and pagination, plus lookup by identifier."
    )
)]
pub struct ApiDoc;
