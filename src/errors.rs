//! # Error Handling
//!
//! Two layers of errors:
//!
//! - [`QueryError`]: everything that can go wrong while turning a query string into a
//!   [`Query`](crate::query::Query). Parsing is all-or-nothing, so the first error
//!   aborts the request before any backend is touched.
//! - [`SchemaError`]: a schema declared at startup that can't be served.
//! - [`ApiError`]: what handlers return. It maps to an HTTP status code, sends a
//!   sanitized message to the client and logs internal details with `tracing`.
//!
//! ## Logging
//!
//! Internal errors are logged using the `tracing` crate. To see them, install a
//! subscriber in your application:
//!
//! ```rust,ignore
//! tracing_subscriber::fmt()
//!     .with_target(false)
//!     .compact()
//!     .init();
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;
use std::fmt;

/// Client-facing validation failures raised while parsing a query string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("'{operator}' can't be applied to the field '{property}'")]
    IncompatibleFilter { operator: String, property: String },

    #[error("Query parameter '{parameter}' refers to unknown field '{property}'")]
    UnknownProperty { parameter: String, property: String },

    #[error("Query parameter '{parameter}' has invalid value '{value}': {reason}")]
    InvalidFilterValue {
        parameter: String,
        value: String,
        reason: String,
    },

    #[error("Query parameter '{parameter}' exceeds the maximum length of {max} bytes")]
    ValueTooLong { parameter: String, max: usize },

    #[error("Can't sort on field '{property}'")]
    UnsortableProperty { property: String },

    #[error("Invalid sort direction '{direction}' in 'sort={value}', expected ASC or DESC")]
    InvalidSortDirection { value: String, direction: String },

    #[error("Malformed sort parameter 'sort={value}', expected 'field' or 'field,direction'")]
    MalformedSort { value: String },

    #[error("Query parameter '{parameter}' must be a positive integer, got '{value}'")]
    InvalidPageParameter { parameter: String, value: String },

    #[error("Malformed search 'q={query}': {reason}")]
    MalformedSearch { query: String, reason: String },

    #[error("Invalid identifier '{value}' for field '{field}': {reason}")]
    InvalidIdentifier {
        field: String,
        value: String,
        reason: String,
    },
}

/// Inconsistent schema declarations, reported by [`SchemaBuilder::build`](crate::schema::SchemaBuilder::build).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("Schema '{schema}' declares no property '{field}' for its identifier")]
    UnknownIdField { schema: String, field: String },

    #[error("Schema '{schema}' can't sort by default on '{field}': it is not a sortable property")]
    UnsortableDefaultSort { schema: String, field: String },
}

/// API error type with automatic logging and sanitized responses
#[derive(Debug)]
pub enum ApiError {
    /// 404 Not Found - model or record doesn't exist
    NotFound {
        resource: String,
        id: Option<String>,
    },

    /// 400 Bad Request - invalid input from the client
    BadRequest { message: String },

    /// 500 Internal Server Error - database error (details logged, not exposed)
    Database { message: String, internal: DbErr },

    /// 500 Internal Server Error - generic internal error
    Internal {
        message: String,
        internal: Option<String>,
    },
}

impl ApiError {
    pub fn not_found(resource: impl Into<String>, id: Option<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Create a 500 error from a database error. The details are logged, never sent.
    #[must_use]
    pub fn database(err: DbErr) -> Self {
        Self::Database {
            message: "A database error occurred".to_string(),
            internal: err,
        }
    }

    pub fn internal(message: impl Into<String>, internal: Option<String>) -> Self {
        Self::Internal {
            message: message.into(),
            internal,
        }
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Database { .. } | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the user-facing error message (sanitized)
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound { resource, id } => match id {
                Some(id) => format!("{resource} with ID '{id}' not found"),
                None => format!("{resource} not found"),
            },
            Self::BadRequest { message }
            | Self::Database { message, .. }
            | Self::Internal { message, .. } => message.clone(),
        }
    }

    fn log_internal(&self) {
        match self {
            Self::Database { internal, .. } => {
                tracing::error!(error = ?internal, "Database error occurred");
            }
            Self::Internal {
                internal: Some(details),
                ..
            } => {
                tracing::error!(details = %details, "Internal error occurred");
            }
            _ => {
                tracing::debug!(
                    error = %self.user_message(),
                    status = %self.status_code(),
                    "API error"
                );
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log_internal();
        let body = ErrorResponse {
            error: self.user_message(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl std::error::Error for ApiError {}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        Self::bad_request(err.to_string())
    }
}

/// `DbErr::RecordNotFound` becomes 404, every other database error becomes 500.
impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        match &err {
            DbErr::RecordNotFound(msg) => {
                let resource = msg.split_whitespace().next().unwrap_or("Resource");
                Self::not_found(resource, None)
            }
            _ => Self::database(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incompatible_filter_names_operator_and_field() {
        let err = QueryError::IncompatibleFilter {
            operator: "Contains".to_string(),
            property: "Number Max 40".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "'Contains' can't be applied to the field 'Number Max 40'"
        );
    }

    #[test]
    fn test_query_error_becomes_bad_request() {
        let err: ApiError = QueryError::InvalidPageParameter {
            parameter: "pageSize".to_string(),
            value: "abc".to_string(),
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.user_message().contains("pageSize"));
        assert!(err.user_message().contains("abc"));
    }

    #[test]
    fn test_not_found_with_and_without_id() {
        assert_eq!(
            ApiError::not_found("resources", Some("4".to_string())).user_message(),
            "resources with ID '4' not found"
        );
        assert_eq!(ApiError::not_found("Model", None).user_message(), "Model not found");
    }

    #[test]
    fn test_database_error_is_sanitized() {
        let err = ApiError::database(DbErr::Custom("secret connection string".to_string()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.user_message(), "A database error occurred");
    }

    #[test]
    fn test_dberr_conversion() {
        let not_found: ApiError = DbErr::RecordNotFound("Resource not found".to_string()).into();
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);

        let other: ApiError = DbErr::Type("Type mismatch".to_string()).into();
        assert_eq!(other.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_display_matches_user_message() {
        let err = ApiError::internal("Processing failed", Some("stack".to_string()));
        assert_eq!(format!("{err}"), "Processing failed");
    }
}
