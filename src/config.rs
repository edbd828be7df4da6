//! Query parsing configuration.
//!
//! [`QueryConfig`] is passed explicitly to the parser and owned by the
//! [`ModelRegistry`](crate::registry::ModelRegistry); there is no global state.

use serde::Deserialize;

const DEFAULT_MAX_SEARCH_LENGTH: usize = 10_000;
const DEFAULT_MAX_FILTER_VALUE_LENGTH: usize = 10_000;
const DEFAULT_MAX_SEARCH_DEPTH: usize = 32;

/// Limits applied while parsing a query string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QueryConfig {
    /// Maximum length in bytes of the `q` parameter.
    pub max_search_length: usize,
    /// Maximum length in bytes of a single filter value.
    pub max_filter_value_length: usize,
    /// Maximum nesting of parentheses in the `q` parameter.
    pub max_search_depth: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            max_search_length: DEFAULT_MAX_SEARCH_LENGTH,
            max_filter_value_length: DEFAULT_MAX_FILTER_VALUE_LENGTH,
            max_search_depth: DEFAULT_MAX_SEARCH_DEPTH,
        }
    }
}

impl QueryConfig {
    /// Load from a JSON document. Missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if the document is not valid.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
