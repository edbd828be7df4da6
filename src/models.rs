use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

use crate::filtering::pagination::UNBOUNDED_PAGE_SIZE;

/// The full parameter map of one request's query string.
///
/// Keys keep the order in which they first appear; repeated keys collect every
/// value in order (`sort=a&sort=b`, `id_in=1&id_in=2`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    params: IndexMap<String, Vec<String>>,
}

impl QueryParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode an `application/x-www-form-urlencoded` query string (without the leading `?`).
    #[must_use]
    pub fn from_query_string(query: &str) -> Self {
        url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params
            .entry(key.into())
            .or_default()
            .push(value.into());
    }

    /// First value for `key`, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Every value for `key`, in the order received.
    #[must_use]
    pub fn get_all(&self, key: &str) -> &[String] {
        self.params.get(key).map_or(&[], Vec::as_slice)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.params.keys().map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

/// Paginated result envelope returned by every storage backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub values: Vec<T>,
    pub total_count: u64,
    pub page_number: u64,
    pub page_size: u64,
}

impl<T> Page<T> {
    #[must_use]
    pub fn new(values: Vec<T>, total_count: u64, page_number: u64, page_size: u64) -> Self {
        Self {
            values,
            total_count,
            page_number,
            page_size,
        }
    }

    /// Whether this page was requested without a page size.
    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.page_size == UNBOUNDED_PAGE_SIZE
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            values: self.values.into_iter().map(f).collect(),
            total_count: self.total_count,
            page_number: self.page_number,
            page_size: self.page_size,
        }
    }
}

/// Query parameters accepted by list endpoints.
///
/// Only used to document the endpoint; requests are parsed from the raw query
/// string so that `<field>_<operator>` keys can be discovered dynamically.
///
/// # Filtering
/// Any key of the form `<field>_<operator>` is a field filter, for example
/// `unique_contains=filter` or `numberMax40_gte=10`. Repeat a key to pass several
/// values (`id_in=1&id_in=2`). Unknown operators are ignored.
///
/// # Sorting
/// `sort=field` or `sort=field,DESC`; repeat for multi-key sorts, first listed is primary.
///
/// # Pagination
/// `pageNumber` (1-based, default 1) and `pageSize` (default: everything).
#[derive(Debug, Deserialize, IntoParams, Default)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    /// Free-text search across searchable fields.
    ///
    /// Example: `"filter" OR unique`
    #[param(example = "ilterUni")]
    pub q: Option<String>,
    /// Sort keys in the format `field` or `field,ASC|DESC`. Repeatable.
    #[param(example = "id,DESC")]
    pub sort: Option<Vec<String>>,
    /// Number of records per page.
    #[param(example = 25)]
    pub page_size: Option<u64>,
    /// 1-based page number.
    #[param(example = 1)]
    pub page_number: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_query_string_collects_repeated_keys() {
        let params = QueryParams::from_query_string("sort=name&sort=age%2CDESC&q=hello+world");
        assert_eq!(params.get_all("sort"), ["name".to_string(), "age,DESC".to_string()]);
        assert_eq!(params.get("q"), Some("hello world"));
        assert_eq!(params.get("missing"), None);
        assert!(params.get_all("missing").is_empty());
    }

    #[test]
    fn test_key_order_is_first_appearance() {
        let params = QueryParams::from_query_string("b=1&a=2&b=3");
        let keys: Vec<&str> = params.keys().collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn test_empty_query_string() {
        assert!(QueryParams::from_query_string("").is_empty());
    }

    #[test]
    fn test_page_serializes_camel_case() {
        let page = Page::new(vec![1, 2], 10, 2, 2);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"values": [1, 2], "totalCount": 10, "pageNumber": 2, "pageSize": 2})
        );
    }

    #[test]
    fn test_page_map_keeps_metadata() {
        let page = Page::new(vec![1, 2], 2, 1, UNBOUNDED_PAGE_SIZE).map(|v| v * 10);
        assert_eq!(page.values, vec![10, 20]);
        assert!(page.is_unbounded());
    }
}
