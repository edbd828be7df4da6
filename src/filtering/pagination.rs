use axum::http::{HeaderMap, HeaderValue, header::CONTENT_RANGE};

use crate::errors::QueryError;
use crate::models::QueryParams;

/// Page size used when the request does not ask for one: everything on one page.
pub const UNBOUNDED_PAGE_SIZE: u64 = u64::MAX;

/// Largest offset or limit a SQL backend can bind (a signed 64-bit integer).
const MAX_ADDRESSABLE: u64 = i64::MAX.unsigned_abs();

const PAGE_SIZE_PARAM: &str = "pageSize";
const PAGE_NUMBER_PARAM: &str = "pageNumber";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page number
    pub page_number: u64,
    pub page_size: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page_number: 1,
            page_size: UNBOUNDED_PAGE_SIZE,
        }
    }
}

impl Pagination {
    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.page_size == UNBOUNDED_PAGE_SIZE
    }

    /// Number of records to skip.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.page_number.saturating_sub(1).saturating_mul(self.page_size)
    }

    /// Maximum number of records to return.
    ///
    /// `None` when unbounded, and for page sizes no store could ever fill.
    #[must_use]
    pub const fn limit(&self) -> Option<u64> {
        if self.is_unbounded() || self.page_size > MAX_ADDRESSABLE {
            None
        } else {
            Some(self.page_size)
        }
    }

    /// Whether the page starts past any record a store can hold, so it is empty.
    ///
    /// Covers every page after the first of an unbounded listing.
    #[must_use]
    pub const fn is_out_of_range(&self) -> bool {
        self.offset() > MAX_ADDRESSABLE
    }
}

fn parse_positive(params: &QueryParams, name: &str) -> Result<Option<u64>, QueryError> {
    let Some(raw) = params.get(name) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|n| *n >= 1)
        .map(Some)
        .ok_or_else(|| QueryError::InvalidPageParameter {
            parameter: name.to_string(),
            value: raw.to_string(),
        })
}

/// Resolve `pageSize` and `pageNumber`.
///
/// Absent `pageSize` means unbounded, absent `pageNumber` means 1. Present values
/// must be positive integers; anything else is rejected rather than defaulted.
///
/// # Errors
///
/// [`QueryError::InvalidPageParameter`] naming the offending parameter.
pub fn parse_pagination(params: &QueryParams) -> Result<Pagination, QueryError> {
    Ok(Pagination {
        page_number: parse_positive(params, PAGE_NUMBER_PARAM)?.unwrap_or(1),
        page_size: parse_positive(params, PAGE_SIZE_PARAM)?.unwrap_or(UNBOUNDED_PAGE_SIZE),
    })
}

/// Sanitize resource name by removing control characters for HTTP headers
fn sanitize_resource_name(name: &str) -> String {
    name.chars().filter(|c| c.is_ascii() && !c.is_ascii_control()).collect()
}

/// Build the `Content-Range` header for a page of results.
///
/// * `offset` - index of the first returned record.
/// * `returned` - number of records in the page.
/// * `total_count` - number of records matching the query.
/// * `resource_name` - the model name, sanitized before use.
///
/// An empty page is reported as `<name> */<total>`.
#[must_use]
pub fn calculate_content_range(
    offset: u64,
    returned: u64,
    total_count: u64,
    resource_name: &str,
) -> HeaderMap {
    let safe_name = sanitize_resource_name(resource_name);
    let content_range = if returned == 0 {
        format!("{safe_name} */{total_count}")
    } else {
        let last = offset.saturating_add(returned - 1);
        format!("{safe_name} {offset}-{last}/{total_count}")
    };

    let mut headers = HeaderMap::new();
    let value = HeaderValue::from_str(&content_range)
        .unwrap_or_else(|_| HeaderValue::from_static("items */0"));
    headers.insert(CONTENT_RANGE, value);
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(query: &str) -> Result<Pagination, QueryError> {
        parse_pagination(&QueryParams::from_query_string(query))
    }

    #[test]
    fn test_defaults() {
        let pagination = parse("").unwrap();
        assert_eq!(pagination.page_number, 1);
        assert_eq!(pagination.page_size, UNBOUNDED_PAGE_SIZE);
        assert!(pagination.is_unbounded());
        assert_eq!(pagination.limit(), None);
        assert_eq!(pagination.offset(), 0);
    }

    #[test]
    fn test_explicit_values() {
        let pagination = parse("pageSize=10&pageNumber=3").unwrap();
        assert_eq!(pagination, Pagination { page_number: 3, page_size: 10 });
        assert_eq!(pagination.offset(), 20);
        assert_eq!(pagination.limit(), Some(10));
    }

    #[test]
    fn test_non_numeric_is_rejected() {
        assert_eq!(
            parse("pageSize=abc").unwrap_err(),
            QueryError::InvalidPageParameter {
                parameter: "pageSize".to_string(),
                value: "abc".to_string()
            }
        );
        assert!(parse("pageNumber=1.5").is_err());
    }

    #[test]
    fn test_zero_and_negative_are_rejected() {
        assert!(parse("pageNumber=0").is_err());
        assert!(parse("pageNumber=-1").is_err());
        assert!(parse("pageSize=0").is_err());
    }

    #[test]
    fn test_offset_saturates_for_unbounded_pages() {
        let pagination = Pagination {
            page_number: 2,
            page_size: UNBOUNDED_PAGE_SIZE,
        };
        assert_eq!(pagination.offset(), u64::MAX);
        assert!(pagination.is_out_of_range());
    }

    #[test]
    fn test_huge_values_stay_within_sql_range() {
        let far_page = parse("pageSize=2&pageNumber=18446744073709551615").unwrap();
        assert!(far_page.is_out_of_range());
        assert_eq!(far_page.limit(), Some(2));

        let huge_size = parse("pageSize=18446744073709551614").unwrap();
        assert!(!huge_size.is_out_of_range());
        assert_eq!(huge_size.offset(), 0);
        assert_eq!(huge_size.limit(), None);

        let last_bindable = parse("pageSize=9223372036854775807").unwrap();
        assert_eq!(last_bindable.limit(), Some(9_223_372_036_854_775_807));
        assert!(!parse("pageSize=1&pageNumber=9223372036854775808").unwrap().is_out_of_range());
        assert!(parse("pageSize=1&pageNumber=9223372036854775809").unwrap().is_out_of_range());
    }

    #[test]
    fn test_content_range_normal() {
        let headers = calculate_content_range(0, 10, 100, "users");
        assert_eq!(headers.get(CONTENT_RANGE).unwrap().to_str().unwrap(), "users 0-9/100");
    }

    #[test]
    fn test_content_range_empty_page() {
        let headers = calculate_content_range(20, 0, 5, "users");
        assert_eq!(headers.get(CONTENT_RANGE).unwrap().to_str().unwrap(), "users */5");
    }

    #[test]
    fn test_content_range_strips_control_characters() {
        let headers = calculate_content_range(0, 1, 1, "users\r\nInjected: evil");
        let value = headers.get(CONTENT_RANGE).unwrap().to_str().unwrap();
        assert!(!value.contains('\r'));
        assert!(!value.contains('\n'));
    }
}
