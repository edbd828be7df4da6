//! # Filtering, Search, Sorting & Pagination
//!
//! This module turns URL query parameters into the building blocks of a
//! [`Query`](crate::query::Query) and translates those building blocks into
//! Sea-ORM conditions.
//!
//! ## Main Components
//!
//! - **[`FilterType`]**: operator registry (`_equals`, `_contains`, `_gt`, ...) with type compatibility rules
//! - **[`filters_for_model`]**: `<field>_<operator>` keys to [`Filter`]s
//! - **[`parse_search`]**: the `q` search grammar
//! - **[`Expression`]**: AND/OR/SEARCH/FILTER tree with [`Expression::purge`]
//! - **[`parse_sort`]**: `sort` parameters to a [`SortingSpecification`]
//! - **[`parse_pagination`]**: `pageSize` / `pageNumber`
//! - **[`build_condition`]**: expression to Sea-ORM `Condition`
//!
//! ## Query Parameter Examples
//!
//! ```rust,ignore
//! // Field filters (OR'ed with each other)
//! GET /resources?id_equals=4&unique_contains=filter
//!
//! // Numeric comparisons
//! GET /resources?numberMax40_gte=10
//!
//! // Several values for one filter
//! GET /resources?id_in=1&id_in=2&id_in=3
//!
//! // Free-text search
//! GET /resources?q=hello world
//! GET /resources?q=(alpha OR beta) AND "release notes"
//!
//! // Multi-key sorting, first key is primary
//! GET /resources?sort=unique&sort=id,DESC
//!
//! // Pagination (pageSize defaults to everything)
//! GET /resources?pageSize=25&pageNumber=2
//! ```

pub mod conditions;
pub mod expression;
pub mod filter;
pub mod filter_type;
pub mod pagination;
pub mod search;
pub mod sort;

pub use conditions::{build_condition, escape_like_wildcards};
pub use expression::Expression;
pub use filter::{Filter, FilterValue, filters_for_model};
pub use filter_type::FilterType;
pub use pagination::{Pagination, UNBOUNDED_PAGE_SIZE, calculate_content_range, parse_pagination};
pub use search::parse_search;
pub use sort::{SortEntry, SortOption, SortingSpecification, parse_sort};
