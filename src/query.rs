//! # Query Assembly
//!
//! [`parse_query`] turns a request's query parameters into an immutable [`Query`]:
//!
//! ```text
//! expression = AND(parse_search(q), OR(field filters...) or SEARCH(""))
//! ```
//!
//! then purges the expression, resolves the sort and the page.
//!
//! ## Filters are OR'ed with each other
//!
//! Field filters are combined with OR, not AND: a record passes the filter branch
//! when it satisfies *any* of the `<field>_<operator>` parameters, and must also
//! satisfy the free-text search. `?id_equals=4&unique_contains=filter` therefore
//! returns records with id 4 *or* a unique value containing "filter". This widening
//! behavior is kept for compatibility with existing clients and is surprising
//! enough to deserve a product review before anyone builds on it.

use crate::config::QueryConfig;
use crate::errors::QueryError;
use crate::filtering::{
    Expression, Filter, FilterType, FilterValue, Pagination, SortingSpecification,
    filters_for_model, parse_pagination, parse_search, parse_sort,
};
use crate::models::QueryParams;
use crate::schema::Schema;

const SEARCH_PARAM: &str = "q";
const SORT_PARAM: &str = "sort";

/// A backend-agnostic query: what to match, in which order, and which page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    expression: Option<Expression>,
    sort: SortingSpecification,
    pagination: Pagination,
}

impl Query {
    /// Start building a query around `expression`.
    #[must_use]
    pub fn builder(expression: Expression) -> QueryBuilder {
        QueryBuilder {
            expression: Some(expression),
            sort: SortingSpecification::new(),
            pagination: Pagination::default(),
        }
    }

    /// The match expression; `None` matches every record.
    #[must_use]
    pub const fn expression(&self) -> Option<&Expression> {
        self.expression.as_ref()
    }

    #[must_use]
    pub const fn sort(&self) -> &SortingSpecification {
        &self.sort
    }

    #[must_use]
    pub const fn pagination(&self) -> Pagination {
        self.pagination
    }

    #[must_use]
    pub const fn page_number(&self) -> u64 {
        self.pagination.page_number
    }

    #[must_use]
    pub const fn page_size(&self) -> u64 {
        self.pagination.page_size
    }
}

#[derive(Debug, Clone)]
pub struct QueryBuilder {
    expression: Option<Expression>,
    sort: SortingSpecification,
    pagination: Pagination,
}

impl QueryBuilder {
    /// Remove degenerate nodes from the expression, see [`Expression::purge`].
    #[must_use]
    pub fn purge(mut self) -> Self {
        self.expression = self.expression.and_then(Expression::purge);
        self
    }

    #[must_use]
    pub fn sort(mut self, sort: SortingSpecification) -> Self {
        self.sort = sort;
        self
    }

    #[must_use]
    pub const fn page(mut self, pagination: Pagination) -> Self {
        self.pagination = pagination;
        self
    }

    #[must_use]
    pub fn build(self) -> Query {
        Query {
            expression: self.expression,
            sort: self.sort,
            pagination: self.pagination,
        }
    }
}

/// Parse a request's query parameters with the default [`QueryConfig`].
///
/// # Errors
///
/// See [`parse_query_with_config`].
pub fn parse_query(params: &QueryParams, schema: &Schema) -> Result<Query, QueryError> {
    parse_query_with_config(params, schema, &QueryConfig::default())
}

/// Parse a request's query parameters into a [`Query`] for `schema`.
///
/// # Errors
///
/// Any [`QueryError`] from the search, sort, pagination or filter parsers. Parsing
/// is all-or-nothing: no partial query is returned.
pub fn parse_query_with_config(
    params: &QueryParams,
    schema: &Schema,
    config: &QueryConfig,
) -> Result<Query, QueryError> {
    let search = parse_search(params.get(SEARCH_PARAM).unwrap_or(""), config)?;
    let sort = parse_sort(params.get_all(SORT_PARAM), schema)?;
    let pagination = parse_pagination(params)?;
    let filters = filters_for_model(params, schema, config)?;

    let field_filters = if filters.is_empty() {
        Expression::search("")
    } else {
        Expression::or(filters.into_iter().map(Expression::filter))
    };

    let query = Query::builder(Expression::and([search, field_filters]))
        .purge()
        .sort(sort)
        .page(pagination)
        .build();

    tracing::debug!(
        model = schema.name(),
        expression = %query.expression().map_or_else(|| "*".to_string(), ToString::to_string),
        page_number = query.page_number(),
        page_size = query.page_size(),
        "Parsed query"
    );

    Ok(query)
}

/// Expression selecting the record whose identifier field equals `id`.
///
/// # Errors
///
/// [`QueryError::InvalidIdentifier`] when `id` is not a value of the identifier's
/// type, e.g. `abc` for a numeric key.
pub fn parse_id(schema: &Schema, id: &str) -> Result<Expression, QueryError> {
    let field = schema.id_field();
    if let Some(property) = schema.property(field) {
        FilterValue::coerce(property.property_type(), id).map_err(|reason| {
            QueryError::InvalidIdentifier {
                field: field.to_string(),
                value: id.to_string(),
                reason,
            }
        })?;
    }
    Ok(Expression::filter(Filter::new(field, FilterType::Equals, [id])))
}
