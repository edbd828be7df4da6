//! In-memory [`ResourceStore`] for tests, demos and small fixed data sets.
//!
//! Records are JSON objects keyed by property name. Queries are evaluated with
//! the same semantics as the SQL translation: `equals` is exact, `contains` and
//! `startsWith` ignore case, and a missing or null field never satisfies a filter.

use async_trait::async_trait;
use serde_json::Value;
use std::cmp::Ordering;
use std::sync::{Arc, RwLock};

use super::traits::ResourceStore;
use crate::errors::ApiError;
use crate::filtering::{Expression, Filter, FilterType, FilterValue, SortOption, SortingSpecification};
use crate::models::Page;
use crate::query::{Query, parse_id};
use crate::schema::{PropertyType, Schema};

/// In-memory record store
///
/// Uses `RwLock` for thread-safe access; cloning shares the same records.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    records: Arc<RwLock<Vec<Value>>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with `records`.
    pub fn with_records(records: impl IntoIterator<Item = Value>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records.into_iter().collect())),
        }
    }

    /// Append a record.
    ///
    /// # Errors
    ///
    /// Fails only if the lock was poisoned by a panicking writer.
    pub fn insert(&self, record: Value) -> Result<(), ApiError> {
        self.records
            .write()
            .map_err(|e| ApiError::internal("Storage unavailable", Some(format!("Failed to acquire write lock: {e}"))))?
            .push(record);
        Ok(())
    }
}

#[async_trait]
impl ResourceStore for InMemoryStore {
    async fn find(&self, schema: &Schema, query: &Query) -> Result<Page<Value>, ApiError> {
        let records = self
            .records
            .read()
            .map_err(|e| ApiError::internal("Storage unavailable", Some(format!("Failed to acquire read lock: {e}"))))?;

        let mut matching: Vec<&Value> = match query.expression() {
            Some(expression) => records
                .iter()
                .filter(|record| matches(expression, record, schema))
                .collect(),
            None => records.iter().collect(),
        };
        sort_records(&mut matching, query.sort());

        let total_count = matching.len() as u64;
        let pagination = query.pagination();
        let offset = usize::try_from(pagination.offset()).unwrap_or(usize::MAX);
        let limit = pagination
            .limit()
            .map_or(usize::MAX, |limit| usize::try_from(limit).unwrap_or(usize::MAX));

        let values = matching
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();

        Ok(Page::new(values, total_count, query.page_number(), query.page_size()))
    }

    async fn find_by_id(&self, schema: &Schema, id: &str) -> Result<Value, ApiError> {
        let expression = parse_id(schema, id)?;
        let records = self
            .records
            .read()
            .map_err(|e| ApiError::internal("Storage unavailable", Some(format!("Failed to acquire read lock: {e}"))))?;

        records
            .iter()
            .find(|record| matches(&expression, record, schema))
            .cloned()
            .ok_or_else(|| ApiError::not_found(schema.name(), Some(id.to_string())))
    }
}

fn matches(expression: &Expression, record: &Value, schema: &Schema) -> bool {
    match expression {
        Expression::And(children) => children.iter().all(|child| matches(child, record, schema)),
        Expression::Or(children) => children.iter().any(|child| matches(child, record, schema)),
        Expression::Search(term) => matches_search(term, record, schema),
        Expression::Filter(filter) => matches_filter(filter, record, schema),
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_uppercase().contains(&needle.to_uppercase())
}

fn matches_search(term: &str, record: &Value, schema: &Schema) -> bool {
    if term.is_empty() {
        return true;
    }
    schema
        .searchable_properties()
        .filter(|p| p.property_type().is_textual() || p.property_type() == PropertyType::Collection)
        .filter_map(|p| record.get(p.name()).and_then(as_text))
        .any(|text| contains_ignore_case(&text, term))
}

/// Order a record's field against a filter value; `None` when they can't be compared.
fn compare(field: &Value, value: &FilterValue) -> Option<Ordering> {
    match value {
        FilterValue::Text(text) => field.as_str().map(|s| s.cmp(text.as_str())),
        FilterValue::Number(n) => field.as_f64().and_then(|f| f.partial_cmp(n)),
        FilterValue::Boolean(b) => field.as_bool().map(|f| f.cmp(b)),
        FilterValue::Date(date) => field
            .as_str()
            .and_then(|s| FilterValue::coerce(PropertyType::Date, s).ok())
            .and_then(|field| match field {
                FilterValue::Date(field) => Some(field.cmp(date)),
                _ => None,
            }),
    }
}

fn matches_filter(filter: &Filter, record: &Value, schema: &Schema) -> bool {
    let Some(property) = schema.property(&filter.property_name) else {
        return false;
    };
    let Some(field) = record.get(property.name()).filter(|v| !v.is_null()) else {
        return false;
    };
    let Ok(values) = filter
        .values
        .iter()
        .map(|raw| FilterValue::coerce(property.property_type(), raw))
        .collect::<Result<Vec<_>, _>>()
    else {
        return false;
    };

    let text = |value: &FilterValue| match value {
        FilterValue::Text(text) => text.clone(),
        other => format!("{other:?}"),
    };
    let ordering = |value: &FilterValue| compare(field, value);

    match filter.operator {
        FilterType::Equals | FilterType::In => values.iter().any(|v| ordering(v) == Some(Ordering::Equal)),
        FilterType::NotEquals => values
            .iter()
            .all(|v| ordering(v).is_some_and(|o| o != Ordering::Equal)),
        FilterType::Contains => as_text(field).is_some_and(|haystack| {
            values.iter().any(|v| contains_ignore_case(&haystack, &text(v)))
        }),
        FilterType::StartsWith => as_text(field).is_some_and(|haystack| {
            values
                .iter()
                .any(|v| haystack.to_uppercase().starts_with(&text(v).to_uppercase()))
        }),
        FilterType::GreaterThan => values.iter().all(|v| ordering(v) == Some(Ordering::Greater)),
        FilterType::GreaterThanOrEquals => values
            .iter()
            .all(|v| matches!(ordering(v), Some(Ordering::Greater | Ordering::Equal))),
        FilterType::LessThan => values.iter().all(|v| ordering(v) == Some(Ordering::Less)),
        FilterType::LessThanOrEquals => values
            .iter()
            .all(|v| matches!(ordering(v), Some(Ordering::Less | Ordering::Equal))),
    }
}

/// Total order over JSON field values: missing and null first, then by kind.
fn compare_fields(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .zip(b.as_f64())
            .and_then(|(a, b)| a.partial_cmp(&b))
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(Value::Bool(a)), Some(Value::Bool(b))) => a.cmp(b),
        (Some(a), Some(b)) => a.to_string().cmp(&b.to_string()),
    }
}

fn sort_records(records: &mut [&Value], sort: &SortingSpecification) {
    records.sort_by(|a, b| {
        sort.entries().iter().fold(Ordering::Equal, |ordering, entry| {
            ordering.then_with(|| {
                let ordering = compare_fields(a.get(&entry.property), b.get(&entry.property));
                match entry.direction {
                    SortOption::Ascending => ordering,
                    SortOption::Descending => ordering.reverse(),
                }
            })
        })
    });
}
