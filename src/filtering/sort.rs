use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::QueryError;
use crate::schema::Schema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortOption {
    Ascending,
    Descending,
}

impl SortOption {
    /// Parse a direction keyword: `asc`, `ascending`, `desc` or `descending`, any case.
    #[must_use]
    pub fn get(keyword: &str) -> Option<Self> {
        match keyword.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(Self::Ascending),
            "desc" | "descending" => Some(Self::Descending),
            _ => None,
        }
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortEntry {
    pub property: String,
    pub direction: SortOption,
}

/// Ordered sort keys; the first entry is the primary key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SortingSpecification {
    entries: Vec<SortEntry>,
}

impl SortingSpecification {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a key. Entries are never reordered or deduplicated.
    #[must_use]
    pub fn add(mut self, property: impl Into<String>, direction: SortOption) -> Self {
        self.entries.push(SortEntry {
            property: property.into(),
            direction,
        });
        self
    }

    #[must_use]
    pub fn entries(&self) -> &[SortEntry] {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolve the `sort` parameters of a request.
///
/// Each value is `field` (ascending) or `field,direction`. Without any value the
/// schema's default sort is used.
///
/// # Errors
///
/// Fails on a malformed value, an unknown direction keyword, or a field that is not
/// a sortable property of the schema.
pub fn parse_sort(values: &[String], schema: &Schema) -> Result<SortingSpecification, QueryError> {
    if values.is_empty() {
        return Ok(SortingSpecification::new()
            .add(schema.default_sort_field(), schema.default_sort_direction()));
    }

    let mut spec = SortingSpecification::new();
    for value in values {
        let parts: Vec<&str> = value.split(',').map(str::trim).collect();
        let (field, direction) = match parts.as_slice() {
            [field] => (*field, SortOption::Ascending),
            [field, keyword] => {
                let direction =
                    SortOption::get(keyword).ok_or_else(|| QueryError::InvalidSortDirection {
                        value: value.clone(),
                        direction: (*keyword).to_string(),
                    })?;
                (*field, direction)
            }
            _ => return Err(QueryError::MalformedSort { value: value.clone() }),
        };

        if field.is_empty() {
            return Err(QueryError::MalformedSort { value: value.clone() });
        }
        if !schema.property(field).is_some_and(|p| p.is_sortable()) {
            return Err(QueryError::UnsortableProperty {
                property: field.to_string(),
            });
        }

        spec = spec.add(field, direction);
    }

    Ok(spec)
}
