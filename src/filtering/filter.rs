use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::filter_type::FilterType;
use crate::config::QueryConfig;
use crate::errors::QueryError;
use crate::models::QueryParams;
use crate::schema::{PropertyType, Schema};

/// A single field-level predicate derived from one `<field>_<operator>` query key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    pub property_name: String,
    pub operator: FilterType,
    pub values: Vec<String>,
}

impl Filter {
    pub fn new<V: Into<String>>(
        property_name: impl Into<String>,
        operator: FilterType,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self {
            property_name: property_name.into(),
            operator,
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

/// A filter value converted to the semantic type of its property.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Number(f64),
    Boolean(bool),
    Date(DateTime<Utc>),
}

impl FilterValue {
    /// Convert a raw query-string value for a property of `property_type`.
    ///
    /// # Errors
    ///
    /// Returns a reason string when the value does not fit the type.
    pub fn coerce(property_type: PropertyType, raw: &str) -> Result<Self, String> {
        match property_type {
            PropertyType::String | PropertyType::Enum | PropertyType::Collection => {
                Ok(Self::Text(raw.to_string()))
            }
            PropertyType::Number => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(Self::Number)
                .ok_or_else(|| "expected a number".to_string()),
            PropertyType::Boolean => match raw.trim().to_ascii_lowercase().as_str() {
                "true" => Ok(Self::Boolean(true)),
                "false" => Ok(Self::Boolean(false)),
                _ => Err("expected true or false".to_string()),
            },
            PropertyType::Date => parse_date(raw.trim())
                .map(Self::Date)
                .ok_or_else(|| "expected an RFC 3339 timestamp or YYYY-MM-DD date".to_string()),
        }
    }
}

fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|datetime| datetime.and_utc())
}

/// Split `customer_type_equals` into (`customer_type`, `equals`).
///
/// The last segment is the operator token; everything before it is the property
/// name, which may itself contain underscores.
fn split_filter_key(key: &str) -> Option<(&str, &str)> {
    key.rsplit_once('_')
}

/// Extract every field filter from the request's query parameters.
///
/// Keys without an underscore, or whose operator token is unknown, are not filters
/// and are skipped silently. A recognized operator must target a visible property
/// of the schema, be compatible with its type, and carry values of that type.
///
/// # Errors
///
/// Returns the first [`QueryError`] encountered; no partial result is produced.
pub fn filters_for_model(
    params: &QueryParams,
    schema: &Schema,
    config: &QueryConfig,
) -> Result<Vec<Filter>, QueryError> {
    let mut filters = Vec::new();

    for key in params.keys() {
        let Some((property_name, token)) = split_filter_key(key) else {
            continue;
        };
        let Some(operator) = FilterType::get_by_query_string(token) else {
            tracing::trace!(parameter = key, "Skipping query parameter without a known operator");
            continue;
        };

        let property = schema
            .property(property_name)
            .filter(|p| !p.is_hidden())
            .ok_or_else(|| QueryError::UnknownProperty {
                parameter: key.to_string(),
                property: property_name.to_string(),
            })?;

        if !operator.can_be_used_by(property) {
            return Err(QueryError::IncompatibleFilter {
                operator: operator.pretty_name().to_string(),
                property: property.pretty_name().to_string(),
            });
        }

        let values = params.get_all(key);
        for value in values {
            if value.len() > config.max_filter_value_length {
                return Err(QueryError::ValueTooLong {
                    parameter: key.to_string(),
                    max: config.max_filter_value_length,
                });
            }
            FilterValue::coerce(property.property_type(), value).map_err(|reason| {
                QueryError::InvalidFilterValue {
                    parameter: key.to_string(),
                    value: value.clone(),
                    reason,
                }
            })?;
        }

        filters.push(Filter::new(property_name, operator, values.iter().cloned()));
    }

    Ok(filters)
}
