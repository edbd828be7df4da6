use serde::Serialize;

use crate::schema::{Property, PropertyType};

/// Comparison operators selectable through a `<field>_<operator>` query key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterType {
    Equals,
    NotEquals,
    Contains,
    StartsWith,
    GreaterThan,
    GreaterThanOrEquals,
    LessThan,
    LessThanOrEquals,
    In,
}

impl FilterType {
    pub const ALL: [Self; 9] = [
        Self::Equals,
        Self::NotEquals,
        Self::Contains,
        Self::StartsWith,
        Self::GreaterThan,
        Self::GreaterThanOrEquals,
        Self::LessThan,
        Self::LessThanOrEquals,
        Self::In,
    ];

    /// The token that follows the last `_` of a filter key.
    #[must_use]
    pub const fn query_string(self) -> &'static str {
        match self {
            Self::Equals => "equals",
            Self::NotEquals => "notEquals",
            Self::Contains => "contains",
            Self::StartsWith => "startsWith",
            Self::GreaterThan => "gt",
            Self::GreaterThanOrEquals => "gte",
            Self::LessThan => "lt",
            Self::LessThanOrEquals => "lte",
            Self::In => "in",
        }
    }

    #[must_use]
    pub const fn pretty_name(self) -> &'static str {
        match self {
            Self::Equals => "Equals",
            Self::NotEquals => "Not Equals",
            Self::Contains => "Contains",
            Self::StartsWith => "Starts with",
            Self::GreaterThan => "Greater than",
            Self::GreaterThanOrEquals => "Greater than or equal to",
            Self::LessThan => "Less than",
            Self::LessThanOrEquals => "Less than or equal to",
            Self::In => "In",
        }
    }

    /// Case-insensitive exact lookup of an operator token. Unknown tokens yield `None`.
    #[must_use]
    pub fn get_by_query_string(token: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|filter_type| filter_type.query_string().eq_ignore_ascii_case(token))
    }

    /// Whether this operator is meaningful for properties of the given type.
    #[must_use]
    pub const fn supports(self, property_type: PropertyType) -> bool {
        use PropertyType as P;

        match self {
            Self::Equals | Self::NotEquals => matches!(
                property_type,
                P::String | P::Number | P::Boolean | P::Date | P::Enum
            ),
            Self::Contains => matches!(property_type, P::String | P::Collection),
            Self::StartsWith => matches!(property_type, P::String),
            Self::GreaterThan
            | Self::GreaterThanOrEquals
            | Self::LessThan
            | Self::LessThanOrEquals => matches!(property_type, P::Number | P::Date),
            Self::In => matches!(property_type, P::String | P::Number | P::Enum),
        }
    }

    #[must_use]
    pub const fn can_be_used_by(self, property: &Property) -> bool {
        self.supports(property.property_type())
    }
}
