//! Translation of query expressions into Sea-ORM conditions.
//!
//! Property names are used as column names. Free-text search becomes a
//! case-insensitive `LIKE` over every searchable column, with `%` and `_` in
//! the user's term escaped.

use sea_orm::{
    Condition, Order, Value,
    sea_query::{Alias, Expr, Func, LikeExpr, SimpleExpr},
};

use super::expression::Expression;
use super::filter::{Filter, FilterValue};
use super::filter_type::FilterType;
use super::sort::SortOption;
use crate::errors::QueryError;
use crate::schema::{PropertyType, Schema};

/// Escape LIKE wildcards so user input only ever matches literally.
/// Escapes: `\` first, then `%` (match any) and `_` (match single char).
#[must_use]
pub fn escape_like_wildcards(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

impl From<SortOption> for Order {
    fn from(direction: SortOption) -> Self {
        match direction {
            SortOption::Ascending => Self::Asc,
            SortOption::Descending => Self::Desc,
        }
    }
}

fn column(name: &str) -> Expr {
    Expr::col(Alias::new(name))
}

/// `UPPER(column) LIKE '<pattern>' ESCAPE '\'`
fn upper_like(name: &str, pattern: String) -> SimpleExpr {
    Expr::expr(Func::upper(column(name))).like(LikeExpr::new(pattern).escape('\\'))
}

/// Always-false predicate, used when a search has no column to look in.
fn never() -> SimpleExpr {
    Expr::val(1).eq(2)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss, clippy::float_cmp)]
fn to_sql_value(value: FilterValue) -> Value {
    match value {
        FilterValue::Text(text) => text.into(),
        FilterValue::Number(n) if n.fract() == 0.0 && n.abs() < i64::MAX as f64 => (n as i64).into(),
        FilterValue::Number(n) => n.into(),
        FilterValue::Boolean(b) => b.into(),
        FilterValue::Date(date) => date.into(),
    }
}

fn search_condition(term: &str, schema: &Schema) -> Condition {
    let pattern = format!("%{}%", escape_like_wildcards(term).to_uppercase());
    let columns: Vec<&str> = schema
        .searchable_properties()
        .filter(|p| p.property_type().is_textual() || p.property_type() == PropertyType::Collection)
        .map(|p| p.name())
        .collect();

    if columns.is_empty() {
        return Condition::all().add(never());
    }
    columns
        .into_iter()
        .fold(Condition::any(), |condition, name| {
            condition.add(upper_like(name, pattern.clone()))
        })
}

fn filter_condition(filter: &Filter, schema: &Schema) -> Result<Condition, QueryError> {
    let parameter = || format!("{}_{}", filter.property_name, filter.operator.query_string());
    let property = schema
        .property(&filter.property_name)
        .ok_or_else(|| QueryError::UnknownProperty {
            parameter: parameter(),
            property: filter.property_name.clone(),
        })?;
    let name = property.name();

    let mut values = Vec::with_capacity(filter.values.len());
    for raw in &filter.values {
        let value = FilterValue::coerce(property.property_type(), raw).map_err(|reason| {
            QueryError::InvalidFilterValue {
                parameter: parameter(),
                value: raw.clone(),
                reason,
            }
        })?;
        values.push(value);
    }

    let any_of = |build: &dyn Fn(FilterValue) -> SimpleExpr| {
        values
            .iter()
            .cloned()
            .fold(Condition::any(), |condition, value| condition.add(build(value)))
    };
    let all_of = |build: &dyn Fn(FilterValue) -> SimpleExpr| {
        values
            .iter()
            .cloned()
            .fold(Condition::all(), |condition, value| condition.add(build(value)))
    };
    let text = |value: FilterValue| match value {
        FilterValue::Text(text) => text,
        other => format!("{other:?}"),
    };

    let condition = match filter.operator {
        FilterType::Equals => any_of(&|v: FilterValue| column(name).eq(to_sql_value(v))),
        FilterType::NotEquals => all_of(&|v: FilterValue| column(name).ne(to_sql_value(v))),
        FilterType::Contains => any_of(&|v: FilterValue| {
            upper_like(name, format!("%{}%", escape_like_wildcards(&text(v)).to_uppercase()))
        }),
        FilterType::StartsWith => any_of(&|v: FilterValue| {
            upper_like(name, format!("{}%", escape_like_wildcards(&text(v)).to_uppercase()))
        }),
        FilterType::GreaterThan => all_of(&|v: FilterValue| column(name).gt(to_sql_value(v))),
        FilterType::GreaterThanOrEquals => all_of(&|v: FilterValue| column(name).gte(to_sql_value(v))),
        FilterType::LessThan => all_of(&|v: FilterValue| column(name).lt(to_sql_value(v))),
        FilterType::LessThanOrEquals => all_of(&|v: FilterValue| column(name).lte(to_sql_value(v))),
        FilterType::In => Condition::all().add(
            column(name).is_in(values.iter().cloned().map(to_sql_value).collect::<Vec<_>>()),
        ),
    };
    Ok(condition)
}

/// Translate an expression into a Sea-ORM condition for the table described by `schema`.
///
/// `None` (match everything) becomes an empty `AND`, which Sea-ORM renders as no
/// `WHERE` clause.
///
/// # Errors
///
/// Fails when a filter references a property or value the schema does not accept.
/// Expressions built by [`parse_query`](crate::query::parse_query) are already
/// validated and never fail here.
pub fn build_condition(expression: Option<&Expression>, schema: &Schema) -> Result<Condition, QueryError> {
    let Some(expression) = expression else {
        return Ok(Condition::all());
    };

    Ok(match expression {
        Expression::And(children) => children.iter().try_fold(Condition::all(), |condition, child| {
            build_condition(Some(child), schema).map(|c| condition.add(c))
        })?,
        Expression::Or(children) => children.iter().try_fold(Condition::any(), |condition, child| {
            build_condition(Some(child), schema).map(|c| condition.add(c))
        })?,
        Expression::Search(term) => search_condition(term, schema),
        Expression::Filter(filter) => filter_condition(filter, schema)?,
    })
}
