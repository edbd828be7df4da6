//! Composable query expressions.
//!
//! An [`Expression`] is an immutable tree of AND/OR nodes over free-text search
//! terms and field filters. [`Expression::purge`] removes the degenerate nodes
//! that request parsing naturally produces, so storage backends never see an
//! empty group or an empty search term.

use serde::Serialize;
use std::fmt;

use super::filter::Filter;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Expression {
    And(Vec<Expression>),
    Or(Vec<Expression>),
    Search(String),
    Filter(Filter),
}

impl Expression {
    pub fn and(children: impl IntoIterator<Item = Self>) -> Self {
        Self::And(children.into_iter().collect())
    }

    pub fn or(children: impl IntoIterator<Item = Self>) -> Self {
        Self::Or(children.into_iter().collect())
    }

    pub fn search(term: impl Into<String>) -> Self {
        Self::Search(term.into())
    }

    #[must_use]
    pub fn filter(filter: Filter) -> Self {
        Self::Filter(filter)
    }

    /// Simplify the tree.
    ///
    /// Blank search terms are dropped, groups left without children are dropped,
    /// and a group with a single child is replaced by that child. `None` means the
    /// whole tree was degenerate, i.e. the query matches everything.
    ///
    /// Purging is idempotent: purging a purged tree returns it unchanged.
    #[must_use]
    pub fn purge(self) -> Option<Self> {
        match self {
            Self::Search(term) if term.trim().is_empty() => None,
            Self::Search(_) | Self::Filter(_) => Some(self),
            Self::And(children) => collapse(children, Self::And),
            Self::Or(children) => collapse(children, Self::Or),
        }
    }
}

fn collapse(children: Vec<Expression>, group: fn(Vec<Expression>) -> Expression) -> Option<Expression> {
    let mut children: Vec<Expression> = children.into_iter().filter_map(Expression::purge).collect();
    match children.len() {
        0 => None,
        1 => children.pop(),
        _ => Some(group(children)),
    }
}

fn write_group(f: &mut fmt::Formatter<'_>, name: &str, children: &[Expression]) -> fmt::Result {
    write!(f, "{name}(")?;
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{child}")?;
    }
    write!(f, ")")
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And(children) => write_group(f, "AND", children),
            Self::Or(children) => write_group(f, "OR", children),
            Self::Search(term) => write!(f, "SEARCH({term:?})"),
            Self::Filter(filter) => write!(
                f,
                "{} {} {:?}",
                filter.property_name,
                filter.operator.query_string(),
                filter.values
            ),
        }
    }
}
