//! Filter expression tree.
//!
//! Grammar produced by [`Query::render`]:
//!
//! ```text
//! comparison := field " " op " " literal        op ∈ EQ LT GT LE GE
//! range      := field " BTW " literal "..." literal
//! in-list    := field " IN " literal ("," literal)*
//! and        := "(" query ";" query ")"
//! or         := "(" query "||" query ")"
//! not        := "!" "(" query ")"
//! literal    := 'text' | integer | true | false | null | ^timestamp^ | "{" query "}"
//! ```
//!
//! Operands are rendered in the order they were combined.

use chrono::{DateTime, FixedOffset};
use octane_model::ModelParser;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    EqualTo,
    LessThan,
    GreaterThan,
    LessOrEqual,
    GreaterOrEqual,
}

impl Comparison {
    pub fn operator(self) -> &'static str {
        match self {
            Comparison::EqualTo => "EQ",
            Comparison::LessThan => "LT",
            Comparison::GreaterThan => "GT",
            Comparison::LessOrEqual => "LE",
            Comparison::GreaterOrEqual => "GE",
        }
    }
}

/// A value on the right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    Integer(i64),
    Boolean(bool),
    Timestamp(DateTime<FixedOffset>),
    Null,
    /// A sub-query over the entity a reference field points to.
    Query(Box<Query>),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::String(s) => {
                f.write_str("'")?;
                for c in s.chars() {
                    match c {
                        '\'' => f.write_str("\\'")?,
                        '\\' => f.write_str("\\\\")?,
                        c => write!(f, "{c}")?,
                    }
                }
                f.write_str("'")
            }
            Literal::Integer(n) => write!(f, "{n}"),
            Literal::Boolean(b) => write!(f, "{b}"),
            Literal::Timestamp(ts) => write!(f, "^{}^", ModelParser::format_timestamp(ts)),
            Literal::Null => f.write_str("null"),
            Literal::Query(q) => write!(f, "{{{q}}}"),
        }
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::String(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Literal::String(value)
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::Integer(value)
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Literal::Integer(i64::from(value))
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Boolean(value)
    }
}

impl From<DateTime<FixedOffset>> for Literal {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Literal::Timestamp(value)
    }
}

impl From<Query> for Literal {
    fn from(value: Query) -> Self {
        Literal::Query(Box::new(value))
    }
}

/// A filter expression over entity fields.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    Compare {
        field: String,
        op: Comparison,
        value: Literal,
    },
    Between {
        field: String,
        low: Literal,
        high: Literal,
    },
    /// Never empty when built through [`Query::in_list`].
    In {
        field: String,
        values: Vec<Literal>,
    },
    And(Box<Query>, Box<Query>),
    Or(Box<Query>, Box<Query>),
    Not(Box<Query>),
}

impl Query {
    pub fn compare(field: impl Into<String>, op: Comparison, value: impl Into<Literal>) -> Self {
        Query::Compare {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    pub fn equal_to(field: impl Into<String>, value: impl Into<Literal>) -> Self {
        Self::compare(field, Comparison::EqualTo, value)
    }

    pub fn less_than(field: impl Into<String>, value: impl Into<Literal>) -> Self {
        Self::compare(field, Comparison::LessThan, value)
    }

    pub fn greater_than(field: impl Into<String>, value: impl Into<Literal>) -> Self {
        Self::compare(field, Comparison::GreaterThan, value)
    }

    pub fn less_or_equal(field: impl Into<String>, value: impl Into<Literal>) -> Self {
        Self::compare(field, Comparison::LessOrEqual, value)
    }

    pub fn greater_or_equal(field: impl Into<String>, value: impl Into<Literal>) -> Self {
        Self::compare(field, Comparison::GreaterOrEqual, value)
    }

    /// Inclusive range: `field BTW low...high`.
    pub fn between(
        field: impl Into<String>,
        low: impl Into<Literal>,
        high: impl Into<Literal>,
    ) -> Self {
        Query::Between {
            field: field.into(),
            low: low.into(),
            high: high.into(),
        }
    }

    /// `field IN v1,v2,...`, or `None` when `values` is empty since the
    /// grammar has no empty list.
    pub fn in_list<L: Into<Literal>>(
        field: impl Into<String>,
        values: impl IntoIterator<Item = L>,
    ) -> Option<Self> {
        let values: Vec<Literal> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return None;
        }
        Some(Query::In {
            field: field.into(),
            values,
        })
    }

    /// Matches entities whose reference `field` points at an entity
    /// satisfying `sub_query`.
    pub fn reference(field: impl Into<String>, sub_query: Query) -> Self {
        Self::equal_to(field, sub_query)
    }

    pub fn and(self, other: Query) -> Self {
        Query::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: Query) -> Self {
        Query::Or(Box::new(self), Box::new(other))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Query::Not(Box::new(self))
    }

    /// Renders the expression in the service's filter grammar.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Compare { field, op, value } => write!(f, "{field} {} {value}", op.operator()),
            Query::Between { field, low, high } => write!(f, "{field} BTW {low}...{high}"),
            Query::In { field, values } => {
                write!(f, "{field} IN ")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{value}")?;
                }
                Ok(())
            }
            Query::And(left, right) => write!(f, "({left};{right})"),
            Query::Or(left, right) => write!(f, "({left}||{right})"),
            Query::Not(inner) => match inner.as_ref() {
                Query::And(..) | Query::Or(..) => write!(f, "!{inner}"),
                _ => write!(f, "!({inner})"),
            },
        }
    }
}
