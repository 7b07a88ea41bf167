//! Literal Values
//!
//! A closed set of literal kinds that may appear on the right-hand side of a
//! comparison. Callers build values through the `From` impls below, so the
//! escaper never has to inspect runtime types.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use serde_json::Number;

/// A pre-built expression literal that is inserted verbatim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterExpression {
    expr: String,
}

impl FilterExpression {
    /// Wrap raw expression text
    pub fn new(expr: impl Into<String>) -> Self {
        Self { expr: expr.into() }
    }

    /// The current user sentinel, `me()`
    pub fn me() -> Self {
        Self::new("me()")
    }

    pub fn as_str(&self) -> &str {
        &self.expr
    }
}

impl fmt::Display for FilterExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expr)
    }
}

/// Right operand of a comparison
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// `null`
    Null,
    /// `true` / `false`
    Bool(bool),
    /// Integer or finite floating point number
    Number(Number),
    /// Text, single-quoted on output
    Text(String),
    /// Date/time, ISO-8601 and single-quoted on output
    DateTime(DateTime<FixedOffset>),
    /// Array of values, possibly nested
    Sequence(Vec<Value>),
    /// Raw expression, emitted unquoted
    Expression(FilterExpression),
    /// Anything else, already converted to its string form
    Other(String),
}

impl Value {
    /// Wrap an arbitrary displayable value as [`Value::Other`]
    pub fn other(value: impl fmt::Display) -> Self {
        Self::Other(value.to_string())
    }

    /// Build a floating point value; NaN and infinities become [`Value::Null`]
    pub fn float(value: f64) -> Self {
        Number::from_f64(value).map(Self::Number).unwrap_or(Self::Null)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Short name of the variant, used in log fields
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::Text(_) => "text",
            Self::DateTime(_) => "datetime",
            Self::Sequence(_) => "sequence",
            Self::Expression(_) => "expression",
            Self::Other(_) => "other",
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Self::Number(Number::from(value))
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

/// Goes through the shortest decimal form of the `f32`, so `0.1f32` stays `0.1`
impl From<f32> for Value {
    fn from(value: f32) -> Self {
        value
            .to_string()
            .parse::<f64>()
            .map(Self::float)
            .unwrap_or(Self::Null)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Self::DateTime(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Self::DateTime(value.fixed_offset())
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Self::DateTime(value.and_utc().fixed_offset())
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Self::from(value.and_time(chrono::NaiveTime::default()))
    }
}

impl From<FilterExpression> for Value {
    fn from(value: FilterExpression) -> Self {
        Self::Expression(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Self::Sequence(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Self::Null)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n),
            serde_json::Value::String(s) => Self::Text(s),
            serde_json::Value::Array(items) => {
                Self::Sequence(items.into_iter().map(Self::from).collect())
            }
            other @ serde_json::Value::Object(_) => Self::Other(other.to_string()),
        }
    }
}
