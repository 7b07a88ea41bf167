//! Query Options
//!
//! The accumulated, non-transient state of a queryable and its serialization
//! into a `?$name=value&...` query string.
//!
//! Parameters are emitted in a fixed order:
//! `$filter`, `$select`, `$order`, `$top`, `$skip`, `$group`, `$expand`, `$inlinecount`.
//! Values are emitted raw; percent-encoding is left to the transport.

use crate::operators::{fold, LogicalOperator};
use crate::sorts::SortOrder;

/// Wire names of the reserved query parameters
pub mod params {
    pub const FILTER: &str = "$filter";
    pub const SELECT: &str = "$select";
    pub const ORDER: &str = "$order";
    pub const TOP: &str = "$top";
    pub const SKIP: &str = "$skip";
    pub const GROUP: &str = "$group";
    pub const EXPAND: &str = "$expand";
    pub const INLINECOUNT: &str = "$inlinecount";
}

/// Field list argument for projection, grouping, ordering and expansion.
///
/// Accepts a single expression, a list of expressions, or `None`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldList {
    /// No value given; the call is a no-op
    #[default]
    Absent,
    Fields(Vec<String>),
}

impl FieldList {
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Comma-joined form of the non-empty entries; `None` when there are none
    pub fn joined(&self) -> Option<String> {
        match self {
            Self::Absent => None,
            Self::Fields(fields) => {
                let kept: Vec<&str> = fields
                    .iter()
                    .map(String::as_str)
                    .filter(|f| !f.is_empty())
                    .collect();
                (!kept.is_empty()).then(|| kept.join(","))
            }
        }
    }

    /// Non-empty entries
    pub fn into_fields(self) -> Vec<String> {
        match self {
            Self::Absent => vec![],
            Self::Fields(fields) => fields.into_iter().filter(|f| !f.is_empty()).collect(),
        }
    }
}

impl From<&str> for FieldList {
    fn from(field: &str) -> Self {
        Self::Fields(vec![field.to_string()])
    }
}

impl From<String> for FieldList {
    fn from(field: String) -> Self {
        Self::Fields(vec![field])
    }
}

impl<S: Into<String>> From<Vec<S>> for FieldList {
    fn from(fields: Vec<S>) -> Self {
        Self::Fields(fields.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for FieldList {
    fn from(fields: [S; N]) -> Self {
        Self::Fields(fields.into_iter().map(Into::into).collect())
    }
}

impl From<&[&str]> for FieldList {
    fn from(fields: &[&str]) -> Self {
        Self::Fields(fields.iter().map(|f| f.to_string()).collect())
    }
}

impl<T: Into<FieldList>> From<Option<T>> for FieldList {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Self::Absent)
    }
}

/// Accumulated query options of one queryable
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Live filter expression, already folded
    pub filter: Option<String>,
    /// Filter segment committed by `prepare`, joined with `filter` on output
    pub prepared: Option<String>,
    /// Joiner between `prepared` and `filter`
    pub prepared_lop: Option<LogicalOperator>,
    /// Comma-joined projection list
    pub select: Option<String>,
    pub order: SortOrder,
    pub group: Option<String>,
    pub expand: Option<String>,
    /// Zero is a real value and is still emitted
    pub top: Option<u32>,
    pub skip: Option<u32>,
    pub inlinecount: Option<bool>,
    /// Single-item result shape; consumed by the facade, never sent
    pub first: Option<bool>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter that will actually be sent: `prepared` joined with `filter`
    pub fn effective_filter(&self) -> Option<String> {
        match (&self.prepared, &self.filter) {
            (Some(prepared), Some(filter)) => Some(fold(
                Some(prepared.clone()),
                filter,
                self.prepared_lop.unwrap_or_default(),
            )),
            (Some(prepared), None) => Some(prepared.clone()),
            (None, filter) => filter.clone(),
        }
    }

    /// Non-empty options as `(name, value)` pairs in wire order
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        if let Some(filter) = self.effective_filter().filter(|f| !f.is_empty()) {
            pairs.push((params::FILTER, filter));
        }
        if let Some(select) = non_empty(&self.select) {
            pairs.push((params::SELECT, select));
        }
        if let Some(order) = self.order.to_query_value() {
            pairs.push((params::ORDER, order));
        }
        if let Some(top) = self.top {
            pairs.push((params::TOP, top.to_string()));
        }
        if let Some(skip) = self.skip {
            pairs.push((params::SKIP, skip.to_string()));
        }
        if let Some(group) = non_empty(&self.group) {
            pairs.push((params::GROUP, group));
        }
        if let Some(expand) = non_empty(&self.expand) {
            pairs.push((params::EXPAND, expand));
        }
        if let Some(inlinecount) = self.inlinecount {
            pairs.push((params::INLINECOUNT, inlinecount.to_string()));
        }

        pairs
    }

    /// Serialize to `?$a=x&$b=y`, or the empty string when nothing is set
    pub fn to_query_string(&self) -> String {
        let pairs = self.to_params();
        if pairs.is_empty() {
            return String::new();
        }
        let joined: Vec<String> = pairs
            .into_iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect();
        format!("?{}", joined.join("&"))
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}
