//! Sort Orders
//!
//! Ordering terms for the `$order` option. Each term is a raw field
//! expression (`price`, `count(id)`, `orderedItem/name`) with a direction.

use std::fmt;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// A single ordering term
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortCriterion {
    /// Field expression to order by
    pub expression: String,
    pub direction: SortDirection,
}

impl SortCriterion {
    pub fn new(expression: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            expression: expression.into(),
            direction,
        }
    }
}

/// Ascending terms carry no suffix on the wire.
impl fmt::Display for SortCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            SortDirection::Asc => f.write_str(&self.expression),
            SortDirection::Desc => write!(f, "{} desc", self.expression),
        }
    }
}

/// Ordered collection of sort terms
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortOrder {
    criteria: Vec<SortCriterion>,
}

impl SortOrder {
    /// Build from a list of expressions sharing one direction.
    ///
    /// Empty expressions are skipped.
    pub fn by<I, S>(expressions: I, direction: SortDirection) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut order = Self::default();
        for expression in expressions {
            order.add(SortCriterion::new(expression, direction));
        }
        order
    }

    /// Append a term; a term with an empty expression is ignored
    pub fn add(&mut self, criterion: SortCriterion) -> &mut Self {
        if !criterion.expression.is_empty() {
            self.criteria.push(criterion);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    /// Comma-joined wire form, `None` when no term is set
    pub fn to_query_value(&self) -> Option<String> {
        if self.criteria.is_empty() {
            return None;
        }
        let terms: Vec<String> = self.criteria.iter().map(|c| c.to_string()).collect();
        Some(terms.join(","))
    }
}
