//! Filter Operators
//!
//! Comparison operators close a clause; logical operators join clauses.

use std::fmt;

/// Comparison operators available to a clause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOperator {
    /// Equals (eq)
    Equal,
    /// Not equals (ne)
    NotEqual,
    /// Greater than (gt)
    GreaterThan,
    /// Greater than or equal (ge)
    GreaterOrEqual,
    /// Less than (lt)
    LowerThan,
    /// Less than or equal (le)
    LowerOrEqual,
}

impl ComparisonOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equal => "eq",
            Self::NotEqual => "ne",
            Self::GreaterThan => "gt",
            Self::GreaterOrEqual => "ge",
            Self::LowerThan => "lt",
            Self::LowerOrEqual => "le",
        }
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logical joiner used when folding a clause into the filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogicalOperator {
    #[default]
    And,
    Or,
}

impl LogicalOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
        }
    }
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Combine an accumulated expression with a new clause.
///
/// Every join is fully parenthesized and the accumulated side stays on the
/// left, so call order is preserved.
pub fn fold(accumulated: Option<String>, clause: &str, joiner: LogicalOperator) -> String {
    match accumulated {
        Some(acc) if !acc.is_empty() => format!("({}) {} ({})", acc, joiner, clause),
        _ => clause.to_string(),
    }
}
