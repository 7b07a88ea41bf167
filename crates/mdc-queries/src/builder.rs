//! Queryable Builder
//!
//! Fluent API that turns a chain of field selectors, transforms and
//! comparators into a filter expression plus paging/projection options.
//!
//! A chain keeps one pending left operand. Field selectors set it, transforms
//! rewrap it, and comparators close it into a clause that is folded into the
//! accumulated filter:
//!
//! ```text
//! filter = filter.is_empty ? clause : "(" + filter + ") " + joiner + " (" + clause + ")"
//! ```
//!
//! There are two ways to continue a filter:
//!
//! - [`DataQueryable::also`] / [`DataQueryable::either`] extend the current
//!   group. The next clause is folded into `filter` with `and` / `or`.
//! - [`DataQueryable::and_also`] / [`DataQueryable::or_else`] commit the
//!   current filter via [`DataQueryable::prepare`] and start a new group, which
//!   is joined to the committed one with `and` / `or` at serialization time.
//!
//! ```
//! use mdc_queries::DataQueryable;
//!
//! # fn main() -> Result<(), mdc_core::UsageError> {
//! let q = DataQueryable::new("Product")
//!     .where_("category")?.equal("Laptops")?
//!     .either("category")?.equal("Desktops")?
//!     .and_also("price")?.round()?.lower_or_equal(250)?;
//!
//! assert_eq!(
//!     q.effective_filter().as_deref(),
//!     Some("((category eq 'Laptops') or (category eq 'Desktops')) and (round(price) le 250)")
//! );
//! # Ok(())
//! # }
//! ```
//!
//! `starts_with` / `ends_with` leave the clause open: the caller closes it,
//! normally with `equal(true)`.

use mdc_core::{UsageError, UsageResult};
use tracing::trace;

use crate::escape::escape;
use crate::operators::{fold, ComparisonOperator, LogicalOperator};
use crate::options::{FieldList, QueryOptions};
use crate::paths::ResourcePaths;
use crate::sorts::{SortCriterion, SortDirection, SortOrder};
use crate::value::Value;

/// Whether a comparison is in progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderState {
    /// No left operand pending
    Idle,
    /// A left operand is waiting for a comparator
    OperandPending,
}

/// In-progress comparison, cleared after every closed clause
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct PendingComparison {
    left: Option<String>,
    lop: Option<LogicalOperator>,
}

/// Builder for a query against one remote resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataQueryable {
    model: String,
    paths: ResourcePaths,
    key: Option<String>,
    options: QueryOptions,
    pending: PendingComparison,
}

impl DataQueryable {
    /// Create a queryable for the given model
    pub fn new(model: impl Into<String>) -> Self {
        let model = model.into();
        Self {
            paths: ResourcePaths::for_model(&model),
            model,
            key: None,
            options: QueryOptions::new(),
            pending: PendingComparison::default(),
        }
    }

    /// Create a queryable with explicit endpoints
    pub fn with_paths(model: impl Into<String>, paths: ResourcePaths) -> Self {
        Self {
            paths,
            ..Self::new(model)
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn paths(&self) -> &ResourcePaths {
        &self.paths
    }

    pub fn options(&self) -> &QueryOptions {
        &self.options
    }

    /// Pending left operand, if any
    pub fn left(&self) -> Option<&str> {
        self.pending.left.as_deref()
    }

    pub fn state(&self) -> BuilderState {
        if self.pending.left.is_some() {
            BuilderState::OperandPending
        } else {
            BuilderState::Idle
        }
    }

    /// Live (uncommitted) filter
    pub fn filter(&self) -> Option<&str> {
        self.options.filter.as_deref()
    }

    /// Filter as it will be sent
    pub fn effective_filter(&self) -> Option<String> {
        self.options.effective_filter()
    }

    // Field selectors

    /// Start a clause on `field`
    pub fn where_(mut self, field: impl Into<String>) -> UsageResult<Self> {
        let field = non_empty(field)?;
        self.pending.left = Some(field);
        self.pending.lop = None;
        Ok(self)
    }

    /// Start a clause that extends the current group with `and`
    pub fn also(mut self, field: impl Into<String>) -> UsageResult<Self> {
        let field = non_empty(field)?;
        self.pending.lop = Some(LogicalOperator::And);
        self.pending.left = Some(field);
        Ok(self)
    }

    /// Start a clause that extends the current group with `or`
    pub fn either(mut self, field: impl Into<String>) -> UsageResult<Self> {
        let field = non_empty(field)?;
        self.pending.lop = Some(LogicalOperator::Or);
        self.pending.left = Some(field);
        Ok(self)
    }

    /// Commit the current filter and start a new group joined with `and`
    pub fn and_also(self, field: impl Into<String>) -> UsageResult<Self> {
        self.start_group(field, LogicalOperator::And)
    }

    /// Commit the current filter and start a new group joined with `or`
    pub fn or_else(self, field: impl Into<String>) -> UsageResult<Self> {
        self.start_group(field, LogicalOperator::Or)
    }

    fn start_group(self, field: impl Into<String>, joiner: LogicalOperator) -> UsageResult<Self> {
        let field = non_empty(field)?;
        let mut this = self.prepare();
        this.options.prepared_lop = Some(joiner);
        this.pending.left = Some(field);
        Ok(this)
    }

    /// Move the live filter into the committed segment.
    ///
    /// A no-op when no live filter exists.
    pub fn prepare(mut self) -> Self {
        let Some(filter) = self.options.filter.take() else {
            return self;
        };
        let joiner = self.options.prepared_lop.unwrap_or_default();
        let prepared = fold(self.options.prepared.take(), &filter, joiner);
        trace!(model = %self.model, prepared = %prepared, "prepared filter segment");
        self.options.prepared = Some(prepared);
        self
    }

    // Transforms

    fn wrap(mut self, function: &str) -> UsageResult<Self> {
        let left = self.pending.left.take().ok_or(UsageError::MissingLeftOperand)?;
        self.pending.left = Some(format!("{}({})", function, left));
        Ok(self)
    }

    pub fn to_lower_case(self) -> UsageResult<Self> {
        self.wrap("tolower")
    }

    pub fn to_upper_case(self) -> UsageResult<Self> {
        self.wrap("toupper")
    }

    pub fn trim(self) -> UsageResult<Self> {
        self.wrap("trim")
    }

    pub fn round(self) -> UsageResult<Self> {
        self.wrap("round")
    }

    pub fn floor(self) -> UsageResult<Self> {
        self.wrap("floor")
    }

    pub fn ceil(self) -> UsageResult<Self> {
        self.wrap("ceiling")
    }

    pub fn length(self) -> UsageResult<Self> {
        self.wrap("length")
    }

    /// Date part of a date/time field
    pub fn get_date(self) -> UsageResult<Self> {
        self.wrap("date")
    }

    pub fn get_year(self) -> UsageResult<Self> {
        self.wrap("year")
    }

    /// Alias of [`DataQueryable::get_year`]
    pub fn get_full_year(self) -> UsageResult<Self> {
        self.get_year()
    }

    pub fn get_month(self) -> UsageResult<Self> {
        self.wrap("month")
    }

    /// Day of month
    pub fn get_day(self) -> UsageResult<Self> {
        self.wrap("day")
    }

    pub fn get_hours(self) -> UsageResult<Self> {
        self.wrap("hour")
    }

    pub fn get_minutes(self) -> UsageResult<Self> {
        self.wrap("minute")
    }

    pub fn get_seconds(self) -> UsageResult<Self> {
        self.wrap("second")
    }

    /// `substring(left,pos,length)`; `pos >= 0` and `length > 0`
    pub fn substring(mut self, pos: i64, length: i64) -> UsageResult<Self> {
        if length <= 0 {
            return Err(UsageError::invalid_argument(
                "Length must be greater than zero.",
            ));
        }
        if pos < 0 {
            return Err(UsageError::invalid_argument(
                "Position must be greater or equal to zero.",
            ));
        }
        let left = self.pending.left.take().ok_or(UsageError::MissingLeftOperand)?;
        self.pending.left = Some(format!("substring({},{},{})", left, pos, length));
        Ok(self)
    }

    /// `indexof(left,value)`, left open for a comparator
    pub fn index_of(self, value: impl Into<Value>) -> UsageResult<Self> {
        self.wrap_search("indexof", value.into())
    }

    /// `substringof(left,value)`, left open for a comparator
    pub fn substring_of(self, value: impl Into<Value>) -> UsageResult<Self> {
        self.wrap_search("substringof", value.into())
    }

    /// `startswith(left,value)`, left open for a comparator
    pub fn starts_with(self, value: impl Into<Value>) -> UsageResult<Self> {
        self.wrap_with_argument("startswith", &value.into())
    }

    /// `endswith(left,value)`, left open for a comparator
    pub fn ends_with(self, value: impl Into<Value>) -> UsageResult<Self> {
        self.wrap_with_argument("endswith", &value.into())
    }

    /// Close a clause that holds when `value` occurs in the left operand
    pub fn contains(self, value: impl Into<Value>) -> UsageResult<Self> {
        self.wrap_search("indexof", value.into())?
            .compare(ComparisonOperator::GreaterOrEqual, Value::from(0))
    }

    fn wrap_search(self, function: &str, value: Value) -> UsageResult<Self> {
        if value.is_null() {
            return Err(UsageError::NullValue);
        }
        self.wrap_with_argument(function, &value)
    }

    fn wrap_with_argument(mut self, function: &str, value: &Value) -> UsageResult<Self> {
        let left = self.pending.left.take().ok_or(UsageError::MissingLeftOperand)?;
        self.pending.left = Some(format!("{}({},{})", function, left, escape(value)));
        Ok(self)
    }

    // Comparators

    pub fn equal(self, value: impl Into<Value>) -> UsageResult<Self> {
        self.compare(ComparisonOperator::Equal, value.into())
    }

    pub fn not_equal(self, value: impl Into<Value>) -> UsageResult<Self> {
        self.compare(ComparisonOperator::NotEqual, value.into())
    }

    pub fn greater_than(self, value: impl Into<Value>) -> UsageResult<Self> {
        self.compare(ComparisonOperator::GreaterThan, value.into())
    }

    pub fn greater_or_equal(self, value: impl Into<Value>) -> UsageResult<Self> {
        self.compare(ComparisonOperator::GreaterOrEqual, value.into())
    }

    pub fn lower_than(self, value: impl Into<Value>) -> UsageResult<Self> {
        self.compare(ComparisonOperator::LowerThan, value.into())
    }

    pub fn lower_or_equal(self, value: impl Into<Value>) -> UsageResult<Self> {
        self.compare(ComparisonOperator::LowerOrEqual, value.into())
    }

    /// Close `(left ge low) and (left le high)` as a single clause
    pub fn between(mut self, low: impl Into<Value>, high: impl Into<Value>) -> UsageResult<Self> {
        let left = self.pending.left.take().ok_or(UsageError::MissingLeftOperand)?;
        let clause = format!(
            "({left} {} {}) and ({left} {} {})",
            ComparisonOperator::GreaterOrEqual,
            escape(&low.into()),
            ComparisonOperator::LowerOrEqual,
            escape(&high.into()),
        );
        self.append(clause);
        Ok(self)
    }

    /// Close the pending clause with an explicit operator
    pub fn compare(mut self, op: ComparisonOperator, value: Value) -> UsageResult<Self> {
        let left = self.pending.left.take().ok_or(UsageError::MissingLeftOperand)?;
        trace!(model = %self.model, %op, value_kind = value.kind(), "closing comparison");
        let clause = format!("{} {} {}", left, op, escape(&value));
        self.append(clause);
        Ok(self)
    }

    fn append(&mut self, clause: String) {
        let joiner = self.pending.lop.take().unwrap_or_default();
        let filter = fold(self.options.filter.take(), &clause, joiner);
        trace!(model = %self.model, %joiner, clause = %clause, "folded clause");
        self.options.filter = Some(filter);
        self.pending = PendingComparison::default();
    }

    // Projection, grouping, expansion

    /// Set the projection. An empty list clears it; `None` is a no-op.
    pub fn select(mut self, fields: impl Into<FieldList>) -> Self {
        let fields = fields.into();
        if !fields.is_absent() {
            self.options.select = fields.joined();
        }
        self
    }

    /// Set the grouping. An empty list clears it; `None` is a no-op.
    pub fn group_by(mut self, fields: impl Into<FieldList>) -> Self {
        let fields = fields.into();
        if !fields.is_absent() {
            self.options.group = fields.joined();
        }
        self
    }

    /// Set the related resources to expand. Empty or `None` is a no-op.
    pub fn expand(mut self, fields: impl Into<FieldList>) -> Self {
        if let Some(expand) = fields.into().joined() {
            self.options.expand = Some(expand);
        }
        self
    }

    // Ordering

    pub fn order_by(self, fields: impl Into<FieldList>) -> Self {
        self.set_order(fields.into(), SortDirection::Asc)
    }

    pub fn order_by_descending(self, fields: impl Into<FieldList>) -> Self {
        self.set_order(fields.into(), SortDirection::Desc)
    }

    pub fn then_by(self, fields: impl Into<FieldList>) -> Self {
        self.append_order(fields.into(), SortDirection::Asc)
    }

    pub fn then_by_descending(self, fields: impl Into<FieldList>) -> Self {
        self.append_order(fields.into(), SortDirection::Desc)
    }

    fn set_order(mut self, fields: FieldList, direction: SortDirection) -> Self {
        let fields = fields.into_fields();
        if !fields.is_empty() {
            self.options.order = SortOrder::by(fields, direction);
        }
        self
    }

    fn append_order(mut self, fields: FieldList, direction: SortDirection) -> Self {
        for field in fields.into_fields() {
            self.options.order.add(SortCriterion::new(field, direction));
        }
        self
    }

    // Paging

    pub fn skip(mut self, num: u32) -> Self {
        self.options.skip = Some(num);
        self
    }

    pub fn top(mut self, num: u32) -> Self {
        self.options.top = Some(num);
        self
    }

    /// Set `top`; taking zero rows also turns inline counting off
    pub fn take(self, num: u32) -> Self {
        let mut this = self.top(num);
        if num == 0 {
            this.options.inlinecount = Some(false);
        }
        this
    }

    /// Ask the server to report the total count alongside the page
    pub fn paged(mut self) -> Self {
        self.options.inlinecount = Some(true);
        self
    }

    /// Ask for a single-item result
    pub fn first(self) -> Self {
        let mut this = self.skip(0).top(1);
        this.options.first = Some(true);
        this
    }

    pub fn is_first(&self) -> bool {
        self.options.first.unwrap_or(false)
    }

    /// Set or clear inline counting explicitly
    pub fn inline_count(mut self, inlinecount: bool) -> Self {
        self.options.inlinecount = Some(inlinecount);
        self
    }

    // Related resources

    /// Remember the key of a parent item for [`DataQueryable::query`]
    pub fn item(mut self, key: impl ToString) -> Self {
        self.key = Some(key.to_string());
        self
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Derive a queryable for an association of the remembered item.
    ///
    /// The derived queryable starts with empty options.
    pub fn query(&self, association: impl Into<String>) -> UsageResult<DataQueryable> {
        let key = self.key.as_deref().ok_or(UsageError::MissingItemKey)?;
        let association = association.into();
        if association.is_empty() {
            return Err(UsageError::empty_model());
        }
        let paths = ResourcePaths::for_association(&self.model, key, &association);
        Ok(DataQueryable::with_paths(association, paths))
    }

    // Serialization

    /// `?`-prefixed query string, or the empty string
    pub fn to_query_string(&self) -> String {
        self.options.to_query_string()
    }

    /// Read endpoint followed by the query string
    pub fn relative_url(&self) -> String {
        format!("{}{}", self.paths.get_url, self.to_query_string())
    }
}

fn non_empty(field: impl Into<String>) -> UsageResult<String> {
    let field = field.into();
    if field.is_empty() {
        Err(UsageError::empty_field())
    } else {
        Ok(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::FilterExpression;
    use chrono::{TimeZone, Utc};

    type Transform = fn(DataQueryable) -> UsageResult<DataQueryable>;

    fn products() -> DataQueryable {
        DataQueryable::new("Product")
    }

    #[test]
    fn test_single_clause() {
        let q = products()
            .where_("category")
            .unwrap()
            .equal("Laptops")
            .unwrap();
        assert_eq!(q.filter(), Some("category eq 'Laptops'"));
        assert_eq!(q.state(), BuilderState::Idle);
        assert_eq!(
            q.relative_url(),
            "/Product/index.json?$filter=category eq 'Laptops'"
        );
    }

    #[test]
    fn test_also_folds_with_and() {
        let q = products()
            .where_("a")
            .unwrap()
            .equal(1)
            .unwrap()
            .also("b")
            .unwrap()
            .equal(2)
            .unwrap();
        assert_eq!(q.filter(), Some("(a eq 1) and (b eq 2)"));
    }

    #[test]
    fn test_three_clauses_are_left_associative() {
        let q = products()
            .where_("a")
            .unwrap()
            .equal(1)
            .unwrap()
            .also("b")
            .unwrap()
            .equal(2)
            .unwrap()
            .also("c")
            .unwrap()
            .equal(3)
            .unwrap();
        assert_eq!(q.filter(), Some("((a eq 1) and (b eq 2)) and (c eq 3)"));
    }

    #[test]
    fn test_where_after_clause_defaults_to_and() {
        let q = products()
            .where_("a")
            .unwrap()
            .equal(1)
            .unwrap()
            .where_("b")
            .unwrap()
            .not_equal(2)
            .unwrap();
        assert_eq!(q.filter(), Some("(a eq 1) and (b ne 2)"));
    }

    #[test]
    fn test_either_forces_or() {
        let q = products()
            .where_("category")
            .unwrap()
            .equal("Desktops")
            .unwrap()
            .either("category")
            .unwrap()
            .equal("Laptops")
            .unwrap()
            .also("price")
            .unwrap()
            .lower_than(500)
            .unwrap();
        assert_eq!(
            q.filter(),
            Some("((category eq 'Desktops') or (category eq 'Laptops')) and (price lt 500)")
        );
    }

    #[test]
    fn test_all_comparators() {
        let q = products()
            .where_("a")
            .unwrap()
            .equal(1)
            .unwrap()
            .also("b")
            .unwrap()
            .not_equal(2)
            .unwrap()
            .also("c")
            .unwrap()
            .greater_than(3)
            .unwrap()
            .also("d")
            .unwrap()
            .greater_or_equal(4)
            .unwrap()
            .also("e")
            .unwrap()
            .lower_than(5)
            .unwrap()
            .also("f")
            .unwrap()
            .lower_or_equal(6)
            .unwrap();
        assert_eq!(
            q.filter(),
            Some(
                "(((((a eq 1) and (b ne 2)) and (c gt 3)) and (d ge 4)) and (e lt 5)) and (f le 6)"
            )
        );
    }

    #[test]
    fn test_between() {
        let q = products()
            .where_("price")
            .unwrap()
            .between(200, 750)
            .unwrap();
        assert_eq!(q.filter(), Some("(price ge 200) and (price le 750)"));
    }

    #[test]
    fn test_between_folds_as_one_unit() {
        let q = products()
            .where_("category")
            .unwrap()
            .equal("Laptops")
            .unwrap()
            .also("price")
            .unwrap()
            .between(200, 750)
            .unwrap();
        assert_eq!(
            q.filter(),
            Some("(category eq 'Laptops') and ((price ge 200) and (price le 750))")
        );

        let q = products()
            .where_("category")
            .unwrap()
            .equal("Laptops")
            .unwrap()
            .either("price")
            .unwrap()
            .between(200, 750)
            .unwrap();
        assert_eq!(
            q.filter(),
            Some("(category eq 'Laptops') or ((price ge 200) and (price le 750))")
        );
    }

    #[test]
    fn test_between_on_transform() {
        let q = DataQueryable::new("Order")
            .where_("orderDate")
            .unwrap()
            .get_hours()
            .unwrap()
            .between(10, 18)
            .unwrap();
        assert_eq!(
            q.filter(),
            Some("(hour(orderDate) ge 10) and (hour(orderDate) le 18)")
        );
    }

    #[test]
    fn test_prepare_then_where() {
        let q = products()
            .where_("a")
            .unwrap()
            .equal(1)
            .unwrap()
            .prepare()
            .where_("b")
            .unwrap()
            .equal(2)
            .unwrap();
        assert_eq!(q.options().prepared.as_deref(), Some("a eq 1"));
        assert_eq!(q.filter(), Some("b eq 2"));
        assert_eq!(q.to_query_string(), "?$filter=(a eq 1) and (b eq 2)");
    }

    #[test]
    fn test_prepare_without_filter_is_noop() {
        let q = products().prepare();
        assert_eq!(q.options(), &QueryOptions::new());
    }

    #[test]
    fn test_and_also_starts_new_group() {
        let q = products()
            .where_("category")
            .unwrap()
            .equal("Laptops")
            .unwrap()
            .either("category")
            .unwrap()
            .equal("Desktops")
            .unwrap()
            .and_also("price")
            .unwrap()
            .between(200, 750)
            .unwrap();
        assert_eq!(
            q.effective_filter().as_deref(),
            Some(
                "((category eq 'Laptops') or (category eq 'Desktops')) \
                 and ((price ge 200) and (price le 750))"
            )
        );
    }

    #[test]
    fn test_also_versus_and_also() {
        // also: extends the current group, the or binds first
        let extended = products()
            .where_("a")
            .unwrap()
            .equal(1)
            .unwrap()
            .either("b")
            .unwrap()
            .equal(2)
            .unwrap()
            .also("c")
            .unwrap()
            .equal(3)
            .unwrap();
        // and_also: commits "(a) or (b)" and starts a new group
        let grouped = products()
            .where_("a")
            .unwrap()
            .equal(1)
            .unwrap()
            .either("b")
            .unwrap()
            .equal(2)
            .unwrap()
            .and_also("c")
            .unwrap()
            .equal(3)
            .unwrap();

        assert_eq!(
            extended.effective_filter().as_deref(),
            Some("((a eq 1) or (b eq 2)) and (c eq 3)")
        );
        assert_eq!(extended.options().prepared, None);

        assert_eq!(
            grouped.options().prepared.as_deref(),
            Some("(a eq 1) or (b eq 2)")
        );
        assert_eq!(grouped.filter(), Some("c eq 3"));
    }

    #[test]
    fn test_or_else_then_and_also() {
        let q = products()
            .where_("a")
            .unwrap()
            .equal(1)
            .unwrap()
            .or_else("b")
            .unwrap()
            .equal(2)
            .unwrap()
            .also("c")
            .unwrap()
            .equal(3)
            .unwrap()
            .and_also("d")
            .unwrap()
            .equal(4)
            .unwrap();
        assert_eq!(
            q.options().prepared.as_deref(),
            Some("(a eq 1) or ((b eq 2) and (c eq 3))")
        );
        assert_eq!(
            q.to_query_string(),
            "?$filter=((a eq 1) or ((b eq 2) and (c eq 3))) and (d eq 4)"
        );
    }

    #[test]
    fn test_and_also_without_filter() {
        let q = products()
            .and_also("price")
            .unwrap()
            .lower_than(10)
            .unwrap();
        assert_eq!(q.options().prepared, None);
        assert_eq!(q.to_query_string(), "?$filter=price lt 10");
    }

    #[test]
    fn test_transforms() {
        let cases: [(Transform, &str); 15] = [
            (DataQueryable::to_lower_case, "tolower(f)"),
            (DataQueryable::to_upper_case, "toupper(f)"),
            (DataQueryable::trim, "trim(f)"),
            (DataQueryable::round, "round(f)"),
            (DataQueryable::floor, "floor(f)"),
            (DataQueryable::ceil, "ceiling(f)"),
            (DataQueryable::length, "length(f)"),
            (DataQueryable::get_date, "date(f)"),
            (DataQueryable::get_year, "year(f)"),
            (DataQueryable::get_full_year, "year(f)"),
            (DataQueryable::get_month, "month(f)"),
            (DataQueryable::get_day, "day(f)"),
            (DataQueryable::get_hours, "hour(f)"),
            (DataQueryable::get_minutes, "minute(f)"),
            (DataQueryable::get_seconds, "second(f)"),
        ];
        for (transform, expected) in cases {
            let q = transform(products().where_("f").unwrap()).unwrap();
            assert_eq!(q.left(), Some(expected));
            assert_eq!(q.state(), BuilderState::OperandPending);
        }
    }

    #[test]
    fn test_transforms_nest() {
        let q = DataQueryable::new("Order")
            .where_("orderDate")
            .unwrap()
            .get_month()
            .unwrap()
            .get_day()
            .unwrap();
        assert_eq!(q.left(), Some("day(month(orderDate))"));
    }

    #[test]
    fn test_transform_requires_left() {
        assert_eq!(
            products().to_lower_case().unwrap_err(),
            UsageError::MissingLeftOperand
        );
        assert_eq!(
            products().get_month().unwrap_err(),
            UsageError::MissingLeftOperand
        );
    }

    #[test]
    fn test_comparator_requires_left() {
        assert_eq!(
            products().equal(1).unwrap_err(),
            UsageError::MissingLeftOperand
        );
        assert_eq!(
            products().between(1, 2).unwrap_err(),
            UsageError::MissingLeftOperand
        );
        // the operand is consumed by the first comparator
        let q = products().where_("a").unwrap().equal(1).unwrap();
        assert_eq!(q.equal(2).unwrap_err(), UsageError::MissingLeftOperand);
    }

    #[test]
    fn test_empty_field_rejected() {
        assert_eq!(products().where_("").unwrap_err(), UsageError::empty_field());
        assert_eq!(products().also("").unwrap_err(), UsageError::empty_field());
        assert_eq!(products().either("").unwrap_err(), UsageError::empty_field());
        assert_eq!(products().and_also("").unwrap_err(), UsageError::empty_field());
        assert_eq!(products().or_else("").unwrap_err(), UsageError::empty_field());
    }

    #[test]
    fn test_substring() {
        let q = products()
            .where_("name")
            .unwrap()
            .substring(6, 4)
            .unwrap()
            .equal("Core")
            .unwrap();
        assert_eq!(q.filter(), Some("substring(name,6,4) eq 'Core'"));
    }

    #[test]
    fn test_substring_validation() {
        let q = products().where_("name").unwrap();
        assert!(matches!(
            q.clone().substring(0, 0).unwrap_err(),
            UsageError::InvalidArgument { .. }
        ));
        assert!(matches!(
            q.clone().substring(-1, 4).unwrap_err(),
            UsageError::InvalidArgument { .. }
        ));
        assert!(q.substring(0, 1).is_ok());
    }

    #[test]
    fn test_contains() {
        let q = products()
            .where_("name")
            .unwrap()
            .contains("Book")
            .unwrap()
            .also("category")
            .unwrap()
            .equal("Laptops")
            .unwrap();
        assert_eq!(
            q.filter(),
            Some("(indexof(name,'Book') ge 0) and (category eq 'Laptops')")
        );
    }

    #[test]
    fn test_contains_rejects_null() {
        let q = products().where_("name").unwrap();
        assert_eq!(
            q.clone().contains(None::<&str>).unwrap_err(),
            UsageError::NullValue
        );
        assert_eq!(q.index_of(Value::Null).unwrap_err(), UsageError::NullValue);
    }

    #[test]
    fn test_index_of() {
        let q = products()
            .where_("name")
            .unwrap()
            .index_of("Intel")
            .unwrap()
            .greater_or_equal(0)
            .unwrap();
        assert_eq!(q.filter(), Some("indexof(name,'Intel') ge 0"));
    }

    #[test]
    fn test_substring_of() {
        let q = products()
            .where_("name")
            .unwrap()
            .substring_of("Intel")
            .unwrap()
            .equal(true)
            .unwrap();
        assert_eq!(q.filter(), Some("substringof(name,'Intel') eq true"));
    }

    #[test]
    fn test_starts_with_stays_open() {
        let q = products()
            .where_("name")
            .unwrap()
            .starts_with("Intel Core")
            .unwrap();
        assert_eq!(q.state(), BuilderState::OperandPending);
        assert_eq!(q.filter(), None);

        let q = q.equal(true).unwrap();
        assert_eq!(q.filter(), Some("startswith(name,'Intel Core') eq true"));
    }

    #[test]
    fn test_ends_with() {
        let q = products()
            .where_("name")
            .unwrap()
            .ends_with("Edition")
            .unwrap()
            .equal(true)
            .unwrap();
        assert_eq!(q.filter(), Some("endswith(name,'Edition') eq true"));
    }

    #[test]
    fn test_filter_expression_value() {
        let q = DataQueryable::new("Order")
            .where_("customer")
            .unwrap()
            .equal(FilterExpression::me())
            .unwrap();
        assert_eq!(q.filter(), Some("customer eq me()"));
    }

    #[test]
    fn test_typed_values() {
        let when = Utc.with_ymd_and_hms(2015, 4, 18, 0, 0, 0).unwrap();
        let q = DataQueryable::new("Order")
            .where_("orderDate")
            .unwrap()
            .greater_or_equal(when)
            .unwrap()
            .also("orderStatus")
            .unwrap()
            .equal(vec![1, 2])
            .unwrap()
            .also("customer")
            .unwrap()
            .equal(None::<i64>)
            .unwrap()
            .also("price")
            .unwrap()
            .lower_or_equal(263.56)
            .unwrap();
        assert_eq!(
            q.filter(),
            Some(
                "(((orderDate ge '2015-04-18T00:00:00+00:00') and (orderStatus eq [1,2])) \
                 and (customer eq null)) and (price le 263.56)"
            )
        );
    }

    #[test]
    fn test_select_variants() {
        let q = DataQueryable::new("Order").select([
            "id",
            "orderStatus/name as orderStatusName",
            "customer/description as customerDescription",
        ]);
        assert_eq!(
            q.options().select.as_deref(),
            Some("id,orderStatus/name as orderStatusName,customer/description as customerDescription")
        );

        let q = q.select(None::<&str>);
        assert!(q.options().select.is_some());

        let q = q.select(Vec::<String>::new());
        assert_eq!(q.options().select, None);
    }

    #[test]
    fn test_group_by_and_expand() {
        let q = products()
            .select(["category", "count(id) as total"])
            .group_by("category")
            .expand(["customer", "orderedItem"]);
        assert_eq!(q.options().group.as_deref(), Some("category"));
        assert_eq!(q.options().expand.as_deref(), Some("customer,orderedItem"));

        let q = q.expand(Vec::<String>::new()).group_by(None::<&str>);
        assert_eq!(q.options().expand.as_deref(), Some("customer,orderedItem"));
        assert_eq!(q.options().group.as_deref(), Some("category"));

        let q = q.group_by(Vec::<&str>::new());
        assert_eq!(q.options().group, None);
    }

    #[test]
    fn test_ordering() {
        let q = products().order_by("category").then_by("name");
        assert_eq!(q.to_query_string(), "?$order=category,name");

        let q = products()
            .order_by_descending("category")
            .then_by_descending("name");
        assert_eq!(q.to_query_string(), "?$order=category desc,name desc");

        let q = products().order_by(["category", "name"]);
        assert_eq!(q.to_query_string(), "?$order=category,name");

        let q = products().then_by("price");
        assert_eq!(q.to_query_string(), "?$order=price");
    }

    #[test]
    fn test_order_by_replaces_and_none_is_noop() {
        let q = products()
            .order_by("category")
            .order_by_descending("count(id)")
            .order_by(None::<&str>)
            .then_by(None::<&str>);
        assert_eq!(q.to_query_string(), "?$order=count(id) desc");
    }

    #[test]
    fn test_empty_names_are_not_sent() {
        let q = products().select("").order_by("");
        assert_eq!(q.to_query_string(), "");

        let q = products()
            .group_by("")
            .expand(["", ""])
            .then_by_descending("");
        assert_eq!(q.to_query_string(), "");

        let q = products()
            .order_by("price")
            .order_by("")
            .select(["", "id"]);
        assert_eq!(q.to_query_string(), "?$select=id&$order=price");
    }

    #[test]
    fn test_f32_literal() {
        let q = products().where_("price").unwrap().equal(0.1f32).unwrap();
        assert_eq!(q.filter(), Some("price eq 0.1"));
    }

    #[test]
    fn test_paging() {
        let q = DataQueryable::new("Order").skip(10).take(10);
        assert_eq!(q.to_query_string(), "?$top=10&$skip=10");

        let q = q.paged();
        assert_eq!(q.to_query_string(), "?$top=10&$skip=10&$inlinecount=true");
    }

    #[test]
    fn test_take_zero() {
        let q = products().paged().take(0);
        assert_eq!(q.to_query_string(), "?$top=0&$inlinecount=false");

        let q = products().top(0);
        assert_eq!(q.to_query_string(), "?$top=0");
    }

    #[test]
    fn test_first() {
        let q = products().skip(40).first();
        assert!(q.is_first());
        assert_eq!(q.to_query_string(), "?$top=1&$skip=0");
    }

    #[test]
    fn test_full_query_string() {
        let q = DataQueryable::new("Order")
            .where_("orderedItem/price")
            .unwrap()
            .greater_than(968)
            .unwrap()
            .also("orderedItem/category")
            .unwrap()
            .equal("Laptops")
            .unwrap()
            .also("orderStatus/alternateName")
            .unwrap()
            .not_equal("OrderCancelled")
            .unwrap()
            .select(["id", "orderedItem"])
            .order_by_descending("orderDate")
            .take(10);
        assert_eq!(
            q.relative_url(),
            "/Order/index.json?$filter=((orderedItem/price gt 968) and \
             (orderedItem/category eq 'Laptops')) and \
             (orderStatus/alternateName ne 'OrderCancelled')\
             &$select=id,orderedItem&$order=orderDate desc&$top=10"
        );
    }

    #[test]
    fn test_identical_chains_are_byte_identical() {
        let build = || {
            products()
                .where_("category")
                .unwrap()
                .equal("Laptops")
                .unwrap()
                .either("category")
                .unwrap()
                .equal("Desktops")
                .unwrap()
                .and_also("price")
                .unwrap()
                .round()
                .unwrap()
                .lower_or_equal(250)
                .unwrap()
                .select(["id", "name"])
                .order_by("price")
                .take(5)
                .paged()
        };
        assert_eq!(build().to_query_string(), build().to_query_string());
        assert_eq!(build(), build());
    }

    #[test]
    fn test_serialization_is_repeatable() {
        let q = products()
            .where_("a")
            .unwrap()
            .equal(1)
            .unwrap()
            .and_also("b")
            .unwrap()
            .equal(2)
            .unwrap();
        let first = q.to_query_string();
        assert_eq!(first, q.to_query_string());
        assert_eq!(first, "?$filter=(a eq 1) and (b eq 2)");
    }

    #[test]
    fn test_item_query() {
        let q = DataQueryable::new("User").item(337);
        assert_eq!(q.key(), Some("337"));

        let orders = q.query("orders").unwrap().top(5);
        assert_eq!(orders.model(), "orders");
        assert_eq!(orders.paths().post_url, "/User/337/orders/edit.json");
        assert_eq!(orders.relative_url(), "/User/337/orders/index.json?$top=5");
        // the parent keeps its own options
        assert_eq!(q.to_query_string(), "");
    }

    #[test]
    fn test_query_requires_item() {
        assert_eq!(
            DataQueryable::new("User").query("orders").unwrap_err(),
            UsageError::MissingItemKey
        );
        assert_eq!(
            DataQueryable::new("User").item(1).query("").unwrap_err(),
            UsageError::empty_model()
        );
    }
}
