//! # mdc-queries
//!
//! Query expression builder for the MOST data client.
//!
//! This crate turns a fluent method chain into an OData-style query string
//! (`$filter`, `$select`, `$order`, `$top`, `$skip`, `$group`, `$expand`,
//! `$inlinecount`). It performs no I/O.
//!
//! ## Structure
//!
//! - `value` - Typed literal values and raw filter expressions
//! - `escape` - Rendering of values as expression literals
//! - `operators` - Comparison/logical operators and the clause fold
//! - `sorts` - Sort orders and directions
//! - `options` - Accumulated query options and their serialization
//! - `paths` - Read/write endpoints of a resource
//! - `builder` - Fluent API for constructing queries
//!
//! ## Example
//!
//! ```
//! use mdc_queries::DataQueryable;
//!
//! # fn main() -> Result<(), mdc_core::UsageError> {
//! let query = DataQueryable::new("Product")
//!     .where_("category")?.equal("Laptops")?
//!     .also("price")?.between(200, 750)?
//!     .order_by("price")
//!     .take(5);
//!
//! assert_eq!(
//!     query.relative_url(),
//!     "/Product/index.json?$filter=(category eq 'Laptops') and \
//!      ((price ge 200) and (price le 750))&$order=price&$top=5"
//! );
//! # Ok(())
//! # }
//! ```

pub mod value;
pub mod escape;
pub mod operators;
pub mod sorts;
pub mod options;
pub mod paths;
pub mod builder;

// Re-exports for convenience
pub use value::{FilterExpression, Value};
pub use escape::escape;
pub use operators::{ComparisonOperator, LogicalOperator};
pub use sorts::{SortCriterion, SortDirection, SortOrder};
pub use options::{FieldList, QueryOptions};
pub use paths::ResourcePaths;
pub use builder::{BuilderState, DataQueryable};
