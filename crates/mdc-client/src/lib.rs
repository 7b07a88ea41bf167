//! # mdc-client
//!
//! Data context facade for the MOST data client. Queries built with
//! `mdc-queries` are handed to a [`DataService`] transport; records come
//! back as JSON or typed values.
//!
//! ## Structure
//!
//! - `service` - Transport trait and an in-memory implementation
//! - `context` - [`ClientDataContext`], reads and writes per model

pub mod service;
pub mod context;

pub use service::{Cookies, DataService, HttpMethod, MemoryDataService, RecordedRequest};
pub use context::{ClientDataContext, DataList};

pub use mdc_core::{ClientConfig, ClientError, ClientResult, UsageError};
pub use mdc_queries::{DataQueryable, FilterExpression, Value};
