//! Result type aliases

use crate::error::{ClientError, UsageError};

/// Standard Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Result of a builder step that can only fail through misuse
pub type UsageResult<T> = Result<T, UsageError>;
