//! Core error types for the MOST data client
//!
//! Usage errors are raised synchronously by the query builder when a chain is
//! misused. Everything else belongs to the transport boundary.

use thiserror::Error;

use crate::config::ConfigError;

/// Core error type for all client operations
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Usage error: {0}")]
    Usage(#[from] UsageError),

    #[error("HTTP error [{status}]: {message}")]
    Http { status: u16, message: String },

    #[error("Request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Caller misuse of the fluent builder. Never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UsageError {
    #[error("Invalid right operand assignment. Left operand cannot be empty at this context.")]
    MissingLeftOperand,

    #[error("Value cannot be null at this context.")]
    NullValue,

    #[error("{what} cannot be empty at this context.")]
    EmptyName { what: &'static str },

    #[error("Invalid argument. {message}")]
    InvalidArgument { message: String },

    #[error("Associated item cannot be empty at this context.")]
    MissingItemKey,
}

impl UsageError {
    /// Empty field name passed to a field selector
    pub fn empty_field() -> Self {
        Self::EmptyName { what: "Field" }
    }

    /// Empty model or association name
    pub fn empty_model() -> Self {
        Self::EmptyName { what: "Model" }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

impl ClientError {
    /// Shorthand for a transport status failure
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Check whether this error was caused by misuse of the builder
    pub fn is_usage_error(&self) -> bool {
        matches!(self, ClientError::Usage(_))
    }

    /// HTTP status code associated with the error
    pub fn status_code(&self) -> u16 {
        match self {
            ClientError::Usage(_) => 400,
            ClientError::Http { status, .. } => *status,
            ClientError::Timeout { .. } => 504,
            ClientError::InvalidResponse(_) => 502,
            ClientError::Json(_) => 502,
            ClientError::Config(_) | ClientError::Internal(_) => 500,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::Usage(_) => "usage_error",
            ClientError::Http { .. } => "http_error",
            ClientError::Timeout { .. } => "timeout",
            ClientError::InvalidResponse(_) => "invalid_response",
            ClientError::Json(_) => "json_error",
            ClientError::Config(_) => "configuration_error",
            ClientError::Internal(_) => "internal_error",
        }
    }
}
