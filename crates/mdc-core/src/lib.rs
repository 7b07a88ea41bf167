//! # mdc-core
//!
//! Core types and utilities for the MOST data client.
//!
//! This crate provides the foundational building blocks used across the other crates:
//! - Error taxonomy (usage errors vs. transport errors)
//! - Result type alias
//! - Client configuration

pub mod error;
pub mod result;
pub mod config;

pub use error::*;
pub use result::*;
pub use config::{ClientConfig, ConfigError};
