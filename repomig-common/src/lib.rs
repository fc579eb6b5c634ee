//! # repomig Common Library
//!
//! Shared code for the repomig service and its tools:
//! - Configuration loading (TOML bootstrap, environment and CLI overrides)
//! - Common error type

pub mod config;
pub mod error;

pub use error::{Error, Result};
