//! Configuration module for palswap
//!
//! Provides types and loading for the optional `palswap.toml` file.

pub mod loader;
pub mod schema;

pub use loader::{load_config, CliOverrides, ConfigError};
pub use schema::*;
