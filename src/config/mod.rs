//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Core config struct definitions (Config, HttpConfig, DatabaseConfig)
//! - [`validation`]: Startup checks that collect every problem at once

mod types;
pub mod validation;

pub use types::{Config, ConfigError, DatabaseConfig, HttpConfig};
