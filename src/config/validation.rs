//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use std::path::Path;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("database.path is required")]
    MissingDatabasePath,
    #[error("database.path parent directory does not exist: {0}")]
    DatabasePathInvalid(String),
    #[error("database.max_connections must be at least 1")]
    NoConnections,
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let db = &config.database;

    if db.path.trim().is_empty() {
        errors.push(ValidationError::MissingDatabasePath);
    } else if !db.is_memory() {
        let db_path = Path::new(&db.path);
        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            errors.push(ValidationError::DatabasePathInvalid(db.path.clone()));
        }
    }

    if db.max_connections == 0 {
        errors.push(ValidationError::NoConnections);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
