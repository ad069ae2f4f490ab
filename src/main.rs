//! board-api - user registration service.

use board_api::config::{self, Config};
use board_api::db::Database;
use board_api::services::RegistrationService;
use board_api::{http, metrics};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    if let Err(errors) = config::validation::validate(&config) {
        for e in &errors {
            error!(error = %e, "Invalid configuration");
        }
        return Err(anyhow::anyhow!(
            "{} configuration error(s) in {}",
            errors.len(),
            config_path
        ));
    }

    info!(address = %config.http.address, database = %config.database.path, "Starting board-api");

    // A database we cannot reach is a broken deployment: exit, no retry.
    let db = match Database::connect(&config.database).await {
        Ok(db) => db,
        Err(e) => {
            error!(path = %config.database.path, error = %e, "FATAL: database connection failed");
            std::process::exit(1);
        }
    };

    if config.http.metrics {
        metrics::init();
    }

    let service = Arc::new(RegistrationService::new(db));
    http::run_http_server(&config.http, service).await?;

    info!("board-api stopped");
    Ok(())
}
