//! HTTP front for registration.
//!
//! Serves `POST /users` (form-encoded `account`, `email`, `pass`) and, when
//! enabled, `/metrics` for Prometheus scraping.

use crate::config::HttpConfig;
use crate::db::Database;
use crate::error::FailureCategory;
use crate::services::{Registered, RegistrationOutcome, RegistrationService};
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Fixed `event` label on every registration response.
pub const REGISTRATION_EVENT: &str = "registration";

/// Shared state handed to every request.
pub type AppState = Arc<RegistrationService<Database>>;

/// Registration form fields. Absent fields are empty strings.
#[derive(Debug, Default, Deserialize)]
pub struct RegistrationForm {
    #[serde(default)]
    pub account: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub pass: String,
}

/// JSON body returned for a registration attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationResponse {
    pub event: &'static str,
    pub status: &'static str,
    pub content: String,
}

/// Map an outcome to its status code and JSON body.
pub fn respond(outcome: &RegistrationOutcome) -> (StatusCode, RegistrationResponse) {
    match outcome {
        Ok(_) => (
            StatusCode::CREATED,
            RegistrationResponse {
                event: REGISTRATION_EVENT,
                status: "success",
                content: Registered::MESSAGE.to_string(),
            },
        ),
        Err(e) => {
            let (status, content) = match e.category() {
                FailureCategory::InvalidInput | FailureCategory::DuplicateConflict => {
                    (StatusCode::BAD_REQUEST, format!("registration failed, {e}"))
                }
                FailureCategory::StorageError | FailureCategory::UnknownError => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("registration failed: {e}"),
                ),
            };
            (
                status,
                RegistrationResponse {
                    event: REGISTRATION_EVENT,
                    status: "error",
                    content,
                },
            )
        }
    }
}

/// Handler for POST /users.
async fn register_handler(
    State(service): State<AppState>,
    Form(form): Form<RegistrationForm>,
) -> (StatusCode, Json<RegistrationResponse>) {
    let outcome = service
        .register(form.account.trim(), form.email.trim(), form.pass.trim())
        .await;
    let (status, body) = respond(&outcome);
    (status, Json(body))
}

/// Handler for GET /metrics - returns Prometheus metrics in text format.
async fn metrics_handler() -> String {
    crate::metrics::gather_metrics()
}

/// Build the application router.
pub fn router(service: AppState, metrics: bool) -> Router {
    let app = Router::new().route("/users", post(register_handler));
    let app = if metrics {
        app.route("/metrics", get(metrics_handler))
    } else {
        app
    };
    app.with_state(service)
}

/// Run the HTTP server until it fails or the process receives Ctrl-C.
pub async fn run_http_server(config: &HttpConfig, service: AppState) -> std::io::Result<()> {
    let app = router(service, config.metrics);

    let listener = tokio::net::TcpListener::bind(config.address).await?;
    tracing::info!(address = %config.address, metrics = config.metrics, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
            }
            tracing::info!("Shutdown signal received");
        })
        .await
}
