//! Test server management.
//!
//! Runs the board-api router on an ephemeral port inside the test runtime.

use board_api::config::DatabaseConfig;
use board_api::db::Database;
use board_api::http;
use board_api::services::RegistrationService;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// A test server instance.
pub struct TestServer {
    addr: SocketAddr,
    db: Database,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Spawn a server backed by a fresh in-memory database.
    pub async fn spawn() -> anyhow::Result<Self> {
        let db = Database::connect(&DatabaseConfig::in_memory()).await?;
        let service = Arc::new(RegistrationService::new(db.clone()));
        let app = http::router(service, true);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("test server error: {e}");
            }
        });

        Ok(Self { addr, db, handle })
    }

    /// Database the server writes to.
    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Create a client for this server.
    pub fn client(&self) -> super::client::TestClient {
        super::client::TestClient::new(self.addr)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
