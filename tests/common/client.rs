//! Test HTTP client.
//!
//! Speaks just enough HTTP/1.1 over a raw TCP stream to post forms and read
//! one response per connection.

use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

/// A parsed HTTP response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: u16,
    pub body: String,
}

impl TestResponse {
    /// Parse the body as JSON.
    pub fn json(&self) -> anyhow::Result<serde_json::Value> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// A test HTTP client.
pub struct TestClient {
    addr: SocketAddr,
}

impl TestClient {
    pub fn new(addr: SocketAddr) -> Self {
        Self { addr }
    }

    /// POST an already-encoded form body.
    pub async fn post_form(&self, path: &str, body: &str) -> anyhow::Result<TestResponse> {
        let request = format!(
            "POST {path} HTTP/1.1\r\n\
             Host: {}\r\n\
             Content-Type: application/x-www-form-urlencoded\r\n\
             Content-Length: {}\r\n\
             Connection: close\r\n\r\n{body}",
            self.addr,
            body.len()
        );
        self.send(&request).await
    }

    /// GET a path.
    pub async fn get(&self, path: &str) -> anyhow::Result<TestResponse> {
        let request = format!(
            "GET {path} HTTP/1.1\r\nHost: {}\r\nConnection: close\r\n\r\n",
            self.addr
        );
        self.send(&request).await
    }

    async fn send(&self, request: &str) -> anyhow::Result<TestResponse> {
        let mut stream = TcpStream::connect(self.addr).await?;
        stream.write_all(request.as_bytes()).await?;
        stream.flush().await?;

        let mut raw = Vec::new();
        timeout(Duration::from_secs(5), stream.read_to_end(&mut raw)).await??;
        let raw = String::from_utf8(raw)?;

        let (head, body) = raw
            .split_once("\r\n\r\n")
            .ok_or_else(|| anyhow::anyhow!("malformed response: {raw:?}"))?;
        let status = head
            .lines()
            .next()
            .and_then(|line| line.split_whitespace().nth(1))
            .ok_or_else(|| anyhow::anyhow!("missing status line"))?
            .parse()?;

        Ok(TestResponse {
            status,
            body: body.to_string(),
        })
    }
}
