//! Integration test common infrastructure.
//!
//! Provides utilities for spawning in-process test servers and a minimal
//! HTTP client for asserting on registration responses.

pub mod client;
pub mod server;

#[allow(unused_imports)]
pub use client::{TestClient, TestResponse};
#[allow(unused_imports)]
pub use server::TestServer;
