//! board-api - user registration service.
//!
//! Accepts an account name, email and password, validates them, checks
//! uniqueness against the `users` table, stores an Argon2 hash and answers
//! with a JSON status document.

pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod metrics;
pub mod security;
pub mod services;
pub mod telemetry;
