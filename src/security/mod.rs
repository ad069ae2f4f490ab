//! Security module for board-api.
//!
//! Provides the input-handling primitives used by registration:
//! - **Password**: Argon2id hashing and verification
//! - **Email**: sanitization and strict syntax validation

pub mod email;
pub mod password;

pub use email::is_valid_email;
pub use password::{hash_password, verify_password};
