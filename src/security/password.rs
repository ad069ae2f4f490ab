//! Password hashing and verification utilities.
//!
//! Passwords are stored as Argon2id PHC strings with a per-hash random salt.

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};

/// Hash a password using default Argon2 settings.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    Ok(argon2
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// Verify a password against a stored PHC hash string.
///
/// A stored value that does not parse as a PHC string is an error; a
/// well-formed hash that does not match yields `Ok(false)`.
pub fn verify_password(password: &str, stored: &str) -> Result<bool, argon2::password_hash::Error> {
    let hash = PasswordHash::new(stored)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_not_plaintext_and_verifies() {
        let hash = hash_password("secret").unwrap();
        assert_ne!(hash, "secret");
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("secret", &hash).unwrap());
        assert!(!verify_password("Secret", &hash).unwrap());
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let a = hash_password("secret").unwrap();
        let b = hash_password("secret").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_hash_is_error() {
        assert!(verify_password("secret", "secret").is_err());
    }
}
