//! User registration workflow.
//!
//! Rules run in a fixed order and the first failure wins:
//! presence, email syntax, uniqueness, then hash-and-insert. Every failure
//! comes back as a [`RegistrationError`]; nothing panics and no store error
//! escapes [`RegistrationService::register`].

use super::UserStore;
use crate::db::{DbError, ExistingUser};
use crate::error::RegistrationError;
use crate::security::{hash_password, is_valid_email};
use crate::telemetry::{RegistrationTimer, spans};
use std::fmt;
use tracing::{Instrument, debug, error, info, warn};

/// Result of a registration attempt.
pub type RegistrationOutcome = Result<Registered, RegistrationError>;

/// A successfully inserted user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registered {
    /// Row id of the new user.
    pub user_id: i64,
}

impl Registered {
    /// Confirmation shown to the client.
    pub const MESSAGE: &'static str = "registration succeeded";
}

impl fmt::Display for Registered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(Self::MESSAGE)
    }
}

/// Registration service over a [`UserStore`].
pub struct RegistrationService<S> {
    store: S,
}

impl<S: UserStore> RegistrationService<S> {
    /// Create a new registration service.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Get reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Register a user from already-trimmed fields.
    pub async fn register(&self, account: &str, email: &str, pass: &str) -> RegistrationOutcome {
        let _timer = RegistrationTimer::new();

        let outcome = self
            .try_register(account, email, pass)
            .instrument(spans::registration(account))
            .await;

        match &outcome {
            Ok(registered) => {
                info!(account = %account, user_id = registered.user_id, "User registered");
                crate::metrics::record_registration("success");
            }
            Err(e) => {
                if e.category().is_client_fault() {
                    debug!(account = %account, reason = %e, "Registration rejected");
                } else {
                    error!(account = %account, error = %e, "Registration failed");
                }
                crate::metrics::record_registration(e.error_code());
            }
        }

        outcome
    }

    async fn try_register(&self, account: &str, email: &str, pass: &str) -> RegistrationOutcome {
        validate_fields(account, email, pass)?;

        let existing = self
            .store
            .check_existing(account, email)
            .await
            .map_err(storage_error)?;
        if let Some(conflict) = duplicate_error(existing) {
            return Err(conflict);
        }

        let password_hash = hash_password(pass).map_err(|e| {
            RegistrationError::Unknown(format!("password hashing failed: {e}"))
        })?;

        match self.store.insert_user(account, email, &password_hash).await {
            Ok(result) if result.rows_affected == 0 => {
                Err(RegistrationError::Unknown("no rows inserted".to_string()))
            }
            Ok(result) => Ok(Registered {
                user_id: result.id,
            }),
            Err(DbError::UniqueViolation(detail)) => {
                // Another request inserted between our check and our insert
                warn!(account = %account, detail = %detail, "Registration lost uniqueness race");
                Err(self.explain_conflict(account, email).await)
            }
            Err(e) => Err(storage_error(e)),
        }
    }

    /// Pick the precise duplicate message after a constraint violation.
    async fn explain_conflict(&self, account: &str, email: &str) -> RegistrationError {
        match self.store.check_existing(account, email).await {
            Ok(existing) => duplicate_error(existing).unwrap_or(RegistrationError::Conflict),
            Err(e) => {
                warn!(error = %e, "Follow-up uniqueness check failed");
                RegistrationError::Conflict
            }
        }
    }
}

/// Presence and email-syntax rules, in that order.
pub fn validate_fields(account: &str, email: &str, pass: &str) -> Result<(), RegistrationError> {
    if account.is_empty() || email.is_empty() || pass.is_empty() {
        return Err(RegistrationError::MissingFields);
    }
    if !is_valid_email(email) {
        return Err(RegistrationError::InvalidEmail);
    }
    Ok(())
}

/// Map a uniqueness check to its duplicate error, if any field is taken.
pub fn duplicate_error(existing: ExistingUser) -> Option<RegistrationError> {
    if existing.is_clear() {
        return None;
    }
    Some(match (existing.account_exists, existing.email_exists) {
        (true, true) => RegistrationError::AccountAndEmailTaken,
        (true, false) => RegistrationError::AccountTaken,
        _ => RegistrationError::EmailTaken,
    })
}

fn storage_error(e: DbError) -> RegistrationError {
    RegistrationError::Storage(e.to_string())
}
