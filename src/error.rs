//! Unified error handling for board-api.
//!
//! Registration failures are values, not panics: every failure the workflow
//! can hit is a [`RegistrationError`] variant, grouped into a
//! [`FailureCategory`] that the HTTP layer maps to a status code.

use thiserror::Error;

// ============================================================================
// Failure categories
// ============================================================================

/// Client-fault versus server-fault classification of a failed registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCategory {
    /// Missing field or malformed email.
    InvalidInput,
    /// Account or email already taken.
    DuplicateConflict,
    /// The store raised an error.
    StorageError,
    /// The store reported nothing inserted without raising.
    UnknownError,
}

impl FailureCategory {
    /// Whether the client can fix the request and retry.
    #[inline]
    pub fn is_client_fault(self) -> bool {
        matches!(self, Self::InvalidInput | Self::DuplicateConflict)
    }
}

// ============================================================================
// Registration Errors
// ============================================================================

/// Errors that can end a registration attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("one or more fields missing")]
    MissingFields,

    #[error("invalid email format (example: test@example.com)")]
    InvalidEmail,

    #[error("both account and email already registered")]
    AccountAndEmailTaken,

    #[error("account already registered")]
    AccountTaken,

    #[error("email already registered")]
    EmailTaken,

    /// Constraint violation the follow-up check could not attribute.
    #[error("account or email already registered")]
    Conflict,

    #[error("storage error: {0}")]
    Storage(String),

    #[error("unknown error: {0}")]
    Unknown(String),
}

impl RegistrationError {
    /// Outcome category used to pick the transport status.
    pub fn category(&self) -> FailureCategory {
        match self {
            Self::MissingFields | Self::InvalidEmail => FailureCategory::InvalidInput,
            Self::AccountAndEmailTaken | Self::AccountTaken | Self::EmailTaken | Self::Conflict => {
                FailureCategory::DuplicateConflict
            }
            Self::Storage(_) => FailureCategory::StorageError,
            Self::Unknown(_) => FailureCategory::UnknownError,
        }
    }

    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingFields => "missing_fields",
            Self::InvalidEmail => "invalid_email",
            Self::AccountAndEmailTaken => "account_and_email_taken",
            Self::AccountTaken => "account_taken",
            Self::EmailTaken => "email_taken",
            Self::Conflict => "conflict",
            Self::Storage(_) => "storage_error",
            Self::Unknown(_) => "unknown_error",
        }
    }
}
