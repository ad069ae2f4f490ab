//! Telemetry utilities for registration timing and tracing spans.

use std::time::Instant;

/// Guard for timing a registration and recording metrics.
///
/// Records latency when dropped, so early returns are timed too.
pub struct RegistrationTimer {
    start: Instant,
}

impl RegistrationTimer {
    /// Start timing a registration.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for RegistrationTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for RegistrationTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        crate::metrics::record_registration_latency(duration);
    }
}

/// Standardized span constructors.
pub mod spans {
    use tracing::{Span, info_span};

    /// Create a span for one registration attempt. Never carries the password.
    pub fn registration(account: &str) -> Span {
        info_span!("registration", account = %account)
    }
}
