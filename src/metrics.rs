//! Prometheus metrics collection for board-api.
//!
//! - `board_registrations_total{outcome}` - Registration attempts by outcome
//! - `board_registration_duration_seconds` - Registration latency histogram
//!
//! Recording before [`init`] is a no-op.

use prometheus::{Encoder, Histogram, HistogramOpts, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::OnceLock;

/// Global Prometheus registry for all metrics.
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::new)
}

/// Registration attempts by outcome (`success` or an error code).
pub static REGISTRATIONS: OnceLock<IntCounterVec> = OnceLock::new();

/// Registration latency, validation through insert.
pub static REGISTRATION_LATENCY: OnceLock<Histogram> = OnceLock::new();

/// Initialize the Prometheus metrics registry.
///
/// Called once at startup. Later calls are no-ops.
pub fn init() {
    let r = registry();

    macro_rules! register {
        ($metric:ident, $init:expr) => {
            match $init {
                // Only the instance that wins the OnceLock gets registered
                Ok(m) => {
                    if $metric.set(m.clone()).is_ok()
                        && let Err(e) = r.register(Box::new(m))
                    {
                        tracing::warn!(error = %e, concat!("Failed to register metric ", stringify!($metric)));
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, concat!("Failed to create metric ", stringify!($metric)));
                }
            }
        };
    }

    register!(REGISTRATIONS, IntCounterVec::new(Opts::new("board_registrations_total", "Registration attempts by outcome"), &["outcome"]));
    register!(REGISTRATION_LATENCY, Histogram::with_opts(
        HistogramOpts::new("board_registration_duration_seconds", "Registration latency")
            .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0])));
}

/// Gather all metrics and encode them in Prometheus text format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = registry().gather();
    let mut buffer = vec![];
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode Prometheus metrics");
        return String::new();
    }
    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Prometheus metrics were not valid UTF-8");
            String::new()
        }
    }
}

// ============================================================================
// Helper functions
// ============================================================================

/// Count one registration attempt.
pub fn record_registration(outcome: &str) {
    if let Some(counter) = REGISTRATIONS.get() {
        counter.with_label_values(&[outcome]).inc();
    }
}

/// Record registration latency in seconds.
pub fn record_registration_latency(seconds: f64) {
    if let Some(histogram) = REGISTRATION_LATENCY.get() {
        histogram.observe(seconds);
    }
}
