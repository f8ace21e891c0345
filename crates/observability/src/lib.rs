//! Shared observability setup for marketplace services.

/// Tracing configuration (filters, layers).
pub mod tracing;

/// Initialize process-wide observability.
///
/// Idempotent: only the first call installs the subscriber.
pub fn init() {
    tracing::init();
}
