//! Tracing/logging initialization.

use ::tracing::Span;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info";

/// Initialize tracing/logging for the process.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    init_with(DEFAULT_FILTER);
}

/// Like [`init`], with a custom fallback filter (e.g. `"storefront_sync=debug"`).
pub fn init_with(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // JSON logs + timestamps, configurable via RUST_LOG.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}

/// Span wrapping one catalog operation, tagged with a fresh time-ordered id.
pub fn request_span(operation: &'static str) -> Span {
    let request_id = Uuid::now_v7();
    ::tracing::info_span!("catalog_request", operation, request_id = %request_id)
}
