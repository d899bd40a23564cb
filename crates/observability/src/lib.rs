//! Tracing setup shared by the storefront binaries.

/// Tracing configuration (filters, layers) and per-request spans.
pub mod tracing;

pub use self::tracing::{init, init_with, request_span};
