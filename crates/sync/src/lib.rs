//! `storefront-sync`
//!
//! **Responsibility:** the I/O side of the storefront catalog.
//!
//! This crate provides:
//! - an HTTP client for the remote product catalog
//! - category resolution with a time-bounded cache
//! - the `CatalogSync` orchestrator used by the product views
//!
//! The remote catalog stays the authority; nothing is stored locally.

pub mod categories;
pub mod client;
pub mod config;
pub mod sync_manager;
pub mod types;

pub use categories::CategoryResolver;
pub use client::{CatalogClient, CatalogError};
pub use config::{CatalogConfig, ConfigError};
pub use sync_manager::CatalogSync;
pub use types::{RemoteBody, Submitted, SyncResult, SyncStage, TransportKind};
