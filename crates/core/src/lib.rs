//! `storefront-core` — building blocks shared by the catalog and account layers.
//!
//! Nothing in here performs IO.

pub mod error;
pub mod field_map;
pub mod id;

pub use error::{FieldErrors, FieldWarning, InvalidId, NON_FIELD_ERRORS, ValidationResult};
pub use field_map::FieldMap;
pub use id::{CategoryId, ProductId};
