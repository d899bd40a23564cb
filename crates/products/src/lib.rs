//! Products catalog domain.
//!
//! Validation rules for product forms, the category name/id mapping, and the
//! shapes exchanged with the remote catalog service. Pure logic only: no HTTP,
//! no storage.

pub mod category;
pub mod form;
pub mod price;
pub mod remote;

pub use category::{Category, CategoryFallback, CategoryMap, DEFAULT_CATEGORY_ID, Resolution};
pub use form::{ProductInput, RawProductForm, ValidatedProduct, parse_product_id, validate};
pub use price::{Price, PriceError};
pub use remote::{
    Listing, PRODUCT_FIELD_MAP, ProductPayload, RemoteProduct, embedded_error_status,
    normalize_listing,
};
