//! Shapes exchanged with the remote catalog service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use storefront_core::{CategoryId, FieldMap, ProductId};

use crate::category::Category;
use crate::form::ProductInput;
use crate::price::Price;

/// Remote product field -> product form field.
pub const PRODUCT_FIELD_MAP: FieldMap = FieldMap::new(&[
    ("title", "title"),
    ("price", "price"),
    ("description", "description"),
    ("categoryId", "category"),
    ("category", "category"),
    ("images", "image"),
    ("image", "image"),
]);

/// A product as returned by the remote catalog. The service either embeds the
/// category object or only reports its id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteProduct {
    pub id: ProductId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl RemoteProduct {
    pub fn category_id(&self) -> Option<CategoryId> {
        self.category_id.or_else(|| self.category.as_ref().map(|c| c.id))
    }

    pub fn price(&self) -> Option<Price> {
        Price::from_remote(self.price)
    }

    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// Body sent on create and update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    pub title: String,
    pub price: f64,
    pub description: String,
    pub category_id: CategoryId,
    pub images: Vec<String>,
}

impl ProductPayload {
    /// The form carries a single image URL; the service expects a list.
    pub fn from_input(input: &ProductInput, category_id: CategoryId) -> Self {
        Self {
            title: input.title.clone(),
            price: input.price.as_f64(),
            description: input.description.clone(),
            category_id,
            images: vec![input.image_url.to_string()],
        }
    }
}

/// Products recovered from a listing response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Listing {
    pub products: Vec<RemoteProduct>,
    /// Entries dropped for lacking a valid id or not reading as a product.
    pub dropped: usize,
}

/// Normalize a listing body: a lone object becomes a one-element list, and
/// entries without a positive integer `id` are discarded.
pub fn normalize_listing(body: Value) -> Listing {
    let entries = match body {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => vec![other],
    };

    let mut listing = Listing::default();
    for entry in entries {
        if !has_valid_id(&entry) {
            listing.dropped += 1;
            continue;
        }
        match serde_json::from_value::<RemoteProduct>(entry) {
            Ok(product) => listing.products.push(product),
            Err(_) => listing.dropped += 1,
        }
    }
    listing
}

fn has_valid_id(entry: &Value) -> bool {
    entry
        .get("id")
        .and_then(Value::as_i64)
        .is_some_and(|id| id > 0)
}

/// The service sometimes answers with a success status and an error document
/// carrying its real status (`{"statusCode": 404, "message": ...}`). Returns
/// that status when it is an error one.
pub fn embedded_error_status(body: &Value) -> Option<u16> {
    body.as_object()?
        .get("statusCode")
        .and_then(Value::as_u64)
        .and_then(|status| u16::try_from(status).ok())
        .filter(|status| *status >= 400)
}
