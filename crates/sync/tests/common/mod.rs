//! Shared fixtures for the black-box catalog tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{Value, json};
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use storefront_products::RawProductForm;
use storefront_sync::CatalogConfig;

/// Config pointing at the mock server, with short timeouts.
pub fn config_for(server: &MockServer) -> CatalogConfig {
    let mut config = CatalogConfig::default().with_api_url(format!("{}/api/v1", server.uri()));
    config.read_timeout = Duration::from_millis(500);
    config.write_timeout = Duration::from_millis(500);
    config
}

pub fn product_json(id: i64, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "slug": title.to_lowercase().replace(' ', "-"),
        "price": 42,
        "description": "A product served by the mock catalog.",
        "category": {"id": 2, "name": "Electronics", "slug": "electronics"},
        "images": ["https://i.imgur.com/QkIa5tT.jpeg"],
        "creationAt": "2025-03-01T12:00:00.000Z",
        "updatedAt": "2025-03-01T12:00:00.000Z"
    })
}

pub fn categories_json() -> Value {
    json!([
        {"id": 1, "name": "Clothes", "slug": "clothes"},
        {"id": 2, "name": "Electronics", "slug": "electronics"},
        {"id": 3, "name": "Furniture", "slug": "furniture"}
    ])
}

pub fn valid_form() -> RawProductForm {
    RawProductForm {
        title: "Wireless mouse".to_string(),
        price: "19.99".to_string(),
        description: "Ergonomic mouse with silent clicks.".to_string(),
        category: "Electronics".to_string(),
        image: "https://i.imgur.com/mouse.png".to_string(),
    }
}

pub async fn mount_categories(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v1/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(categories_json()))
        .mount(server)
        .await;
}

/// Requests the server saw whose path starts with `prefix`.
pub async fn requests_to(server: &MockServer, prefix: &str) -> Vec<Request> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.url.path().starts_with(prefix))
        .collect()
}

type Store = Arc<Mutex<BTreeMap<i64, Value>>>;

/// Stateful in-memory catalog: POST stores, GET/PUT/DELETE read it back.
#[derive(Clone, Default)]
pub struct FakeCatalog {
    store: Store,
}

impl FakeCatalog {
    pub async fn mount(&self, server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/api/v1/products/"))
            .respond_with(Create(self.store.clone()))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path_regex(r"^/api/v1/products/\d+$"))
            .respond_with(Fetch(self.store.clone()))
            .mount(server)
            .await;
        Mock::given(method("PUT"))
            .and(path_regex(r"^/api/v1/products/\d+$"))
            .respond_with(Replace(self.store.clone()))
            .mount(server)
            .await;
        Mock::given(method("DELETE"))
            .and(path_regex(r"^/api/v1/products/\d+$"))
            .respond_with(Remove(self.store.clone()))
            .mount(server)
            .await;
    }

    pub fn len(&self) -> usize {
        self.store.lock().unwrap().len()
    }
}

fn id_from_path(request: &Request) -> i64 {
    request
        .url
        .path()
        .rsplit('/')
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or_default()
}

fn entity_not_found(request: &Request) -> ResponseTemplate {
    // the real service answers a missing product with a success status
    ResponseTemplate::new(200).set_body_json(json!({
        "path": request.url.path(),
        "timestamp": "2025-03-01T12:00:00.000Z",
        "name": "EntityNotFoundError",
        "message": "Could not find any entity of type \"Product\"",
        "statusCode": 404
    }))
}

fn stored_product(id: i64, body: &Value) -> Value {
    json!({
        "id": id,
        "title": body["title"],
        "price": body["price"],
        "description": body["description"],
        "category": {"id": body["categoryId"], "name": "Electronics"},
        "images": body["images"],
        "creationAt": "2025-03-01T12:00:00.000Z",
        "updatedAt": "2025-03-01T12:00:00.000Z"
    })
}

struct Create(Store);

impl Respond for Create {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let Ok(body) = serde_json::from_slice::<Value>(&request.body) else {
            return ResponseTemplate::new(400).set_body_json(json!({
                "message": ["body must be JSON"],
                "error": "Bad Request",
                "statusCode": 400
            }));
        };
        let mut store = self.0.lock().unwrap();
        let id = store.keys().next_back().copied().unwrap_or(100) + 1;
        let product = stored_product(id, &body);
        store.insert(id, product.clone());
        ResponseTemplate::new(201).set_body_json(product)
    }
}

struct Fetch(Store);

impl Respond for Fetch {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        match self.0.lock().unwrap().get(&id_from_path(request)) {
            Some(product) => ResponseTemplate::new(200).set_body_json(product.clone()),
            None => entity_not_found(request),
        }
    }
}

struct Replace(Store);

impl Respond for Replace {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let id = id_from_path(request);
        let mut store = self.0.lock().unwrap();
        if !store.contains_key(&id) {
            return entity_not_found(request);
        }
        let body: Value = serde_json::from_slice(&request.body).unwrap_or_default();
        let product = stored_product(id, &body);
        store.insert(id, product.clone());
        ResponseTemplate::new(200).set_body_json(product)
    }
}

struct Remove(Store);

impl Respond for Remove {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        match self.0.lock().unwrap().remove(&id_from_path(request)) {
            Some(_) => ResponseTemplate::new(200).set_body_json(json!(true)),
            None => ResponseTemplate::new(404).set_body_json(json!({
                "message": "Product not found",
                "statusCode": 404
            })),
        }
    }
}
