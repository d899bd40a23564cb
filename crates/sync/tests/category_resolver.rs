mod common;

use std::time::Duration;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use storefront_core::CategoryId;
use storefront_products::DEFAULT_CATEGORY_ID;
use storefront_sync::{CatalogClient, CategoryResolver};

use common::{categories_json, config_for, requests_to};

fn resolver(server: &MockServer, ttl: Duration) -> CategoryResolver {
    let client = CatalogClient::new(&config_for(server)).unwrap();
    CategoryResolver::new(client, ttl)
}

#[tokio::test]
async fn resolves_and_caches_categories() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(categories_json()))
        .expect(1)
        .mount(&server)
        .await;

    let resolver = resolver(&server, Duration::from_secs(300));
    let first = resolver.resolve().await;
    let second = resolver.resolve().await;

    assert_eq!(first, second);
    assert_eq!(first.id_for("Furniture"), CategoryId::new(3));
    assert_eq!(first.id_for("Toys"), DEFAULT_CATEGORY_ID);
    assert!(resolver.cached_at().await.is_some());
}

#[tokio::test]
async fn zero_ttl_refetches_every_time() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(categories_json()))
        .expect(2)
        .mount(&server)
        .await;

    let resolver = resolver(&server, Duration::ZERO);
    resolver.resolve().await;
    resolver.resolve().await;
    assert!(resolver.cached_at().await.is_none());
}

#[tokio::test]
async fn invalidate_forces_refetch() {
    let server = MockServer::start().await;
    common::mount_categories(&server).await;

    let resolver = resolver(&server, Duration::from_secs(300));
    resolver.resolve().await;
    resolver.invalidate().await;
    assert!(resolver.cached_at().await.is_none());
    resolver.resolve().await;

    assert_eq!(requests_to(&server, "/api/v1/categories").await.len(), 2);
}

#[tokio::test]
async fn failure_degrades_to_empty_and_is_not_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/categories"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    common::mount_categories(&server).await;

    let resolver = resolver(&server, Duration::from_secs(300));

    let degraded = resolver.resolve().await;
    assert!(degraded.is_empty());
    assert!(resolver.cached_at().await.is_none());

    let recovered = resolver.resolve().await;
    assert_eq!(recovered.len(), 3);
}

#[tokio::test]
async fn unreachable_service_degrades_to_empty() {
    let config = storefront_sync::CatalogConfig::default().with_api_url("http://127.0.0.1:1/api/v1");
    let resolver = CategoryResolver::new(CatalogClient::new(&config).unwrap(), Duration::from_secs(300));
    assert!(resolver.resolve().await.is_empty());
}
