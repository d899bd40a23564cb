//! `catalog-sync`: smoke entry point for the catalog layer.
//!
//! Lists the remote products and categories and prints a short summary.

use anyhow::Context;

use storefront_sync::{CatalogConfig, CatalogSync, SyncResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    storefront_observability::init();

    let config = CatalogConfig::from_env().context("invalid catalog configuration")?;
    tracing::info!(api_url = %config.api_url, "Starting catalog sync");

    let sync = CatalogSync::new(&config).context("failed to build catalog client")?;

    let categories = sync.resolve_categories().await.success().unwrap_or_default();
    if categories.is_empty() {
        println!("categories: unavailable");
    } else {
        println!("categories: {}", categories.len());
        for (id, name) in categories.choices() {
            println!("  {id:>4}  {name}");
        }
    }

    match sync.list().await {
        SyncResult::Success(products) => {
            println!("products: {}", products.len());
            for product in products.iter().take(10) {
                let price = product.price().map(|p| p.to_string()).unwrap_or_else(|| "-".to_string());
                println!("  {:>4}  {:>10}  {}", product.id, price, product.title);
            }
            Ok(())
        }
        failure => {
            let message = failure
                .user_message()
                .unwrap_or_else(|| "unknown failure".to_string());
            anyhow::bail!("listing failed ({}): {message}", failure.outcome())
        }
    }
}
