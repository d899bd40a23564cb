//! Category resolution with a time-bounded in-memory cache.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use storefront_products::CategoryMap;

use crate::client::CatalogClient;

#[derive(Debug, Clone)]
struct CachedCategories {
    map: CategoryMap,
    fetched_at: DateTime<Utc>,
    // age is measured on the monotonic clock; `fetched_at` is for display only
    fetched: Instant,
}

impl CachedCategories {
    fn new(map: CategoryMap) -> Self {
        Self {
            map,
            fetched_at: Utc::now(),
            fetched: Instant::now(),
        }
    }

    fn is_fresh(&self, ttl: Duration) -> bool {
        self.fetched.elapsed() < ttl
    }
}

/// Fetches the remote category list and keeps it for `ttl`.
///
/// A failed fetch yields an empty map instead of an error; callers treat an
/// empty map as "categories unavailable". Empty results are never cached.
#[derive(Debug, Clone)]
pub struct CategoryResolver {
    client: CatalogClient,
    ttl: Duration,
    cache: Arc<RwLock<Option<CachedCategories>>>,
}

impl CategoryResolver {
    pub fn new(client: CatalogClient, ttl: Duration) -> Self {
        Self {
            client,
            ttl,
            cache: Arc::new(RwLock::new(None)),
        }
    }

    /// Current category map, fetched if the cached copy is missing or stale.
    pub async fn resolve(&self) -> CategoryMap {
        if let Some(map) = self.cached().await {
            tracing::debug!(categories = map.len(), "category cache hit");
            return map;
        }

        let map = match self.client.list_categories().await {
            Ok(categories) => CategoryMap::new(categories),
            Err(e) => {
                tracing::warn!(error = %e, "category fetch failed, continuing without categories");
                return CategoryMap::empty();
            }
        };

        if map.is_empty() {
            tracing::warn!("remote catalog returned no categories");
        } else if !self.ttl.is_zero() {
            *self.cache.write().await = Some(CachedCategories::new(map.clone()));
        }
        map
    }

    /// Drop the cached map; the next `resolve` refetches.
    pub async fn invalidate(&self) {
        *self.cache.write().await = None;
    }

    /// When the cached map was fetched, if one is held.
    pub async fn cached_at(&self) -> Option<DateTime<Utc>> {
        self.cache.read().await.as_ref().map(|c| c.fetched_at)
    }

    /// The cached map while it is still fresh. Never touches the network.
    pub async fn cached(&self) -> Option<CategoryMap> {
        if self.ttl.is_zero() {
            return None;
        }
        let guard = self.cache.read().await;
        let cached = guard.as_ref()?;
        cached.is_fresh(self.ttl).then(|| cached.map.clone())
    }
}
