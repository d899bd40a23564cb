//! Catalog operations as seen by the product views.
//!
//! `CatalogSync` runs every operation through the same stages:
//! - validate the submitted form (no network when it fails)
//! - resolve the category reference to a remote id
//! - call the remote catalog
//! - fold the outcome into a [`SyncResult`]
//!
//! Client errors never escape; they are mapped here.

use std::borrow::Cow;

use tracing::Instrument;

use storefront_core::{FieldErrors, ProductId};
use storefront_observability::request_span;
use storefront_products::form::fields;
use storefront_products::{
    CategoryFallback, CategoryMap, PRODUCT_FIELD_MAP, ProductPayload, RawProductForm, RemoteProduct, Resolution,
    ValidatedProduct, normalize_listing, parse_product_id, validate,
};

use crate::categories::CategoryResolver;
use crate::client::{CatalogClient, CatalogError};
use crate::config::CatalogConfig;
use crate::types::{RemoteBody, Submitted, SyncResult, SyncStage, TransportKind};

/// Orchestrates validation, category resolution and remote calls.
#[derive(Debug, Clone)]
pub struct CatalogSync {
    client: CatalogClient,
    categories: CategoryResolver,
    fallback: CategoryFallback,
}

impl CatalogSync {
    /// Build the client, resolver and policy from configuration.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let client = CatalogClient::new(config)?;
        let categories = CategoryResolver::new(client.clone(), config.category_ttl);
        Ok(Self::from_parts(client, categories, config.category_fallback))
    }

    pub fn from_parts(client: CatalogClient, categories: CategoryResolver, fallback: CategoryFallback) -> Self {
        Self {
            client,
            categories,
            fallback,
        }
    }

    pub fn client(&self) -> &CatalogClient {
        &self.client
    }

    pub fn category_resolver(&self) -> &CategoryResolver {
        &self.categories
    }

    /// All products, with malformed entries dropped.
    pub async fn list(&self) -> SyncResult<Vec<RemoteProduct>> {
        async {
            tracing::info!("Listing products");
            stage(SyncStage::CallingRemote);

            let result = match self.client.list().await {
                Ok(body) => {
                    let listing = normalize_listing(body);
                    if listing.dropped > 0 {
                        tracing::warn!(dropped = listing.dropped, "Dropped malformed listing entries");
                    }
                    SyncResult::Success(listing.products)
                }
                Err(e) => failure(e, None),
            };
            finish(result)
        }
        .instrument(request_span("list"))
        .await
    }

    pub async fn get(&self, id: ProductId) -> SyncResult<RemoteProduct> {
        async {
            tracing::info!(product_id = %id, "Fetching product");
            finish(self.fetch(id).await)
        }
        .instrument(request_span("get"))
        .await
    }

    /// Look up a product from the raw id typed into the search form.
    pub async fn search(&self, raw_id: &str) -> SyncResult<RemoteProduct> {
        async {
            tracing::info!(raw_id, "Searching product");
            stage(SyncStage::Validating);
            let result = match parse_product_id(raw_id) {
                Ok(id) => self.fetch(id).await,
                Err(errors) => SyncResult::ValidationError(errors),
            };
            finish(result)
        }
        .instrument(request_span("search"))
        .await
    }

    /// Validate and create a product, resolving categories through the
    /// resolver.
    pub async fn create(&self, form: &RawProductForm) -> SyncResult<Submitted> {
        self.submit("create", None, form, None).await
    }

    /// Like [`create`](Self::create), against a category map the caller
    /// already holds (e.g. the one used to render the form).
    pub async fn create_with(&self, form: &RawProductForm, categories: &CategoryMap) -> SyncResult<Submitted> {
        self.submit("create", None, form, Some(categories)).await
    }

    pub async fn update(&self, id: ProductId, form: &RawProductForm) -> SyncResult<Submitted> {
        self.submit("update", Some(id), form, None).await
    }

    pub async fn update_with(
        &self,
        id: ProductId,
        form: &RawProductForm,
        categories: &CategoryMap,
    ) -> SyncResult<Submitted> {
        self.submit("update", Some(id), form, Some(categories)).await
    }

    pub async fn delete(&self, id: ProductId) -> SyncResult<()> {
        async {
            tracing::info!(product_id = %id, "Deleting product");
            stage(SyncStage::CallingRemote);
            let result = match self.client.delete(id).await {
                Ok(()) => SyncResult::Success(()),
                Err(e) => failure(e, Some(id)),
            };
            finish(result)
        }
        .instrument(request_span("delete"))
        .await
    }

    /// Current category choices; empty when the remote list is unavailable.
    pub async fn resolve_categories(&self) -> SyncResult<CategoryMap> {
        async {
            stage(SyncStage::ResolvingCategory);
            finish(SyncResult::Success(self.categories.resolve().await))
        }
        .instrument(request_span("resolve_categories"))
        .await
    }

    async fn fetch(&self, id: ProductId) -> SyncResult<RemoteProduct> {
        stage(SyncStage::CallingRemote);
        match self.client.get(id).await {
            Ok(product) => SyncResult::Success(product),
            Err(e) => failure(e, Some(id)),
        }
    }

    async fn submit(
        &self,
        operation: &'static str,
        target: Option<ProductId>,
        form: &RawProductForm,
        categories: Option<&CategoryMap>,
    ) -> SyncResult<Submitted> {
        async {
            match target {
                Some(id) => tracing::info!(product_id = %id, "Submitting product update"),
                None => tracing::info!("Submitting new product"),
            }
            finish(self.run_submission(target, form, categories).await)
        }
        .instrument(request_span(operation))
        .await
    }

    async fn run_submission(
        &self,
        target: Option<ProductId>,
        form: &RawProductForm,
        supplied: Option<&CategoryMap>,
    ) -> SyncResult<Submitted> {
        stage(SyncStage::Validating);
        let (validated, categories) = match supplied {
            Some(categories) => match validate(form, categories) {
                Ok(validated) => {
                    stage(SyncStage::ResolvingCategory);
                    (validated, Cow::Borrowed(categories))
                }
                Err(errors) => return SyncResult::ValidationError(errors),
            },
            None => {
                // checked before any I/O: against the fresh cache when held,
                // otherwise everything but the category choice
                let known = self.categories.cached().await.unwrap_or_default();
                if let Err(errors) = validate(form, &known) {
                    return SyncResult::ValidationError(errors);
                }
                stage(SyncStage::ResolvingCategory);
                let categories = self.categories.resolve().await;
                match validate(form, &categories) {
                    Ok(validated) => (validated, Cow::Owned(categories)),
                    Err(errors) => return SyncResult::ValidationError(errors),
                }
            }
        };

        let ValidatedProduct { input, warnings } = validated;
        let category_id = match self.fallback.resolve(&categories, &input.category_ref) {
            Resolution::Matched(id) => id,
            Resolution::FellBack(id) => {
                tracing::warn!(
                    category = %input.category_ref,
                    fallback_id = %id,
                    "Category not matched, using fallback id"
                );
                id
            }
            Resolution::Unresolved => {
                return SyncResult::ValidationError(FieldErrors::single(
                    fields::CATEGORY,
                    "Categories are unavailable right now; select a category by its id.",
                ));
            }
        };

        stage(SyncStage::CallingRemote);
        let payload = ProductPayload::from_input(&input, category_id);
        let response = match target {
            Some(id) => self.client.update(id, &payload).await,
            None => self.client.create(&payload).await,
        };

        match response {
            Ok(product) => {
                tracing::info!(product_id = %product.id, "Catalog accepted product");
                SyncResult::Success(Submitted { product, warnings })
            }
            Err(e) => failure(e, target),
        }
    }
}

fn stage(stage: SyncStage) {
    tracing::debug!(stage = stage.as_str(), "Stage transition");
}

fn finish<T>(result: SyncResult<T>) -> SyncResult<T> {
    stage(SyncStage::Done);
    tracing::info!(outcome = result.outcome(), "Catalog operation finished");
    result
}

/// Fold a client error into the caller-facing outcome.
fn failure<T>(err: CatalogError, id: Option<ProductId>) -> SyncResult<T> {
    match err {
        CatalogError::NotFound => match id {
            Some(id) => SyncResult::NotFound { id },
            None => SyncResult::RemoteError {
                status: 404,
                body: RemoteBody::Text(String::new()),
                field_errors: FieldErrors::form("The catalog service could not find the requested resource."),
            },
        },
        CatalogError::Transport { kind, detail } => {
            tracing::warn!(%kind, %detail, "Catalog unreachable");
            SyncResult::TransportError { kind, detail }
        }
        CatalogError::Remote { status, body } => {
            let field_errors = remote_field_errors(status, &body);
            tracing::warn!(status, fields = field_errors.len(), "Catalog rejected request");
            SyncResult::RemoteError {
                status,
                body,
                field_errors,
            }
        }
        CatalogError::Parse { status, detail, body } => {
            tracing::warn!(status, %detail, "Unreadable catalog response");
            SyncResult::RemoteError {
                status,
                body: RemoteBody::Text(body),
                field_errors: FieldErrors::form("The catalog service returned an unexpected response."),
            }
        }
        CatalogError::Build(detail) => SyncResult::TransportError {
            kind: TransportKind::Other,
            detail,
        },
    }
}

fn remote_field_errors(status: u16, body: &RemoteBody) -> FieldErrors {
    if status >= 500 {
        return FieldErrors::form("The catalog service is temporarily unavailable. Please try again.");
    }
    let mapped = body
        .as_json()
        .map(|json| PRODUCT_FIELD_MAP.map_body(json))
        .unwrap_or_default();
    if mapped.is_empty() {
        FieldErrors::form(format!("The catalog service rejected the request (status {status})."))
    } else {
        mapped
    }
}
