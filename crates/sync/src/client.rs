//! HTTP client for the remote product catalog.
//!
//! One method per remote endpoint, each issuing exactly one request with a
//! bounded timeout. Nothing is cached and nothing is retried here.

use std::time::Duration;

use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use storefront_core::ProductId;
use storefront_products::{Category, ProductPayload, RemoteProduct, embedded_error_status};

use crate::config::CatalogConfig;
use crate::types::{RemoteBody, TransportKind};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("transport error ({kind}): {detail}")]
    Transport { kind: TransportKind, detail: String },

    #[error("catalog rejected the request (status {status})")]
    Remote { status: u16, body: RemoteBody },

    #[error("not found")]
    NotFound,

    #[error("unexpected response body (status {status}): {detail}")]
    Parse { status: u16, detail: String, body: String },

    #[error("failed to build HTTP client: {0}")]
    Build(String),
}

impl CatalogError {
    fn transport(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            TransportKind::Timeout
        } else if err.is_connect() {
            TransportKind::Connection
        } else {
            TransportKind::Other
        };
        CatalogError::Transport {
            kind,
            detail: err.to_string(),
        }
    }
}

/// Client for the remote catalog endpoints.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: Client,
    api_url: String,
    read_timeout: Duration,
    write_timeout: Duration,
}

impl CatalogClient {
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let http = Client::builder()
            .build()
            .map_err(|e| CatalogError::Build(e.to_string()))?;

        Ok(Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            read_timeout: config.read_timeout,
            write_timeout: config.write_timeout,
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Raw product listing; shape normalization is left to the caller.
    pub async fn list(&self) -> Result<Value, CatalogError> {
        let (status, text) = self.send(Method::GET, "/products", None).await?;
        let text = ensure_success(status, text)?;
        reject_embedded_error(parse(status, text)?)
    }

    pub async fn get(&self, id: ProductId) -> Result<RemoteProduct, CatalogError> {
        let (status, text) = self.send(Method::GET, &format!("/products/{id}"), None).await?;
        product_from_response(status, text)
    }

    pub async fn create(&self, payload: &ProductPayload) -> Result<RemoteProduct, CatalogError> {
        let (status, text) = self.send(Method::POST, "/products/", Some(payload)).await?;
        ensure_success(status, text).and_then(|text| parse(status, text))
    }

    pub async fn update(&self, id: ProductId, payload: &ProductPayload) -> Result<RemoteProduct, CatalogError> {
        let (status, text) = self
            .send(Method::PUT, &format!("/products/{id}"), Some(payload))
            .await?;
        product_from_response(status, text)
    }

    pub async fn delete(&self, id: ProductId) -> Result<(), CatalogError> {
        let (status, text) = self.send(Method::DELETE, &format!("/products/{id}"), None).await?;
        if status == StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound);
        }
        let text = ensure_success(status, text)?;
        match serde_json::from_str::<Value>(&text) {
            Ok(body) => reject_embedded_error(body).map(|_| ()),
            // the body is usually a bare `true`; anything else is accepted too
            Err(_) => Ok(()),
        }
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>, CatalogError> {
        let (status, text) = self.send(Method::GET, "/categories", None).await?;
        ensure_success(status, text).and_then(|text| parse(status, text))
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        payload: Option<&ProductPayload>,
    ) -> Result<(StatusCode, String), CatalogError> {
        let url = format!("{}{}", self.api_url, path);
        let timeout = if method == Method::GET {
            self.read_timeout
        } else {
            self.write_timeout
        };

        let mut req = self.http.request(method.clone(), &url).timeout(timeout);
        if let Some(payload) = payload {
            req = req.json(payload);
        }

        let resp = req.send().await.map_err(|e| {
            tracing::debug!(%method, %url, error = %e, "catalog request failed");
            CatalogError::transport(e)
        })?;
        let status = resp.status();
        tracing::debug!(%method, %url, status = status.as_u16(), "catalog response");

        let text = resp.text().await.map_err(CatalogError::transport)?;
        Ok((status, text))
    }
}

fn ensure_success(status: StatusCode, text: String) -> Result<String, CatalogError> {
    if status.is_success() {
        Ok(text)
    } else {
        Err(CatalogError::Remote {
            status: status.as_u16(),
            body: RemoteBody::from_text(text),
        })
    }
}

fn parse<T: DeserializeOwned>(status: StatusCode, text: String) -> Result<T, CatalogError> {
    serde_json::from_str(&text).map_err(|e| CatalogError::Parse {
        status: status.as_u16(),
        detail: e.to_string(),
        body: text,
    })
}

/// An error document delivered with a success status is still an error.
fn reject_embedded_error(body: Value) -> Result<Value, CatalogError> {
    match embedded_error_status(&body) {
        None => Ok(body),
        Some(404) => Err(CatalogError::NotFound),
        Some(status) => Err(CatalogError::Remote {
            status,
            body: RemoteBody::Json(body),
        }),
    }
}

/// A single-product answer: a real 404 and an embedded 404 are the same thing.
fn product_from_response(status: StatusCode, text: String) -> Result<RemoteProduct, CatalogError> {
    if status == StatusCode::NOT_FOUND {
        return Err(CatalogError::NotFound);
    }
    let text = ensure_success(status, text)?;
    let body = reject_embedded_error(parse(status, text.clone())?)?;
    serde_json::from_value(body).map_err(|e| CatalogError::Parse {
        status: status.as_u16(),
        detail: e.to_string(),
        body: text,
    })
}
