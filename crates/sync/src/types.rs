//! Outcome types returned to callers of the catalog layer.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use storefront_core::{FieldErrors, FieldWarning, ProductId};
use storefront_products::RemoteProduct;

/// Why an outbound call never produced a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    Timeout,
    Connection,
    Other,
}

impl TransportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportKind::Timeout => "timeout",
            TransportKind::Connection => "connection",
            TransportKind::Other => "other",
        }
    }
}

impl core::fmt::Display for TransportKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of a rejected call: parsed JSON when possible, raw text otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RemoteBody {
    Json(Value),
    Text(String),
}

impl RemoteBody {
    pub fn from_text(text: String) -> Self {
        match serde_json::from_str(&text) {
            Ok(value) => RemoteBody::Json(value),
            Err(_) => RemoteBody::Text(text),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            RemoteBody::Json(value) => Some(value),
            RemoteBody::Text(_) => None,
        }
    }
}

/// Stages every orchestrated operation moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStage {
    Validating,
    ResolvingCategory,
    CallingRemote,
    Done,
}

impl SyncStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncStage::Validating => "validating",
            SyncStage::ResolvingCategory => "resolving_category",
            SyncStage::CallingRemote => "calling_remote",
            SyncStage::Done => "done",
        }
    }
}

/// A product accepted by the remote catalog, with any advisory notes raised
/// while validating the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submitted {
    pub product: RemoteProduct,
    pub warnings: Vec<FieldWarning>,
}

/// Uniform outcome of a catalog operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncResult<T> {
    Success(T),

    /// Local validation failed; nothing was sent.
    ValidationError(FieldErrors),

    /// The product does not exist (404, or a success status carrying an
    /// embedded 404 document).
    NotFound { id: ProductId },

    /// The remote service answered but did not accept the request.
    RemoteError {
        status: u16,
        body: RemoteBody,
        field_errors: FieldErrors,
    },

    /// No usable response arrived.
    TransportError { kind: TransportKind, detail: String },
}

impl<T> SyncResult<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, SyncResult::Success(_))
    }

    pub fn success(self) -> Option<T> {
        match self {
            SyncResult::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> SyncResult<U> {
        match self {
            SyncResult::Success(value) => SyncResult::Success(f(value)),
            SyncResult::ValidationError(errors) => SyncResult::ValidationError(errors),
            SyncResult::NotFound { id } => SyncResult::NotFound { id },
            SyncResult::RemoteError {
                status,
                body,
                field_errors,
            } => SyncResult::RemoteError {
                status,
                body,
                field_errors,
            },
            SyncResult::TransportError { kind, detail } => SyncResult::TransportError { kind, detail },
        }
    }

    /// Short label for logs.
    pub fn outcome(&self) -> &'static str {
        match self {
            SyncResult::Success(_) => "success",
            SyncResult::ValidationError(_) => "validation_error",
            SyncResult::NotFound { .. } => "not_found",
            SyncResult::RemoteError { .. } => "remote_error",
            SyncResult::TransportError { .. } => "transport_error",
        }
    }

    /// Errors to attach to the submitted form, if any.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            SyncResult::ValidationError(errors) => Some(errors),
            SyncResult::RemoteError { field_errors, .. } => Some(field_errors),
            _ => None,
        }
    }

    /// Whether the same request may succeed later without changes.
    pub fn is_retryable(&self) -> bool {
        match self {
            SyncResult::TransportError { .. } => true,
            SyncResult::RemoteError { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// One message for the user, or `None` on success.
    pub fn user_message(&self) -> Option<String> {
        let message = match self {
            SyncResult::Success(_) => return None,
            SyncResult::ValidationError(_) => "Please correct the errors below.".to_string(),
            SyncResult::NotFound { id } => format!("Product with id {id} was not found."),
            SyncResult::RemoteError { status, .. } if *status >= 500 => {
                "The catalog service is having trouble. Please try again in a moment.".to_string()
            }
            SyncResult::RemoteError { field_errors, .. } => match field_errors.non_field_errors().first() {
                Some(detail) => format!("The catalog service rejected the request: {detail}"),
                None => "The catalog service rejected the request. Please correct the errors below.".to_string(),
            },
            SyncResult::TransportError {
                kind: TransportKind::Timeout,
                ..
            } => "The catalog service took too long to answer. Please try again.".to_string(),
            SyncResult::TransportError { .. } => {
                "Could not reach the catalog service. Please try again.".to_string()
            }
        };
        Some(message)
    }
}
