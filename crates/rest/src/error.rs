//! Error types for the object API.
//!
//! Every failure is rendered as the same structured body,
//! `{"code": <status>, "message": <text>}`, where the message joins all
//! individual error strings with `". "` and falls back to the status's
//! canonical reason phrase.
//!
//! # Error Mapping
//!
//! Storage errors from the persistence layer are mapped to HTTP statuses:
//!
//! | Storage Error | HTTP Status |
//! |--------------|-------------|
//! | NotFound | 404 |
//! | AlreadyExists | 400 |
//! | Tenant | 400 |
//! | Validation | 400 |
//! | Backend | 500 |

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use strata_persistence::error::{
    BackendError, ResourceError, StorageError, TenantError, ValidationError,
};
use thiserror::Error;
use tracing::error;

/// The primary error type for API operations.
#[derive(Debug, Error)]
pub enum RestError {
    /// Bad request: malformed input or failed validation (HTTP 400).
    #[error("Bad request: {}", .messages.join(". "))]
    BadRequest {
        /// Individual error messages.
        messages: Vec<String>,
    },

    /// Target object or its app linkage is missing (HTTP 404).
    #[error("Not found")]
    NotFound,

    /// Internal server error (HTTP 500).
    #[error("Internal error: {}", .message.as_deref().unwrap_or("unknown"))]
    InternalError {
        /// Message shown to the caller, if any.
        message: Option<String>,
    },
}

impl RestError {
    /// Creates a bad request error with a single message.
    pub fn bad_request(message: impl Into<String>) -> Self {
        RestError::BadRequest {
            messages: vec![message.into()],
        }
    }

    /// Returns the HTTP status code of this error.
    pub fn status(&self) -> StatusCode {
        match self {
            RestError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            RestError::NotFound => StatusCode::NOT_FOUND,
            RestError::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the structured body of this error.
    pub fn body(&self) -> ErrorBody {
        match self {
            RestError::BadRequest { messages } => status_response(self.status(), messages),
            RestError::NotFound => status_response::<&str>(self.status(), &[]),
            RestError::InternalError { message } => {
                status_response(self.status(), message.as_slice())
            }
        }
    }
}

/// Result type alias for API operations.
pub type RestResult<T> = Result<T, RestError>;

/// The structured failure body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Numeric HTTP status.
    pub code: u16,
    /// Human-readable description.
    pub message: String,
}

/// Builds the failure body for a status and a list of messages.
///
/// Messages are joined with `". "`. Without messages the canonical reason
/// phrase of the status is used.
///
/// # Examples
///
/// ```
/// use http::StatusCode;
/// use strata_rest::error::status_response;
///
/// let body = status_response(StatusCode::BAD_REQUEST, &["'tag' is required", "'count' must be at least 0"]);
/// assert_eq!(body.code, 400);
/// assert_eq!(body.message, "'tag' is required. 'count' must be at least 0");
///
/// let body = status_response::<&str>(StatusCode::NOT_FOUND, &[]);
/// assert_eq!(body.message, "Not Found");
/// ```
pub fn status_response<M: AsRef<str>>(status: StatusCode, messages: &[M]) -> ErrorBody {
    let message = if messages.is_empty() {
        status.canonical_reason().unwrap_or_default().to_string()
    } else {
        messages
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(". ")
    };
    ErrorBody {
        code: status.as_u16(),
        message,
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}

// Implement conversions from storage errors

impl From<StorageError> for RestError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Resource(e) => e.into(),
            StorageError::Tenant(e) => e.into(),
            StorageError::Validation(e) => e.into(),
            StorageError::Backend(e) => e.into(),
        }
    }
}

impl From<ResourceError> for RestError {
    fn from(err: ResourceError) -> Self {
        match err {
            ResourceError::NotFound { .. } => RestError::NotFound,
            ResourceError::AlreadyExists { id, .. } => {
                RestError::bad_request(format!("Object '{}' already exists.", id))
            }
        }
    }
}

impl From<TenantError> for RestError {
    fn from(err: TenantError) -> Self {
        match err {
            TenantError::MissingTenant { .. } => {
                RestError::bad_request("Object is not linked to an app.")
            }
            TenantError::InvalidTenant { .. } => RestError::bad_request("Invalid app."),
        }
    }
}

impl From<ValidationError> for RestError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::MissingType { field } => {
                RestError::bad_request(format!("'{}' is missing", field))
            }
            ValidationError::UnknownType { .. } => {
                RestError::bad_request("'type' has an invalid format")
            }
            ValidationError::InvalidField { field, .. } => {
                RestError::bad_request(format!("'{}' has an invalid format", field))
            }
            ValidationError::InvalidObject { messages } => RestError::BadRequest { messages },
        }
    }
}

impl From<BackendError> for RestError {
    fn from(err: BackendError) -> Self {
        error!(error = %err, "Storage backend failure");
        RestError::InternalError { message: None }
    }
}
