//! Error types for the persistence layer.
//!
//! This module defines all error types used throughout the persistence layer,
//! following a hierarchy that separates resource state errors, tenant errors,
//! validation errors and backend errors.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

/// The primary error type for all storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Object state errors
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// Tenant linkage errors
    #[error(transparent)]
    Tenant(#[from] TenantError),

    /// Validation and materialization errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Backend-specific errors
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Errors related to object state.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// The requested object was not found.
    #[error("object not found: {app}/{id}")]
    NotFound { app: String, id: String },

    /// An object with the given ID already exists.
    #[error("object already exists: {app}/{id}")]
    AlreadyExists { app: String, id: String },
}

/// Errors related to tenant linkage.
#[derive(Error, Debug)]
pub enum TenantError {
    /// The object carries no app linkage.
    #[error("object {id} is not linked to an app")]
    MissingTenant { id: String },

    /// The app identifier is empty or malformed.
    #[error("invalid app: {app}")]
    InvalidTenant { app: String },
}

/// Errors raised while materializing or validating objects.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// The field map has no type discriminator.
    #[error("missing type discriminator '{field}'")]
    MissingType { field: String },

    /// The type discriminator is not a usable type name.
    #[error("unrecognized type: {object_type}")]
    UnknownType { object_type: String },

    /// A field value does not fit the declared shape of the type.
    #[error("invalid value for '{field}': {message}")]
    InvalidField { field: String, message: String },

    /// The object failed one or more constraints.
    #[error("invalid object: {}", messages.join(". "))]
    InvalidObject { messages: Vec<String> },
}

/// Errors originating from the storage backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The backend is currently unavailable.
    #[error("backend unavailable: {backend_name}")]
    Unavailable {
        backend_name: String,
        message: String,
    },

    /// Internal backend error.
    #[error("internal error in {backend_name}: {message}")]
    Internal {
        backend_name: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Serialization/deserialization error.
    #[error("serialization error: {message}")]
    SerializationError { message: String },
}

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Backend(BackendError::SerializationError {
            message: err.to_string(),
        })
    }
}

impl From<std::io::Error> for BackendError {
    fn from(err: std::io::Error) -> Self {
        BackendError::Internal {
            backend_name: "unknown".to_string(),
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}
