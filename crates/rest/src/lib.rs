//! # strata-rest - Object Persistence API
//!
//! This crate implements the object persistence API of the Strata backend:
//! single and batch create, read, update and delete of dynamically typed
//! objects, scoped to the app (tenant) that issued the request.
//!
//! ## Features
//!
//! - **Single-object CRUD** with validation and locked-field protection
//! - **Batch operations** with per-item failure isolation
//! - **Type discovery**: custom types are recorded on the app when first stored
//! - **Shard keys**: objects of apps sharing a partition are stamped with one
//!
//! ## Operations
//!
//! | Operation | Handler | Success |
//! |-----------|---------|---------|
//! | create | [`handlers::create_object`] | 201 |
//! | read | [`handlers::read_object`] | 200 |
//! | update | [`handlers::update_object`] | 200 |
//! | delete | [`handlers::delete_object`] | 200 |
//! | batch read | [`handlers::batch_read`] | 200 |
//! | batch create | [`handlers::batch_create`] | 200 |
//! | batch update | [`handlers::batch_update`] | 200 |
//! | batch delete | [`handlers::batch_delete`] | 200 |
//!
//! Handlers are transport-agnostic: they take the request body as any
//! [`AsyncRead`](tokio::io::AsyncRead) and return an
//! [`ApiResponse`](responses::ApiResponse) or a [`RestError`], both of
//! which implement axum's `IntoResponse`.
//!
//! ## Error Handling
//!
//! All errors are returned as `{"code": <status>, "message": <text>}`:
//!
//! | HTTP Status | Cause |
//! |-------------|-------|
//! | 400 | Missing, oversized or malformed body; validation failure; missing ids; batch limit |
//! | 404 | Object or its app linkage not found |
//! | 500 | Body read failure or storage backend failure |
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use strata_persistence::backends::memory::InMemoryBackend;
//! use strata_persistence::tenant::{App, AppId};
//! use strata_rest::{AppState, RestConfig, handlers};
//!
//! # tokio_test::block_on(async {
//! let state = AppState::new(Arc::new(InMemoryBackend::new()), RestConfig::default());
//! let app = App::new("acme", &AppId::new("root"));
//!
//! let body = br#"{"name": "Rex", "breed": "collie"}"#;
//! let response = handlers::create_object(&state, &app, Some("dog"), &body[..])
//!     .await
//!     .unwrap();
//! assert_eq!(response.status(), http::StatusCode::CREATED);
//! assert!(response.location().unwrap().starts_with("/dogs/"));
//! # });
//! ```
//!
//! ## Architecture
//!
//! - [`error`] - Error types and the structured failure body
//! - [`config`] - Configuration
//! - [`state`] - Application state (storage, registry, projector, executor)
//! - [`entity`] - Request body decoding
//! - [`executor`] - Background task execution
//! - [`tenant`] - Resolution of the request's app
//! - [`handlers`] - The operations
//! - [`responses`] - Response types

// Enforce documentation
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod entity;
pub mod error;
pub mod executor;
pub mod handlers;
pub mod responses;
pub mod state;
pub mod tenant;

// Re-export commonly used types
pub use config::RestConfig;
pub use error::{RestError, RestResult};
pub use executor::{TaskExecutor, TokioExecutor};
pub use state::AppState;
pub use tenant::{Principal, StorageTenantResolver, TenantResolver};

/// Initializes the tracing subscriber for logging.
///
/// This should be called once at application startup. `RUST_LOG` takes
/// precedence over `level` when set.
///
/// # Arguments
///
/// * `level` - The log level (error, warn, info, debug, trace)
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "strata_rest={level},strata_persistence={level}"
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
