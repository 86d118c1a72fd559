//! Strata Persistence Layer
//!
//! This crate provides the object model and storage layer of a multi-tenant
//! backend-as-a-service. Objects are heterogeneous and dynamically typed: a
//! closed set of built-in shapes plus an open fallback for custom types that
//! apps declare simply by storing them.
//!
//! # Features
//!
//! - **Tagged object model**: a common envelope plus a built-in or custom body
//! - **Type registry**: core types computed once, custom types recorded per app
//! - **Validation**: declarative field constraints with human-readable messages
//! - **Projection**: field maps to objects and back, honoring locked fields
//! - **Multitenancy**: every storage call is scoped to an app partition
//!
//! Available backend features:
//! - `memory` (default) - In-process storage
//!
//! # Architecture
//!
//! - [`types`] - Envelope, built-in shapes, descriptors and [`DomainObject`]
//! - [`tenant`] - App identifiers and the app record
//! - [`validation`] - Constraint checks against materialized objects
//! - [`projection`] - Field map conversion and the locked-field policy
//! - [`registry`] - Core and per-app type names
//! - [`core`] - The [`ObjectStorage`] trait
//! - [`backends`] - Backend implementations
//! - [`error`] - Error types for all operations
//!
//! # Quick Start
//!
//! ```
//! use serde_json::json;
//! use strata_persistence::projection::Projector;
//! use strata_persistence::tenant::{App, AppId};
//! use strata_persistence::validation::validate;
//!
//! let app = App::new("acme", &AppId::new("root")).with_shared(true);
//! let projector = Projector::default();
//!
//! let fields = json!({"type": "tag", "tag": "rust", "shardkey": "forged"});
//! let mut tag = projector.materialize(fields.as_object().cloned().unwrap()).unwrap();
//! app.assign(&mut tag);
//!
//! assert!(validate(&tag).is_empty());
//! assert_eq!(tag.appid(), Some("acme"));
//! assert_eq!(tag.shard_key(), Some("acme"));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod backends;
pub mod core;
pub mod error;
pub mod projection;
pub mod registry;
pub mod tenant;
pub mod types;
pub mod validation;

// Re-export commonly used types at crate root
pub use error::{StorageError, StorageResult};
pub use projection::{FieldFilter, Projector};
pub use registry::TypeRegistry;
pub use tenant::{App, AppId};
pub use types::{DomainObject, FieldMap, ObjectBody};

// Re-export core traits
pub use core::ObjectStorage;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
