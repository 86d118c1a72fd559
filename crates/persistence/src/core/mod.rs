//! Core storage traits and abstractions.
//!
//! - [`ObjectStorage`] - CRUD and batch operations over app partitions
//!
//! # Example: Implementing a Storage Backend
//!
//! Only the four single-object operations are required; the batch
//! operations default to looping over them. Backends with native batch
//! primitives override them.
//!
//! ```ignore
//! use async_trait::async_trait;
//! use strata_persistence::core::ObjectStorage;
//!
//! struct MyBackend { /* ... */ }
//!
//! #[async_trait]
//! impl ObjectStorage for MyBackend {
//!     fn backend_name(&self) -> &'static str { "my-backend" }
//!     // create, read, update, delete ...
//! }
//! ```

mod storage;

pub use storage::ObjectStorage;
