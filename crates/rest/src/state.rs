//! Application state for the object API.
//!
//! This module defines the shared state available to all operation
//! handlers: the storage backend, the type registry, the projector, the
//! background executor and the configuration.

use std::sync::Arc;

use strata_persistence::core::ObjectStorage;
use strata_persistence::projection::Projector;
use strata_persistence::registry::TypeRegistry;

use crate::config::RestConfig;
use crate::executor::{TaskExecutor, TokioExecutor};

/// Shared application state for the object API.
///
/// # Type Parameters
///
/// * `S` - The storage backend type (must implement [`ObjectStorage`])
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use strata_persistence::backends::memory::InMemoryBackend;
/// use strata_rest::{AppState, RestConfig};
///
/// let state = AppState::new(Arc::new(InMemoryBackend::new()), RestConfig::default());
/// assert!(state.registry().core_types().contains_key("users"));
/// ```
pub struct AppState<S: ?Sized> {
    /// The storage backend.
    storage: Arc<S>,

    /// Core and per-app type names.
    registry: Arc<TypeRegistry>,

    /// Field map conversion using the configured wire names.
    projector: Projector,

    /// Runs background registration.
    executor: Arc<dyn TaskExecutor>,

    /// Configuration.
    config: Arc<RestConfig>,
}

// Manually implement Clone since S is wrapped in Arc and doesn't need to be Clone
impl<S: ?Sized> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            registry: Arc::clone(&self.registry),
            projector: self.projector.clone(),
            executor: Arc::clone(&self.executor),
            config: Arc::clone(&self.config),
        }
    }
}

impl<S: ObjectStorage + ?Sized> AppState<S> {
    /// Creates a new AppState with the given storage and configuration.
    ///
    /// Background tasks run on the caller's tokio runtime.
    pub fn new(storage: Arc<S>, config: RestConfig) -> Self {
        let registry = TypeRegistry::with_extra_types(config.extra_core_types.iter().cloned());
        Self {
            storage,
            registry: Arc::new(registry),
            projector: Projector::new(config.field_names()),
            executor: Arc::new(TokioExecutor::new()),
            config: Arc::new(config),
        }
    }

    /// Replaces the background executor.
    pub fn with_executor(mut self, executor: Arc<dyn TaskExecutor>) -> Self {
        self.executor = executor;
        self
    }

    /// Returns a reference to the storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Returns a clone of the storage Arc.
    pub fn storage_arc(&self) -> Arc<S> {
        Arc::clone(&self.storage)
    }

    /// Returns the type registry.
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Returns a clone of the registry Arc.
    pub fn registry_arc(&self) -> Arc<TypeRegistry> {
        Arc::clone(&self.registry)
    }

    /// Returns the projector.
    pub fn projector(&self) -> &Projector {
        &self.projector
    }

    /// Returns the background executor.
    pub fn executor(&self) -> &dyn TaskExecutor {
        self.executor.as_ref()
    }

    /// Returns a reference to the configuration.
    pub fn config(&self) -> &RestConfig {
        &self.config
    }

    /// Returns the maximum request body size in bytes.
    pub fn max_entity_size(&self) -> usize {
        self.config.max_entity_size_bytes
    }

    /// Returns the maximum number of ids per batch delete.
    pub fn max_batch_delete(&self) -> usize {
        self.config.max_batch_delete
    }
}
