//! Background task execution.
//!
//! Work that must not delay a response, such as recording newly seen custom
//! types after a batch create, is handed to a [`TaskExecutor`].

use std::fmt::Debug;
use std::future::Future;
use std::pin::Pin;

use tokio::runtime::Handle;
use tracing::warn;

/// A unit of background work.
pub type Task = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Runs tasks off the request path. Fire and forget.
pub trait TaskExecutor: Send + Sync + Debug {
    /// Submits a task for execution.
    fn spawn(&self, task: Task);
}

/// Executes tasks on a tokio runtime.
///
/// Without an explicit handle, tasks run on the runtime of the caller.
#[derive(Debug, Clone, Default)]
pub struct TokioExecutor {
    handle: Option<Handle>,
}

impl TokioExecutor {
    /// Creates an executor that uses the caller's runtime.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an executor bound to a specific runtime.
    pub fn with_handle(handle: Handle) -> Self {
        Self {
            handle: Some(handle),
        }
    }
}

impl TaskExecutor for TokioExecutor {
    fn spawn(&self, task: Task) {
        let handle = match &self.handle {
            Some(handle) => handle.clone(),
            None => match Handle::try_current() {
                Ok(handle) => handle,
                Err(e) => {
                    warn!(error = %e, "No runtime available, dropping background task");
                    return;
                }
            },
        };
        // Detached; completion is not awaited.
        drop(handle.spawn(task));
    }
}
