//! Test harness for the object API.
//!
//! Builds an [`AppState`] over the in-memory backend with a recording
//! executor, so background work runs only when a test asks for it.

use std::sync::{Arc, Mutex};

use strata_persistence::backends::memory::InMemoryBackend;
use strata_persistence::core::ObjectStorage;
use strata_persistence::tenant::{App, AppId};
use strata_persistence::types::DomainObject;
use strata_rest::executor::{Task, TaskExecutor};
use strata_rest::{AppState, RestConfig};

/// Executor that queues tasks until [`RecordingExecutor::run_all`] is called.
#[derive(Default)]
pub struct RecordingExecutor {
    tasks: Mutex<Vec<Task>>,
}

impl std::fmt::Debug for RecordingExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingExecutor")
            .field("pending", &self.pending())
            .finish()
    }
}

impl RecordingExecutor {
    /// Number of queued tasks.
    pub fn pending(&self) -> usize {
        self.tasks.lock().unwrap().len()
    }

    /// Runs and drains every queued task.
    pub async fn run_all(&self) {
        let tasks: Vec<Task> = std::mem::take(&mut *self.tasks.lock().unwrap());
        for task in tasks {
            task.await;
        }
    }
}

impl TaskExecutor for RecordingExecutor {
    fn spawn(&self, task: Task) {
        self.tasks.lock().unwrap().push(task);
    }
}

/// A ready-to-use API state plus handles on its collaborators.
pub struct TestContext {
    pub state: AppState<InMemoryBackend>,
    pub storage: Arc<InMemoryBackend>,
    pub executor: Arc<RecordingExecutor>,
    pub root: AppId,
}

impl TestContext {
    /// Creates a context with the testing configuration.
    pub fn new() -> Self {
        Self::with_config(RestConfig::for_testing())
    }

    /// Creates a context with a custom configuration.
    pub fn with_config(config: RestConfig) -> Self {
        let root = config.root_app_id();
        let storage = Arc::new(InMemoryBackend::new());
        let executor = Arc::new(RecordingExecutor::default());
        let state = AppState::new(Arc::clone(&storage), config)
            .with_executor(Arc::clone(&executor) as Arc<dyn TaskExecutor>);
        Self {
            state,
            storage,
            executor,
            root,
        }
    }

    /// Stores an app record and returns the app.
    pub async fn app(&self, name: &str, shared: bool) -> App {
        let app = App::new(name, &self.root).with_shared(shared);
        let mut record = app.to_object();
        self.storage
            .create(&self.root, &mut record)
            .await
            .expect("app record stored");
        app
    }

    /// Re-reads an app record from storage.
    pub async fn reload(&self, app: &App) -> App {
        let record = self
            .storage
            .read(&self.root, &app.identifier().object_id())
            .await
            .expect("read app")
            .expect("app exists");
        App::try_from(record).expect("valid app record")
    }

    /// Reads an object from the app's partition.
    pub async fn stored(&self, app: &App, id: &str) -> Option<DomainObject> {
        self.storage
            .read(&app.identifier(), id)
            .await
            .expect("read object")
    }

    /// Runs queued background tasks.
    pub async fn run_background(&self) {
        self.executor.run_all().await;
    }
}
