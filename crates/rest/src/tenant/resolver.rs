//! Tenant resolution.
//!
//! Provides the [`TenantResolver`] which maps the authenticated principal of
//! a request to the [`App`] whose partition the request operates on.

use std::sync::Arc;

use async_trait::async_trait;
use strata_persistence::core::ObjectStorage;
use strata_persistence::tenant::{App, AppId};
use tracing::{debug, info};

use crate::error::RestResult;

/// The authenticated caller of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    /// No credentials were presented.
    Anonymous,
    /// An app authenticated with its own credentials.
    App(AppId),
    /// A user of an app.
    User {
        /// The user's object id.
        id: String,
        /// The app the user belongs to.
        appid: AppId,
    },
}

impl Principal {
    /// Returns the app the principal belongs to, if authenticated.
    pub fn app_id(&self) -> Option<&AppId> {
        match self {
            Principal::Anonymous => None,
            Principal::App(appid) | Principal::User { appid, .. } => Some(appid),
        }
    }
}

/// Resolves the app a request operates on.
#[async_trait]
pub trait TenantResolver: Send + Sync {
    /// Resolves the principal's app, falling back to the root app.
    async fn resolve(&self, principal: &Principal) -> RestResult<App>;
}

/// Resolves apps by reading their records from storage.
///
/// App records live in the root app's partition. Unauthenticated requests,
/// and principals whose app record cannot be found, resolve to the root app.
pub struct StorageTenantResolver<S: ?Sized> {
    storage: Arc<S>,
    root: AppId,
}

impl<S: ?Sized> Clone for StorageTenantResolver<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            root: self.root.clone(),
        }
    }
}

impl<S> StorageTenantResolver<S>
where
    S: ObjectStorage + ?Sized,
{
    /// Creates a resolver over the given storage and root app.
    pub fn new(storage: Arc<S>, root: AppId) -> Self {
        Self { storage, root }
    }

    /// Returns the root app identifier.
    pub fn root(&self) -> &AppId {
        &self.root
    }

    async fn load(&self, appid: &AppId) -> RestResult<Option<App>> {
        let record = self.storage.read(&self.root, &appid.object_id()).await?;
        Ok(record.map(App::try_from).transpose()?)
    }

    async fn root_app(&self) -> RestResult<App> {
        Ok(self
            .load(&self.root)
            .await?
            .unwrap_or_else(|| App::root(&self.root)))
    }
}

#[async_trait]
impl<S> TenantResolver for StorageTenantResolver<S>
where
    S: ObjectStorage + ?Sized,
{
    async fn resolve(&self, principal: &Principal) -> RestResult<App> {
        let Some(appid) = principal.app_id() else {
            info!(app = %self.root, "Unauthenticated request, using root app");
            return self.root_app().await;
        };
        match self.load(appid).await? {
            Some(app) => {
                debug!(app = %appid, "Resolved app");
                Ok(app)
            }
            None => {
                info!(app = %appid, root = %self.root, "App not found, using root app");
                self.root_app().await
            }
        }
    }
}
