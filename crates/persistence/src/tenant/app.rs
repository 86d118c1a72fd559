//! The app (tenant) record.

use std::collections::BTreeMap;

use super::id::AppId;
use crate::error::TenantError;
use crate::types::{AppFields, DomainObject, ObjectBody, ObjectMeta};

/// A tenant: the owner of a storage partition and of its custom types.
///
/// Apps are domain objects themselves (type `app`) and are stored in the
/// root app's partition under the id `app:<identifier>`.
///
/// # Examples
///
/// ```
/// use strata_persistence::tenant::{App, AppId};
///
/// let root = AppId::new("root");
/// let app = App::new("acme", &root).with_shared(true);
/// assert_eq!(app.identifier().as_str(), "acme");
/// assert_eq!(app.shard_key().as_deref(), Some("acme"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct App {
    meta: ObjectMeta,
    settings: AppFields,
}

impl App {
    /// Creates an app record stored in the partition of `root`.
    pub fn new(name: &str, root: &AppId) -> Self {
        let identifier = AppId::new(name);
        let mut meta = ObjectMeta::new("app");
        meta.id = Some(identifier.object_id());
        meta.appid = Some(root.to_string());
        meta.name = Some(name.to_string());
        Self {
            meta,
            settings: AppFields::default(),
        }
    }

    /// Creates the root app record, which lives in its own partition.
    pub fn root(root: &AppId) -> Self {
        Self::new(root.as_str(), root)
    }

    /// Sets whether the app shares a partition with other apps.
    pub fn with_shared(mut self, shared: bool) -> Self {
        self.settings.shared = Some(shared);
        self
    }

    /// Returns the app identifier.
    pub fn identifier(&self) -> AppId {
        AppId::from_object_id(self.meta.id.as_deref().unwrap_or_default())
    }

    /// Returns the partition the app record itself is stored in.
    pub fn partition(&self) -> AppId {
        match self.meta.appid.as_deref() {
            Some(appid) => AppId::new(appid),
            None => self.identifier(),
        }
    }

    /// Returns `true` if the app shares a partition with other apps.
    pub fn is_shared(&self) -> bool {
        self.settings.shared.unwrap_or(false)
    }

    /// Returns the custom types registered by the app, plural to singular.
    pub fn datatypes(&self) -> &BTreeMap<String, String> {
        &self.settings.datatypes
    }

    /// Registers a custom type. Existing entries are never replaced.
    ///
    /// Returns `true` if the entry was added.
    pub fn add_datatype(&mut self, plural: impl Into<String>, singular: impl Into<String>) -> bool {
        let plural = plural.into();
        if self.settings.datatypes.contains_key(&plural) {
            return false;
        }
        self.settings.datatypes.insert(plural, singular.into());
        true
    }

    /// Returns the shard key stamped on this app's objects.
    ///
    /// Only apps sharing a partition have one; it equals the app identifier.
    pub fn shard_key(&self) -> Option<String> {
        self.is_shared().then(|| self.identifier().to_string())
    }

    /// Stamps the app linkage and shard key onto an object.
    pub fn assign(&self, object: &mut DomainObject) {
        object.set_appid(Some(self.identifier().to_string()));
        self.assign_shard_key(object);
    }

    /// Stamps the shard key onto an object, clearing any client-supplied value.
    pub fn assign_shard_key(&self, object: &mut DomainObject) {
        object.set_shard_key(self.shard_key());
    }

    /// Converts the app into a storable domain object.
    pub fn to_object(&self) -> DomainObject {
        DomainObject::from_parts(self.meta.clone(), ObjectBody::App(self.settings.clone()))
    }
}

impl TryFrom<DomainObject> for App {
    type Error = TenantError;

    fn try_from(object: DomainObject) -> Result<Self, Self::Error> {
        let meta = object.meta().clone();
        match (object.body(), meta.id.as_deref()) {
            (ObjectBody::App(settings), Some(id)) if !AppId::from_object_id(id).is_blank() => {
                Ok(Self {
                    settings: settings.clone(),
                    meta,
                })
            }
            _ => Err(TenantError::InvalidTenant {
                app: meta.id.unwrap_or_default(),
            }),
        }
    }
}
