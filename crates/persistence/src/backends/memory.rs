//! In-memory storage backend.
//!
//! Objects are kept in a map per app partition behind a single
//! [`parking_lot::RwLock`]. Nothing is persisted; the backend is meant for
//! tests, development and embedding.

use std::collections::HashMap;
use std::fmt::Debug;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::core::ObjectStorage;
use crate::error::{ResourceError, StorageResult, TenantError};
use crate::tenant::AppId;
use crate::types::DomainObject;

type Partition = HashMap<String, DomainObject>;

/// In-memory object storage, partitioned by app.
#[derive(Default)]
pub struct InMemoryBackend {
    partitions: RwLock<HashMap<AppId, Partition>>,
}

impl Debug for InMemoryBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryBackend")
            .field("partitions", &self.partitions.read().len())
            .finish()
    }
}

impl InMemoryBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of objects stored for an app.
    pub fn count(&self, app: &AppId) -> usize {
        self.partitions.read().get(app).map_or(0, HashMap::len)
    }

    /// Returns every object stored for an app, in no particular order.
    pub fn objects(&self, app: &AppId) -> Vec<DomainObject> {
        self.partitions
            .read()
            .get(app)
            .map(|p| p.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Prepares an object for insertion: checks linkage, assigns the id and
    /// creation timestamp.
    fn prepare(
        app: &AppId,
        partition: Option<&Partition>,
        object: &mut DomainObject,
    ) -> StorageResult<String> {
        check_linkage(app, object)?;
        let id = match object.id() {
            Some(id) if !id.trim().is_empty() => id.to_string(),
            _ => Uuid::new_v4().to_string(),
        };
        if partition.is_some_and(|p| p.contains_key(&id)) {
            return Err(ResourceError::AlreadyExists {
                app: app.to_string(),
                id,
            }
            .into());
        }
        object.set_id(Some(id.clone()));
        object.meta_mut().timestamp = Some(Utc::now().timestamp_millis());
        Ok(id)
    }
}

fn check_linkage(app: &AppId, object: &DomainObject) -> StorageResult<()> {
    match object.appid() {
        Some(appid) if appid == app.as_str() => Ok(()),
        Some(appid) if !appid.trim().is_empty() => Err(TenantError::InvalidTenant {
            app: appid.to_string(),
        }
        .into()),
        _ => Err(TenantError::MissingTenant {
            id: object.id().unwrap_or_default().to_string(),
        }
        .into()),
    }
}

#[async_trait]
impl ObjectStorage for InMemoryBackend {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn create(&self, app: &AppId, object: &mut DomainObject) -> StorageResult<String> {
        let mut partitions = self.partitions.write();
        let id = Self::prepare(app, partitions.get(app), object)?;
        partitions
            .entry(app.clone())
            .or_default()
            .insert(id.clone(), object.clone());
        debug!(app = %app, id = %id, object_type = %object.object_type(), "Created object");
        Ok(id)
    }

    async fn read(&self, app: &AppId, id: &str) -> StorageResult<Option<DomainObject>> {
        Ok(self
            .partitions
            .read()
            .get(app)
            .and_then(|p| p.get(id))
            .cloned())
    }

    async fn update(&self, app: &AppId, object: &mut DomainObject) -> StorageResult<()> {
        check_linkage(app, object)?;
        let id = object.id().unwrap_or_default().to_string();
        let mut partitions = self.partitions.write();
        let stored = partitions
            .get_mut(app)
            .and_then(|p| p.get_mut(&id))
            .ok_or_else(|| ResourceError::NotFound {
                app: app.to_string(),
                id: id.clone(),
            })?;

        let meta = object.meta_mut();
        meta.timestamp = stored.meta().timestamp;
        meta.updated = Some(Utc::now().timestamp_millis());
        *stored = object.clone();
        debug!(app = %app, id = %id, "Replaced object");
        Ok(())
    }

    async fn delete(&self, app: &AppId, object: &DomainObject) -> StorageResult<()> {
        let Some(id) = object.id() else {
            return Ok(());
        };
        let removed = self
            .partitions
            .write()
            .get_mut(app)
            .and_then(|p| p.remove(id))
            .is_some();
        debug!(app = %app, id = %id, removed, "Deleted object");
        Ok(())
    }

    async fn read_all(
        &self,
        app: &AppId,
        ids: &[String],
        _preserve_order: bool,
    ) -> StorageResult<Vec<DomainObject>> {
        let partitions = self.partitions.read();
        let Some(partition) = partitions.get(app) else {
            return Ok(Vec::new());
        };
        Ok(ids.iter().filter_map(|id| partition.get(id).cloned()).collect())
    }

    /// Inserts all objects under one write lock. Either every object is
    /// stored or none is.
    async fn create_all(
        &self,
        app: &AppId,
        objects: &mut [DomainObject],
    ) -> StorageResult<Vec<String>> {
        let mut partitions = self.partitions.write();
        let mut staged = Partition::new();
        for object in objects.iter_mut() {
            let id = Self::prepare(app, partitions.get(app), object)?;
            if staged.contains_key(&id) {
                return Err(ResourceError::AlreadyExists {
                    app: app.to_string(),
                    id,
                }
                .into());
            }
            staged.insert(id, object.clone());
        }
        let ids: Vec<String> = objects
            .iter()
            .filter_map(|o| o.id().map(str::to_string))
            .collect();
        partitions.entry(app.clone()).or_default().extend(staged);
        debug!(app = %app, count = ids.len(), "Created objects");
        Ok(ids)
    }

    /// Merges every object that exists under one write lock. Objects that
    /// are not stored are skipped.
    async fn update_all(&self, app: &AppId, objects: &mut [DomainObject]) -> StorageResult<()> {
        for object in objects.iter() {
            check_linkage(app, object)?;
        }
        let now = Utc::now().timestamp_millis();
        let mut partitions = self.partitions.write();
        let Some(partition) = partitions.get_mut(app) else {
            debug!(app = %app, count = objects.len(), "No objects to update");
            return Ok(());
        };

        let mut updated = 0;
        for object in objects.iter_mut() {
            let Some(stored) = object.id().and_then(|id| partition.get_mut(id)) else {
                debug!(app = %app, id = ?object.id(), "Skipping update of missing object");
                continue;
            };
            let mut merged = stored.clone();
            merged.merge_from(object)?;
            merged.meta_mut().updated = Some(now);
            *stored = merged.clone();
            *object = merged;
            updated += 1;
        }
        debug!(app = %app, updated, "Updated objects");
        Ok(())
    }

    async fn delete_all(&self, app: &AppId, objects: &[DomainObject]) -> StorageResult<()> {
        let mut partitions = self.partitions.write();
        if let Some(partition) = partitions.get_mut(app) {
            for id in objects.iter().filter_map(DomainObject::id) {
                partition.remove(id);
            }
        }
        debug!(app = %app, count = objects.len(), "Deleted objects");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::types::ObjectBody;
    use serde_json::json;

    fn app() -> AppId {
        AppId::new("acme")
    }

    fn dog(name: &str) -> DomainObject {
        let mut obj = DomainObject::new("dog");
        obj.set_appid(Some(app().to_string()));
        obj.meta_mut().name = Some(name.to_string());
        obj
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_timestamp() {
        let backend = InMemoryBackend::new();
        let mut obj = dog("Rex");
        let id = backend.create(&app(), &mut obj).await.unwrap();
        assert_eq!(obj.id(), Some(id.as_str()));
        assert!(obj.meta().timestamp.is_some());
        assert_eq!(backend.count(&app()), 1);
    }

    #[tokio::test]
    async fn test_create_keeps_client_id() {
        let backend = InMemoryBackend::new();
        let mut obj = dog("Rex");
        obj.set_id(Some("d1".to_string()));
        assert_eq!(backend.create(&app(), &mut obj).await.unwrap(), "d1");

        let mut dup = dog("Rex again");
        dup.set_id(Some("d1".to_string()));
        let err = backend.create(&app(), &mut dup).await.unwrap_err();
        assert!(matches!(
            err,
            StorageError::Resource(ResourceError::AlreadyExists { .. })
        ));
    }

    #[tokio::test]
    async fn test_create_requires_linkage() {
        let backend = InMemoryBackend::new();
        let mut obj = DomainObject::new("dog");
        let err = backend.create(&app(), &mut obj).await.unwrap_err();
        assert!(matches!(
            err,
            StorageError::Tenant(TenantError::MissingTenant { .. })
        ));

        obj.set_appid(Some("other".to_string()));
        let err = backend.create(&app(), &mut obj).await.unwrap_err();
        assert!(matches!(
            err,
            StorageError::Tenant(TenantError::InvalidTenant { .. })
        ));
    }

    #[tokio::test]
    async fn test_partitions_are_isolated() {
        let backend = InMemoryBackend::new();
        let mut obj = dog("Rex");
        let id = backend.create(&app(), &mut obj).await.unwrap();
        assert!(backend.read(&AppId::new("other"), &id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_replaces() {
        let backend = InMemoryBackend::new();
        let mut obj = dog("Rex");
        if let ObjectBody::Custom(fields) = obj.body_mut() {
            fields.insert("breed".to_string(), json!("collie"));
        }
        obj.set_shard_key(Some(app().to_string()));
        let id = backend.create(&app(), &mut obj).await.unwrap();
        let created_at = obj.meta().timestamp;

        let mut next = dog("Rex");
        next.set_id(Some(id.clone()));
        if let ObjectBody::Custom(fields) = next.body_mut() {
            fields.insert("age".to_string(), json!(3));
        }
        backend.update(&app(), &mut next).await.unwrap();

        let stored = backend.read(&app(), &id).await.unwrap().unwrap();
        let fields = stored.to_field_map();
        assert!(!fields.contains_key("breed"));
        assert!(!fields.contains_key("shardkey"));
        assert_eq!(fields["age"], json!(3));
        assert_eq!(stored.meta().timestamp, created_at);
        assert!(stored.meta().updated.is_some());
        assert_eq!(next, stored);
    }

    #[tokio::test]
    async fn test_update_missing() {
        let backend = InMemoryBackend::new();
        let mut obj = dog("Rex");
        obj.set_id(Some("nope".to_string()));
        let err = backend.update(&app(), &mut obj).await.unwrap_err();
        assert!(matches!(
            err,
            StorageError::Resource(ResourceError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let backend = InMemoryBackend::new();
        let mut obj = dog("Rex");
        backend.create(&app(), &mut obj).await.unwrap();
        backend.delete(&app(), &obj).await.unwrap();
        backend.delete(&app(), &obj).await.unwrap();
        assert_eq!(backend.count(&app()), 0);
    }

    #[tokio::test]
    async fn test_read_all_preserves_order_and_skips_missing() {
        let backend = InMemoryBackend::new();
        let mut objects = vec![dog("a"), dog("b"), dog("c")];
        let ids = backend.create_all(&app(), &mut objects).await.unwrap();

        let wanted = vec![ids[2].clone(), "missing".to_string(), ids[0].clone()];
        let found = backend.read_all(&app(), &wanted, true).await.unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|o| o.meta().name.clone().unwrap())
            .collect();
        assert_eq!(names, vec!["c", "a"]);
    }

    #[tokio::test]
    async fn test_create_all_is_all_or_nothing() {
        let backend = InMemoryBackend::new();
        let mut objects = vec![dog("a"), DomainObject::new("dog")];
        assert!(backend.create_all(&app(), &mut objects).await.is_err());
        assert_eq!(backend.count(&app()), 0);
    }

    #[tokio::test]
    async fn test_update_all_skips_missing() {
        let backend = InMemoryBackend::new();
        let mut objects = vec![dog("a")];
        let ids = backend.create_all(&app(), &mut objects).await.unwrap();

        let mut known = DomainObject::new("dog");
        known.set_id(Some(ids[0].clone()));
        known.set_appid(Some(app().to_string()));
        known.meta_mut().name = Some("renamed".to_string());
        let mut unknown = dog("ghost");
        unknown.set_id(Some("missing".to_string()));

        let mut batch = vec![known, unknown];
        backend.update_all(&app(), &mut batch).await.unwrap();

        assert_eq!(backend.count(&app()), 1);
        let stored = backend.read(&app(), &ids[0]).await.unwrap().unwrap();
        assert_eq!(stored.meta().name.as_deref(), Some("renamed"));
        assert!(stored.meta().updated.is_some());
    }

    #[tokio::test]
    async fn test_delete_all() {
        let backend = InMemoryBackend::new();
        let mut objects = vec![dog("a"), dog("b"), dog("c")];
        backend.create_all(&app(), &mut objects).await.unwrap();
        backend.delete_all(&app(), &objects[..2]).await.unwrap();
        assert_eq!(backend.count(&app()), 1);
    }
}
