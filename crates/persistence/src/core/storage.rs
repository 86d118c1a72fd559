//! Core object storage trait.
//!
//! This module defines the [`ObjectStorage`] trait, which provides the CRUD
//! operations for domain objects. Every operation is scoped to an app
//! partition, so tenant isolation is enforced at the type level.

use async_trait::async_trait;

use crate::error::{ResourceError, StorageError, StorageResult};
use crate::tenant::AppId;
use crate::types::DomainObject;

/// Core storage trait for domain objects.
///
/// # Tenant Isolation
///
/// Every operation takes the [`AppId`] of the partition it works on as its
/// first parameter. Objects written through this trait must already carry an
/// app linkage; backends reject objects that don't.
///
/// # Example
///
/// ```
/// use strata_persistence::backends::memory::InMemoryBackend;
/// use strata_persistence::core::ObjectStorage;
/// use strata_persistence::tenant::AppId;
/// use strata_persistence::types::DomainObject;
///
/// # tokio_test::block_on(async {
/// let storage = InMemoryBackend::new();
/// let app = AppId::new("acme");
///
/// let mut dog = DomainObject::new("dog");
/// dog.set_appid(Some(app.to_string()));
/// let id = storage.create(&app, &mut dog).await.unwrap();
///
/// let read = storage.read(&app, &id).await.unwrap();
/// assert_eq!(read.as_ref().and_then(|d| d.id()), Some(id.as_str()));
///
/// storage.delete(&app, &dog).await.unwrap();
/// assert!(storage.read(&app, &id).await.unwrap().is_none());
/// # });
/// ```
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Returns a human-readable name for this storage backend.
    fn backend_name(&self) -> &'static str;

    /// Stores a new object.
    ///
    /// The backend assigns an identifier when the object has none, stamps the
    /// creation timestamp, and writes both back into `object`.
    ///
    /// # Returns
    ///
    /// The identifier of the stored object.
    ///
    /// # Errors
    ///
    /// * `StorageError::Tenant(MissingTenant)` - If the object has no app linkage
    /// * `StorageError::Resource(AlreadyExists)` - If the identifier is taken
    async fn create(&self, app: &AppId, object: &mut DomainObject) -> StorageResult<String>;

    /// Reads an object by identifier.
    ///
    /// Returns `None` if the object doesn't exist in the partition.
    async fn read(&self, app: &AppId, id: &str) -> StorageResult<Option<DomainObject>>;

    /// Replaces an existing object.
    ///
    /// `object` is the complete new state: fields it leaves unset are
    /// removed from the stored object. The creation timestamp is kept from
    /// the stored object, and the `updated` timestamp is written back into
    /// `object`.
    ///
    /// # Errors
    ///
    /// * `StorageError::Resource(NotFound)` - If the object doesn't exist
    /// * `StorageError::Tenant(MissingTenant)` - If the object has no app linkage
    async fn update(&self, app: &AppId, object: &mut DomainObject) -> StorageResult<()>;

    /// Deletes an object. Deleting a missing object is not an error.
    async fn delete(&self, app: &AppId, object: &DomainObject) -> StorageResult<()>;

    /// Reads multiple objects by identifier.
    ///
    /// Missing objects are omitted. When `preserve_order` is set, the result
    /// follows the order of `ids`; otherwise the order is unspecified.
    async fn read_all(
        &self,
        app: &AppId,
        ids: &[String],
        preserve_order: bool,
    ) -> StorageResult<Vec<DomainObject>> {
        let _ = preserve_order;
        let mut results = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(object) = self.read(app, id).await? {
                results.push(object);
            }
        }
        Ok(results)
    }

    /// Stores multiple objects, returning their identifiers.
    async fn create_all(
        &self,
        app: &AppId,
        objects: &mut [DomainObject],
    ) -> StorageResult<Vec<String>> {
        let mut ids = Vec::with_capacity(objects.len());
        for object in objects.iter_mut() {
            ids.push(self.create(app, object).await?);
        }
        Ok(ids)
    }

    /// Updates multiple objects with merge semantics.
    ///
    /// Each object is partial: the fields it sets are merged onto the stored
    /// object and the merged result is written back into the slice. Objects
    /// that are not stored are skipped rather than failing the batch.
    async fn update_all(&self, app: &AppId, objects: &mut [DomainObject]) -> StorageResult<()> {
        for object in objects.iter_mut() {
            let Some(id) = object.id() else {
                continue;
            };
            let Some(mut merged) = self.read(app, id).await? else {
                continue;
            };
            merged.merge_from(object)?;
            match self.update(app, &mut merged).await {
                Ok(()) => *object = merged,
                Err(StorageError::Resource(ResourceError::NotFound { .. })) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    /// Deletes multiple objects.
    async fn delete_all(&self, app: &AppId, objects: &[DomainObject]) -> StorageResult<()> {
        for object in objects {
            self.delete(app, object).await?;
        }
        Ok(())
    }
}
