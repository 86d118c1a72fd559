//! Field projection.
//!
//! The [`Projector`] turns untyped field maps into [`DomainObject`]s and back.
//! It owns the wire names of the identifier and type discriminator, so a
//! deployment can rename them without the object model noticing, and it
//! enforces the locked-field policy on updates.
//!
//! The shard key is never taken from client input. It is stripped from every
//! incoming map and only ever stamped by the app.

use serde_json::Value;
use tracing::trace;

use crate::error::ValidationError;
use crate::types::{DomainObject, FieldMap, ID_FIELD, SHARDKEY_FIELD, TYPE_FIELD};

/// Which fields an update may touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldFilter {
    /// Every field in the map is applied.
    #[default]
    All,
    /// Fields locked for the object's type are silently skipped.
    SkipLocked,
}

/// Wire names of the identifier and type discriminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldNames {
    /// Identifier field, `id` by default.
    pub id: String,
    /// Type discriminator field, `type` by default.
    pub object_type: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            id: ID_FIELD.to_string(),
            object_type: TYPE_FIELD.to_string(),
        }
    }
}

/// Converts between field maps and domain objects.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use strata_persistence::projection::{FieldFilter, Projector};
///
/// let projector = Projector::default();
/// let fields = json!({"type": "user", "identifier": "fb:1", "email": "a@b.co"});
/// let mut user = projector.materialize(fields.as_object().cloned().unwrap()).unwrap();
///
/// let patch = json!({"identifier": "fb:2", "email": "c@d.co"});
/// projector
///     .project(&mut user, patch.as_object().cloned().unwrap(), FieldFilter::SkipLocked)
///     .unwrap();
///
/// let out = projector.to_field_map(&user);
/// assert_eq!(out["identifier"], "fb:1");
/// assert_eq!(out["email"], "c@d.co");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Projector {
    names: FieldNames,
}

impl Projector {
    /// Creates a projector using custom wire names.
    pub fn new(names: FieldNames) -> Self {
        Self { names }
    }

    /// Returns the configured wire names.
    pub fn names(&self) -> &FieldNames {
        &self.names
    }

    /// Returns the type discriminator of a field map, if it is a string.
    pub fn discriminator<'a>(&self, fields: &'a FieldMap) -> Option<&'a str> {
        fields.get(&self.names.object_type).and_then(Value::as_str)
    }

    /// Returns the identifier of a field map, if it is a non-blank string.
    pub fn identifier<'a>(&self, fields: &'a FieldMap) -> Option<&'a str> {
        fields
            .get(&self.names.id)
            .and_then(Value::as_str)
            .filter(|id| !id.trim().is_empty())
    }

    /// Sets the type discriminator of a field map.
    pub fn inject_type(&self, fields: &mut FieldMap, object_type: &str) {
        fields.insert(
            self.names.object_type.clone(),
            Value::String(object_type.to_string()),
        );
    }

    /// Builds an object from a field map carrying a type discriminator.
    pub fn materialize(&self, fields: FieldMap) -> Result<DomainObject, ValidationError> {
        DomainObject::from_field_map(self.normalize(fields))
    }

    /// Builds an object, keeping only fields accepted by `filter`.
    ///
    /// With [`FieldFilter::SkipLocked`] the result carries only the identifier,
    /// the type and the unlocked fields. Used for batch updates, where the
    /// projected object is merged onto the stored one by the backend.
    pub fn materialize_filtered(
        &self,
        fields: FieldMap,
        filter: FieldFilter,
    ) -> Result<DomainObject, ValidationError> {
        let mut fields = self.normalize(fields);
        let object_type = fields.remove(TYPE_FIELD);
        let id = fields.remove(ID_FIELD);

        let mut head = FieldMap::new();
        head.extend(object_type.map(|t| (TYPE_FIELD.to_string(), t)));
        head.extend(id.map(|id| (ID_FIELD.to_string(), id)));
        let mut object = DomainObject::from_field_map(head)?;
        apply(&mut object, fields, filter)?;
        Ok(object)
    }

    /// Applies a field map onto an existing object in place.
    ///
    /// The type discriminator in the map is ignored; the object keeps its type.
    pub fn project(
        &self,
        object: &mut DomainObject,
        fields: FieldMap,
        filter: FieldFilter,
    ) -> Result<(), ValidationError> {
        let mut fields = self.normalize(fields);
        fields.remove(TYPE_FIELD);
        apply(object, fields, filter)
    }

    /// Flattens an object into a field map using the configured wire names.
    pub fn to_field_map(&self, object: &DomainObject) -> FieldMap {
        let mut fields = object.to_field_map();
        rename(&mut fields, ID_FIELD, &self.names.id);
        rename(&mut fields, TYPE_FIELD, &self.names.object_type);
        fields
    }

    fn normalize(&self, mut fields: FieldMap) -> FieldMap {
        if fields.remove(SHARDKEY_FIELD).is_some() {
            trace!("Discarding client-supplied shard key");
        }
        rename(&mut fields, &self.names.id, ID_FIELD);
        rename(&mut fields, &self.names.object_type, TYPE_FIELD);
        fields
    }
}

fn apply(
    object: &mut DomainObject,
    mut fields: FieldMap,
    filter: FieldFilter,
) -> Result<(), ValidationError> {
    if filter == FieldFilter::SkipLocked {
        fields.retain(|name, _| {
            let locked = object.is_locked(name);
            if locked {
                trace!(field = %name, object_type = %object.object_type(), "Skipping locked field");
            }
            !locked
        });
    }
    object.overlay(fields)
}

fn rename(fields: &mut FieldMap, from: &str, to: &str) {
    if from == to {
        return;
    }
    if let Some(value) = fields.remove(from) {
        fields.insert(to.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SERVER_ASSIGNED_FIELDS;
    use serde_json::json;

    fn map(value: Value) -> FieldMap {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_materialize_strips_shard_key() {
        let projector = Projector::default();
        let obj = projector
            .materialize(map(json!({"type": "dog", "shardkey": "evil"})))
            .unwrap();
        assert_eq!(obj.shard_key(), None);
    }

    #[test]
    fn test_materialize_requires_discriminator() {
        let projector = Projector::default();
        assert!(projector.materialize(map(json!({"name": "x"}))).is_err());
    }

    #[test]
    fn test_project_skips_locked() {
        let projector = Projector::default();
        let mut tag = projector
            .materialize(map(json!({"type": "tag", "id": "t1", "tag": "rust", "count": 1})))
            .unwrap();
        projector
            .project(
                &mut tag,
                map(json!({"id": "t2", "type": "user", "tag": "go", "count": 2})),
                FieldFilter::SkipLocked,
            )
            .unwrap();
        let out = projector.to_field_map(&tag);
        assert_eq!(out["id"], json!("t1"));
        assert_eq!(out["type"], json!("tag"));
        assert_eq!(out["tag"], json!("rust"));
        assert_eq!(out["count"], json!(2));
    }

    #[test]
    fn test_project_all_overwrites_locked() {
        let projector = Projector::default();
        let mut tag = projector
            .materialize(map(json!({"type": "tag", "tag": "rust"})))
            .unwrap();
        projector
            .project(&mut tag, map(json!({"tag": "go"})), FieldFilter::All)
            .unwrap();
        assert_eq!(projector.to_field_map(&tag)["tag"], json!("go"));
    }

    #[test]
    fn test_materialize_filtered_keeps_identity() {
        let projector = Projector::default();
        let obj = projector
            .materialize_filtered(
                map(json!({"id": "u1", "type": "user", "identifier": "fb:9", "email": "x@y.io"})),
                FieldFilter::SkipLocked,
            )
            .unwrap();
        let out = projector.to_field_map(&obj);
        assert_eq!(out, map(json!({"id": "u1", "type": "user", "email": "x@y.io"})));
    }

    #[test]
    fn test_custom_field_names() {
        let projector = Projector::new(FieldNames {
            id: "_id".to_string(),
            object_type: "kind".to_string(),
        });
        let fields = map(json!({"_id": "d1", "kind": "dog", "breed": "pug"}));
        assert_eq!(projector.discriminator(&fields), Some("dog"));
        assert_eq!(projector.identifier(&fields), Some("d1"));

        let obj = projector.materialize(fields.clone()).unwrap();
        assert_eq!(obj.id(), Some("d1"));
        assert_eq!(obj.object_type(), "dog");
        assert_eq!(projector.to_field_map(&obj), fields);
    }

    #[test]
    fn test_round_trip_reproduces_unlocked_fields() {
        let projector = Projector::default();
        let inputs = [
            json!({"type": "dog", "name": "Rex", "breed": "collie", "age": 4, "tags": ["a"]}),
            json!({"type": "address", "address": "1 Main", "country": "US", "phone": "555"}),
            json!({"type": "vote", "value": 1, "expiresAfter": 60, "parentid": "p1"}),
        ];
        for input in inputs {
            let input = map(input);
            let mut obj = projector.materialize(input.clone()).unwrap();
            obj.set_id(Some("server-id".to_string()));
            obj.set_appid(Some("acme".to_string()));

            let mut out = projector.to_field_map(&obj);
            out.retain(|k, _| !SERVER_ASSIGNED_FIELDS.contains(&k.as_str()));
            assert_eq!(out, input);
        }
    }
}
