//! The generic domain object.
//!
//! A [`DomainObject`] is an [`ObjectMeta`] envelope plus an [`ObjectBody`],
//! which is either one of the built-in shapes or an open bag of fields for
//! custom types. The variant is selected by the type discriminator.

use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::trace;

use super::descriptor::TypeDescriptor;
use super::meta::{ObjectMeta, TYPE_FIELD, envelope_field};
use super::naming::{is_valid_type_name, pluralize};
use super::shapes::{
    ADDRESS, APP, AddressFields, AppFields, TAG, TRANSLATION, TagFields, TranslationFields, USER,
    UserFields, VOTE, VoteFields,
};
use crate::error::ValidationError;

/// An untyped map of field names to JSON values.
pub type FieldMap = Map<String, Value>;

/// The type-specific part of an object.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum ObjectBody {
    App(AppFields),
    User(UserFields),
    Tag(TagFields),
    Address(AddressFields),
    Translation(TranslationFields),
    Vote(VoteFields),
    /// Any type without a built-in shape; all non-envelope fields are kept.
    Custom(FieldMap),
}

impl ObjectBody {
    /// Returns an empty body of the variant selected by a singular type name.
    pub fn for_type(object_type: &str) -> Self {
        match object_type {
            "app" => ObjectBody::App(AppFields::default()),
            "user" => ObjectBody::User(UserFields::default()),
            "tag" => ObjectBody::Tag(TagFields::default()),
            "address" => ObjectBody::Address(AddressFields::default()),
            "translation" => ObjectBody::Translation(TranslationFields::default()),
            "vote" => ObjectBody::Vote(VoteFields::default()),
            _ => ObjectBody::Custom(FieldMap::new()),
        }
    }

    /// Returns the descriptor of a built-in variant, or `None` for custom bodies.
    pub fn descriptor(&self) -> Option<&'static TypeDescriptor> {
        match self {
            ObjectBody::App(_) => Some(&APP),
            ObjectBody::User(_) => Some(&USER),
            ObjectBody::Tag(_) => Some(&TAG),
            ObjectBody::Address(_) => Some(&ADDRESS),
            ObjectBody::Translation(_) => Some(&TRANSLATION),
            ObjectBody::Vote(_) => Some(&VOTE),
            ObjectBody::Custom(_) => None,
        }
    }

    /// Returns `true` for the open custom variant.
    pub fn is_custom(&self) -> bool {
        matches!(self, ObjectBody::Custom(_))
    }

    /// Returns the fields that are set on this body.
    pub fn to_fields(&self) -> FieldMap {
        match self {
            ObjectBody::App(f) => to_map(f),
            ObjectBody::User(f) => to_map(f),
            ObjectBody::Tag(f) => to_map(f),
            ObjectBody::Address(f) => to_map(f),
            ObjectBody::Translation(f) => to_map(f),
            ObjectBody::Vote(f) => to_map(f),
            ObjectBody::Custom(f) => f.clone(),
        }
    }

    /// Decodes a field map into a body of the same variant as `self`.
    fn with_fields(&self, fields: FieldMap) -> Result<Self, ValidationError> {
        Ok(match self {
            ObjectBody::App(_) => ObjectBody::App(decode_fields(fields)?),
            ObjectBody::User(_) => ObjectBody::User(decode_fields(fields)?),
            ObjectBody::Tag(_) => ObjectBody::Tag(decode_fields(fields)?),
            ObjectBody::Address(_) => ObjectBody::Address(decode_fields(fields)?),
            ObjectBody::Translation(_) => ObjectBody::Translation(decode_fields(fields)?),
            ObjectBody::Vote(_) => ObjectBody::Vote(decode_fields(fields)?),
            ObjectBody::Custom(_) => ObjectBody::Custom(fields),
        })
    }
}

/// A persisted object: common envelope plus a type-specific body.
///
/// # Examples
///
/// ```
/// use strata_persistence::types::DomainObject;
///
/// let mut tag = DomainObject::new("tag");
/// tag.set_id(Some("tag:rust".to_string()));
/// assert_eq!(tag.plural(), "tags");
/// assert_eq!(tag.object_uri().as_deref(), Some("/tags/tag:rust"));
///
/// let cat = DomainObject::new("category");
/// assert!(cat.body().is_custom());
/// assert_eq!(cat.plural(), "categories");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DomainObject {
    meta: ObjectMeta,
    body: ObjectBody,
}

impl DomainObject {
    /// Creates an empty object of the given type.
    pub fn new(object_type: impl Into<String>) -> Self {
        let object_type = object_type.into();
        Self {
            body: ObjectBody::for_type(&object_type),
            meta: ObjectMeta::new(object_type),
        }
    }

    /// Assembles an object from an envelope and a body.
    pub fn from_parts(meta: ObjectMeta, body: ObjectBody) -> Self {
        Self { meta, body }
    }

    /// Decodes a complete field map, as produced by [`to_field_map`](Self::to_field_map).
    ///
    /// Fields that the selected built-in shape does not declare are dropped.
    pub fn from_field_map(mut fields: FieldMap) -> Result<Self, ValidationError> {
        let object_type = match fields.remove(TYPE_FIELD) {
            Some(Value::String(t)) if is_valid_type_name(&t) => t,
            Some(Value::String(t)) if !t.trim().is_empty() => {
                return Err(ValidationError::UnknownType { object_type: t });
            }
            None | Some(Value::Null) | Some(Value::String(_)) => {
                return Err(ValidationError::MissingType {
                    field: TYPE_FIELD.to_string(),
                });
            }
            Some(other) => {
                return Err(ValidationError::UnknownType {
                    object_type: other.to_string(),
                });
            }
        };
        let mut object = DomainObject::new(object_type);
        object.overlay(fields)?;
        Ok(object)
    }

    /// Returns the identifier, if assigned.
    pub fn id(&self) -> Option<&str> {
        self.meta.id.as_deref()
    }

    /// Sets the identifier.
    pub fn set_id(&mut self, id: Option<String>) {
        self.meta.id = id;
    }

    /// Returns the singular type name.
    pub fn object_type(&self) -> &str {
        &self.meta.object_type
    }

    /// Returns the identifier of the owning app.
    pub fn appid(&self) -> Option<&str> {
        self.meta.appid.as_deref()
    }

    /// Sets the owning app.
    pub fn set_appid(&mut self, appid: Option<String>) {
        self.meta.appid = appid;
    }

    /// Returns the shard key.
    pub fn shard_key(&self) -> Option<&str> {
        self.meta.shardkey.as_deref()
    }

    /// Sets the shard key.
    pub fn set_shard_key(&mut self, shard_key: Option<String>) {
        self.meta.shardkey = shard_key;
    }

    /// Returns the plural type name.
    pub fn plural(&self) -> String {
        match self.body.descriptor() {
            Some(d) => d.plural.to_string(),
            None => pluralize(&self.meta.object_type),
        }
    }

    /// Returns the collection-style URI of the object, once it has an id.
    pub fn object_uri(&self) -> Option<String> {
        self.id().map(|id| format!("/{}/{}", self.plural(), id))
    }

    /// Returns the envelope.
    pub fn meta(&self) -> &ObjectMeta {
        &self.meta
    }

    /// Returns the envelope mutably.
    pub fn meta_mut(&mut self) -> &mut ObjectMeta {
        &mut self.meta
    }

    /// Returns the body.
    pub fn body(&self) -> &ObjectBody {
        &self.body
    }

    /// Returns the body mutably.
    pub fn body_mut(&mut self) -> &mut ObjectBody {
        &mut self.body
    }

    /// Returns the descriptor of the object's built-in shape, if any.
    pub fn descriptor(&self) -> Option<&'static TypeDescriptor> {
        self.body.descriptor()
    }

    /// Returns `true` if the field is locked for this object's type.
    pub fn is_locked(&self, field: &str) -> bool {
        match envelope_field(field) {
            Some(spec) => spec.locked,
            None => self.descriptor().is_some_and(|d| d.is_locked(field)),
        }
    }

    /// Returns `true` if the object can hold the field.
    ///
    /// Envelope fields are always accepted; built-in shapes accept only the
    /// fields they declare, custom objects accept anything.
    pub fn accepts(&self, field: &str) -> bool {
        envelope_field(field).is_some()
            || match self.descriptor() {
                Some(d) => d.declares(field),
                None => true,
            }
    }

    /// Flattens the object into a field map of all set fields.
    pub fn to_field_map(&self) -> FieldMap {
        let mut fields = self.body.to_fields();
        fields.extend(to_map(&self.meta));
        fields
    }

    /// Overlays the set fields of `other` onto this object.
    ///
    /// The type of `self` is kept. Used for partial updates.
    pub fn merge_from(&mut self, other: &DomainObject) -> Result<(), ValidationError> {
        self.overlay(other.to_field_map())
    }

    /// Overlays fields onto this object. `null` clears a field, the type
    /// discriminator and undeclared fields are ignored.
    pub(crate) fn overlay(&mut self, fields: FieldMap) -> Result<(), ValidationError> {
        let mut meta_fields = to_map(&self.meta);
        let mut body_fields = self.body.to_fields();

        for (name, value) in fields {
            if name == TYPE_FIELD {
                continue;
            }
            let target = if envelope_field(&name).is_some() {
                &mut meta_fields
            } else if self.accepts(&name) {
                &mut body_fields
            } else {
                trace!(field = %name, object_type = %self.meta.object_type, "Ignoring undeclared field");
                continue;
            };
            if value.is_null() {
                target.remove(&name);
            } else {
                target.insert(name, value);
            }
        }

        let meta: ObjectMeta = decode_fields(meta_fields)?;
        let body = self.body.with_fields(body_fields)?;
        self.meta = meta;
        self.body = body;
        Ok(())
    }
}

impl Serialize for DomainObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_field_map().serialize(serializer)
    }
}

fn to_map<T: Serialize>(value: &T) -> FieldMap {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => map,
        _ => FieldMap::new(),
    }
}

/// Decodes a typed value from a field map, naming the offending field on failure.
fn decode_fields<T: DeserializeOwned>(fields: FieldMap) -> Result<T, ValidationError> {
    match serde_json::from_value(Value::Object(fields.clone())) {
        Ok(value) => Ok(value),
        Err(err) => {
            let field = fields
                .iter()
                .find(|(name, value)| {
                    let single = FieldMap::from_iter([((*name).clone(), (*value).clone())]);
                    serde_json::from_value::<T>(Value::Object(single)).is_err()
                })
                .map(|(name, _)| name.clone())
                .unwrap_or_else(|| "body".to_string());
            Err(ValidationError::InvalidField {
                field,
                message: err.to_string(),
            })
        }
    }
}
