//! The common object envelope.
//!
//! Every persisted object carries an [`ObjectMeta`] regardless of its concrete
//! shape: identity, type, owning app, shard key, and a handful of generic
//! attributes.

use serde::{Deserialize, Serialize};

use super::descriptor::{Constraint, FieldSpec};

/// Wire name of the identifier field.
pub const ID_FIELD: &str = "id";

/// Wire name of the type discriminator.
pub const TYPE_FIELD: &str = "type";

/// Wire name of the app linkage field.
pub const APPID_FIELD: &str = "appid";

/// Wire name of the shard key field.
pub const SHARDKEY_FIELD: &str = "shardkey";

/// Fields every object carries, with their lock flags and constraints.
pub static ENVELOPE_FIELDS: &[FieldSpec] = &[
    FieldSpec::locked(ID_FIELD, &[]),
    FieldSpec::locked(TYPE_FIELD, &[Constraint::Required]),
    FieldSpec::locked(APPID_FIELD, &[]),
    FieldSpec::locked("creatorid", &[]),
    FieldSpec::locked("timestamp", &[]),
    FieldSpec::open("parentid", &[]),
    FieldSpec::open("name", &[Constraint::MaxLength(255)]),
    FieldSpec::open("tags", &[]),
    FieldSpec::open("updated", &[]),
    FieldSpec::open(SHARDKEY_FIELD, &[]),
];

/// Fields whose values are assigned by the server rather than the client.
pub static SERVER_ASSIGNED_FIELDS: &[&str] =
    &[ID_FIELD, APPID_FIELD, SHARDKEY_FIELD, "timestamp", "updated"];

/// Returns the envelope declaration of a field, if it is an envelope field.
pub fn envelope_field(name: &str) -> Option<&'static FieldSpec> {
    ENVELOPE_FIELDS.iter().find(|f| f.name == name)
}

/// The envelope shared by all objects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMeta {
    /// Object identifier, assigned by storage when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Singular type name.
    #[serde(rename = "type", default)]
    pub object_type: String,

    /// Identifier of the owning app.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appid: Option<String>,

    /// Identifier of a parent object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parentid: Option<String>,

    /// Identifier of the creating user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creatorid: Option<String>,

    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Free-form tags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Creation time in milliseconds since the epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,

    /// Last update time in milliseconds since the epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<i64>,

    /// Partition routing key, set only for apps sharing a partition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shardkey: Option<String>,
}

impl ObjectMeta {
    /// Creates an envelope for a new object of the given type.
    pub fn new(object_type: impl Into<String>) -> Self {
        Self {
            object_type: object_type.into(),
            ..Default::default()
        }
    }
}
