//! Built-in object shapes.
//!
//! Each shape is the typed body of one core object type, paired with the
//! static [`TypeDescriptor`] that declares its fields. All body fields are
//! optional so that a partially populated object only carries what was set.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::descriptor::{Constraint, FieldSpec, TypeDescriptor};

/// Descriptor of the `app` type.
pub static APP: TypeDescriptor = TypeDescriptor {
    singular: "app",
    plural: "apps",
    fields: &[
        FieldSpec::locked("shared", &[]),
        FieldSpec::locked("datatypes", &[]),
        FieldSpec::open("active", &[]),
    ],
};

/// Descriptor of the `user` type.
pub static USER: TypeDescriptor = TypeDescriptor {
    singular: "user",
    plural: "users",
    fields: &[
        FieldSpec::locked("identifier", &[Constraint::Required]),
        FieldSpec::open("email", &[Constraint::Required, Constraint::Email]),
        FieldSpec::open("groups", &[]),
        FieldSpec::open("active", &[]),
        FieldSpec::open("picture", &[Constraint::MaxLength(2048)]),
    ],
};

/// Descriptor of the `tag` type.
pub static TAG: TypeDescriptor = TypeDescriptor {
    singular: "tag",
    plural: "tags",
    fields: &[
        FieldSpec::locked("tag", &[Constraint::Required, Constraint::MaxLength(255)]),
        FieldSpec::open("count", &[Constraint::Min(0)]),
    ],
};

/// Descriptor of the `address` type.
pub static ADDRESS: TypeDescriptor = TypeDescriptor {
    singular: "address",
    plural: "addresses",
    fields: &[
        FieldSpec::open("address", &[Constraint::Required, Constraint::MaxLength(255)]),
        FieldSpec::open("country", &[Constraint::Required]),
        FieldSpec::open("latlng", &[Constraint::LatLng]),
        FieldSpec::open("phone", &[Constraint::MaxLength(255)]),
    ],
};

/// Descriptor of the `translation` type.
pub static TRANSLATION: TypeDescriptor = TypeDescriptor {
    singular: "translation",
    plural: "translations",
    fields: &[
        FieldSpec::locked("locale", &[Constraint::Required, Constraint::Locale]),
        FieldSpec::locked("thekey", &[Constraint::Required]),
        FieldSpec::open("value", &[Constraint::Required]),
        FieldSpec::open("approved", &[]),
    ],
};

/// Descriptor of the `vote` type.
pub static VOTE: TypeDescriptor = TypeDescriptor {
    singular: "vote",
    plural: "votes",
    fields: &[
        FieldSpec::open("value", &[Constraint::Required, Constraint::Min(-1), Constraint::Max(1)]),
        FieldSpec::open("expiresAfter", &[Constraint::Min(0)]),
    ],
};

/// All built-in object types, in registration order.
pub static BUILTIN_TYPES: &[&TypeDescriptor] = &[&APP, &USER, &TAG, &ADDRESS, &TRANSLATION, &VOTE];

/// Looks up a built-in descriptor by singular type name.
pub fn builtin_descriptor(singular: &str) -> Option<&'static TypeDescriptor> {
    BUILTIN_TYPES.iter().copied().find(|d| d.singular == singular)
}

/// Body of an `app` object: tenant settings and registered custom types.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppFields {
    /// Whether the app shares a storage partition with other apps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared: Option<bool>,

    /// Custom types registered by the app, plural to singular.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub datatypes: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

/// Body of a `user` object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserFields {
    /// External identity, e.g. `fb:1234`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}

/// Body of a `tag` object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Number of objects carrying the tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<i64>,
}

/// Body of an `address` object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latlng: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Body of a `translation` object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    /// Key of the translated string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thekey: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved: Option<bool>,
}

/// Body of a `vote` object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteFields {
    /// `1` for an upvote, `-1` for a downvote.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<i64>,
    /// Seconds after which the vote can no longer be changed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_after: Option<i64>,
}
