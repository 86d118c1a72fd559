//! Core types for persisted objects.
//!
//! This module provides the object model shared by every layer:
//!
//! - [`ObjectMeta`] - The envelope every object carries
//! - [`DomainObject`] / [`ObjectBody`] - Envelope plus a built-in or custom body
//! - [`TypeDescriptor`] - Static declaration of a built-in type's fields
//! - [`pluralize`] - Plural names for custom types

mod descriptor;
mod meta;
mod naming;
mod object;
mod shapes;

pub use descriptor::{Constraint, FieldSpec, TypeDescriptor};
pub use meta::{
    APPID_FIELD, ENVELOPE_FIELDS, ID_FIELD, ObjectMeta, SERVER_ASSIGNED_FIELDS, SHARDKEY_FIELD,
    TYPE_FIELD, envelope_field,
};
pub use naming::{is_valid_type_name, pluralize};
pub use object::{DomainObject, FieldMap, ObjectBody};
pub use shapes::{
    ADDRESS, APP, AddressFields, AppFields, BUILTIN_TYPES, TAG, TRANSLATION, TagFields,
    TranslationFields, USER, UserFields, VOTE, VoteFields, builtin_descriptor,
};
