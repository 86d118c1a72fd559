//! Type descriptors.
//!
//! A [`TypeDescriptor`] is the static description of one built-in object type:
//! its singular and plural names and the fields it declares, each with its
//! lock flag and constraint set. Descriptors are enumerated explicitly at
//! compile time, which is what the type registry discovers core types from.

/// A single constraint attached to a declared field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// The field must be present, non-null and, for strings, non-blank.
    Required,
    /// String fields must be at most this many characters long.
    MaxLength(usize),
    /// Integer fields must be at least this value.
    Min(i64),
    /// Integer fields must be at most this value.
    Max(i64),
    /// String fields must look like an email address.
    Email,
    /// String fields must be a `lat,lng` coordinate pair.
    LatLng,
    /// String fields must be a locale tag such as `en` or `en_GB`.
    Locale,
}

/// A field declared by an object type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Wire name of the field.
    pub name: &'static str,
    /// Locked fields are only set at creation and ignored on update.
    pub locked: bool,
    /// Constraints checked by the validator.
    pub constraints: &'static [Constraint],
}

impl FieldSpec {
    /// Declares an unlocked field.
    pub const fn open(name: &'static str, constraints: &'static [Constraint]) -> Self {
        Self {
            name,
            locked: false,
            constraints,
        }
    }

    /// Declares a locked field.
    pub const fn locked(name: &'static str, constraints: &'static [Constraint]) -> Self {
        Self {
            name,
            locked: true,
            constraints,
        }
    }
}

/// Static description of a built-in object type.
#[derive(Debug, PartialEq, Eq)]
pub struct TypeDescriptor {
    /// Singular (canonical) type name, e.g. `user`.
    pub singular: &'static str,
    /// Plural type name, e.g. `users`.
    pub plural: &'static str,
    /// Fields declared by the type, excluding the common envelope.
    pub fields: &'static [FieldSpec],
}

impl TypeDescriptor {
    /// Returns the declaration of a field, if the type declares it.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns `true` if the type declares the field.
    pub fn declares(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Returns `true` if the field is declared and locked.
    pub fn is_locked(&self, name: &str) -> bool {
        self.field(name).map(|f| f.locked).unwrap_or(false)
    }
}
