//! App identifier type.
//!
//! This module defines the [`AppId`] type, the identifier of the tenant that
//! owns a set of objects. App records themselves are stored with the object id
//! `app:<identifier>`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Prefix of the object id under which an app record is stored.
pub const APP_ID_PREFIX: &str = "app:";

/// An opaque app (tenant) identifier.
///
/// # Examples
///
/// ```
/// use strata_persistence::tenant::AppId;
///
/// let app = AppId::from_object_id("app:acme");
/// assert_eq!(app.as_str(), "acme");
/// assert_eq!(app.object_id(), "app:acme");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppId(String);

impl AppId {
    /// Creates a new app ID from the given string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derives the app ID from an app record's object id, stripping the
    /// `app:` prefix if present.
    pub fn from_object_id(object_id: &str) -> Self {
        Self::new(object_id.strip_prefix(APP_ID_PREFIX).unwrap_or(object_id))
    }

    /// Returns the object id of this app's record.
    pub fn object_id(&self) -> String {
        format!("{}{}", APP_ID_PREFIX, self.0)
    }

    /// Returns the app ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the identifier is blank.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AppId({})", self.0)
    }
}

impl FromStr for AppId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(AppId::new(s))
    }
}

impl From<&str> for AppId {
    fn from(s: &str) -> Self {
        AppId::new(s)
    }
}

impl From<String> for AppId {
    fn from(s: String) -> Self {
        AppId::new(s)
    }
}

impl AsRef<str> for AppId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
