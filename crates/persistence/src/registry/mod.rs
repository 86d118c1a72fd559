//! Type registry.
//!
//! Maps plural type names to singular ones. Core types come from the
//! statically enumerated built-in descriptors plus any extra names the
//! deployment declares as built-in; they are computed once per registry
//! and never change afterward. Custom types are recorded per app, in the
//! app's `datatypes` mapping.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use once_cell::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::core::ObjectStorage;
use crate::error::StorageResult;
use crate::tenant::App;
use crate::types::{BUILTIN_TYPES, DomainObject, is_valid_type_name, pluralize};

/// Plural type name to singular type name.
pub type TypeMap = BTreeMap<String, String>;

/// Registry of core and per-app custom types.
///
/// # Examples
///
/// ```
/// use strata_persistence::registry::TypeRegistry;
///
/// let registry = TypeRegistry::with_extra_types(["category"]);
/// let core = registry.core_types();
/// assert_eq!(core.get("users").map(String::as_str), Some("user"));
/// assert_eq!(core.get("categories").map(String::as_str), Some("category"));
/// ```
#[derive(Debug, Default)]
pub struct TypeRegistry {
    extra_types: Vec<String>,
    core: OnceCell<TypeMap>,
    discoveries: AtomicUsize,
}

impl TypeRegistry {
    /// Creates a registry whose core types are the built-in shapes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry that also treats the given singular names as core types.
    pub fn with_extra_types<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            extra_types: names.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Returns the core types, discovering them on first use.
    ///
    /// Concurrent first callers block until discovery finishes and all
    /// observe the same map. Discovery runs once per registry.
    pub fn core_types(&self) -> &TypeMap {
        self.core.get_or_init(|| self.discover())
    }

    /// Returns how many times core type discovery has run.
    pub fn discovery_count(&self) -> usize {
        self.discoveries.load(Ordering::Acquire)
    }

    /// Returns the core types merged with the app's custom types.
    ///
    /// App entries take precedence on a plural name collision.
    pub fn all_types(&self, app: &App) -> TypeMap {
        let mut types = self.core_types().clone();
        types.extend(
            app.datatypes()
                .iter()
                .map(|(plural, singular)| (plural.clone(), singular.clone())),
        );
        types
    }

    /// Returns `true` if the object's type is a core type or registered by the app.
    pub fn is_known(&self, app: &App, object: &DomainObject) -> bool {
        let plural = object.plural();
        self.core_types().contains_key(&plural) || app.datatypes().contains_key(&plural)
    }

    /// Returns the types among `objects` that neither the core nor the app knows.
    pub fn unregistered_types(&self, app: &App, objects: &[DomainObject]) -> TypeMap {
        objects
            .iter()
            .filter(|o| is_valid_type_name(o.object_type()) && !self.is_known(app, o))
            .map(|o| (o.plural(), o.object_type().to_string()))
            .collect()
    }

    /// Records the custom types of `objects` on the app record.
    ///
    /// The latest stored app record is re-read before merging so entries
    /// registered concurrently are kept. All new types are written with a
    /// single update. Returns the number of types added.
    pub async fn register_new_types<S>(
        &self,
        storage: &S,
        app: Option<&App>,
        objects: &[DomainObject],
    ) -> StorageResult<usize>
    where
        S: ObjectStorage + ?Sized,
    {
        let Some(app) = app else {
            return Ok(0);
        };
        if objects.is_empty() {
            return Ok(0);
        }
        let pending = self.unregistered_types(app, objects);
        if pending.is_empty() {
            return Ok(0);
        }

        let partition = app.partition();
        let identifier = app.identifier();
        let stored = storage.read(&partition, &identifier.object_id()).await?;
        let exists = stored.is_some();
        let mut latest = match stored {
            Some(object) => App::try_from(object)?,
            None => app.clone(),
        };

        let mut added = 0;
        for (plural, singular) in pending {
            if latest.add_datatype(plural, singular) {
                added += 1;
            }
        }
        if added == 0 {
            return Ok(0);
        }

        let mut record = latest.to_object();
        if exists {
            storage.update(&partition, &mut record).await?;
        } else {
            storage.create(&partition, &mut record).await?;
        }
        info!(app = %identifier, added, "Registered new types");
        Ok(added)
    }

    fn discover(&self) -> TypeMap {
        self.discoveries.fetch_add(1, Ordering::AcqRel);
        let mut types = TypeMap::new();

        for descriptor in BUILTIN_TYPES {
            insert_core(&mut types, descriptor.plural, descriptor.singular);
        }
        for singular in &self.extra_types {
            let singular = singular.trim();
            if !is_valid_type_name(singular) {
                warn!(type_name = %singular, "Skipping invalid core type name");
                continue;
            }
            insert_core(&mut types, &pluralize(singular), singular);
        }

        debug!(count = types.len(), "Discovered core types");
        types
    }
}

fn insert_core(types: &mut TypeMap, plural: &str, singular: &str) {
    if let Some(existing) = types.get(plural) {
        warn!(
            plural = %plural,
            singular = %singular,
            existing = %existing,
            "Skipping duplicate core type"
        );
        return;
    }
    types.insert(plural.to_string(), singular.to_string());
}
