//! Configuration for the object API.
//!
//! This module provides configuration types for the API layer, supporting
//! both programmatic configuration and environment variable overrides.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `STRATA_MAX_ENTITY_SIZE` | 1048576 | Max request body (bytes) |
//! | `STRATA_MAX_BATCH_DELETE` | 30 | Max ids per batch delete |
//! | `STRATA_CORE_TYPES` | | Extra singular type names treated as built-in (comma-separated) |
//! | `STRATA_ID_FIELD` | id | Wire name of the identifier field |
//! | `STRATA_TYPE_FIELD` | type | Wire name of the type discriminator |
//! | `STRATA_ROOT_APP` | root | Identifier of the root app |
//! | `STRATA_LOG_LEVEL` | info | Log level |
//!
//! # Example
//!
//! ```rust
//! use strata_rest::RestConfig;
//!
//! // Create from environment
//! let config = RestConfig::from_env();
//!
//! // Or create programmatically
//! let config = RestConfig {
//!     max_batch_delete: 100,
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

use clap::Parser;
use strata_persistence::projection::FieldNames;
use strata_persistence::tenant::AppId;
use strata_persistence::types::is_valid_type_name;

/// Default maximum request body size, 1 MB.
pub const DEFAULT_MAX_ENTITY_SIZE: usize = 1024 * 1024;

/// Default maximum number of ids in one batch delete.
pub const DEFAULT_MAX_BATCH_DELETE: usize = 30;

/// Configuration for the object API.
///
/// This struct can be constructed from environment variables using [`RestConfig::from_env`],
/// from command line arguments using [`RestConfig::parse`], or programmatically.
#[derive(Debug, Clone, Parser)]
#[command(name = "strata-rest")]
#[command(about = "Strata object persistence API")]
pub struct RestConfig {
    /// Maximum request body size in bytes.
    #[arg(long, env = "STRATA_MAX_ENTITY_SIZE", default_value = "1048576")]
    pub max_entity_size_bytes: usize,

    /// Maximum number of ids accepted by a batch delete.
    #[arg(long, env = "STRATA_MAX_BATCH_DELETE", default_value = "30")]
    pub max_batch_delete: usize,

    /// Extra singular type names treated as built-in types.
    #[arg(long, env = "STRATA_CORE_TYPES", value_delimiter = ',')]
    pub extra_core_types: Vec<String>,

    /// Wire name of the identifier field.
    #[arg(long, env = "STRATA_ID_FIELD", default_value = "id")]
    pub id_field: String,

    /// Wire name of the type discriminator field.
    #[arg(long, env = "STRATA_TYPE_FIELD", default_value = "type")]
    pub type_field: String,

    /// Identifier of the root app, used for unauthenticated requests.
    #[arg(long, env = "STRATA_ROOT_APP", default_value = "root")]
    pub root_app: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "STRATA_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            max_entity_size_bytes: DEFAULT_MAX_ENTITY_SIZE,
            max_batch_delete: DEFAULT_MAX_BATCH_DELETE,
            extra_core_types: Vec::new(),
            id_field: "id".to_string(),
            type_field: "type".to_string(),
            root_app: "root".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl RestConfig {
    /// Creates a new RestConfig from environment variables.
    ///
    /// This is a convenience method that parses environment variables without
    /// requiring command line arguments.
    pub fn from_env() -> Self {
        // Try to parse from environment, falling back to defaults
        Self::try_parse().unwrap_or_default()
    }

    /// Returns the configured wire names for the projector.
    pub fn field_names(&self) -> FieldNames {
        FieldNames {
            id: self.id_field.clone(),
            object_type: self.type_field.clone(),
        }
    }

    /// Returns the root app identifier.
    pub fn root_app_id(&self) -> AppId {
        AppId::new(self.root_app.as_str())
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.max_entity_size_bytes == 0 {
            errors.push("Max entity size cannot be 0".to_string());
        }

        if self.max_batch_delete == 0 {
            errors.push("Max batch delete size cannot be 0".to_string());
        }

        if self.id_field.trim().is_empty() {
            errors.push("Id field name cannot be empty".to_string());
        }

        if self.type_field.trim().is_empty() {
            errors.push("Type field name cannot be empty".to_string());
        }

        if self.id_field == self.type_field {
            errors.push("Id and type field names must differ".to_string());
        }

        if self.root_app_id().is_blank() {
            errors.push("Root app cannot be empty".to_string());
        }

        for name in &self.extra_core_types {
            if !is_valid_type_name(name.trim()) {
                errors.push(format!("Invalid core type name: '{}'", name));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a configuration suitable for testing.
    ///
    /// Uses small limits so size and batch checks are easy to trigger.
    pub fn for_testing() -> Self {
        Self {
            max_entity_size_bytes: 64 * 1024,
            max_batch_delete: 5,
            log_level: "debug".to_string(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RestConfig::default();
        assert_eq!(config.max_entity_size_bytes, 1_048_576);
        assert_eq!(config.max_batch_delete, 30);
        assert_eq!(config.root_app_id(), AppId::new("root"));
        assert!(config.extra_core_types.is_empty());
    }

    #[test]
    fn test_parse_matches_default() {
        let parsed = RestConfig::try_parse_from(["strata-rest"]).unwrap();
        let default = RestConfig::default();
        assert_eq!(parsed.max_entity_size_bytes, default.max_entity_size_bytes);
        assert_eq!(parsed.max_batch_delete, default.max_batch_delete);
        assert_eq!(parsed.id_field, default.id_field);
        assert_eq!(parsed.root_app, default.root_app);
    }

    #[test]
    fn test_parse_core_types() {
        let parsed =
            RestConfig::try_parse_from(["strata-rest", "--extra-core-types", "box,category"])
                .unwrap();
        assert_eq!(parsed.extra_core_types, vec!["box", "category"]);
    }

    #[test]
    fn test_field_names() {
        let config = RestConfig {
            id_field: "_id".to_string(),
            ..Default::default()
        };
        let names = config.field_names();
        assert_eq!(names.id, "_id");
        assert_eq!(names.object_type, "type");
    }

    #[test]
    fn test_validate_valid() {
        assert!(RestConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_invalid_limits() {
        let config = RestConfig {
            max_entity_size_bytes: 0,
            max_batch_delete: 0,
            ..Default::default()
        };
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_validate_field_names() {
        let config = RestConfig {
            id_field: "type".to_string(),
            extra_core_types: vec!["not valid".to_string()],
            ..Default::default()
        };
        let errors = config.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.contains("must differ")));
        assert!(errors.iter().any(|e| e.contains("not valid")));
    }

    #[test]
    fn test_for_testing() {
        let config = RestConfig::for_testing();
        assert_eq!(config.max_batch_delete, 5);
        assert!(config.validate().is_ok());
    }
}
