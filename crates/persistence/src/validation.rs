//! Object validation.
//!
//! Validation runs against a materialized [`DomainObject`], never against the
//! raw field map, so every entry point enforces the same constraints. The
//! envelope rules apply to all objects; built-in types add the constraints
//! declared in their [`TypeDescriptor`](crate::types::TypeDescriptor).
//! Custom types are only checked against the envelope.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::error::ValidationError;
use crate::types::{
    Constraint, DomainObject, ENVELOPE_FIELDS, FieldMap, FieldSpec, TYPE_FIELD, is_valid_type_name,
};

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?)+$")
        .expect("email pattern is valid")
});

static LOCALE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z]{2,3}(?:[_-][A-Za-z]{2,4})?$").expect("locale pattern is valid"));

/// Validates an object, returning one message per violated constraint.
///
/// An empty list means the object is valid.
///
/// # Examples
///
/// ```
/// use strata_persistence::types::DomainObject;
/// use strata_persistence::validation::validate;
///
/// let tag = DomainObject::new("tag");
/// assert_eq!(validate(&tag), vec!["'tag' is required".to_string()]);
/// ```
pub fn validate(object: &DomainObject) -> Vec<String> {
    let mut errors = Vec::new();

    let object_type = object.object_type();
    if object_type.trim().is_empty() {
        errors.push(format!("'{TYPE_FIELD}' is missing"));
    } else if !is_valid_type_name(object_type) {
        errors.push(format!("'{TYPE_FIELD}' has an invalid format"));
    }

    let fields = object.to_field_map();
    let envelope = ENVELOPE_FIELDS.iter().filter(|spec| spec.name != TYPE_FIELD);
    let declared = object.descriptor().map(|d| d.fields).unwrap_or_default();
    for spec in envelope.chain(declared.iter()) {
        check_field(spec, &fields, &mut errors);
    }
    errors
}

/// Returns `true` if the object passes validation.
pub fn is_valid(object: &DomainObject) -> bool {
    validate(object).is_empty()
}

/// Validates an object, converting violations into a [`ValidationError`].
pub fn ensure_valid(object: &DomainObject) -> Result<(), ValidationError> {
    let messages = validate(object);
    if messages.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::InvalidObject { messages })
    }
}

fn check_field(spec: &FieldSpec, fields: &FieldMap, errors: &mut Vec<String>) {
    let name = spec.name;
    let value = fields.get(name).filter(|v| !is_blank(v));

    let Some(value) = value else {
        if spec.constraints.contains(&Constraint::Required) {
            errors.push(format!("'{name}' is required"));
        }
        return;
    };

    for constraint in spec.constraints {
        let violation = match *constraint {
            Constraint::Required => None,
            Constraint::MaxLength(max) => value
                .as_str()
                .filter(|s| s.chars().count() > max)
                .map(|_| format!("'{name}' must be at most {max} characters long")),
            Constraint::Min(min) => as_number(value)
                .filter(|n| *n < min as f64)
                .map(|_| format!("'{name}' must be at least {min}")),
            Constraint::Max(max) => as_number(value)
                .filter(|n| *n > max as f64)
                .map(|_| format!("'{name}' must be at most {max}")),
            Constraint::Email => value
                .as_str()
                .filter(|s| !EMAIL.is_match(s))
                .map(|_| format!("'{name}' must be a valid email address")),
            Constraint::LatLng => value
                .as_str()
                .filter(|s| !is_lat_lng(s))
                .map(|_| format!("'{name}' has an invalid format")),
            Constraint::Locale => value
                .as_str()
                .filter(|s| !LOCALE.is_match(s))
                .map(|_| format!("'{name}' has an invalid format")),
        };
        errors.extend(violation);
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    value.as_f64()
}

/// Checks a `lat,lng` pair such as `40.7128,-74.0060`.
fn is_lat_lng(value: &str) -> bool {
    let Some((lat, lng)) = value.split_once(',') else {
        return false;
    };
    match (lat.trim().parse::<f64>(), lng.trim().parse::<f64>()) {
        (Ok(lat), Ok(lng)) => (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng),
        _ => false,
    }
}
