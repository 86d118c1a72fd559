//! Test data fixtures.

use serde_json::{Value, json};
use strata_persistence::types::FieldMap;

/// Serializes a JSON value into a request body.
pub fn body(value: Value) -> Vec<u8> {
    serde_json::to_vec(&value).expect("fixture serializes")
}

/// Converts a JSON object literal into a field map.
pub fn fields(value: Value) -> FieldMap {
    value.as_object().cloned().expect("fixture is an object")
}

/// A valid user.
pub fn user(identifier: &str, email: &str) -> Value {
    json!({
        "type": "user",
        "identifier": identifier,
        "email": email,
        "name": "Test User"
    })
}

/// A valid custom object.
pub fn custom(object_type: &str, name: &str) -> Value {
    json!({
        "type": object_type,
        "name": name,
        "color": "brown"
    })
}

/// A custom object that fails envelope validation.
pub fn invalid_custom(object_type: &str) -> Value {
    json!({
        "type": object_type,
        "name": "x".repeat(300)
    })
}
