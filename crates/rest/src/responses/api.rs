//! Successful operation results.

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use http::{StatusCode, header};
use serde_json::Value;
use strata_persistence::types::FieldMap;

/// The domain payload of a successful operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// A single object.
    Object(FieldMap),
    /// A collection of objects.
    Objects(Vec<FieldMap>),
    /// No body.
    Empty,
}

/// A successful operation result: status, payload and optional location.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    status: StatusCode,
    payload: Payload,
    location: Option<String>,
}

impl ApiResponse {
    /// `200 OK` with a single object.
    pub fn ok(object: FieldMap) -> Self {
        Self::new(StatusCode::OK, Payload::Object(object))
    }

    /// `200 OK` with a collection.
    pub fn ok_list(objects: Vec<FieldMap>) -> Self {
        Self::new(StatusCode::OK, Payload::Objects(objects))
    }

    /// `200 OK` without a body.
    pub fn ok_empty() -> Self {
        Self::new(StatusCode::OK, Payload::Empty)
    }

    /// `201 Created` with the stored object and its URI.
    pub fn created(object: FieldMap, location: Option<String>) -> Self {
        Self {
            location,
            ..Self::new(StatusCode::CREATED, Payload::Object(object))
        }
    }

    fn new(status: StatusCode, payload: Payload) -> Self {
        Self {
            status,
            payload,
            location: None,
        }
    }

    /// Returns the status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the payload.
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Returns the location of a created object.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Returns the payload as a JSON value, or `None` for an empty body.
    pub fn body(&self) -> Option<Value> {
        match &self.payload {
            Payload::Object(object) => Some(Value::Object(object.clone())),
            Payload::Objects(objects) => Some(Value::Array(
                objects.iter().cloned().map(Value::Object).collect(),
            )),
            Payload::Empty => None,
        }
    }

    /// Returns the objects of a collection payload.
    pub fn objects(&self) -> &[FieldMap] {
        match &self.payload {
            Payload::Objects(objects) => objects,
            _ => &[],
        }
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let mut response = match self.body() {
            Some(body) => (self.status, Json(body)).into_response(),
            None => self.status.into_response(),
        };
        if let Some(location) = self.location.as_deref()
            && let Ok(value) = location.parse()
        {
            response.headers_mut().insert(header::LOCATION, value);
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> FieldMap {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_created() {
        let response = ApiResponse::created(map(json!({"id": "1"})), Some("/dogs/1".to_string()));
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.location(), Some("/dogs/1"));
        assert_eq!(response.body(), Some(json!({"id": "1"})));
    }

    #[test]
    fn test_list_body() {
        let response = ApiResponse::ok_list(vec![map(json!({"id": "1"})), map(json!({"id": "2"}))]);
        assert_eq!(response.body(), Some(json!([{"id": "1"}, {"id": "2"}])));
        assert_eq!(response.objects().len(), 2);
    }

    #[tokio::test]
    async fn test_into_response_sets_location() {
        let response = ApiResponse::created(map(json!({"id": "1"})), Some("/dogs/1".to_string()))
            .into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()[header::LOCATION], "/dogs/1");
    }

    #[tokio::test]
    async fn test_empty_body() {
        let response = ApiResponse::ok_empty().into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(bytes.is_empty());
    }
}
