//! Response types for the object API.
//!
//! - [`ApiResponse`] - Successful results with a domain payload
//! - [`ErrorBody`] / [`status_response`] - The structured failure body

mod api;

pub use crate::error::{ErrorBody, status_response};
pub use api::{ApiResponse, Payload};
