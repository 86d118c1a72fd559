//! Read operation.
//!
//! `GET /{plural}/{id}`

use strata_persistence::core::ObjectStorage;
use strata_persistence::tenant::App;
use tracing::debug;

use crate::error::{RestError, RestResult};
use crate::responses::ApiResponse;
use crate::state::AppState;

/// Reads a single object from the app's partition.
///
/// # Response
///
/// - `200 OK` - The object
/// - `404 Not Found` - No such object
pub async fn read_object<S>(state: &AppState<S>, app: &App, id: &str) -> RestResult<ApiResponse>
where
    S: ObjectStorage + ?Sized,
{
    debug!(app = %app.identifier(), id = %id, "Processing read request");
    match state.storage().read(&app.identifier(), id).await? {
        Some(object) => Ok(ApiResponse::ok(state.projector().to_field_map(&object))),
        None => Err(RestError::NotFound),
    }
}
