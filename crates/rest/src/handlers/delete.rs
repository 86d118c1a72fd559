//! Delete operation.
//!
//! `DELETE /{plural}/{id}`

use strata_persistence::core::ObjectStorage;
use strata_persistence::tenant::App;
use strata_persistence::types::DomainObject;
use tracing::debug;

use crate::error::{RestError, RestResult};
use crate::responses::ApiResponse;
use crate::state::AppState;

/// Deletes an object.
///
/// The target must carry both an identifier and an app linkage. The linkage
/// and shard key are re-stamped from the app before deleting, so an object
/// can only ever be removed from the caller's own partition.
///
/// # Response
///
/// - `200 OK` - Empty body
/// - `400 Bad Request` - No target, or the target lacks an id or app linkage
pub async fn delete_object<S>(
    state: &AppState<S>,
    app: &App,
    object: Option<DomainObject>,
) -> RestResult<ApiResponse>
where
    S: ObjectStorage + ?Sized,
{
    let Some(mut object) = object.filter(|o| o.id().is_some() && o.appid().is_some()) else {
        return Err(RestError::BadRequest {
            messages: Vec::new(),
        });
    };

    app.assign(&mut object);
    state.storage().delete(&app.identifier(), &object).await?;
    debug!(app = %app.identifier(), id = ?object.id(), "Object deleted");
    Ok(ApiResponse::ok_empty())
}
