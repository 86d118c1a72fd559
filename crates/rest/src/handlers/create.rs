//! Create operation.
//!
//! `POST /{plural}` with a single object as the body.

use std::slice;

use strata_persistence::core::ObjectStorage;
use strata_persistence::tenant::App;
use strata_persistence::validation::validate;
use tokio::io::AsyncRead;
use tracing::{debug, warn};

use crate::entity::read_object;
use crate::error::{RestError, RestResult};
use crate::responses::ApiResponse;
use crate::state::AppState;

/// Creates a single object.
///
/// The type comes from `type_hint` when given (the collection the request
/// was addressed to), otherwise from the body's type discriminator. The app
/// linkage and shard key are always stamped by the server. Newly seen custom
/// types are registered on the app before the object is validated.
///
/// # Response
///
/// - `201 Created` - The stored object, with its URI as the location
/// - `400 Bad Request` - Missing, oversized or malformed body, or failed validation
pub async fn create_object<S, R>(
    state: &AppState<S>,
    app: &App,
    type_hint: Option<&str>,
    body: R,
) -> RestResult<ApiResponse>
where
    S: ObjectStorage + ?Sized,
    R: AsyncRead + Unpin,
{
    let mut fields = read_object(body, state.max_entity_size()).await?;
    if let Some(object_type) = type_hint.filter(|t| !t.trim().is_empty()) {
        state.projector().inject_type(&mut fields, object_type);
    }

    let mut object = state.projector().materialize(fields)?;
    app.assign(&mut object);

    // A lost registration is repaired the next time the type is seen.
    if let Err(e) = state
        .registry()
        .register_new_types(state.storage(), Some(app), slice::from_ref(&object))
        .await
    {
        warn!(app = %app.identifier(), object_type = %object.object_type(), error = %e, "Failed to register type");
    }

    let errors = validate(&object);
    if !errors.is_empty() {
        debug!(app = %app.identifier(), object_type = %object.object_type(), ?errors, "Rejected invalid object");
        return Err(RestError::BadRequest { messages: errors });
    }

    let id = state
        .storage()
        .create(&app.identifier(), &mut object)
        .await?;
    if id.trim().is_empty() {
        return Err(RestError::bad_request("Failed to create object."));
    }

    debug!(app = %app.identifier(), id = %id, object_type = %object.object_type(), "Object created");
    Ok(ApiResponse::created(
        state.projector().to_field_map(&object),
        object.object_uri(),
    ))
}
