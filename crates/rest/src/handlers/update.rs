//! Update operation.
//!
//! `PUT /{plural}/{id}` with the fields to change as the body.

use strata_persistence::core::ObjectStorage;
use strata_persistence::projection::FieldFilter;
use strata_persistence::tenant::App;
use strata_persistence::types::DomainObject;
use strata_persistence::validation::validate;
use tokio::io::AsyncRead;
use tracing::debug;

use crate::entity::read_object;
use crate::error::{RestError, RestResult};
use crate::responses::ApiResponse;
use crate::state::AppState;

/// Updates an existing object.
///
/// `object` is the stored target, as looked up by the caller. The body is
/// applied onto it and the result replaces the stored object, so a `null`
/// value removes the field. Fields locked for the object's type are left
/// untouched whatever the body says, and the shard key is re-stamped from
/// the app.
///
/// # Response
///
/// - `200 OK` - The updated object
/// - `400 Bad Request` - Missing, oversized or malformed body, or failed validation
/// - `404 Not Found` - No target, or the target is not linked to this app
pub async fn update_object<S, R>(
    state: &AppState<S>,
    app: &App,
    object: Option<DomainObject>,
    body: R,
) -> RestResult<ApiResponse>
where
    S: ObjectStorage + ?Sized,
    R: AsyncRead + Unpin,
{
    let fields = read_object(body, state.max_entity_size()).await?;

    let identifier = app.identifier();
    let Some(mut object) =
        object.filter(|o| o.id().is_some() && o.appid() == Some(identifier.as_str()))
    else {
        return Err(RestError::NotFound);
    };

    app.assign_shard_key(&mut object);
    state
        .projector()
        .project(&mut object, fields, FieldFilter::SkipLocked)?;

    let errors = validate(&object);
    if !errors.is_empty() {
        debug!(app = %identifier, id = ?object.id(), ?errors, "Rejected invalid update");
        return Err(RestError::BadRequest { messages: errors });
    }

    state.storage().update(&identifier, &mut object).await?;
    debug!(app = %identifier, id = ?object.id(), "Object updated");
    Ok(ApiResponse::ok(state.projector().to_field_map(&object)))
}
