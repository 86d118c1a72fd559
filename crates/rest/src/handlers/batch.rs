//! Batch operations.
//!
//! Batch requests isolate per-item failures: malformed or invalid items are
//! dropped and the rest of the batch proceeds. Only request-level problems
//! (unreadable body, missing ids, limit exceeded) fail the whole request.

use std::collections::HashSet;

use serde_json::Value;
use strata_persistence::core::ObjectStorage;
use strata_persistence::projection::FieldFilter;
use strata_persistence::tenant::App;
use strata_persistence::types::{DomainObject, FieldMap};
use strata_persistence::validation::is_valid;
use tokio::io::AsyncRead;
use tracing::{debug, info, warn};

use crate::entity::read_list;
use crate::error::{RestError, RestResult};
use crate::responses::ApiResponse;
use crate::state::AppState;

/// Reads several objects by id.
///
/// Missing ids are silently omitted; the result follows the order of `ids`.
///
/// # Response
///
/// - `200 OK` - The objects found
/// - `400 Bad Request` - `Missing ids.`
pub async fn batch_read<S>(state: &AppState<S>, app: &App, ids: &[String]) -> RestResult<ApiResponse>
where
    S: ObjectStorage + ?Sized,
{
    if ids.is_empty() {
        return Err(RestError::bad_request("Missing ids."));
    }
    let objects = state
        .storage()
        .read_all(&app.identifier(), ids, true)
        .await?;
    debug!(app = %app.identifier(), requested = ids.len(), found = objects.len(), "Batch read");
    Ok(ApiResponse::ok_list(to_field_maps(state, &objects)))
}

/// Creates several objects.
///
/// Each item is materialized and validated on its own; items that fail,
/// or whose id is already taken, are dropped. Survivors are stamped with the app linkage and shard key and
/// stored with one batch call. Newly seen custom types are registered in the
/// background after the response is produced.
///
/// # Response
///
/// - `200 OK` - The objects actually stored, possibly fewer than sent
/// - `400 Bad Request` - Missing, oversized or malformed body
pub async fn batch_create<S, R>(state: &AppState<S>, app: &App, body: R) -> RestResult<ApiResponse>
where
    S: ObjectStorage + ?Sized + 'static,
    R: AsyncRead + Unpin,
{
    let items = read_list(body, state.max_entity_size()).await?;
    let received = items.len();

    let mut objects = Vec::with_capacity(received);
    for (index, item) in items.into_iter().enumerate() {
        let Value::Object(fields) = item else {
            debug!(index, "Dropping non-object batch item");
            continue;
        };
        let mut object = match state.projector().materialize(fields) {
            Ok(object) => object,
            Err(e) => {
                debug!(index, error = %e, "Dropping unreadable batch item");
                continue;
            }
        };
        if !is_valid(&object) {
            debug!(index, object_type = %object.object_type(), "Dropping invalid batch item");
            continue;
        }
        app.assign(&mut object);
        objects.push(object);
    }

    let mut objects = drop_conflicts(state, app, objects).await?;
    if !objects.is_empty() {
        state
            .storage()
            .create_all(&app.identifier(), &mut objects)
            .await?;
        spawn_registration(state, app, objects.clone());
    }

    debug!(app = %app.identifier(), received, created = objects.len(), "Batch create");
    Ok(ApiResponse::ok_list(to_field_maps(state, &objects)))
}

/// Updates several objects.
///
/// Only items carrying both an id and a type are processed. Locked fields
/// are dropped from each item and the rest is merged onto the stored object.
/// Items are not validated: the merge happens in storage, and re-validating
/// would cost a read per item.
///
/// # Response
///
/// - `200 OK` - The projected objects sent to storage
/// - `400 Bad Request` - Missing, oversized or malformed body
pub async fn batch_update<S, R>(state: &AppState<S>, app: &App, body: R) -> RestResult<ApiResponse>
where
    S: ObjectStorage + ?Sized,
    R: AsyncRead + Unpin,
{
    let items = read_list(body, state.max_entity_size()).await?;
    let received = items.len();
    let projector = state.projector();

    let mut objects = Vec::with_capacity(received);
    for (index, item) in items.into_iter().enumerate() {
        let Value::Object(fields) = item else {
            debug!(index, "Dropping non-object batch item");
            continue;
        };
        if projector.identifier(&fields).is_none() || projector.discriminator(&fields).is_none() {
            debug!(index, "Dropping batch item without id or type");
            continue;
        }
        match projector.materialize_filtered(fields, FieldFilter::SkipLocked) {
            Ok(mut object) => {
                app.assign(&mut object);
                objects.push(object);
            }
            Err(e) => debug!(index, error = %e, "Dropping unreadable batch item"),
        }
    }

    let projected = to_field_maps(state, &objects);
    if !objects.is_empty() {
        state
            .storage()
            .update_all(&app.identifier(), &mut objects)
            .await?;
    }

    debug!(app = %app.identifier(), received, updated = projected.len(), "Batch update");
    Ok(ApiResponse::ok_list(projected))
}

/// Deletes several objects by id.
///
/// The ids are resolved to stored objects first; anything that doesn't
/// resolve to an object with an id and a type is skipped.
///
/// # Response
///
/// - `200 OK` - Empty body
/// - `400 Bad Request` - `Missing ids.`, or more ids than the configured limit
pub async fn batch_delete<S>(state: &AppState<S>, app: &App, ids: &[String]) -> RestResult<ApiResponse>
where
    S: ObjectStorage + ?Sized,
{
    if ids.is_empty() {
        return Err(RestError::bad_request("Missing ids."));
    }
    let max = state.max_batch_delete();
    if ids.len() > max {
        return Err(RestError::bad_request(format!(
            "Limit reached. Maximum number of items to delete is {}",
            max
        )));
    }

    let identifier = app.identifier();
    let mut objects: Vec<DomainObject> = state
        .storage()
        .read_all(&identifier, ids, false)
        .await?
        .into_iter()
        .filter(|o| o.id().is_some() && !o.object_type().trim().is_empty())
        .collect();
    for object in &mut objects {
        app.assign_shard_key(object);
    }

    if !objects.is_empty() {
        state.storage().delete_all(&identifier, &objects).await?;
    }
    debug!(app = %identifier, requested = ids.len(), deleted = objects.len(), "Batch delete");
    Ok(ApiResponse::ok_empty())
}

/// Drops items whose client-supplied id is already stored, or repeats an
/// earlier item's id in the same batch.
async fn drop_conflicts<S>(
    state: &AppState<S>,
    app: &App,
    objects: Vec<DomainObject>,
) -> RestResult<Vec<DomainObject>>
where
    S: ObjectStorage + ?Sized,
{
    let requested: Vec<String> = objects
        .iter()
        .filter_map(|o| o.id())
        .filter(|id| !id.trim().is_empty())
        .map(str::to_string)
        .collect();
    if requested.is_empty() {
        return Ok(objects);
    }

    let mut taken: HashSet<String> = state
        .storage()
        .read_all(&app.identifier(), &requested, false)
        .await?
        .iter()
        .filter_map(|o| o.id().map(str::to_string))
        .collect();
    Ok(objects
        .into_iter()
        .filter(|o| match o.id().filter(|id| !id.trim().is_empty()) {
            Some(id) if !taken.insert(id.to_string()) => {
                debug!(id = %id, "Dropping batch item with a taken id");
                false
            }
            _ => true,
        })
        .collect())
}

fn to_field_maps<S: ObjectStorage + ?Sized>(
    state: &AppState<S>,
    objects: &[DomainObject],
) -> Vec<FieldMap> {
    objects
        .iter()
        .map(|o| state.projector().to_field_map(o))
        .collect()
}

/// Hands type registration for `objects` to the background executor.
fn spawn_registration<S>(state: &AppState<S>, app: &App, objects: Vec<DomainObject>)
where
    S: ObjectStorage + ?Sized + 'static,
{
    let storage = state.storage_arc();
    let registry = state.registry_arc();
    let app = app.clone();
    state.executor().spawn(Box::pin(async move {
        match registry
            .register_new_types(storage.as_ref(), Some(&app), &objects)
            .await
        {
            Ok(0) => {}
            Ok(added) => info!(app = %app.identifier(), added, "Registered types from batch"),
            Err(e) => warn!(app = %app.identifier(), error = %e, "Background type registration failed"),
        }
    }));
}
