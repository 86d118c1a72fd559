//! Request body decoding.
//!
//! Bodies are read from any [`AsyncRead`] with a hard size limit and decoded
//! as JSON into the requested shape. Empty and oversized bodies, malformed
//! JSON and I/O failures are reported as distinct errors.

use serde::de::DeserializeOwned;
use serde_json::Value;
use strata_persistence::types::FieldMap;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, error};

use crate::error::{RestError, RestResult};

const BYTES_PER_KB: usize = 1024;
const BYTES_PER_MB: usize = 1024 * BYTES_PER_KB;

/// Reads a body and decodes it as `T`.
///
/// # Errors
///
/// * `BadRequest` - The body is empty, larger than `max_bytes`, or not valid JSON for `T`
/// * `InternalError` - Reading the body failed
pub async fn read_entity<T, R>(reader: R, max_bytes: usize) -> RestResult<T>
where
    T: DeserializeOwned,
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    let limit = u64::try_from(max_bytes).unwrap_or(u64::MAX).saturating_add(1);
    if let Err(e) = reader.take(limit).read_to_end(&mut buf).await {
        error!(error = %e, "Failed to read request body");
        return Err(RestError::InternalError {
            message: Some(e.to_string()),
        });
    }

    if buf.is_empty() {
        return Err(RestError::bad_request("Missing request body."));
    }
    if buf.len() > max_bytes {
        return Err(RestError::bad_request(too_large_message(max_bytes)));
    }

    serde_json::from_slice(&buf).map_err(|e| {
        debug!(error = %e, "Malformed request body");
        RestError::bad_request(e.to_string())
    })
}

/// Reads a body holding a single JSON object.
pub async fn read_object<R>(reader: R, max_bytes: usize) -> RestResult<FieldMap>
where
    R: AsyncRead + Unpin,
{
    read_entity(reader, max_bytes).await
}

/// Reads a body holding a JSON array. Elements are returned undecoded so
/// callers can drop malformed items individually.
pub async fn read_list<R>(reader: R, max_bytes: usize) -> RestResult<Vec<Value>>
where
    R: AsyncRead + Unpin,
{
    read_entity(reader, max_bytes).await
}

/// Formats the oversized-body message, e.g. `Request is too large - the maximum is 1 MB.`
///
/// Limits below one megabyte are given in kilobytes.
pub fn too_large_message(max_bytes: usize) -> String {
    format!(
        "Request is too large - the maximum is {}.",
        format_size(max_bytes)
    )
}

/// Whole units print as integers, anything else with two decimals.
fn format_size(bytes: usize) -> String {
    let (unit, name) = if bytes >= BYTES_PER_MB {
        (BYTES_PER_MB, "MB")
    } else {
        (BYTES_PER_KB, "KB")
    };
    if bytes % unit == 0 {
        format!("{} {}", bytes / unit, name)
    } else {
        format!("{:.2} {}", bytes as f64 / unit as f64, name)
    }
}
