//! Success response envelope.
//!
//! Every successful operation responds with
//! `{ "message": ..., "data": { "<slug>": <payload> } }` at status 200;
//! destroy responds with the message alone. Error bodies come from
//! [`crate::errors::ApiError`].

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::errors::ApiError;

/// Build the `{message, data: {key: payload}}` envelope body.
///
/// # Errors
///
/// Returns `ApiError::Internal` if the payload fails to serialize.
pub fn envelope_value(message: &str, key: &str, payload: impl Serialize) -> Result<Value, ApiError> {
    let payload = serde_json::to_value(payload)
        .map_err(|err| ApiError::internal("Failed to serialize response", Some(err.to_string())))?;
    let mut data = Map::new();
    data.insert(key.to_string(), payload);
    Ok(json!({ "message": message, "data": data }))
}

/// Wrap a payload in the success envelope, keyed by the resource slug.
///
/// # Errors
///
/// Returns `ApiError::Internal` if the payload fails to serialize.
pub fn envelope(message: &str, key: &str, payload: impl Serialize) -> Result<Response, ApiError> {
    let body = envelope_value(message, key, payload)?;
    Ok((StatusCode::OK, Json(body)).into_response())
}

/// Success response carrying only a message (used by destroy).
#[must_use]
pub fn message_only(message: &str) -> Response {
    (StatusCode::OK, Json(json!({ "message": message }))).into_response()
}
