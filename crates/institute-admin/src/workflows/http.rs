//! Request decoding and error bodies shared by the workflow routers.

use axum::body::Bytes;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{json, Map, Value};

use crate::store::RepositoryError;
use crate::validation::FieldErrors;

pub(crate) const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Parse a request body into a JSON value. An empty body is an empty object.
pub(crate) fn json_body(bytes: &Bytes) -> Result<Value, FieldErrors> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_slice(bytes)
        .map_err(|err| FieldErrors::single(NON_FIELD_ERRORS, format!("Malformed JSON: {err}")))
}

/// Deserialize a payload, reporting type mismatches as a non-field validation error.
pub(crate) fn decode<T: DeserializeOwned>(value: Value) -> Result<T, FieldErrors> {
    serde_json::from_value(value).map_err(|err| FieldErrors::single(NON_FIELD_ERRORS, err.to_string()))
}

/// Field adapter for patches: an absent field stays `None`, an explicit `null` becomes
/// `Some(None)` and clears the stored value. Use with `#[serde(default)]`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

pub(crate) fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let payload = json!({ "error": message.into() });
    (status, Json(payload)).into_response()
}

pub(crate) fn validation_response(summary: &str, errors: &FieldErrors) -> Response {
    let payload = json!({
        "error": summary,
        "fields": errors,
    });
    (StatusCode::BAD_REQUEST, Json(payload)).into_response()
}

pub(crate) fn repository_response(error: &RepositoryError) -> Response {
    tracing::error!(%error, "record store failure");
    error_response(StatusCode::INTERNAL_SERVER_ERROR, error.to_string())
}

#[cfg(test)]
pub(crate) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_body_is_an_empty_object() {
        let value = json_body(&Bytes::from_static(b"  \n")).expect("blank body accepted");
        assert_eq!(value, json!({}));
    }

    #[derive(Debug, Deserialize)]
    struct Clearable {
        #[serde(default, deserialize_with = "nullable")]
        note: Option<Option<String>>,
    }

    #[test]
    fn nullable_tells_null_apart_from_absent() {
        let absent: Clearable = decode(json!({})).expect("absent");
        let cleared: Clearable = decode(json!({ "note": null })).expect("null");
        let set: Clearable = decode(json!({ "note": "call back" })).expect("value");

        assert_eq!(absent.note, None);
        assert_eq!(cleared.note, Some(None));
        assert_eq!(set.note, Some(Some("call back".to_string())));
    }

    #[test]
    fn malformed_body_is_a_non_field_error() {
        let errors = json_body(&Bytes::from_static(b"{\"full_name\":")).expect_err("rejected");
        let messages = errors.messages(NON_FIELD_ERRORS);
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("Malformed JSON"));
    }
}
