//! Loosely-typed request parameters merged from every place a client may put them.
//!
//! Browser widgets tend to send `positive[]=a&positive[]=b` either in the
//! query string or as a form body, while scripted clients post JSON. Handlers
//! behind the supervisor see one flat map regardless.

use axum::{
    body::Bytes,
    extract::{Form, FromRequest, Query, Request},
    http::{Method, header::CONTENT_TYPE},
};
use serde_json::{Map, Value, map::Entry};

use crate::errors::AppError;

/// Parameter map handed to supervised handlers.
pub type Params = Map<String, Value>;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Extractor producing [`Params`].
///
/// Merge order:
/// 1. query-string pairs
/// 2. form-encoded body pairs (non-GET requests only)
/// 3. fields of a JSON object body, overwriting anything from 1 and 2
///
/// Keys ending in `[]` are stored without the suffix and always as arrays.
/// A plain key given more than once becomes an array of its values.
///
/// A body that is neither empty, form-encoded, nor a JSON object is
/// rejected with `400 Bad Request`.
pub struct RequestParams(pub Params);

impl<S> FromRequest<S> for RequestParams
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut params = Params::new();

        if req.uri().query().is_some() {
            let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(req.uri())
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            append_pairs(&mut params, pairs);
        }

        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with(FORM_CONTENT_TYPE));
        let has_body = !matches!(*req.method(), Method::GET | Method::HEAD);

        if is_form && has_body {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            append_pairs(&mut params, pairs);
            return Ok(Self(params));
        }

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        merge_json_payload(&mut params, &body)?;

        Ok(Self(params))
    }
}

fn append_pairs(params: &mut Params, pairs: Vec<(String, String)>) {
    for (key, value) in pairs {
        let value = Value::String(value);

        if let Some(base) = key.strip_suffix("[]") {
            match params.entry(base) {
                Entry::Occupied(mut slot) => push_value(slot.get_mut(), value),
                Entry::Vacant(slot) => {
                    slot.insert(Value::Array(vec![value]));
                }
            }
            continue;
        }

        match params.entry(key) {
            Entry::Occupied(mut slot) => push_value(slot.get_mut(), value),
            Entry::Vacant(slot) => {
                slot.insert(value);
            }
        }
    }
}

fn push_value(slot: &mut Value, value: Value) {
    match slot {
        Value::Array(items) => items.push(value),
        other => {
            let first = other.take();
            *other = Value::Array(vec![first, value]);
        }
    }
}

fn merge_json_payload(params: &mut Params, body: &[u8]) -> Result<(), AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(());
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(payload)) => {
            params.extend(payload);
            Ok(())
        }
        Ok(_) => Err(AppError::BadRequest(
            "request body must be a JSON object".to_string(),
        )),
        Err(e) => Err(AppError::BadRequest(format!("invalid JSON body: {}", e))),
    }
}
