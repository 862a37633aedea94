//! Request supervision for JSON-object handlers.
//!
//! [`supervise`] takes a handler `Fn(Params) -> Future<Output = Result<T, E>>`
//! and returns a [`Supervised`] wrapper that
//!
//! - logs the handler name at `debug` before calling it,
//! - times the call and injects `success: 1` and `taken: <seconds>` into the
//!   handler's own JSON object on success,
//! - turns any error into `{"error": "...", "success": 0}` with a `500`
//!   status instead of letting it escape,
//! - when mounted via [`Supervised::into_method_router`], gives the route a
//!   one-week response timeout so slow queries are never cut off.
//!
//! Handlers whose natural result is not a JSON object (an array, a bare
//! string) must not be supervised: there is nowhere to put the envelope
//! fields, and such a result is reported as a failure.
//!
//! ```ignore
//! let status = supervise("status", move |_params| {
//!     let service = service.clone();
//!     async move { Ok::<_, MyError>(service.status()) }
//! });
//! let router = Router::new().route("/status", status.into_method_router());
//! ```

use std::fmt::{Debug, Display};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{MethodRouter, any},
};
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tower_http::timeout::TimeoutLayer;
use tracing::{debug, error, info};

use crate::extractors::{Params, RequestParams};

/// Response timeout applied to supervised routes (one week).
pub const RESPONSE_TIMEOUT: Duration = Duration::from_secs(3600 * 24 * 7);

/// Failures produced by the supervisor itself rather than the handler.
#[derive(Debug, Error)]
enum SupervisorError {
    #[error("handler result must be a JSON object, got {0}")]
    NotAMapping(&'static str),

    #[error("handler result could not be serialized: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Uniform response shape produced by [`Supervised::call`].
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    status: StatusCode,
    body: Map<String, Value>,
}

impl Envelope {
    fn success(mut body: Map<String, Value>, taken: f64) -> Self {
        body.insert("success".to_string(), Value::from(1));
        body.insert("taken".to_string(), Value::from(taken));
        Self {
            status: StatusCode::OK,
            body,
        }
    }

    fn failure(description: String) -> Self {
        let mut body = Map::new();
        body.insert("error".to_string(), Value::String(description));
        body.insert("success".to_string(), Value::from(0));
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn body(&self) -> &Map<String, Value> {
        &self.body
    }

    pub fn into_body(self) -> Map<String, Value> {
        self.body
    }
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        (self.status, Json(Value::Object(self.body))).into_response()
    }
}

/// Wrap `handler` so every invocation yields an [`Envelope`].
pub fn supervise<H>(name: &'static str, handler: H) -> Supervised<H> {
    Supervised { name, handler }
}

/// A handler instrumented by [`supervise`].
pub struct Supervised<H> {
    name: &'static str,
    handler: H,
}

impl<H, Fut, T, E> Supervised<H>
where
    H: Fn(Params) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    T: Serialize,
    E: Display + Debug,
{
    /// Invoke the handler once. Never fails; errors become failure envelopes.
    pub async fn call(&self, params: Params) -> Envelope {
        debug!(handler = self.name, "calling server method '{}'", self.name);

        let start = Instant::now();
        let outcome = (self.handler)(params).await;

        let value = match outcome {
            Ok(value) => value,
            Err(e) => return self.failed(&e),
        };

        match into_mapping(value) {
            Ok(body) => {
                let taken = start.elapsed().as_secs_f64();
                info!(
                    handler = self.name,
                    taken,
                    "method '{}' succeeded in {}s", self.name, taken
                );
                Envelope::success(body, taken)
            }
            Err(e) => self.failed(&e),
        }
    }

    fn failed<D>(&self, err: &D) -> Envelope
    where
        D: Display + Debug + ?Sized,
    {
        error!(
            handler = self.name,
            error = %err,
            details = ?err,
            "exception serving request"
        );

        let mut description = err.to_string();
        if description.is_empty() {
            description = format!("{:?}", err);
        }
        Envelope::failure(description)
    }
}

impl<H, Fut, T, E> Supervised<H>
where
    H: Fn(Params) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Serialize + Send + 'static,
    E: Display + Debug + Send + 'static,
{
    /// Mount the supervised handler on every HTTP method.
    ///
    /// Parameters come from [`RequestParams`]; the route carries a
    /// [`RESPONSE_TIMEOUT`] timeout layer.
    pub fn into_method_router<S>(self) -> MethodRouter<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        let supervised = Arc::new(self);

        any(move |RequestParams(params): RequestParams| {
            let supervised = Arc::clone(&supervised);
            async move { supervised.call(params).await }
        })
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            RESPONSE_TIMEOUT,
        ))
    }
}

fn into_mapping<T: Serialize>(value: T) -> Result<Map<String, Value>, SupervisorError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        Value::Bool(_) => Err(SupervisorError::NotAMapping("a boolean")),
        Value::Number(_) => Err(SupervisorError::NotAMapping("a number")),
        Value::String(_) => Err(SupervisorError::NotAMapping("a string")),
        Value::Array(_) => Err(SupervisorError::NotAMapping("an array")),
    }
}
