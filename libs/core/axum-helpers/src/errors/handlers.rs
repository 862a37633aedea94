use axum::{http::Uri, response::Response};
use axum::response::IntoResponse;

use super::AppError;

/// Handler for 404 Not Found errors.
///
/// This can be used as a fallback handler in your router.
pub async fn not_found(uri: Uri) -> Response {
    AppError::NotFound(format!("no route for {}", uri.path())).into_response()
}
