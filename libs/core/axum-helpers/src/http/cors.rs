use axum::http::{HeaderValue, Method, header};
use std::io;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::info;

const CORS_ENV: &str = "CORS_ALLOWED_ORIGIN";

/// Creates a CORS layer for the given origins.
///
/// # Returns
/// A configured `CorsLayer` with:
/// - The listed origins
/// - GET, POST and OPTIONS
/// - Content-Type and Accept headers
/// - 1 hour max age
pub fn create_cors_layer(allowed_origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600))
}

/// Build a CORS layer from the comma-separated `CORS_ALLOWED_ORIGIN` variable.
///
/// Returns `Ok(None)` when the variable is unset, i.e. same-origin only.
///
/// # Errors
/// Returns an error if the variable is set but holds an invalid header value
/// or no origins at all.
pub fn create_cors_layer_from_env() -> io::Result<Option<CorsLayer>> {
    let Ok(origins_str) = std::env::var(CORS_ENV) else {
        return Ok(None);
    };

    let allowed_origins: Vec<HeaderValue> = origins_str
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid {} value: {}", CORS_ENV, e),
            )
        })?;

    if allowed_origins.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} cannot be empty", CORS_ENV),
        ));
    }

    info!("CORS configured with allowed origins: {}", origins_str);
    Ok(Some(create_cors_layer(allowed_origins)))
}
