//! # Axum Helpers
//!
//! Shared plumbing for the HTTP services in this workspace.
//!
//! ## Modules
//!
//! - **[`server`]**: Server setup, health checks, graceful shutdown
//! - **[`supervisor`]**: Uniform success/failure envelope with timing for handlers
//! - **[`extractors`]**: Merged query/form/JSON request parameters
//! - **[`http`]**: HTTP middleware (security headers, optional CORS)
//! - **[`errors`]**: Structured error responses
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum::Router;
//! use axum_helpers::server::{bind_listener, create_production_app, create_router};
//! use axum_helpers::supervisor::supervise;
//! use core_config::server::ServerConfig;
//! use std::time::Duration;
//! use utoipa::OpenApi;
//!
//! #[derive(OpenApi)]
//! #[openapi(paths())]
//! struct ApiDoc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let ping = supervise("ping", |_params| async { Ok::<_, std::io::Error>(()) });
//!     let routes = Router::new().route("/ping", ping.into_method_router());
//!     let router = create_router::<ApiDoc>(routes)?;
//!
//!     let listener = bind_listener(&ServerConfig::default()).await?;
//!     create_production_app(listener, router, Duration::from_secs(30), async {}).await?;
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;
pub mod supervisor;

// Re-export server types
pub use server::{
    HealthResponse, ShutdownCoordinator, bind_listener, create_production_app, create_router,
    health_router, shutdown_signal,
};

// Re-export HTTP middleware
pub use http::{create_cors_layer_from_env, security_headers};

// Re-export error types
pub use errors::{AppError, ErrorResponse};

// Re-export extractors
pub use extractors::{Params, RequestParams};

// Re-export supervision types
pub use supervisor::{Envelope, RESPONSE_TIMEOUT, Supervised, supervise};
