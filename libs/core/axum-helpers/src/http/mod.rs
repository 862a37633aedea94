//! HTTP middleware module.
//!
//! This module provides HTTP-level middleware for:
//! - CORS configuration (opt-in via environment)
//! - Security headers

pub mod cors;
pub mod security;

// Re-export commonly used functions
pub use cors::create_cors_layer_from_env;
pub use security::security_headers;
