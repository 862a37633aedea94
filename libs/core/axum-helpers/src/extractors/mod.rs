//! Custom extractors for Axum handlers.

pub mod params;

pub use params::{Params, RequestParams};
