//! Game Night server library.
//!
//! The server functionality lives here as a library so the integration
//! tests can build the real router against mock upstream services.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod games;
pub mod pending;
pub mod registry;
pub mod routes;
pub mod state;
pub mod steam;

use axum::{Router, routing::get};
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;

use state::AppState;

/// Build the application router.
///
/// API routes plus the liveness check, with the static frontend served from
/// `public/` as the fallback. Everything goes out compressed.
#[must_use]
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .fallback_service(ServeDir::new("public"))
        .layer(CompressionLayer::new())
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}
