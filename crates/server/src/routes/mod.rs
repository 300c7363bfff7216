//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                      - Liveness check
//!
//! # Players
//! GET    /api/players                 - Registered players' profiles
//! GET    /api/players/{id}            - One profile by account id
//! POST   /api/players/{vanityName}    - Start a registration
//! POST   /api/confirm-player/{token}  - Finish a registration
//! DELETE /api/players/{vanityName}    - Remove a player (feature-flagged)
//!
//! # Games
//! GET    /api/owned-games             - Aggregated game library
//! ```

pub mod games;
pub mod players;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the API router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/players", get(players::list))
        .route(
            "/api/players/{player}",
            get(players::show)
                .post(players::register)
                .delete(players::unregister),
        )
        .route("/api/confirm-player/{token}", post(players::confirm))
        .route("/api/owned-games", get(games::owned))
}
