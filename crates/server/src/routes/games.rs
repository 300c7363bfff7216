//! Aggregated owned-games route handler.

use axum::{
    Json,
    extract::State,
};
use futures::future;
use game_night_core::SteamId;
use serde::Serialize;
use tracing::instrument;

use crate::error::Result;
use crate::games::Game;
use crate::state::AppState;
use crate::steam::{OwnedGame, SteamError};

/// Response body for `GET /api/owned-games`.
#[derive(Debug, Serialize)]
pub struct GamesResponse {
    pub games: Vec<Game>,
}

/// Return the merged library across all registered players.
///
/// Players not yet folded into the aggregate are fetched first, one upstream
/// call per player with no concurrency cap. The join is all-or-nothing: every
/// fetch runs to completion, and one failure fails the request with nothing
/// merged from the batch.
///
/// GET /api/owned-games
#[instrument(skip(state))]
pub async fn owned(State(state): State<AppState>) -> Result<Json<GamesResponse>> {
    let ids = state.registry().read().await.list().to_vec();

    // Holding the collection lock across the fetch serializes concurrent
    // refreshes; a player must not be merged twice between resets.
    let mut collection = state.games().lock().await;

    let missing: Vec<SteamId> = ids
        .into_iter()
        .filter(|id| !collection.contains(id))
        .collect();

    let results: Vec<Option<Vec<OwnedGame>>> =
        future::join_all(missing.iter().map(|id| state.steam().owned_games(id)))
            .await
            .into_iter()
            .collect::<std::result::Result<_, SteamError>>()?;

    for (id, games) in missing.into_iter().zip(results) {
        collection.merge(id, games);
    }

    Ok(Json(GamesResponse {
        games: collection.games(),
    }))
}
