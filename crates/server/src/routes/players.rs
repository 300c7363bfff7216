//! Player profile and registration route handlers.
//!
//! Registration is a two-step handshake: `register` resolves the vanity name
//! and parks the account id under a confirmation token, and the frontend
//! must call `confirm` with that token before the id becomes permanent.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use game_night_core::SteamId;
use serde::Serialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::steam::PlayerSummary;

/// Response body for `GET /api/players`.
#[derive(Debug, Serialize)]
pub struct PlayersResponse {
    pub players: Vec<PlayerSummary>,
}

/// Response body for `GET /api/players/{id}`.
#[derive(Debug, Serialize)]
pub struct PlayerResponse {
    pub player: PlayerSummary,
}

/// Response body for `POST /api/players/{vanityName}`.
#[derive(Debug, Serialize)]
pub struct RegistrationResponse {
    pub player: PlayerSummary,
    #[serde(rename = "confirmationUrl")]
    pub confirmation_url: String,
}

/// List the registered players' profiles.
///
/// One batched upstream call for the whole registry; ids Steam returned no
/// profile for are simply absent from the list.
///
/// GET /api/players
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<PlayersResponse>> {
    let ids = state.registry().read().await.list().to_vec();
    let players = state.steam().player_summaries(&ids).await?;

    Ok(Json(PlayersResponse { players }))
}

/// Fetch one profile by account id.
///
/// GET /api/players/{id}
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PlayerResponse>> {
    let id = SteamId::new(id);
    let player = state
        .steam()
        .player_summaries(std::slice::from_ref(&id))
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::UnknownPlayer(format!("Player {id} not found")))?;

    Ok(Json(PlayerResponse { player }))
}

/// Start registering a player by vanity name.
///
/// Resolves the name, parks the account id under a confirmation token and
/// hands back the URL the frontend must call to make it permanent.
///
/// POST /api/players/{vanityName}
#[instrument(skip(state))]
pub async fn register(
    State(state): State<AppState>,
    Path(vanity_name): Path<String>,
) -> Result<Json<RegistrationResponse>> {
    let id = state
        .steam()
        .resolve_vanity_name(&vanity_name)
        .await?
        .ok_or_else(|| vanity_not_found(&vanity_name))?;

    let player = state
        .steam()
        .player_summaries(std::slice::from_ref(&id))
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| vanity_not_found(&vanity_name))?;

    let token = state.pending().create(player.steamid.clone()).await?;
    tracing::info!(player = %player.steamid, "Registration pending confirmation");

    Ok(Json(RegistrationResponse {
        player,
        confirmation_url: format!("/api/confirm-player/{token}"),
    }))
}

/// Finish a registration.
///
/// The token is left to expire on its own; promoting the id twice is a
/// registry no-op anyway.
///
/// POST /api/confirm-player/{token}
#[instrument(skip(state, token))]
pub async fn confirm(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<StatusCode> {
    let id = state
        .pending()
        .resolve(&token)
        .await
        .ok_or(AppError::ConfirmationExpired)?;

    state.registry().write().await.add(id.clone()).await?;
    tracing::info!(player = %id, "Registration confirmed");

    Ok(StatusCode::NO_CONTENT)
}

/// Remove a player by vanity name.
///
/// Disabled unless `ALLOW_PLAYER_DELETION` is set. The aggregate is reset
/// before the id leaves the registry: merged totals cannot be unpicked per
/// player, so the next owned-games call rebuilds from scratch.
///
/// DELETE /api/players/{vanityName}
#[instrument(skip(state))]
pub async fn unregister(
    State(state): State<AppState>,
    Path(vanity_name): Path<String>,
) -> Result<StatusCode> {
    if !state.config().allow_player_deletion {
        return Err(AppError::DeletionDisabled);
    }

    let id = state
        .steam()
        .resolve_vanity_name(&vanity_name)
        .await?
        .ok_or_else(|| vanity_not_found(&vanity_name))?;

    state.games().lock().await.reset();
    state.registry().write().await.remove(&id).await?;
    tracing::info!(player = %id, "Player removed");

    Ok(StatusCode::NO_CONTENT)
}

fn vanity_not_found(vanity_name: &str) -> AppError {
    AppError::UnknownPlayer(format!("Vanity name {vanity_name} not found"))
}
