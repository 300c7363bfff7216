//! Wire types for the Steam Web API.
//!
//! Field names mirror the v0001 JSON so documents pass through to the
//! frontend untouched. Unknown upstream fields are ignored.

use game_night_core::{AppId, SteamId};
use serde::{Deserialize, Serialize};

/// One player profile from `GetPlayerSummaries`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub steamid: SteamId,
    pub personaname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profileurl: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatarmedium: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatarfull: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personastate: Option<i32>,
}

/// One library entry from `GetOwnedGames`.
///
/// `playtime_forever` is minutes on record; icon and logo are image hashes,
/// not full URLs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnedGame {
    pub appid: AppId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub img_icon_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub img_logo_url: Option<String>,
    #[serde(default)]
    pub playtime_forever: u64,
}
