//! HTTP client for the Steam Web API.

use game_night_core::SteamId;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use crate::config::SteamApiConfig;

use super::SteamError;
use super::types::{OwnedGame, PlayerSummary};

/// Most ids `GetPlayerSummaries` accepts in one call. Ids past this are
/// dropped from the request, not paginated.
pub const MAX_SUMMARY_BATCH: usize = 100;

/// `ResolveVanityURL` sets `success` to this when a name matched an account.
const VANITY_MATCH: i32 = 1;

/// Client for the Steam Web API.
#[derive(Debug, Clone)]
pub struct SteamClient {
    client: reqwest::Client,
    api_root: Url,
    api_key: SecretString,
}

impl SteamClient {
    /// Create a new Steam Web API client.
    #[must_use]
    pub fn new(config: &SteamApiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_root: config.api_root.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// Resolve a vanity name to a Steam account id.
    ///
    /// Returns `None` when no account goes by that name.
    ///
    /// # Errors
    ///
    /// Returns `SteamError` if the request fails or the response cannot be
    /// decoded.
    #[instrument(skip(self))]
    pub async fn resolve_vanity_name(
        &self,
        vanity_name: &str,
    ) -> Result<Option<SteamId>, SteamError> {
        let url = self.endpoint("ISteamUser/ResolveVanityURL/v0001/")?;
        let response: VanityResponse = self.get(url, &[("vanityurl", vanity_name)]).await?;

        if response.success == VANITY_MATCH {
            Ok(response.steamid)
        } else {
            Ok(None)
        }
    }

    /// Fetch profile summaries for a batch of account ids.
    ///
    /// At most [`MAX_SUMMARY_BATCH`] ids go upstream; the rest are silently
    /// dropped. Ids the API knows nothing about are simply absent from the
    /// result, and an empty batch short-circuits without an upstream call.
    ///
    /// # Errors
    ///
    /// Returns `SteamError` if the request fails or the response cannot be
    /// decoded.
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    pub async fn player_summaries(
        &self,
        ids: &[SteamId],
    ) -> Result<Vec<PlayerSummary>, SteamError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let batch = ids
            .iter()
            .take(MAX_SUMMARY_BATCH)
            .map(SteamId::as_str)
            .collect::<Vec<_>>()
            .join(",");

        let url = self.endpoint("ISteamUser/GetPlayerSummaries/v0001/")?;
        let response: PlayerSummariesResponse =
            self.get(url, &[("steamids", batch.as_str())]).await?;

        Ok(response.players.player)
    }

    /// Fetch the owned-games list for one account.
    ///
    /// Returns `None` when the profile is private or the library is empty;
    /// the API omits the `games` array in both cases.
    ///
    /// # Errors
    ///
    /// Returns `SteamError` if the request fails or the response cannot be
    /// decoded.
    #[instrument(skip(self))]
    pub async fn owned_games(&self, id: &SteamId) -> Result<Option<Vec<OwnedGame>>, SteamError> {
        let url = self.endpoint("IPlayerService/GetOwnedGames/v0001/")?;
        let response: OwnedGamesResponse = self
            .get(
                url,
                &[
                    ("steamid", id.as_str()),
                    ("include_appinfo", "1"),
                    ("include_played_free_games", "1"),
                ],
            )
            .await?;

        Ok(response.games)
    }

    fn endpoint(&self, path: &str) -> Result<Url, SteamError> {
        Ok(self.api_root.join(path)?)
    }

    /// Issue a GET and unwrap the `{"response": ...}` envelope.
    async fn get<T: DeserializeOwned>(
        &self,
        url: Url,
        params: &[(&str, &str)],
    ) -> Result<T, SteamError> {
        let response = self
            .client
            .get(url)
            .query(&[("key", self.api_key.expose_secret())])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SteamError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: ApiEnvelope<T> = response.json().await?;
        Ok(envelope.response)
    }
}

/// The `{"response": ...}` wrapper every v0001 endpoint uses.
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    response: T,
}

#[derive(Debug, Deserialize)]
struct VanityResponse {
    success: i32,
    steamid: Option<SteamId>,
}

#[derive(Debug, Deserialize)]
struct PlayerSummariesResponse {
    players: PlayerList,
}

#[derive(Debug, Deserialize)]
struct PlayerList {
    #[serde(default)]
    player: Vec<PlayerSummary>,
}

#[derive(Debug, Deserialize)]
struct OwnedGamesResponse {
    games: Option<Vec<OwnedGame>>,
}
