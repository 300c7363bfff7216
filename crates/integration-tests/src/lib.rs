//! End-to-end tests for Game Night.
//!
//! Each test stands up an `httpmock` server playing the Steam Web API,
//! builds real application state pointed at it, and serves the real router
//! on an ephemeral port. `reqwest` then drives the API the same way the
//! browser frontend does.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p game-night-integration-tests
//! ```
//!
//! No external services are required; the Steam API is mocked per test.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::time::Duration;

use game_night_core::SteamId;
use game_night_server::config::{ServerConfig, SteamApiConfig};
use game_night_server::registry::PlayerRegistry;
use game_night_server::state::AppState;
use httpmock::prelude::*;
use httpmock::Mock;
use secrecy::SecretString;
use serde_json::{Value, json};
use url::Url;

/// Options for a test server.
pub struct ContextOptions {
    /// Whether `DELETE /api/players` is enabled.
    pub allow_player_deletion: bool,
    /// Ids seeded into the registry file before the server starts.
    pub registered: Vec<SteamId>,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            allow_player_deletion: true,
            registered: Vec::new(),
        }
    }
}

/// A running Game Night server wired to a mock Steam Web API.
pub struct TestContext {
    /// HTTP client for driving the API.
    pub client: reqwest::Client,
    /// Base URL of the running server.
    pub base_url: String,
    /// The mock Steam Web API.
    pub steam: MockServer,
    registry_dir: tempfile::TempDir,
}

impl TestContext {
    /// Start a server with default options.
    pub async fn start() -> Self {
        Self::start_with(ContextOptions::default()).await
    }

    /// Start a server with the given options.
    ///
    /// # Panics
    ///
    /// Panics if the server cannot be set up; tests have nothing sensible
    /// to do with a broken harness.
    pub async fn start_with(options: ContextOptions) -> Self {
        let steam = MockServer::start_async().await;
        let registry_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let registry_path = registry_dir.path().join("steamids.json");

        if !options.registered.is_empty() {
            let seed =
                serde_json::to_vec(&options.registered).expect("Failed to serialize registry");
            std::fs::write(&registry_path, seed).expect("Failed to seed registry file");
        }

        let config = ServerConfig {
            host: "127.0.0.1".parse().expect("Invalid host"),
            port: 0,
            steam: SteamApiConfig {
                api_root: Url::parse(&steam.base_url()).expect("Invalid mock url"),
                api_key: SecretString::from("test-key"),
            },
            confirmation_timeout: Duration::from_secs(60),
            cache_reset_period: Duration::from_secs(3600),
            allow_player_deletion: options.allow_player_deletion,
            registry_path: registry_path.clone(),
            sentry_dsn: None,
        };

        let registry = PlayerRegistry::load(registry_path)
            .await
            .expect("Failed to load registry");
        let state = AppState::new(config, registry);

        let app = game_night_server::app(state);
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0))
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server error");
        });

        Self {
            client: reqwest::Client::new(),
            base_url: format!("http://{addr}"),
            steam,
            registry_dir,
        }
    }

    /// Absolute URL for an API path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Path of the registry file backing this server.
    #[must_use]
    pub fn registry_path(&self) -> PathBuf {
        self.registry_dir.path().join("steamids.json")
    }
}

// ============================================================================
// Steam Web API mocks
// ============================================================================

/// Mock a successful vanity resolution to `id`.
pub async fn mock_resolve_vanity<'a>(
    steam: &'a MockServer,
    vanity_name: &str,
    id: &str,
) -> Mock<'a> {
    let vanity_name = vanity_name.to_string();
    let id = id.to_string();
    steam
        .mock_async(move |when, then| {
            when.method(GET)
                .path("/ISteamUser/ResolveVanityURL/v0001/")
                .query_param("vanityurl", vanity_name);
            then.status(200)
                .json_body(json!({"response": {"success": 1, "steamid": id}}));
        })
        .await
}

/// Mock a vanity resolution that matches nothing.
pub async fn mock_resolve_vanity_miss(steam: &MockServer) -> Mock<'_> {
    steam
        .mock_async(|when, then| {
            when.method(GET).path("/ISteamUser/ResolveVanityURL/v0001/");
            then.status(200)
                .json_body(json!({"response": {"success": 42, "message": "No match"}}));
        })
        .await
}

/// Mock `GetPlayerSummaries` for an exact `steamids` parameter.
pub async fn mock_player_summaries<'a>(
    steam: &'a MockServer,
    steamids: &str,
    players: Value,
) -> Mock<'a> {
    let steamids = steamids.to_string();
    steam
        .mock_async(move |when, then| {
            when.method(GET)
                .path("/ISteamUser/GetPlayerSummaries/v0001/")
                .query_param("steamids", steamids);
            then.status(200)
                .json_body(json!({"response": {"players": {"player": players}}}));
        })
        .await
}

/// Mock `GetOwnedGames` for one account id.
pub async fn mock_owned_games<'a>(steam: &'a MockServer, id: &str, response: Value) -> Mock<'a> {
    let id = id.to_string();
    steam
        .mock_async(move |when, then| {
            when.method(GET)
                .path("/IPlayerService/GetOwnedGames/v0001/")
                .query_param("steamid", id);
            then.status(200).json_body(json!({"response": response}));
        })
        .await
}

// ============================================================================
// Document builders
// ============================================================================

/// A minimal profile document for `id`.
#[must_use]
pub fn profile(id: &str, name: &str) -> Value {
    json!({
        "steamid": id,
        "personaname": name,
        "profileurl": format!("https://steamcommunity.com/id/{name}/"),
        "avatar": "https://avatars.example/small.jpg"
    })
}

/// A library document with one entry per `(appid, name, playtime)`.
#[must_use]
pub fn library(games: &[(u32, &str, u64)]) -> Value {
    json!({
        "game_count": games.len(),
        "games": games
            .iter()
            .map(|(appid, name, playtime)| json!({
                "appid": appid,
                "name": name,
                "img_icon_url": "icon",
                "img_logo_url": "logo",
                "playtime_forever": playtime
            }))
            .collect::<Vec<_>>()
    })
}
