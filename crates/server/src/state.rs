//! Application state shared across handlers.

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;

use crate::config::ServerConfig;
use crate::games::GameCollection;
use crate::pending::PendingConfirmations;
use crate::registry::PlayerRegistry;
use crate::steam::SteamClient;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and owns the three state
/// containers plus the upstream client.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    steam: SteamClient,
    registry: RwLock<PlayerRegistry>,
    pending: PendingConfirmations,
    games: Mutex<GameCollection>,
}

impl AppState {
    /// Create a new application state from configuration and a hydrated
    /// registry.
    #[must_use]
    pub fn new(config: ServerConfig, registry: PlayerRegistry) -> Self {
        let steam = SteamClient::new(&config.steam);
        let pending = PendingConfirmations::new(config.confirmation_timeout);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                steam,
                registry: RwLock::new(registry),
                pending,
                games: Mutex::new(GameCollection::default()),
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the Steam Web API client.
    #[must_use]
    pub fn steam(&self) -> &SteamClient {
        &self.inner.steam
    }

    /// Get a reference to the registered-player store.
    #[must_use]
    pub fn registry(&self) -> &RwLock<PlayerRegistry> {
        &self.inner.registry
    }

    /// Get a reference to the pending-confirmation store.
    #[must_use]
    pub fn pending(&self) -> &PendingConfirmations {
        &self.inner.pending
    }

    /// Get a reference to the owned-games aggregate.
    ///
    /// The mutex also serializes the whole owned-games refresh: the handler
    /// holds it across the upstream fan-out so two concurrent refreshes
    /// cannot merge the same player twice.
    #[must_use]
    pub fn games(&self) -> &Mutex<GameCollection> {
        &self.inner.games
    }

    /// Spawn the recurring cache-reset task.
    ///
    /// The aggregate is always counting down to its next clear; after every
    /// reset the countdown starts over. Abort the returned handle at
    /// shutdown.
    pub fn spawn_cache_reset(&self) -> JoinHandle<()> {
        let state = self.clone();
        tokio::spawn(async move {
            let mut timer = tokio::time::interval(state.config().cache_reset_period);
            // An interval fires immediately; swallow the startup tick
            timer.tick().await;
            loop {
                timer.tick().await;
                state.games().lock().await.reset();
                tracing::debug!("owned-games cache cleared");
            }
        })
    }
}
