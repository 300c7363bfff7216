//! Aggregated owned-games cache.
//!
//! Merges each registered player's library into one map keyed by appid,
//! summing playtime and collecting the contributing players. The set of
//! already-merged ids is tracked so a player is fetched from Steam at most
//! once per cache lifetime. Invalidation is wholesale via
//! [`reset`](GameCollection::reset): a single player's contribution cannot
//! be subtracted back out of the totals.

use std::collections::HashSet;

use game_night_core::{AppId, SteamId};
use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::Serialize;

use crate::steam::OwnedGame;

/// One game in the aggregate view.
#[derive(Debug, Clone, Serialize)]
pub struct Game {
    pub appid: AppId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub img_icon_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub img_logo_url: Option<String>,
    /// Minutes on record, summed over every contributor.
    pub playtime_forever: u64,
    /// Players whose library contains this game.
    pub steam_ids: Vec<SteamId>,
}

impl Game {
    fn new(game: OwnedGame, owner: SteamId) -> Self {
        Self {
            appid: game.appid,
            name: game.name,
            img_icon_url: game.img_icon_url,
            img_logo_url: game.img_logo_url,
            playtime_forever: game.playtime_forever,
            steam_ids: vec![owner],
        }
    }
}

/// Merged owned-games view across every included player.
#[derive(Debug, Default)]
pub struct GameCollection {
    apps: IndexMap<AppId, Game>,
    included: HashSet<SteamId>,
}

impl GameCollection {
    /// Whether `id`'s library has already been merged in.
    #[must_use]
    pub fn contains(&self, id: &SteamId) -> bool {
        self.included.contains(id)
    }

    /// Fold one player's library into the aggregate and mark the player
    /// included, games or not, so a gameless player is not re-fetched.
    ///
    /// Must be called at most once per id between resets; the caller checks
    /// [`contains`](Self::contains) first. A second call for the same id
    /// would double-count playtime.
    pub fn merge(&mut self, id: SteamId, games: Option<Vec<OwnedGame>>) {
        for game in games.into_iter().flatten() {
            match self.apps.entry(game.appid) {
                Entry::Occupied(mut entry) => {
                    let existing = entry.get_mut();
                    existing.playtime_forever += game.playtime_forever;
                    if !existing.steam_ids.contains(&id) {
                        existing.steam_ids.push(id.clone());
                    }
                }
                Entry::Vacant(entry) => {
                    entry.insert(Game::new(game, id.clone()));
                }
            }
        }
        self.included.insert(id);
    }

    /// Drop everything: games and included ids.
    pub fn reset(&mut self) {
        self.apps = IndexMap::new();
        self.included = HashSet::new();
    }

    /// The aggregate in first-seen appid order.
    #[must_use]
    pub fn games(&self) -> Vec<Game> {
        self.apps.values().cloned().collect()
    }
}
