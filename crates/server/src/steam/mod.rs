//! Steam Web API client.
//!
//! Thin wrappers over the three endpoints the server consumes:
//! `ResolveVanityURL`, `GetPlayerSummaries` and `GetOwnedGames` (all v0001).
//! Every call is attempted exactly once per request; there is no retry,
//! backoff or timeout beyond what the socket imposes.

mod client;
pub mod types;

pub use client::{MAX_SUMMARY_BATCH, SteamClient};
pub use types::{OwnedGame, PlayerSummary};

use thiserror::Error;

/// Errors that can occur when calling the Steam Web API.
#[derive(Debug, Error)]
pub enum SteamError {
    /// HTTP request failed or the body could not be decoded.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// A request URL could not be built from the configured root.
    #[error("Invalid request url: {0}")]
    Url(#[from] url::ParseError),
}
