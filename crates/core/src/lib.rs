//! Shared types library for Game Night.
//!
//! Holds the newtype ids used across the server and its tests, so a Steam
//! account id can never be handed to something expecting a store app id.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::{AppId, SteamId};
