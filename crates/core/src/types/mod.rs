//! Core domain types.

mod id;

pub use id::{AppId, SteamId};
