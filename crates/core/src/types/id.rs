//! Newtype ids for Steam entities.

use serde::{Deserialize, Serialize};

/// A Steam account id (`steamid`).
///
/// The Web API carries 64-bit account ids as decimal strings in JSON, so the
/// wrapper keeps the string form instead of parsing it; the id is only ever
/// compared and passed back upstream.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SteamId(String);

impl SteamId {
    /// Create an id from its wire string form.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the underlying string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SteamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SteamId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for SteamId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A Steam store application id (`appid`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppId(u32);

impl AppId {
    /// Create a new app id.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the underlying numeric value.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for AppId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for AppId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}
