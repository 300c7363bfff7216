//! Pending registration confirmations.
//!
//! A registration attempt parks the candidate account id here under a random
//! token until the frontend confirms it. Entries live in a `moka` cache whose
//! time-to-live is the configured confirmation timeout, so expiry needs no
//! timer bookkeeping of our own. Resolving a token does not consume it;
//! unconfirmed entries age out on their own.

use std::time::Duration;

use game_night_core::SteamId;
use moka::future::Cache;
use rand::TryRngCore;
use rand::rand_core::OsError;
use rand::rngs::OsRng;
use thiserror::Error;

/// Token length in bytes before hex encoding.
const TOKEN_BYTES: usize = 8;

/// Errors raised when creating a pending confirmation.
#[derive(Debug, Error)]
pub enum PendingError {
    /// The OS entropy source failed.
    #[error("entropy source failure: {0}")]
    Entropy(#[from] OsError),
}

/// Store of not-yet-confirmed registrations, keyed by confirmation token.
///
/// Several tokens may point at the same candidate id; each expires on its
/// own schedule.
#[derive(Clone)]
pub struct PendingConfirmations {
    tokens: Cache<String, SteamId>,
}

impl PendingConfirmations {
    /// Create a store whose entries expire `timeout` after creation.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            tokens: Cache::builder().time_to_live(timeout).build(),
        }
    }

    /// Park `id` under a fresh unpredictable token and return the token.
    ///
    /// # Errors
    ///
    /// Returns `PendingError` if the OS entropy source fails.
    pub async fn create(&self, id: SteamId) -> Result<String, PendingError> {
        let token = generate_token()?;
        self.tokens.insert(token.clone(), id).await;
        Ok(token)
    }

    /// Look up the candidate id for `token`, if present and unexpired.
    ///
    /// The entry stays in the store; it is removed by expiry, not by the
    /// lookup.
    pub async fn resolve(&self, token: &str) -> Option<SteamId> {
        self.tokens.get(token).await
    }

    /// Drop `token` if present. Idempotent.
    pub async fn expire(&self, token: &str) {
        self.tokens.invalidate(token).await;
    }
}

/// Hex-encode [`TOKEN_BYTES`] bytes of OS randomness.
fn generate_token() -> Result<String, PendingError> {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.try_fill_bytes(&mut bytes)?;
    Ok(bytes.iter().map(|b| format!("{b:02x}")).collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_then_resolve() {
        let pending = PendingConfirmations::new(Duration::from_secs(60));

        let token = pending.create(SteamId::new("111")).await.unwrap();
        assert_eq!(pending.resolve(&token).await, Some(SteamId::new("111")));

        // Resolving does not consume the entry
        assert_eq!(pending.resolve(&token).await, Some(SteamId::new("111")));
    }

    #[tokio::test]
    async fn test_unknown_token_is_not_found() {
        let pending = PendingConfirmations::new(Duration::from_secs(60));

        assert_eq!(pending.resolve("deadbeefdeadbeef").await, None);
    }

    #[tokio::test]
    async fn test_entry_expires_after_timeout() {
        let pending = PendingConfirmations::new(Duration::from_millis(50));

        let token = pending.create(SteamId::new("111")).await.unwrap();
        tokio::time::sleep(Duration::from_millis(120)).await;

        assert_eq!(pending.resolve(&token).await, None);
    }

    #[tokio::test]
    async fn test_expire_is_idempotent() {
        let pending = PendingConfirmations::new(Duration::from_secs(60));

        let token = pending.create(SteamId::new("111")).await.unwrap();
        pending.expire(&token).await;
        pending.expire(&token).await;

        assert_eq!(pending.resolve(&token).await, None);
    }

    #[tokio::test]
    async fn test_tokens_are_hex_and_distinct() {
        let pending = PendingConfirmations::new(Duration::from_secs(60));

        let a = pending.create(SteamId::new("111")).await.unwrap();
        let b = pending.create(SteamId::new("111")).await.unwrap();

        assert_eq!(a.len(), TOKEN_BYTES * 2);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);

        // Both tokens stay resolvable; the same candidate may be pending twice
        assert_eq!(pending.resolve(&a).await, Some(SteamId::new("111")));
        assert_eq!(pending.resolve(&b).await, Some(SteamId::new("111")));
    }
}
