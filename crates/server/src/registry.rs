//! Registered-player store.
//!
//! An ordered, deduplicated list of Steam account ids, written out as a JSON
//! array on every membership change. The in-memory list is the source of
//! truth: a failed write surfaces as an error but the mutation stays, so the
//! file can lag reality until the next successful write.

use std::path::PathBuf;

use game_night_core::SteamId;
use thiserror::Error;

/// Errors raised by registry persistence.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Reading or writing the backing file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file holds something other than a JSON id array.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Ordered, deduplicated list of registered Steam account ids.
///
/// First-registration order is preserved and is the iteration order of
/// [`list`](Self::list).
#[derive(Debug)]
pub struct PlayerRegistry {
    ids: Vec<SteamId>,
    path: PathBuf,
}

impl PlayerRegistry {
    /// Load the registry from `path`.
    ///
    /// A missing file yields an empty registry, not an error.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError` if the file exists but cannot be read or
    /// parsed.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self, RegistryError> {
        let path = path.into();
        let ids = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self { ids, path })
    }

    /// Register an id. Adding a known id is a no-op, not an error.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError` if the list changed but could not be written
    /// out; the in-memory insert is kept either way.
    pub async fn add(&mut self, id: SteamId) -> Result<(), RegistryError> {
        if self.ids.contains(&id) {
            return Ok(());
        }
        self.ids.push(id);
        self.persist().await
    }

    /// Remove an id. Removing an unknown id is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError` if the list changed but could not be written
    /// out; the in-memory removal is kept either way.
    pub async fn remove(&mut self, id: &SteamId) -> Result<(), RegistryError> {
        let before = self.ids.len();
        self.ids.retain(|known| known != id);
        if self.ids.len() == before {
            return Ok(());
        }
        self.persist().await
    }

    /// Ordered snapshot of the registered ids.
    #[must_use]
    pub fn list(&self) -> &[SteamId] {
        &self.ids
    }

    /// Whether `id` is registered.
    #[must_use]
    pub fn contains(&self, id: &SteamId) -> bool {
        self.ids.contains(id)
    }

    /// Write the full list to the backing file.
    async fn persist(&self) -> Result<(), RegistryError> {
        let bytes = serde_json::to_vec(&self.ids)?;
        tokio::fs::write(&self.path, bytes).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn registry_path(dir: &tempfile::TempDir) -> PathBuf {
        dir.path().join("steamids.json")
    }

    #[tokio::test]
    async fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let registry = PlayerRegistry::load(registry_path(&dir)).await.unwrap();

        assert!(registry.list().is_empty());
    }

    #[tokio::test]
    async fn test_add_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = PlayerRegistry::load(registry_path(&dir)).await.unwrap();

        registry.add(SteamId::new("111")).await.unwrap();
        registry.add(SteamId::new("111")).await.unwrap();

        assert_eq!(registry.list(), [SteamId::new("111")]);
    }

    #[tokio::test]
    async fn test_remove_twice_is_a_noop() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = PlayerRegistry::load(registry_path(&dir)).await.unwrap();

        registry.add(SteamId::new("111")).await.unwrap();
        registry.remove(&SteamId::new("111")).await.unwrap();
        registry.remove(&SteamId::new("111")).await.unwrap();

        assert!(registry.list().is_empty());
    }

    #[tokio::test]
    async fn test_registration_order_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = registry_path(&dir);

        let mut registry = PlayerRegistry::load(path.clone()).await.unwrap();
        registry.add(SteamId::new("333")).await.unwrap();
        registry.add(SteamId::new("111")).await.unwrap();
        registry.add(SteamId::new("222")).await.unwrap();
        registry.remove(&SteamId::new("111")).await.unwrap();

        let reloaded = PlayerRegistry::load(path).await.unwrap();
        assert_eq!(
            reloaded.list(),
            [SteamId::new("333"), SteamId::new("222")]
        );
    }

    #[tokio::test]
    async fn test_failed_write_keeps_in_memory_mutation() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no-such-dir").join("steamids.json");
        let mut registry = PlayerRegistry::load(missing).await.unwrap();

        let result = registry.add(SteamId::new("111")).await;

        assert!(result.is_err());
        assert!(registry.contains(&SteamId::new("111")));
    }

    #[tokio::test]
    async fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = registry_path(&dir);
        tokio::fs::write(&path, b"not json").await.unwrap();

        assert!(PlayerRegistry::load(path).await.is_err());
    }
}
