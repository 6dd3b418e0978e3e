use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::application::interfaces::SnapshotStore;
use crate::domain::{DomainError, Snapshot};

/// Persists one `Snapshot` per codebase root as flat JSON under
/// `<root>/.codeindex/snapshot.json`, written via a temp file plus
/// `rename` so a crash mid-write never leaves a half-written snapshot
/// behind — the rename is the only state transition a reader can observe.
pub struct JsonSnapshotStore;

impl JsonSnapshotStore {
    pub fn new() -> Self {
        Self
    }

    fn snapshot_path(codebase_root: &str) -> PathBuf {
        Path::new(codebase_root).join(".codeindex").join("snapshot.json")
    }
}

impl Default for JsonSnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SnapshotStore for JsonSnapshotStore {
    async fn load(&self, codebase_root: &str) -> Result<Snapshot, DomainError> {
        let path = Self::snapshot_path(codebase_root);
        match tokio::fs::read_to_string(&path).await {
            Ok(raw) => serde_json::from_str(&raw)
                .map_err(|e| DomainError::storage(format!("corrupt snapshot at {path:?}: {e}"))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("no snapshot yet at {path:?}, starting empty");
                Ok(Snapshot::empty(codebase_root.to_string()))
            }
            Err(e) => Err(DomainError::IoError(e)),
        }
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<(), DomainError> {
        let path = Self::snapshot_path(snapshot.codebase_root());
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp_path = path.with_extension("json.tmp");
        let serialized = serde_json::to_vec_pretty(snapshot)
            .map_err(|e| DomainError::storage(format!("failed to serialize snapshot: {e}")))?;
        tokio::fs::write(&tmp_path, serialized).await?;
        tokio::fs::rename(&tmp_path, &path).await?;
        debug!("saved snapshot with {} files to {path:?}", snapshot.len());
        Ok(())
    }

    async fn delete(&self, codebase_root: &str) -> Result<(), DomainError> {
        let path = Self::snapshot_path(codebase_root);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DomainError::IoError(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[tokio::test]
    async fn test_save_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_string_lossy().to_string();
        let store = JsonSnapshotStore::new();

        let mut hashes = HashMap::new();
        hashes.insert("a.rs".to_string(), "hash1".to_string());
        let snapshot = Snapshot::new(root.clone(), hashes);

        store.save(&snapshot).await.unwrap();
        let loaded = store.load(&root).await.unwrap();
        assert_eq!(loaded.hash_of("a.rs"), Some("hash1"));
    }

    #[tokio::test]
    async fn test_load_missing_returns_empty() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_string_lossy().to_string();
        let store = JsonSnapshotStore::new();

        let loaded = store.load(&root).await.unwrap();
        assert!(loaded.is_empty());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_string_lossy().to_string();
        let store = JsonSnapshotStore::new();

        store.delete(&root).await.unwrap();
        store.delete(&root).await.unwrap();
    }
}
