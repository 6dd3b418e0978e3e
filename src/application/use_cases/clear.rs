use std::sync::Arc;

use crate::application::interfaces::{SnapshotStore, VectorStore};
use crate::domain::DomainError;

/// Drops a codebase root's collection and its persisted snapshot, leaving
/// both in the same state as before the root was ever indexed.
pub struct ClearUseCase {
    vector_store: Arc<dyn VectorStore>,
    snapshot_store: Arc<dyn SnapshotStore>,
}

impl ClearUseCase {
    pub fn new(vector_store: Arc<dyn VectorStore>, snapshot_store: Arc<dyn SnapshotStore>) -> Self {
        Self {
            vector_store,
            snapshot_store,
        }
    }

    pub async fn execute(&self, codebase_root: &str, collection: &str) -> Result<(), DomainError> {
        if self.vector_store.has_collection(collection).await? {
            self.vector_store.drop_collection(collection).await?;
        }
        self.snapshot_store.delete(codebase_root).await
    }
}
