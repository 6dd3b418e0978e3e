use std::path::Path;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::application::interfaces::{SnapshotStore, VectorStore};
use crate::application::use_cases::index::{IndexUseCase, ProgressCallback};
use crate::connector::adapter::file_hasher::scan_codebase;
use crate::domain::{DomainError, ExtensionAllowlist, IgnorePatternSet, Snapshot, SnapshotDiff};

/// Outcome of a reconcile pass: how many files fell into each bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub added: usize,
    pub modified: usize,
    pub removed: usize,
}

/// Component C9 — compares the current file-hash snapshot against the one
/// persisted from the last run, deletes vectors for removed/modified
/// files, reindexes added/modified files, and persists the new snapshot.
/// Never rebuilds the collection from scratch.
pub struct ReconcileUseCase {
    snapshot_store: Arc<dyn SnapshotStore>,
    vector_store: Arc<dyn VectorStore>,
    index_use_case: Arc<IndexUseCase>,
}

impl ReconcileUseCase {
    pub fn new(
        snapshot_store: Arc<dyn SnapshotStore>,
        vector_store: Arc<dyn VectorStore>,
        index_use_case: Arc<IndexUseCase>,
    ) -> Self {
        Self {
            snapshot_store,
            vector_store,
            index_use_case,
        }
    }

    pub async fn execute(
        &self,
        codebase_root: &Path,
        collection: &str,
        ignores: &IgnorePatternSet,
        allowed_extensions: &ExtensionAllowlist,
        progress: Option<ProgressCallback>,
        cancel: &CancellationToken,
    ) -> Result<ReconcileSummary, DomainError> {
        let root_key = codebase_root.to_string_lossy().to_string();

        let previous = self.snapshot_store.load(&root_key).await?;
        let current_hashes = scan_codebase(codebase_root, ignores, allowed_extensions).await?;
        let current = Snapshot::new(root_key.clone(), current_hashes);

        let diff = SnapshotDiff::between(&previous, &current);
        if diff.is_empty() {
            info!("reconcile: no changes under {}", codebase_root.display());
            return Ok(ReconcileSummary::default());
        }

        let to_delete = diff.paths_to_delete();
        if !to_delete.is_empty() {
            self.vector_store.delete_by_paths(collection, &to_delete).await?;
        }

        let to_index = diff.paths_to_index();
        if !to_index.is_empty() {
            self.index_use_case
                .index_paths(codebase_root, collection, &to_index, progress, cancel)
                .await?;
        }

        self.snapshot_store.save(&current).await?;

        info!(
            "reconcile complete: {} added, {} modified, {} removed",
            diff.added.len(),
            diff.modified.len(),
            diff.removed.len()
        );

        Ok(ReconcileSummary {
            added: diff.added.len(),
            modified: diff.modified.len(),
            removed: diff.removed.len(),
        })
    }
}
