use async_trait::async_trait;

use crate::domain::{DomainError, Snapshot};

/// Persistence for a codebase root's file-hash snapshot (component C5),
/// used by the Reconciler to compute what changed since the last run.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Loads the persisted snapshot for `codebase_root`, or an empty one
    /// if none exists yet.
    async fn load(&self, codebase_root: &str) -> Result<Snapshot, DomainError>;

    /// Atomically replaces the persisted snapshot for `codebase_root`.
    async fn save(&self, snapshot: &Snapshot) -> Result<(), DomainError>;

    /// Removes the persisted snapshot, if any. Idempotent.
    async fn delete(&self, codebase_root: &str) -> Result<(), DomainError>;
}
