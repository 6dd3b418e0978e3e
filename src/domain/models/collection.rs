use serde::{Deserialize, Serialize};

/// Tracks the vector store collection backing a single indexed codebase
/// root. One `Collection` exists per root (see
/// `crate::domain::services::identity::collection_name`); there is no
/// multi-tenant registry of repositories — a fresh `Orchestrator` derives
/// the name deterministically instead of looking one up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection {
    name: String,
    codebase_root: String,
    dimension: usize,
    chunk_count: u64,
    file_count: u64,
    created_at: i64,
    updated_at: i64,
}

impl Collection {
    pub fn new(name: String, codebase_root: String, dimension: usize) -> Self {
        let now = current_timestamp();
        Self {
            name,
            codebase_root,
            dimension,
            chunk_count: 0,
            file_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn codebase_root(&self) -> &str {
        &self.codebase_root
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn chunk_count(&self) -> u64 {
        self.chunk_count
    }

    pub fn file_count(&self) -> u64 {
        self.file_count
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    pub fn updated_at(&self) -> i64 {
        self.updated_at
    }

    pub fn update_stats(&mut self, chunk_count: u64, file_count: u64) {
        self.chunk_count = chunk_count;
        self.file_count = file_count;
        self.updated_at = current_timestamp();
    }

    pub fn is_indexed(&self) -> bool {
        self.chunk_count > 0
    }

    pub fn average_chunks_per_file(&self) -> f64 {
        if self.file_count == 0 {
            0.0
        } else {
            self.chunk_count as f64 / self.file_count as f64
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "{} ({} files, {} chunks)",
            self.name, self.file_count, self.chunk_count
        )
    }
}

fn current_timestamp() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Coarse indexing lifecycle state, tracked by the Orchestrator for
/// logging and diagnostics; operations remain idempotent rather than
/// gated on this state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexingStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

impl IndexingStatus {
    pub fn is_complete(&self) -> bool {
        matches!(self, IndexingStatus::Completed)
    }

    pub fn is_in_progress(&self) -> bool {
        matches!(self, IndexingStatus::InProgress)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, IndexingStatus::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_creation() {
        let col = Collection::new("code_chunks_abcd1234".to_string(), "/repo".to_string(), 384);
        assert_eq!(col.chunk_count(), 0);
        assert!(!col.is_indexed());
    }

    #[test]
    fn test_update_stats() {
        let mut col = Collection::new("c".to_string(), "/repo".to_string(), 384);
        col.update_stats(100, 10);
        assert_eq!(col.chunk_count(), 100);
        assert!(col.is_indexed());
        assert!((col.average_chunks_per_file() - 10.0).abs() < 0.01);
    }

    #[test]
    fn test_empty_average() {
        let col = Collection::new("c".to_string(), "/repo".to_string(), 384);
        assert_eq!(col.average_chunks_per_file(), 0.0);
    }
}
