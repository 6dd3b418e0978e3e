use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A point-in-time record of every tracked file under a codebase root and
/// its content hash, used by the Reconciler to compute added/modified/
/// removed sets between indexing runs. Persisted as flat JSON by
/// `crate::connector::adapter::json_snapshot_store`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    codebase_root: String,
    /// relative path -> content hash (sha256 hex)
    file_hashes: HashMap<String, String>,
    created_at: i64,
}

impl Snapshot {
    pub fn new(codebase_root: String, file_hashes: HashMap<String, String>) -> Self {
        Self {
            codebase_root,
            file_hashes,
            created_at: current_timestamp(),
        }
    }

    pub fn empty(codebase_root: String) -> Self {
        Self::new(codebase_root, HashMap::new())
    }

    pub fn codebase_root(&self) -> &str {
        &self.codebase_root
    }

    pub fn file_hashes(&self) -> &HashMap<String, String> {
        &self.file_hashes
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    pub fn len(&self) -> usize {
        self.file_hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.file_hashes.is_empty()
    }

    pub fn hash_of(&self, relative_path: &str) -> Option<&str> {
        self.file_hashes.get(relative_path).map(String::as_str)
    }
}

/// The outcome of diffing two snapshots, driving the Reconciler's
/// selective delete + reindex plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotDiff {
    pub added: Vec<String>,
    pub modified: Vec<String>,
    pub removed: Vec<String>,
}

impl SnapshotDiff {
    pub fn between(previous: &Snapshot, current: &Snapshot) -> Self {
        let mut added = Vec::new();
        let mut modified = Vec::new();
        let mut removed = Vec::new();

        for (path, hash) in current.file_hashes() {
            match previous.hash_of(path) {
                None => added.push(path.clone()),
                Some(prev_hash) if prev_hash != hash => modified.push(path.clone()),
                Some(_) => {}
            }
        }
        for path in previous.file_hashes().keys() {
            if !current.file_hashes().contains_key(path) {
                removed.push(path.clone());
            }
        }

        added.sort();
        modified.sort();
        removed.sort();
        Self {
            added,
            modified,
            removed,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.modified.is_empty() && self.removed.is_empty()
    }

    /// Paths whose vectors must be deleted before reindexing: removed and
    /// modified files (modified files are deleted then rewritten rather
    /// than patched in place).
    pub fn paths_to_delete(&self) -> Vec<String> {
        let mut paths = self.removed.clone();
        paths.extend(self.modified.iter().cloned());
        paths
    }

    /// Paths that must be (re)indexed: added and modified files.
    pub fn paths_to_index(&self) -> Vec<String> {
        let mut paths = self.added.clone();
        paths.extend(self.modified.iter().cloned());
        paths
    }
}

fn current_timestamp() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(pairs: &[(&str, &str)]) -> Snapshot {
        Snapshot::new(
            "/repo".to_string(),
            pairs
                .iter()
                .map(|(p, h)| (p.to_string(), h.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_diff_added_modified_removed() {
        let previous = snap(&[("a.rs", "h1"), ("b.rs", "h2")]);
        let current = snap(&[("a.rs", "h1"), ("b.rs", "h3"), ("c.rs", "h4")]);

        let diff = SnapshotDiff::between(&previous, &current);
        assert_eq!(diff.added, vec!["c.rs".to_string()]);
        assert_eq!(diff.modified, vec!["b.rs".to_string()]);
        assert_eq!(diff.removed, Vec::<String>::new());
    }

    #[test]
    fn test_diff_removed() {
        let previous = snap(&[("a.rs", "h1"), ("b.rs", "h2")]);
        let current = snap(&[("a.rs", "h1")]);

        let diff = SnapshotDiff::between(&previous, &current);
        assert_eq!(diff.removed, vec!["b.rs".to_string()]);
        assert!(diff.added.is_empty());
    }

    #[test]
    fn test_no_changes_is_empty() {
        let s = snap(&[("a.rs", "h1")]);
        let diff = SnapshotDiff::between(&s, &s.clone());
        assert!(diff.is_empty());
    }

    #[test]
    fn test_paths_to_delete_and_index() {
        let previous = snap(&[("a.rs", "h1"), ("b.rs", "h2")]);
        let current = snap(&[("a.rs", "h1x"), ("c.rs", "h4")]);
        let diff = SnapshotDiff::between(&previous, &current);

        let mut to_delete = diff.paths_to_delete();
        to_delete.sort();
        assert_eq!(to_delete, vec!["a.rs".to_string(), "b.rs".to_string()]);

        let mut to_index = diff.paths_to_index();
        to_index.sort();
        assert_eq!(to_index, vec!["a.rs".to_string(), "c.rs".to_string()]);
    }
}
