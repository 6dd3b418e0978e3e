//! Content-derived identity for chunks and collections (component C6).
//!
//! Nothing here is assigned or persisted independently of its inputs: the
//! same relative path, line span and content always produce the same
//! chunk id, and the same canonical codebase root always produces the
//! same collection name. This is what lets the Indexing Pipeline and
//! Reconciler treat re-indexing as an idempotent, delete-then-insert
//! operation rather than tracking a separate identity table.

use sha2::{Digest, Sha256};
use std::path::Path;

/// Derives a stable chunk id from the chunk's location and content.
/// `chunk_<16 hex chars>` where the hex digest is
/// `sha256(relative_path:start_line:end_line:content)`.
pub fn chunk_id(relative_path: &str, start_line: u32, end_line: u32, content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(relative_path.as_bytes());
    hasher.update(b":");
    hasher.update(start_line.to_string().as_bytes());
    hasher.update(b":");
    hasher.update(end_line.to_string().as_bytes());
    hasher.update(b":");
    hasher.update(content.as_bytes());
    let digest = hasher.finalize();
    format!("chunk_{:x}", digest)[..22].to_string()
}

/// Derives a vector store collection name from a codebase root.
/// `code_chunks_<8 hex chars>` where the hex digest is
/// `md5(canonicalized absolute path)`. Canonicalization is attempted so
/// that `.` and `/abs/path` resolve to the same collection; if the path
/// does not exist yet (a fresh root), the raw path string is hashed
/// instead.
pub fn collection_name(codebase_root: &Path) -> String {
    let canonical = codebase_root
        .canonicalize()
        .unwrap_or_else(|_| codebase_root.to_path_buf());
    let digest = md5::compute(canonical.to_string_lossy().as_bytes());
    format!("code_chunks_{:x}", digest)[..20].to_string()
}
