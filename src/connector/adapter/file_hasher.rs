use std::collections::HashMap;
use std::path::Path;

use ignore::WalkBuilder;
use tracing::warn;

use crate::domain::{compute_file_hash, DomainError, ExtensionAllowlist, IgnorePatternSet};

/// Walks `codebase_root`, skipping anything `ignores` denies or
/// `allowed_extensions` excludes, and returns a map of relative path to
/// content hash. Unreadable files and directories are logged and skipped
/// rather than aborting the scan, matching the Path Filter's "skip and
/// log, never abort" requirement.
pub async fn scan_codebase(
    codebase_root: &Path,
    ignores: &IgnorePatternSet,
    allowed_extensions: &ExtensionAllowlist,
) -> Result<HashMap<String, String>, DomainError> {
    let mut hashes = HashMap::new();

    let walker = WalkBuilder::new(codebase_root)
        .hidden(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .build();

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!("error walking directory: {e}");
                continue;
            }
        };
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if !crate::domain::should_visit(path, codebase_root, ignores, allowed_extensions) {
            continue;
        }

        let relative_path = path
            .strip_prefix(codebase_root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/");

        match tokio::fs::read_to_string(path).await {
            Ok(content) => {
                hashes.insert(relative_path, compute_file_hash(&content));
            }
            Err(e) => {
                warn!("skipping unreadable file {relative_path}: {e}");
            }
        }
    }

    Ok(hashes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scan_excludes_extension_not_in_allowlist() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.rs"), "fn f() {}\n").unwrap();
        std::fs::write(dir.path().join("b.lisp"), "(defun f () 1)\n").unwrap();

        let hashes = scan_codebase(dir.path(), &IgnorePatternSet::new(), &ExtensionAllowlist::default())
            .await
            .unwrap();

        assert!(hashes.contains_key("a.rs"));
        assert!(!hashes.contains_key("b.lisp"));
    }

    #[tokio::test]
    async fn test_scan_includes_extended_allowlist_extension() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.lisp"), "(defun f () 1)\n").unwrap();

        let allowlist = ExtensionAllowlist::from_extra(["lisp"]);
        let hashes = scan_codebase(dir.path(), &IgnorePatternSet::new(), &allowlist)
            .await
            .unwrap();

        assert!(hashes.contains_key("b.lisp"));
    }
}
