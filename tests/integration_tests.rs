//! End-to-end scenarios and universal invariants for the indexing engine,
//! run against the in-memory vector store and the deterministic mock
//! embedder so nothing here depends on an external service.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use codeindex::application::use_cases::IndexStatus;
use codeindex::connector::{AstSplitter, FallbackSplitter, InMemoryVectorStore, JsonSnapshotStore, MockEmbedder};
use codeindex::domain::{ExtensionAllowlist, IgnorePatternSet, SearchQuery};
use codeindex::{IndexerConfig, Orchestrator};

async fn orchestrator_with_config(config: IndexerConfig) -> Orchestrator {
    Orchestrator::new(
        Arc::new(AstSplitter::new()),
        Arc::new(FallbackSplitter::new()),
        Arc::new(MockEmbedder::new()),
        Arc::new(InMemoryVectorStore::new()),
        Arc::new(JsonSnapshotStore::new()),
        config,
        IgnorePatternSet::new(),
        ExtensionAllowlist::default(),
    )
    .unwrap()
}

async fn orchestrator() -> Orchestrator {
    orchestrator_with_config(IndexerConfig::default()).await
}

// S1 — empty repo.
#[tokio::test]
async fn test_empty_repo_indexes_to_zero() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join(".git")).unwrap();
    std::fs::create_dir_all(dir.path().join("node_modules")).unwrap();
    std::fs::write(dir.path().join("node_modules/pkg.js"), "module.exports = 1;\n").unwrap();

    let orch = orchestrator().await;
    let cancel = CancellationToken::new();
    let summary = orch.index(dir.path(), None, &cancel).await.unwrap();

    assert_eq!(summary.files_indexed, 0);
    assert_eq!(summary.chunks_indexed, 0);
    assert_eq!(summary.status, IndexStatus::Completed);
}

// S2 — single small file, three top-level functions.
#[tokio::test]
async fn test_small_python_file_yields_one_chunk_per_function() {
    let dir = tempfile::tempdir().unwrap();
    let content = "def f():\n    return 1\n\n\ndef g():\n    return 2\n\n\ndef h():\n    return 3\n";
    std::fs::write(dir.path().join("a.py"), content).unwrap();

    let config = IndexerConfig {
        chunk_size: 1000,
        chunk_overlap: 0,
        ..IndexerConfig::default()
    };
    let orch = orchestrator_with_config(config).await;
    let cancel = CancellationToken::new();
    let summary = orch.index(dir.path(), None, &cancel).await.unwrap();
    assert_eq!(summary.files_indexed, 1);
    assert_eq!(summary.chunks_indexed, 3);

    let results = orch
        .search(dir.path(), &SearchQuery::new("function g").with_min_score(0.0))
        .await
        .unwrap();
    assert!(!results.is_empty());
    assert!(results[0].content().contains("def g"));
}

// S3 — oversize function gets refined into bounded sub-chunks.
#[tokio::test]
async fn test_oversize_function_is_refined_within_bound() {
    let dir = tempfile::tempdir().unwrap();
    let mut body = String::from("fn big() {\n");
    for i in 0..300 {
        body.push_str(&format!("    let v{i} = {i};\n"));
    }
    body.push_str("}\n");
    std::fs::write(dir.path().join("big.rs"), &body).unwrap();

    let config = IndexerConfig {
        chunk_size: 1000,
        chunk_overlap: 100,
        ..IndexerConfig::default()
    };
    let orch = orchestrator_with_config(config).await;
    let cancel = CancellationToken::new();
    let summary = orch.index(dir.path(), None, &cancel).await.unwrap();

    assert!(summary.chunks_indexed >= 2);
}

// S4 — change detection across add/modify/remove.
#[tokio::test]
async fn test_reindex_by_change_reports_added_modified_removed() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("keep.rs"), "fn keep() {}\n").unwrap();
    std::fs::write(dir.path().join("doomed.rs"), "fn doomed() {}\n").unwrap();

    let orch = orchestrator().await;
    let cancel = CancellationToken::new();
    orch.index(dir.path(), None, &cancel).await.unwrap();

    std::fs::write(dir.path().join("keep.rs"), "fn keep() { let x = 1; }\n").unwrap();
    std::fs::remove_file(dir.path().join("doomed.rs")).unwrap();
    std::fs::write(dir.path().join("fresh.rs"), "fn fresh() {}\n").unwrap();

    let summary = orch.reindex_by_change(dir.path(), None, &cancel).await.unwrap();
    assert_eq!(summary.added, 1);
    assert_eq!(summary.modified, 1);
    assert_eq!(summary.removed, 1);

    let hits = orch
        .search(dir.path(), &SearchQuery::new("doomed").with_min_score(0.0).with_limit(50))
        .await
        .unwrap();
    assert!(hits.iter().all(|h| h.relative_path() != "doomed.rs"));
}

// S5 — an extension outside the default allowlist is skipped entirely;
// once the allowlist is explicitly extended, the unsupported language
// falls back to the character splitter.
#[tokio::test]
async fn test_unsupported_language_skipped_until_allowlist_extended() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("x.lisp"), "(defun f (x) (+ x 1))\n").unwrap();

    let orch = orchestrator().await;
    let cancel = CancellationToken::new();
    let summary = orch.index(dir.path(), None, &cancel).await.unwrap();
    assert_eq!(summary.files_indexed, 0);
    assert_eq!(summary.chunks_indexed, 0);

    let mut orch = orch;
    orch.update_allowed_extensions(ExtensionAllowlist::from_extra(["lisp"]));
    let summary = orch.index(dir.path(), None, &cancel).await.unwrap();
    assert_eq!(summary.files_indexed, 1);
    assert!(summary.chunks_indexed >= 1);

    let results = orch
        .search(dir.path(), &SearchQuery::new("defun").with_min_score(0.0))
        .await
        .unwrap();
    assert!(!results.is_empty());
    assert_eq!(results[0].language(), codeindex::domain::Language::Text);
}

// Universal invariant 6 — idempotent index.
#[tokio::test]
async fn test_indexing_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("lib.rs"), "fn add(a: i32, b: i32) -> i32 { a + b }\n").unwrap();

    let orch = orchestrator().await;
    let cancel = CancellationToken::new();
    let first = orch.index(dir.path(), None, &cancel).await.unwrap();
    let second = orch.index(dir.path(), None, &cancel).await.unwrap();

    assert_eq!(first.chunks_indexed, second.chunks_indexed);
}

// Universal invariant 8 — filter correctness under the CLI-facing
// ignore-pattern update.
#[tokio::test]
async fn test_ignore_patterns_exclude_matching_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("keep.rs"), "fn keep() {}\n").unwrap();
    std::fs::write(dir.path().join("skip.lock"), "lockfile contents\n").unwrap();

    let mut orch = orchestrator().await;
    orch.update_ignore_patterns(&["*.lock".to_string()]).unwrap();

    let cancel = CancellationToken::new();
    let summary = orch.index(dir.path(), None, &cancel).await.unwrap();
    assert_eq!(summary.files_indexed, 1);
}

#[tokio::test]
async fn test_clear_removes_collection_and_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("lib.rs"), "fn f() {}\n").unwrap();

    let orch = orchestrator().await;
    let cancel = CancellationToken::new();
    orch.index(dir.path(), None, &cancel).await.unwrap();
    assert!(orch.has_index(dir.path()).await.unwrap());

    orch.clear(dir.path()).await.unwrap();
    assert!(!orch.has_index(dir.path()).await.unwrap());
    assert!(!dir.path().join(".codeindex/snapshot.json").exists());
}
