use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::application::config::IndexerConfig;
use crate::application::interfaces::{Embedder, SnapshotStore, Splitter, VectorStore};
use crate::application::use_cases::{
    ClearUseCase, IndexSummary, IndexUseCase, ProgressCallback, ReconcileSummary, ReconcileUseCase,
    SearchUseCase,
};
use crate::connector::adapter::file_hasher::scan_codebase;
use crate::domain::{
    collection_name, DomainError, ExtensionAllowlist, IgnorePatternSet, IndexingStatus, SearchQuery, SearchResult,
};

/// Component C10 — the single entry point the CLI (and any future
/// embedder) drives. Composes the four use cases, derives each codebase
/// root's collection name, and is the one place that converts every
/// underlying error into this crate's error taxonomy before it reaches a
/// caller.
pub struct Orchestrator {
    index_use_case: Arc<IndexUseCase>,
    reconcile_use_case: ReconcileUseCase,
    search_use_case: SearchUseCase,
    clear_use_case: ClearUseCase,
    vector_store: Arc<dyn VectorStore>,
    ignores: IgnorePatternSet,
    allowed_extensions: ExtensionAllowlist,
    /// Per-collection lifecycle state (spec.md §4.10), tracked for
    /// logging/diagnostics only — no operation below gates on it.
    state: Mutex<HashMap<String, IndexingStatus>>,
}

impl Orchestrator {
    pub fn new(
        ast_splitter: Arc<dyn Splitter>,
        fallback_splitter: Arc<dyn Splitter>,
        embedder: Arc<dyn Embedder>,
        vector_store: Arc<dyn VectorStore>,
        snapshot_store: Arc<dyn SnapshotStore>,
        config: IndexerConfig,
        ignores: IgnorePatternSet,
        allowed_extensions: ExtensionAllowlist,
    ) -> Result<Self, DomainError> {
        config.validate()?;

        let index_use_case = Arc::new(IndexUseCase::new(
            ast_splitter,
            fallback_splitter,
            embedder.clone(),
            vector_store.clone(),
            config,
        ));
        let reconcile_use_case =
            ReconcileUseCase::new(snapshot_store.clone(), vector_store.clone(), index_use_case.clone());
        let search_use_case = SearchUseCase::new(embedder, vector_store.clone());
        let clear_use_case = ClearUseCase::new(vector_store.clone(), snapshot_store);

        Ok(Self {
            index_use_case,
            reconcile_use_case,
            search_use_case,
            clear_use_case,
            vector_store,
            ignores,
            allowed_extensions,
            state: Mutex::new(HashMap::new()),
        })
    }

    pub fn collection_for(codebase_root: &Path) -> String {
        collection_name(codebase_root)
    }

    /// Current lifecycle state for `codebase_root`'s collection, if this
    /// `Orchestrator` has run an operation against it. Diagnostic only.
    pub fn indexing_status(&self, codebase_root: &Path) -> Option<IndexingStatus> {
        let collection = Self::collection_for(codebase_root);
        self.state.lock().unwrap().get(&collection).copied()
    }

    fn set_state(&self, collection: &str, status: IndexingStatus) {
        self.state.lock().unwrap().insert(collection.to_string(), status);
    }

    /// Runs a full index: walks every file under `codebase_root` not
    /// excluded by the Path Filter and indexes it. Does not consult a
    /// previous snapshot — use `reindex_by_change` for incremental runs.
    pub async fn index(
        &self,
        codebase_root: &Path,
        progress: Option<ProgressCallback>,
        cancel: &CancellationToken,
    ) -> Result<IndexSummary, DomainError> {
        let collection = Self::collection_for(codebase_root);
        self.set_state(&collection, IndexingStatus::Pending);

        let hashes = scan_codebase(codebase_root, &self.ignores, &self.allowed_extensions).await?;
        let mut paths: Vec<String> = hashes.into_keys().collect();
        paths.sort();

        info!("indexing {} files under {}", paths.len(), codebase_root.display());
        self.set_state(&collection, IndexingStatus::InProgress);
        let result = self
            .index_use_case
            .index_paths(codebase_root, &collection, &paths, progress, cancel)
            .await;

        self.set_state(
            &collection,
            if result.is_ok() {
                IndexingStatus::Completed
            } else {
                IndexingStatus::Failed
            },
        );
        result
    }

    /// Incrementally reconciles `codebase_root` against the snapshot
    /// persisted from the previous run.
    pub async fn reindex_by_change(
        &self,
        codebase_root: &Path,
        progress: Option<ProgressCallback>,
        cancel: &CancellationToken,
    ) -> Result<ReconcileSummary, DomainError> {
        let collection = Self::collection_for(codebase_root);
        self.set_state(&collection, IndexingStatus::InProgress);
        let result = self
            .reconcile_use_case
            .execute(
                codebase_root,
                &collection,
                &self.ignores,
                &self.allowed_extensions,
                progress,
                cancel,
            )
            .await;

        self.set_state(
            &collection,
            if result.is_ok() {
                IndexingStatus::Completed
            } else {
                IndexingStatus::Failed
            },
        );
        result
    }

    pub async fn search(
        &self,
        codebase_root: &Path,
        query: &SearchQuery,
    ) -> Result<Vec<SearchResult>, DomainError> {
        let collection = Self::collection_for(codebase_root);
        self.search_use_case.execute(&collection, query).await
    }

    pub async fn clear(&self, codebase_root: &Path) -> Result<(), DomainError> {
        let collection = Self::collection_for(codebase_root);
        self.clear_use_case
            .execute(&codebase_root.to_string_lossy(), &collection)
            .await
    }

    pub async fn has_index(&self, codebase_root: &Path) -> Result<bool, DomainError> {
        let collection = Self::collection_for(codebase_root);
        self.vector_store.has_collection(&collection).await
    }

    pub fn update_ignore_patterns(&mut self, patterns: &[String]) -> Result<(), DomainError> {
        self.ignores = IgnorePatternSet::from_patterns(patterns)?;
        Ok(())
    }

    pub fn ignore_patterns(&self) -> impl Iterator<Item = &str> {
        self.ignores.patterns()
    }

    pub fn update_allowed_extensions(&mut self, allowed_extensions: ExtensionAllowlist) {
        self.allowed_extensions = allowed_extensions;
    }

    pub fn allowed_extensions(&self) -> impl Iterator<Item = &str> {
        self.allowed_extensions.extensions()
    }
}
