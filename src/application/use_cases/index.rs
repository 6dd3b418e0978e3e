use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::application::config::IndexerConfig;
use crate::application::interfaces::{Embedder, Splitter, VectorStore};
use crate::domain::{chunk_id, Chunk, DomainError, Language, VectorDocument};

/// Progress reported between file batches and embedding sub-batches. Not
/// wired to a terminal directly — the CLI front end adapts it to an
/// `indicatif` bar; a library caller can ignore it or log it.
#[derive(Debug, Clone)]
pub struct Progress {
    pub phase: &'static str,
    pub current: u64,
    pub total: u64,
}

impl Progress {
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            (self.current as f64 / self.total as f64) * 100.0
        }
    }
}

pub type ProgressCallback = Arc<dyn Fn(Progress) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexStatus {
    Completed,
    LimitReached,
}

#[derive(Debug, Clone)]
pub struct IndexSummary {
    pub files_indexed: u64,
    pub files_skipped: u64,
    pub chunks_indexed: u64,
    pub status: IndexStatus,
}

/// Component C7 — the batching pipeline that turns a list of files into
/// upserted vector documents.
pub struct IndexUseCase {
    ast_splitter: Arc<dyn Splitter>,
    fallback_splitter: Arc<dyn Splitter>,
    embedder: Arc<dyn Embedder>,
    vector_store: Arc<dyn VectorStore>,
    config: IndexerConfig,
}

impl IndexUseCase {
    pub fn new(
        ast_splitter: Arc<dyn Splitter>,
        fallback_splitter: Arc<dyn Splitter>,
        embedder: Arc<dyn Embedder>,
        vector_store: Arc<dyn VectorStore>,
        config: IndexerConfig,
    ) -> Self {
        Self {
            ast_splitter,
            fallback_splitter,
            embedder,
            vector_store,
            config,
        }
    }

    /// Splits one file's content, preferring the AST splitter when a
    /// grammar is available and falling back on a grammar miss or a
    /// parse failure (spec'd fallback path, step 1–2 of the AST Splitter
    /// algorithm).
    fn split_file(
        ast_splitter: &dyn Splitter,
        fallback_splitter: &dyn Splitter,
        relative_path: &str,
        content: &str,
        language: Language,
        config: &IndexerConfig,
    ) -> Vec<Chunk> {
        if language.has_grammar() {
            match ast_splitter.split(relative_path, content, language, config.chunk_size, config.chunk_overlap) {
                Ok(chunks) if !chunks.is_empty() => return chunks,
                Ok(_) => {}
                Err(e) => {
                    warn!("AST split failed for {relative_path}, falling back: {e}");
                }
            }
        }
        fallback_splitter
            .split(relative_path, content, language, config.chunk_size, config.chunk_overlap)
            .unwrap_or_default()
    }

    /// Indexes exactly the given relative paths under `codebase_root` into
    /// `collection`, creating the collection first if it does not exist.
    /// Used both for a full index (caller passes every walked file) and a
    /// restricted reindex driven by the Reconciler (caller passes only
    /// added/modified paths).
    pub async fn index_paths(
        &self,
        codebase_root: &Path,
        collection: &str,
        relative_paths: &[String],
        progress: Option<ProgressCallback>,
        cancel: &CancellationToken,
    ) -> Result<IndexSummary, DomainError> {
        if !self.vector_store.has_collection(collection).await? {
            self.vector_store
                .create_collection(collection, self.embedder.dimension())
                .await?;
        }

        let start = Instant::now();
        let total = relative_paths.len() as u64;
        let files_indexed = AtomicU64::new(0);
        let files_skipped = AtomicU64::new(0);
        let chunks_indexed = AtomicU64::new(0);
        let mut status = IndexStatus::Completed;

        let parallelism = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
        let semaphore = Arc::new(Semaphore::new(parallelism));

        for file_batch in relative_paths.chunks(self.config.file_batch) {
            if cancel.is_cancelled() {
                return Err(DomainError::CancelRequested);
            }

            // Reads and splits within the batch run concurrently, bounded
            // by `semaphore`; embedding and upsert stay sequential below.
            let mut join_set: JoinSet<(usize, Option<Vec<Chunk>>)> = JoinSet::new();
            for (index, relative_path) in file_batch.iter().enumerate() {
                let permit = semaphore.clone();
                let absolute_path = codebase_root.join(relative_path);
                let relative_path = relative_path.clone();
                let ast_splitter = self.ast_splitter.clone();
                let fallback_splitter = self.fallback_splitter.clone();
                let config = self.config.clone();

                join_set.spawn(async move {
                    let _permit = permit.acquire_owned().await.ok();
                    let content = match tokio::fs::read_to_string(&absolute_path).await {
                        Ok(c) => c,
                        Err(e) => {
                            warn!("skipping {relative_path}: {e}");
                            return (index, None);
                        }
                    };
                    let language = Language::from_path(&absolute_path);
                    let chunks = IndexUseCase::split_file(
                        ast_splitter.as_ref(),
                        fallback_splitter.as_ref(),
                        &relative_path,
                        &content,
                        language,
                        &config,
                    );
                    (index, Some(chunks))
                });
            }

            let mut per_file: Vec<Option<Vec<Chunk>>> = vec![None; file_batch.len()];
            while let Some(joined) = join_set.join_next().await {
                let (index, chunks) = joined.map_err(|e| DomainError::internal(format!("split task panicked: {e}")))?;
                per_file[index] = chunks;
            }

            let mut batch_chunks: Vec<Chunk> = Vec::new();
            for file_chunks in per_file.into_iter() {
                let file_chunks = match file_chunks {
                    Some(c) => c,
                    None => {
                        files_skipped.fetch_add(1, Ordering::Relaxed);
                        continue;
                    }
                };

                for chunk in file_chunks {
                    if chunk.estimated_tokens() > self.config.max_chunk_tokens {
                        warn!(
                            "skipping oversize chunk in {} ({}:{}): {} estimated tokens",
                            chunk.relative_path(),
                            chunk.start_line(),
                            chunk.end_line(),
                            chunk.estimated_tokens()
                        );
                        continue;
                    }
                    batch_chunks.push(chunk);
                }

                files_indexed.fetch_add(1, Ordering::Relaxed);
                if let Some(cb) = &progress {
                    cb(Progress {
                        phase: "index",
                        current: files_indexed.load(Ordering::Relaxed),
                        total,
                    });
                }

                if chunks_indexed.load(Ordering::Relaxed) + batch_chunks.len() as u64
                    >= self.config.global_chunk_cap as u64
                {
                    status = IndexStatus::LimitReached;
                    break;
                }
            }

            for sub_batch in sub_batches(&batch_chunks, &self.config) {
                if cancel.is_cancelled() {
                    return Err(DomainError::CancelRequested);
                }
                self.embed_and_upsert(codebase_root, collection, sub_batch).await?;
                chunks_indexed.fetch_add(sub_batch.len() as u64, Ordering::Relaxed);
            }

            if status == IndexStatus::LimitReached {
                break;
            }
        }

        info!(
            "indexed {} files ({} chunks, {} skipped) into {} in {:.2}s",
            files_indexed.load(Ordering::Relaxed),
            chunks_indexed.load(Ordering::Relaxed),
            files_skipped.load(Ordering::Relaxed),
            collection,
            start.elapsed().as_secs_f64()
        );

        Ok(IndexSummary {
            files_indexed: files_indexed.load(Ordering::Relaxed),
            files_skipped: files_skipped.load(Ordering::Relaxed),
            chunks_indexed: chunks_indexed.load(Ordering::Relaxed),
            status,
        })
    }

    async fn embed_and_upsert(
        &self,
        codebase_root: &Path,
        collection: &str,
        chunks: &[Chunk],
    ) -> Result<(), DomainError> {
        if chunks.is_empty() {
            return Ok(());
        }
        let texts: Vec<String> = chunks.iter().map(|c| c.content().to_string()).collect();
        let vectors = self.embedder.embed_batch(&texts).await?;
        if vectors.len() != chunks.len() {
            return Err(DomainError::internal(
                "embedder returned a different number of vectors than inputs",
            ));
        }

        let codebase_path = codebase_root.to_string_lossy().to_string();
        let documents: Vec<VectorDocument> = chunks
            .iter()
            .zip(vectors.into_iter())
            .enumerate()
            .map(|(index, (chunk, vector))| {
                let id = chunk_id(
                    chunk.relative_path(),
                    chunk.start_line(),
                    chunk.end_line(),
                    chunk.content(),
                );
                debug!("embedded chunk {id}");
                VectorDocument::new(
                    id,
                    vector,
                    chunk.content().to_string(),
                    chunk.relative_path().to_string(),
                    chunk.start_line(),
                    chunk.end_line(),
                    chunk.language(),
                    index as u32,
                )
                .with_metadata("codebase_path", codebase_path.clone())
                .with_metadata("language", chunk.language().as_str())
                .with_metadata("chunk_index", index.to_string())
            })
            .collect();

        self.vector_store.upsert(collection, &documents).await
    }
}

/// Groups chunks into sub-batches under both the chunk-count cap and the
/// estimated-token cap, never splitting a single chunk across batches.
fn sub_batches<'a>(chunks: &'a [Chunk], config: &IndexerConfig) -> Vec<&'a [Chunk]> {
    let mut batches = Vec::new();
    let mut start = 0;
    let mut tokens = 0usize;

    for (i, chunk) in chunks.iter().enumerate() {
        let would_exceed_count = i - start >= config.max_chunks_per_batch;
        let would_exceed_tokens =
            tokens + chunk.estimated_tokens() > config.max_tokens_per_batch && i > start;
        if would_exceed_count || would_exceed_tokens {
            batches.push(&chunks[start..i]);
            start = i;
            tokens = 0;
        }
        tokens += chunk.estimated_tokens();
    }
    if start < chunks.len() {
        batches.push(&chunks[start..]);
    }
    batches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::interfaces::VectorFilter;
    use crate::connector::adapter::{AstSplitter, FallbackSplitter, InMemoryVectorStore, MockEmbedder};
    use crate::domain::NodeType;

    fn chunk(content: &str) -> Chunk {
        Chunk::new(
            "id".to_string(),
            "a.rs".to_string(),
            content.to_string(),
            1,
            1,
            Language::Rust,
            Some(NodeType::Function),
        )
    }

    #[tokio::test]
    async fn test_index_paths_stores_required_metadata() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("lib.rs"), "fn add(a: i32, b: i32) -> i32 { a + b }\n").unwrap();

        let vector_store = Arc::new(InMemoryVectorStore::new());
        let embedder = Arc::new(MockEmbedder::new());
        let use_case = IndexUseCase::new(
            Arc::new(AstSplitter::new()),
            Arc::new(FallbackSplitter::new()),
            embedder.clone(),
            vector_store.clone(),
            IndexerConfig::default(),
        );

        let cancel = CancellationToken::new();
        use_case
            .index_paths(dir.path(), "collection", &["lib.rs".to_string()], None, &cancel)
            .await
            .unwrap();

        let query_vector = embedder.embed("add numbers").await.unwrap();
        let hits = vector_store
            .query("collection", &query_vector, 10, &VectorFilter::default())
            .await
            .unwrap();
        assert!(!hits.is_empty());
        for (doc, _) in &hits {
            assert_eq!(
                doc.metadata().get("codebase_path").map(String::as_str),
                Some(dir.path().to_string_lossy().as_ref())
            );
            assert_eq!(doc.metadata().get("language").map(String::as_str), Some("rust"));
            assert!(doc.metadata().contains_key("chunk_index"));
        }
    }

    #[test]
    fn test_sub_batches_respects_chunk_count_cap() {
        let config = IndexerConfig {
            max_chunks_per_batch: 2,
            max_tokens_per_batch: 1_000_000,
            ..IndexerConfig::default()
        };
        let chunks: Vec<Chunk> = (0..5).map(|_| chunk("x")).collect();
        let batches = sub_batches(&chunks, &config);
        assert_eq!(batches.len(), 3);
        assert_eq!(batches[0].len(), 2);
        assert_eq!(batches[2].len(), 1);
    }

    #[test]
    fn test_sub_batches_respects_token_cap() {
        let config = IndexerConfig {
            max_chunks_per_batch: 1000,
            max_tokens_per_batch: 4,
            ..IndexerConfig::default()
        };
        let chunks = vec![chunk("abcd"), chunk("efgh"), chunk("ij")];
        let batches = sub_batches(&chunks, &config);
        assert_eq!(batches.len(), 3);
    }
}
