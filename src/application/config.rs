//! Ambient configuration for the indexing pipeline. Read once at
//! construction time, as design note 9 requires — there is no global
//! mutable config state; an `IndexerConfig` is passed into the
//! `Orchestrator` and threaded through to whichever use case needs it.

use std::env;

/// Batching and splitting parameters for the Indexing Pipeline (§4.7).
/// Defaults match the pipeline's documented caps.
#[derive(Debug, Clone)]
pub struct IndexerConfig {
    /// Target chunk size in characters for the fallback splitter and the
    /// AST splitter's refinement step.
    pub chunk_size: usize,
    /// Characters of trailing context carried from the previous chunk.
    pub chunk_overlap: usize,
    /// Files grouped into one indexing batch.
    pub file_batch: usize,
    /// Chunks grouped into one embedding/upsert sub-batch.
    pub max_chunks_per_batch: usize,
    /// Approximate token budget per embedding sub-batch
    /// (`ceil(bytes / 4)` per chunk).
    pub max_tokens_per_batch: usize,
    /// A single chunk above this estimated token count is skipped with a
    /// `ParseWarning` rather than sent to the embedder.
    pub max_chunk_tokens: usize,
    /// Once this many chunks have been queued in one indexing run, the
    /// pipeline stops accepting more and reports `status = limit_reached`.
    pub global_chunk_cap: usize,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1500,
            chunk_overlap: 200,
            file_batch: 10,
            max_chunks_per_batch: 100,
            max_tokens_per_batch: 200_000,
            max_chunk_tokens: 250_000,
            global_chunk_cap: 450_000,
        }
    }
}

impl IndexerConfig {
    /// Builds a config from defaults overridden by `CODEINDEX_*`
    /// environment variables, read once here rather than looked up again
    /// during a run.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(v) = env_usize("CODEINDEX_CHUNK_SIZE") {
            config.chunk_size = v;
        }
        if let Some(v) = env_usize("CODEINDEX_CHUNK_OVERLAP") {
            config.chunk_overlap = v;
        }
        if let Some(v) = env_usize("CODEINDEX_FILE_BATCH") {
            config.file_batch = v;
        }
        if let Some(v) = env_usize("CODEINDEX_MAX_CHUNKS_PER_BATCH") {
            config.max_chunks_per_batch = v;
        }
        if let Some(v) = env_usize("CODEINDEX_MAX_TOKENS_PER_BATCH") {
            config.max_tokens_per_batch = v;
        }
        if let Some(v) = env_usize("CODEINDEX_MAX_CHUNK_TOKENS") {
            config.max_chunk_tokens = v;
        }
        if let Some(v) = env_usize("CODEINDEX_GLOBAL_CHUNK_CAP") {
            config.global_chunk_cap = v;
        }
        config
    }

    pub fn validate(&self) -> Result<(), crate::domain::DomainError> {
        if self.chunk_size == 0 {
            return Err(crate::domain::DomainError::config(
                "chunk_size must be greater than zero",
            ));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(crate::domain::DomainError::config(
                "chunk_overlap must be smaller than chunk_size",
            ));
        }
        Ok(())
    }
}

fn env_usize(name: &str) -> Option<usize> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}
