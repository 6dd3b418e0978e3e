use crate::domain::{Chunk, DomainError, Language};

/// Splits one file's content into chunks. Implemented by the AST Splitter
/// (tree-sitter backed, for languages with a grammar) and the Fallback
/// Splitter (recursive character splitting, for everything else or when
/// parsing fails). Both are synchronous, CPU-bound operations — no I/O,
/// no `async_trait` needed.
pub trait Splitter: Send + Sync {
    fn split(
        &self,
        relative_path: &str,
        content: &str,
        language: Language,
        chunk_size: usize,
        chunk_overlap: usize,
    ) -> Result<Vec<Chunk>, DomainError>;
}
