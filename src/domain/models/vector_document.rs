use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::Language;

/// The unit stored in a `VectorStore` collection: a chunk's embedding plus
/// the metadata needed to answer a query without a join back to the
/// source file. `id` matches the originating `Chunk::id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorDocument {
    id: String,
    vector: Vec<f32>,
    content: String,
    relative_path: String,
    start_line: u32,
    end_line: u32,
    language: Language,
    chunk_index: u32,
    metadata: HashMap<String, String>,
}

impl VectorDocument {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: String,
        vector: Vec<f32>,
        content: String,
        relative_path: String,
        start_line: u32,
        end_line: u32,
        language: Language,
        chunk_index: u32,
    ) -> Self {
        Self {
            id,
            vector,
            content,
            relative_path,
            start_line,
            end_line,
            language,
            chunk_index,
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn vector(&self) -> &[f32] {
        &self.vector
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    pub fn start_line(&self) -> u32 {
        self.start_line
    }

    pub fn end_line(&self) -> u32 {
        self.end_line
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn chunk_index(&self) -> u32 {
        self.chunk_index
    }

    pub fn metadata(&self) -> &HashMap<String, String> {
        &self.metadata
    }

    pub fn dimension(&self) -> usize {
        self.vector.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_document_metadata() {
        let doc = VectorDocument::new(
            "chunk-1".to_string(),
            vec![0.1, 0.2],
            "fn f() {}".to_string(),
            "src/lib.rs".to_string(),
            1,
            1,
            Language::Rust,
            0,
        )
        .with_metadata("codebase_path", "/repo");

        assert_eq!(doc.dimension(), 2);
        assert_eq!(doc.metadata().get("codebase_path").map(String::as_str), Some("/repo"));
    }
}
