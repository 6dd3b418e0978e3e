use serde::{Deserialize, Serialize};

use super::Language;

/// A contiguous, non-empty span of a source file produced by the AST or
/// fallback splitter. `id` is content-derived (see
/// `crate::domain::services::identity::chunk_id`), not assigned — two
/// chunks with identical path, span and content always carry the same id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    id: String,
    relative_path: String,
    content: String,
    start_line: u32,
    end_line: u32,
    language: Language,
    node_type: Option<NodeType>,
}

impl Chunk {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: String,
        relative_path: String,
        content: String,
        start_line: u32,
        end_line: u32,
        language: Language,
        node_type: Option<NodeType>,
    ) -> Self {
        Self {
            id,
            relative_path,
            content,
            start_line,
            end_line,
            language,
            node_type,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    pub fn content(&self) -> &str {
        &self.content
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

    pub fn node_type(&self) -> Option<NodeType> {
        self.node_type
    }

    pub fn location(&self) -> String {
        format!("{}:{}-{}", self.relative_path, self.start_line, self.end_line)
    }

    pub fn line_count(&self) -> u32 {
        self.end_line.saturating_sub(self.start_line) + 1
    }

    /// Rough token estimate used by the batching pipeline's per-batch and
    /// per-chunk ceilings: `ceil(bytes / 4)`.
    pub fn estimated_tokens(&self) -> usize {
        (self.content.len() + 3) / 4
    }

    pub fn preview(&self, max_lines: usize) -> String {
        self.content
            .lines()
            .take(max_lines)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// The kind of AST node a chunk was split on. Absent (`None` on `Chunk`)
/// for chunks produced by the character-based fallback splitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Function,
    Class,
    Struct,
    Enum,
    Trait,
    Impl,
    Module,
    Constant,
    TypeDef,
    Interface,
    Block,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Function => "function",
            NodeType::Class => "class",
            NodeType::Struct => "struct",
            NodeType::Enum => "enum",
            NodeType::Trait => "trait",
            NodeType::Impl => "impl",
            NodeType::Module => "module",
            NodeType::Constant => "constant",
            NodeType::TypeDef => "typedef",
            NodeType::Interface => "interface",
            NodeType::Block => "block",
        }
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(start: u32, end: u32, content: &str) -> Chunk {
        Chunk::new(
            "id".to_string(),
            "src/lib.rs".to_string(),
            content.to_string(),
            start,
            end,
            Language::Rust,
            Some(NodeType::Function),
        )
    }

    #[test]
    fn test_line_count() {
        let c = chunk(10, 12, "fn add(a: i32, b: i32) -> i32 { a + b }");
        assert_eq!(c.line_count(), 3);
    }

    #[test]
    fn test_location_format() {
        let c = chunk(5, 10, "code");
        assert_eq!(c.location(), "src/lib.rs:5-10");
    }

    #[test]
    fn test_estimated_tokens() {
        let c = chunk(1, 1, "abcdefgh");
        assert_eq!(c.estimated_tokens(), 2);
    }
}
