use streaming_iterator::StreamingIterator;
use tracing::{debug, warn};
use tree_sitter::{Parser, Query, QueryCursor};

use crate::application::interfaces::Splitter;
use crate::domain::{Chunk, DomainError, Language, NodeType};

/// Component C3 — splits a file along the boundaries of its top-level
/// definitions (functions, types, modules) using a tree-sitter grammar,
/// then refines any node that still exceeds `chunk_size` by re-splitting
/// it on line boundaries (never mid-line) and stitches overlap between
/// consecutive chunks.
pub struct AstSplitter {
    supported_languages: Vec<Language>,
}

impl AstSplitter {
    pub fn new() -> Self {
        Self {
            supported_languages: vec![
                Language::Rust,
                Language::Python,
                Language::JavaScript,
                Language::TypeScript,
                Language::Go,
                Language::Hcl,
                Language::Php,
                Language::Cpp,
                Language::Swift,
                Language::Kotlin,
            ],
        }
    }

    pub fn supported_languages(&self) -> &[Language] {
        &self.supported_languages
    }

    fn ts_language(&self, language: Language) -> Option<tree_sitter::Language> {
        match language {
            Language::Rust => Some(tree_sitter_rust::LANGUAGE.into()),
            Language::Python => Some(tree_sitter_python::LANGUAGE.into()),
            Language::JavaScript => Some(tree_sitter_javascript::LANGUAGE.into()),
            Language::TypeScript => Some(tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()),
            Language::Go => Some(tree_sitter_go::LANGUAGE.into()),
            Language::Hcl => Some(tree_sitter_hcl::LANGUAGE.into()),
            Language::Php => Some(tree_sitter_php::LANGUAGE_PHP.into()),
            Language::Cpp => Some(tree_sitter_cpp::LANGUAGE.into()),
            Language::Swift => Some(tree_sitter_swift::LANGUAGE.into()),
            Language::Kotlin => Some(tree_sitter_kotlin_ng::LANGUAGE.into()),
            _ => None,
        }
    }

    fn splittable_node_query(&self, language: Language) -> &'static str {
        match language {
            Language::Rust => {
                r#"
                (function_item name: (identifier) @name) @function
                (impl_item) @impl
                (struct_item name: (type_identifier) @name) @struct
                (enum_item name: (type_identifier) @name) @enum
                (trait_item name: (type_identifier) @name) @trait
                (mod_item name: (identifier) @name) @module
                (const_item name: (identifier) @name) @constant
                (static_item name: (identifier) @name) @constant
                (type_item name: (type_identifier) @name) @typedef
                "#
            }
            Language::Python => {
                r#"
                (function_definition name: (identifier) @name) @function
                (class_definition name: (identifier) @name) @class
                "#
            }
            Language::JavaScript => {
                r#"
                (function_declaration name: (identifier) @name) @function
                (class_declaration name: (identifier) @name) @class
                (method_definition name: (property_identifier) @name) @function
                (arrow_function) @function
                "#
            }
            Language::TypeScript => {
                r#"
                (function_declaration name: (identifier) @name) @function
                (class_declaration name: (type_identifier) @name) @class
                (method_definition name: (property_identifier) @name) @function
                (arrow_function) @function
                (interface_declaration name: (type_identifier) @name) @interface
                (type_alias_declaration name: (type_identifier) @name) @typedef
                "#
            }
            Language::Go => {
                r#"
                (function_declaration name: (identifier) @name) @function
                (method_declaration name: (field_identifier) @name) @function
                (type_declaration (type_spec name: (type_identifier) @name)) @struct
                "#
            }
            Language::Hcl => {
                r#"
                (block (identifier) @name) @block
                (attribute (identifier) @name) @constant
                "#
            }
            Language::Php => {
                r#"
                (function_definition name: (name) @name) @function
                (method_declaration name: (name) @name) @function
                (class_declaration name: (name) @name) @class
                (interface_declaration name: (name) @name) @interface
                (trait_declaration name: (name) @name) @trait
                (namespace_definition name: (namespace_name) @name) @module
                (enum_declaration name: (name) @name) @enum
                "#
            }
            Language::Cpp => {
                r#"
                (class_specifier name: (type_identifier) @name) @class
                (struct_specifier name: (type_identifier) @name) @struct
                (union_specifier name: (type_identifier) @name) @class
                (function_definition
                  declarator: (function_declarator declarator: (identifier) @name)) @function
                (function_definition
                  declarator: (function_declarator declarator: (field_identifier) @name)) @function
                (namespace_definition name: (namespace_identifier) @name) @module
                (type_definition declarator: (type_identifier) @name) @typedef
                (enum_specifier name: (type_identifier) @name) @enum
                "#
            }
            Language::Swift => {
                r#"
                (function_declaration name: (simple_identifier) @name) @function
                (class_declaration
                  declaration_kind: "class"
                  name: (type_identifier) @name) @class
                (class_declaration
                  declaration_kind: "struct"
                  name: (type_identifier) @name) @struct
                (class_declaration
                  declaration_kind: "enum"
                  name: (type_identifier) @name) @enum
                (protocol_declaration name: (type_identifier) @name) @trait
                (typealias_declaration name: (type_identifier) @name) @typedef
                "#
            }
            Language::Kotlin => {
                r#"
                (function_declaration (simple_identifier) @name) @function
                (class_declaration (type_identifier) @name) @class
                (object_declaration (type_identifier) @name) @struct
                (type_alias (type_identifier) @name) @typedef
                "#
            }
            _ => "",
        }
    }

    fn capture_to_node_type(capture_name: &str) -> NodeType {
        match capture_name {
            "function" => NodeType::Function,
            "class" => NodeType::Class,
            "struct" => NodeType::Struct,
            "enum" => NodeType::Enum,
            "trait" => NodeType::Trait,
            "impl" => NodeType::Impl,
            "module" => NodeType::Module,
            "constant" => NodeType::Constant,
            "typedef" => NodeType::TypeDef,
            "interface" => NodeType::Interface,
            _ => NodeType::Block,
        }
    }
}

impl Default for AstSplitter {
    fn default() -> Self {
        Self::new()
    }
}

impl Splitter for AstSplitter {
    fn split(
        &self,
        relative_path: &str,
        content: &str,
        language: Language,
        chunk_size: usize,
        chunk_overlap: usize,
    ) -> Result<Vec<Chunk>, DomainError> {
        let ts_language = self
            .ts_language(language)
            .ok_or_else(|| DomainError::parse(format!("no grammar for {language}")))?;

        let mut parser = Parser::new();
        parser
            .set_language(&ts_language)
            .map_err(|e| DomainError::parse(format!("failed to set language: {e}")))?;

        let tree = parser
            .parse(content, None)
            .ok_or_else(|| DomainError::parse(format!("failed to parse {relative_path}")))?;

        let query_source = self.splittable_node_query(language);
        if query_source.is_empty() {
            return Ok(Vec::new());
        }
        let query = Query::new(&ts_language, query_source)
            .map_err(|e| DomainError::parse(format!("invalid query for {language}: {e}")))?;

        let mut cursor = QueryCursor::new();
        let text_bytes = content.as_bytes();
        let capture_names: Vec<&str> = query.capture_names().to_vec();

        let mut raw_nodes: Vec<(NodeType, tree_sitter::Node)> = Vec::new();
        let mut matches_iter = cursor.matches(&query, tree.root_node(), text_bytes);
        while let Some(query_match) = matches_iter.next() {
            for capture in query_match.captures {
                let capture_name = capture_names.get(capture.index as usize).copied().unwrap_or("");
                if capture_name == "name" || capture_name.ends_with(".name") {
                    continue;
                }
                raw_nodes.push((Self::capture_to_node_type(capture_name), capture.node));
            }
        }
        // A node can be captured more than once by overlapping patterns;
        // keep first-seen order but drop exact byte-range duplicates.
        raw_nodes.sort_by_key(|(_, n)| n.start_byte());
        raw_nodes.dedup_by_key(|(_, n)| n.start_byte());

        let mut chunks = Vec::new();
        for (node_type, node) in raw_nodes {
            let node_content = &content[node.byte_range()];
            if node_content.trim().len() < 10 {
                continue;
            }
            let start_line = node.start_position().row as u32 + 1;
            let refined = refine(node_content, start_line, chunk_size);
            for (text, line) in refined {
                chunks.push((text, line, line + count_lines(&text) - 1, Some(node_type)));
            }
        }

        if chunks.is_empty() {
            debug!("no splittable nodes matched in {relative_path} ({language})");
        }

        Ok(apply_overlap(relative_path, chunks, language, chunk_overlap))
    }
}

/// Splits `text` on line boundaries whenever it exceeds `chunk_size`
/// characters, never breaking inside a line. Returns `(text, start_line)`
/// pairs relative to `node_start_line`.
fn refine(text: &str, node_start_line: u32, chunk_size: usize) -> Vec<(String, u32)> {
    if text.len() <= chunk_size {
        return vec![(text.to_string(), node_start_line)];
    }

    let mut parts = Vec::new();
    let mut current = String::new();
    let mut current_start = node_start_line;
    let mut line_no = node_start_line;

    for line in text.split_inclusive('\n') {
        if !current.is_empty() && current.len() + line.len() > chunk_size {
            parts.push((std::mem::take(&mut current), current_start));
            current_start = line_no;
        }
        current.push_str(line);
        line_no += line.matches('\n').count() as u32;
    }
    if !current.is_empty() {
        parts.push((current, current_start));
    }
    if parts.is_empty() {
        warn!("refine produced no parts for a non-empty node, keeping it whole");
        parts.push((text.to_string(), node_start_line));
    }
    parts
}

fn count_lines(text: &str) -> u32 {
    text.lines().count().max(1) as u32
}

/// Largest byte index `<= idx` that lands on a UTF-8 char boundary of `s`.
/// `idx` itself may fall inside a multi-byte character; a raw byte offset
/// like `len() - chunk_overlap` gives no such guarantee.
fn floor_char_boundary(s: &str, idx: usize) -> usize {
    let mut i = idx.min(s.len());
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

fn apply_overlap(
    relative_path: &str,
    parts: Vec<(String, u32, u32, Option<NodeType>)>,
    language: Language,
    chunk_overlap: usize,
) -> Vec<Chunk> {
    let mut chunks = Vec::with_capacity(parts.len());
    let mut previous_tail: Option<String> = None;

    for (content, mut start_line, end_line, node_type) in parts {
        let mut full_content = content.clone();
        if let Some(tail) = &previous_tail {
            if chunk_overlap > 0 && !tail.is_empty() {
                full_content = format!("{tail}\n{content}");
                start_line = start_line.saturating_sub(count_lines(tail));
            }
        }

        let tail_start = floor_char_boundary(&full_content, full_content.len().saturating_sub(chunk_overlap));
        previous_tail = Some(full_content[tail_start..].to_string());

        let id = crate::domain::chunk_id(relative_path, start_line, end_line, &full_content);
        chunks.push(Chunk::new(
            id,
            relative_path.to_string(),
            full_content,
            start_line,
            end_line,
            language,
            node_type,
        ));
    }
    chunks
}
