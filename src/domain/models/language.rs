use serde::{Deserialize, Serialize};
use std::path::Path;

/// The closed set of languages the classifier can name. `Text` is the
/// universal fallback tag — it never indicates a parse failure, only that
/// no more specific classification applies (including truly unknown
/// extensions), matching the "unknown extension classifies as text"
/// behavior required of a total classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Rust,
    Python,
    JavaScript,
    TypeScript,
    Go,
    Hcl,
    Php,
    Java,
    Cpp,
    C,
    CSharp,
    Ruby,
    Swift,
    Kotlin,
    Scala,
    ObjectiveC,
    Markdown,
    Text,
}

impl Language {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "rs" => Language::Rust,
            "py" | "pyi" => Language::Python,
            "js" | "jsx" | "mjs" | "cjs" => Language::JavaScript,
            "ts" | "tsx" => Language::TypeScript,
            "go" => Language::Go,
            "hcl" | "tf" => Language::Hcl,
            "php" => Language::Php,
            "java" => Language::Java,
            "cpp" | "cc" | "cxx" | "hpp" | "hh" | "hxx" => Language::Cpp,
            "c" | "h" => Language::C,
            "cs" => Language::CSharp,
            "rb" => Language::Ruby,
            "swift" => Language::Swift,
            "kt" | "kts" => Language::Kotlin,
            "scala" | "sc" => Language::Scala,
            "m" | "mm" => Language::ObjectiveC,
            "md" | "markdown" => Language::Markdown,
            _ => Language::Text,
        }
    }

    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Language::Text)
    }

    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "rust" => Language::Rust,
            "python" => Language::Python,
            "javascript" => Language::JavaScript,
            "typescript" => Language::TypeScript,
            "go" => Language::Go,
            "hcl" => Language::Hcl,
            "php" => Language::Php,
            "java" => Language::Java,
            "cpp" | "c++" => Language::Cpp,
            "c" => Language::C,
            "csharp" | "c#" => Language::CSharp,
            "ruby" => Language::Ruby,
            "swift" => Language::Swift,
            "kotlin" => Language::Kotlin,
            "scala" => Language::Scala,
            "objectivec" | "objective-c" => Language::ObjectiveC,
            "markdown" => Language::Markdown,
            _ => Language::Text,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Rust => "rust",
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Go => "go",
            Language::Hcl => "hcl",
            Language::Php => "php",
            Language::Java => "java",
            Language::Cpp => "cpp",
            Language::C => "c",
            Language::CSharp => "csharp",
            Language::Ruby => "ruby",
            Language::Swift => "swift",
            Language::Kotlin => "kotlin",
            Language::Scala => "scala",
            Language::ObjectiveC => "objectivec",
            Language::Markdown => "markdown",
            Language::Text => "text",
        }
    }

    /// Whether this crate carries a tree-sitter grammar for the language,
    /// i.e. whether the AST splitter applies before falling back to the
    /// character splitter.
    pub fn has_grammar(&self) -> bool {
        matches!(
            self,
            Language::Rust
                | Language::Python
                | Language::JavaScript
                | Language::TypeScript
                | Language::Go
                | Language::Hcl
                | Language::Php
                | Language::Cpp
                | Language::Swift
                | Language::Kotlin
        )
    }

    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Language::Rust => &["rs"],
            Language::Python => &["py", "pyi"],
            Language::JavaScript => &["js", "jsx", "mjs", "cjs"],
            Language::TypeScript => &["ts", "tsx"],
            Language::Go => &["go"],
            Language::Hcl => &["hcl", "tf"],
            Language::Php => &["php"],
            Language::Java => &["java"],
            Language::Cpp => &["cpp", "cc", "cxx", "hpp", "hh", "hxx"],
            Language::C => &["c", "h"],
            Language::CSharp => &["cs"],
            Language::Ruby => &["rb"],
            Language::Swift => &["swift"],
            Language::Kotlin => &["kt", "kts"],
            Language::Scala => &["scala", "sc"],
            Language::ObjectiveC => &["m", "mm"],
            Language::Markdown => &["md", "markdown"],
            Language::Text => &[],
        }
    }

    pub fn all_supported() -> Vec<Language> {
        vec![
            Language::Rust,
            Language::Python,
            Language::JavaScript,
            Language::TypeScript,
            Language::Go,
            Language::Hcl,
            Language::Php,
            Language::Java,
            Language::Cpp,
            Language::C,
            Language::CSharp,
            Language::Ruby,
            Language::Swift,
            Language::Kotlin,
            Language::Scala,
            Language::ObjectiveC,
            Language::Markdown,
        ]
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_from_extension() {
        assert_eq!(Language::from_extension("rs"), Language::Rust);
        assert_eq!(Language::from_extension("py"), Language::Python);
        assert_eq!(Language::from_extension("js"), Language::JavaScript);
        assert_eq!(Language::from_extension("ts"), Language::TypeScript);
        assert_eq!(Language::from_extension("go"), Language::Go);
        assert_eq!(Language::from_extension("hcl"), Language::Hcl);
        assert_eq!(Language::from_extension("php"), Language::Php);
        assert_eq!(Language::from_extension("kt"), Language::Kotlin);
        assert_eq!(Language::from_extension("txt"), Language::Text);
    }

    #[test]
    fn test_language_from_path() {
        assert_eq!(
            Language::from_path(Path::new("src/main.rs")),
            Language::Rust
        );
        assert_eq!(
            Language::from_path(Path::new("script.py")),
            Language::Python
        );
        assert_eq!(
            Language::from_path(Path::new("README")),
            Language::Text
        );
    }

    #[test]
    fn test_language_from_str() {
        assert_eq!(Language::parse("rust"), Language::Rust);
        assert_eq!(Language::parse("PYTHON"), Language::Python);
        assert_eq!(Language::parse("unknown_lang"), Language::Text);
    }

    #[test]
    fn test_has_grammar() {
        assert!(Language::Rust.has_grammar());
        assert!(!Language::Java.has_grammar());
        assert!(!Language::Text.has_grammar());
    }

    #[test]
    fn test_extensions() {
        assert_eq!(
            Language::JavaScript.extensions(),
            &["js", "jsx", "mjs", "cjs"]
        );
        assert_eq!(Language::Rust.extensions(), &["rs"]);
    }

    #[test]
    fn test_all_supported() {
        let supported = Language::all_supported();
        assert!(supported.contains(&Language::Rust));
        assert!(supported.contains(&Language::Python));
        assert!(supported.contains(&Language::Hcl));
        assert!(supported.contains(&Language::Php));
        assert!(!supported.contains(&Language::Text));
    }
}
