use serde::{Deserialize, Serialize};

use super::Language;

/// A single hit from the Query Path, already mapped to the shape a caller
/// renders directly — no further join back to a `Chunk` is needed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    content: String,
    relative_path: String,
    start_line: u32,
    end_line: u32,
    language: Language,
    score: f32,
}

impl SearchResult {
    pub fn new(
        content: String,
        relative_path: String,
        start_line: u32,
        end_line: u32,
        language: Language,
        score: f32,
    ) -> Self {
        Self {
            content,
            relative_path,
            start_line,
            end_line,
            language,
            score,
        }
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

    pub fn score(&self) -> f32 {
        self.score
    }

    pub fn is_relevant(&self, threshold: f32) -> bool {
        self.score >= threshold
    }

    pub fn display_line(&self) -> String {
        format!(
            "{}:{}-{} (score: {:.3})",
            self.relative_path, self.start_line, self.end_line, self.score
        )
    }
}

/// The Query Path's input: free text plus optional filters, mirroring the
/// filter predicate a `VectorStore::query` call accepts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    query: String,
    limit: usize,
    min_score: Option<f32>,
    languages: Option<Vec<String>>,
    node_types: Option<Vec<String>>,
}

impl SearchQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            limit: 10,
            min_score: None,
            languages: None,
            node_types: None,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.max(1);
        self
    }

    pub fn with_min_score(mut self, score: f32) -> Self {
        self.min_score = Some(score);
        self
    }

    pub fn with_languages(mut self, languages: Vec<String>) -> Self {
        self.languages = Some(languages);
        self
    }

    pub fn with_node_types(mut self, types: Vec<String>) -> Self {
        self.node_types = Some(types);
        self
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn min_score(&self) -> Option<f32> {
        self.min_score
    }

    pub fn languages(&self) -> Option<&[String]> {
        self.languages.as_deref()
    }

    pub fn node_types(&self) -> Option<&[String]> {
        self.node_types.as_deref()
    }

    pub fn has_filters(&self) -> bool {
        self.languages.is_some() || self.node_types.is_some()
    }

    pub fn filters_by_language(&self, language: &str) -> bool {
        self.languages
            .as_ref()
            .is_some_and(|langs| langs.iter().any(|l| l == language))
    }

    pub fn summary(&self) -> String {
        let mut parts = vec![format!("query=\"{}\"", self.query)];
        parts.push(format!("limit={}", self.limit));
        if let Some(score) = self.min_score {
            parts.push(format!("min_score={:.2}", score));
        }
        if let Some(ref langs) = self.languages {
            parts.push(format!("languages={:?}", langs));
        }
        parts.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_result_relevance() {
        let result = SearchResult::new(
            "fn f() {}".to_string(),
            "src/lib.rs".to_string(),
            1,
            1,
            Language::Rust,
            0.95,
        );

        assert_eq!(result.score(), 0.95);
        assert!(result.is_relevant(0.5));
        assert!(!result.is_relevant(0.99));
    }

    #[test]
    fn test_search_query_builder() {
        let query = SearchQuery::new("find functions")
            .with_limit(20)
            .with_min_score(0.7)
            .with_languages(vec!["rust".to_string()]);

        assert_eq!(query.query(), "find functions");
        assert_eq!(query.limit(), 20);
        assert_eq!(query.min_score(), Some(0.7));
        assert!(query.has_filters());
    }

    #[test]
    fn test_query_filters() {
        let query =
            SearchQuery::new("test").with_languages(vec!["rust".to_string(), "python".to_string()]);

        assert!(query.filters_by_language("rust"));
        assert!(!query.filters_by_language("go"));
    }
}
