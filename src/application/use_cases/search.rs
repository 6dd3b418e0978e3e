use std::sync::Arc;

use crate::application::interfaces::{Embedder, VectorFilter, VectorStore};
use crate::domain::{DomainError, SearchQuery, SearchResult};

/// Component C8 — embeds the query text and maps store hits to
/// `SearchResult`s in descending score order. No reranking, no hybrid
/// text-search fusion, no query expansion: ranking beyond the store's own
/// cosine similarity is out of scope.
pub struct SearchUseCase {
    embedder: Arc<dyn Embedder>,
    vector_store: Arc<dyn VectorStore>,
}

impl SearchUseCase {
    pub fn new(embedder: Arc<dyn Embedder>, vector_store: Arc<dyn VectorStore>) -> Self {
        Self {
            embedder,
            vector_store,
        }
    }

    pub async fn execute(
        &self,
        collection: &str,
        query: &SearchQuery,
    ) -> Result<Vec<SearchResult>, DomainError> {
        if !self.vector_store.has_collection(collection).await? {
            return Err(DomainError::not_found(format!("no index for collection '{collection}'")));
        }

        let query_vector = self.embedder.embed(query.query()).await?;

        let filter = VectorFilter {
            languages: query.languages().map(|l| l.to_vec()),
            min_score: query.min_score(),
            relative_path_prefix: None,
        };

        let hits = self
            .vector_store
            .query(collection, &query_vector, query.limit(), &filter)
            .await?;

        let mut results: Vec<SearchResult> = hits
            .into_iter()
            .filter(|(_, score)| query.min_score().map_or(true, |min| *score >= min))
            .map(|(doc, score)| {
                SearchResult::new(
                    doc.content().to_string(),
                    doc.relative_path().to_string(),
                    doc.start_line(),
                    doc.end_line(),
                    doc.language(),
                    score,
                )
            })
            .collect();

        results.sort_by(|a, b| {
            b.score()
                .partial_cmp(&a.score())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(query.limit());

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::adapter::{InMemoryVectorStore, MockEmbedder};

    #[tokio::test]
    async fn test_search_fails_when_collection_does_not_exist() {
        let use_case = SearchUseCase::new(Arc::new(MockEmbedder::new()), Arc::new(InMemoryVectorStore::new()));
        let result = use_case.execute("missing-collection", &SearchQuery::new("anything")).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_search_succeeds_against_existing_collection() {
        let vector_store = Arc::new(InMemoryVectorStore::new());
        let embedder = Arc::new(MockEmbedder::new());
        vector_store
            .create_collection("exists", embedder.dimension())
            .await
            .unwrap();

        let use_case = SearchUseCase::new(embedder, vector_store);
        let result = use_case.execute("exists", &SearchQuery::new("anything")).await;
        assert!(result.is_ok());
    }
}
