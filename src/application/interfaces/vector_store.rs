use async_trait::async_trait;

use crate::domain::{DomainError, VectorDocument};

/// A filter predicate evaluated by the store's `query` implementation,
/// mirroring `SearchQuery`'s optional filters without coupling the store
/// to the application-layer query type.
#[derive(Debug, Clone, Default)]
pub struct VectorFilter {
    pub languages: Option<Vec<String>>,
    pub min_score: Option<f32>,
    pub relative_path_prefix: Option<String>,
}

/// Vector storage and similarity search, scoped to named collections (one
/// collection per indexed codebase root — see
/// `crate::domain::services::identity::collection_name`).
#[async_trait]
pub trait VectorStore: Send + Sync {
    async fn create_collection(&self, name: &str, dimension: usize) -> Result<(), DomainError>;

    async fn has_collection(&self, name: &str) -> Result<bool, DomainError>;

    async fn drop_collection(&self, name: &str) -> Result<(), DomainError>;

    async fn upsert(&self, collection: &str, documents: &[VectorDocument]) -> Result<(), DomainError>;

    /// Deletes every document in `collection` whose `relative_path`
    /// matches one of `paths`. Returns the number of documents deleted.
    async fn delete_by_paths(&self, collection: &str, paths: &[String]) -> Result<u64, DomainError>;

    async fn query(
        &self,
        collection: &str,
        query_vector: &[f32],
        limit: usize,
        filter: &VectorFilter,
    ) -> Result<Vec<(VectorDocument, f32)>, DomainError>;

    async fn count(&self, collection: &str) -> Result<u64, DomainError>;
}
