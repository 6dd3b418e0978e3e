use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::application::interfaces::{VectorFilter, VectorStore};
use crate::domain::{DomainError, VectorDocument};

struct Collection {
    dimension: usize,
    documents: HashMap<String, VectorDocument>,
}

/// A `VectorStore` held entirely in process memory, keyed by collection
/// name. Used by the CLI's default, network-free configuration and by
/// tests; not persisted across runs.
pub struct InMemoryVectorStore {
    collections: Arc<Mutex<HashMap<String, Collection>>>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self {
            collections: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn create_collection(&self, name: &str, dimension: usize) -> Result<(), DomainError> {
        let mut collections = self.collections.lock().await;
        collections.entry(name.to_string()).or_insert_with(|| Collection {
            dimension,
            documents: HashMap::new(),
        });
        Ok(())
    }

    async fn has_collection(&self, name: &str) -> Result<bool, DomainError> {
        Ok(self.collections.lock().await.contains_key(name))
    }

    async fn drop_collection(&self, name: &str) -> Result<(), DomainError> {
        self.collections.lock().await.remove(name);
        Ok(())
    }

    async fn upsert(&self, collection: &str, documents: &[VectorDocument]) -> Result<(), DomainError> {
        let mut collections = self.collections.lock().await;
        let entry = collections
            .get_mut(collection)
            .ok_or_else(|| DomainError::not_found(format!("collection {collection}")))?;

        for doc in documents {
            if doc.dimension() != entry.dimension {
                return Err(DomainError::schema_mismatch(format!(
                    "expected dimension {}, got {} for {}",
                    entry.dimension,
                    doc.dimension(),
                    doc.id()
                )));
            }
            entry.documents.insert(doc.id().to_string(), doc.clone());
        }
        debug!("upserted {} documents into {collection}", documents.len());
        Ok(())
    }

    async fn delete_by_paths(&self, collection: &str, paths: &[String]) -> Result<u64, DomainError> {
        let mut collections = self.collections.lock().await;
        let entry = match collections.get_mut(collection) {
            Some(e) => e,
            None => return Ok(0),
        };

        let to_remove: Vec<String> = entry
            .documents
            .values()
            .filter(|doc| paths.iter().any(|p| p == doc.relative_path()))
            .map(|doc| doc.id().to_string())
            .collect();

        let count = to_remove.len() as u64;
        for id in to_remove {
            entry.documents.remove(&id);
        }
        Ok(count)
    }

    async fn query(
        &self,
        collection: &str,
        query_vector: &[f32],
        limit: usize,
        filter: &VectorFilter,
    ) -> Result<Vec<(VectorDocument, f32)>, DomainError> {
        let collections = self.collections.lock().await;
        let entry = match collections.get(collection) {
            Some(e) => e,
            None => return Ok(Vec::new()),
        };

        let mut scored: Vec<(VectorDocument, f32)> = entry
            .documents
            .values()
            .filter(|doc| {
                if let Some(langs) = &filter.languages {
                    if !langs.iter().any(|l| l == doc.language().as_str()) {
                        return false;
                    }
                }
                if let Some(prefix) = &filter.relative_path_prefix {
                    if !doc.relative_path().starts_with(prefix.as_str()) {
                        return false;
                    }
                }
                true
            })
            .map(|doc| (doc.clone(), cosine_similarity(query_vector, doc.vector())))
            .filter(|(_, score)| filter.min_score.map_or(true, |min| *score >= min))
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit);
        Ok(scored)
    }

    async fn count(&self, collection: &str) -> Result<u64, DomainError> {
        let collections = self.collections.lock().await;
        Ok(collections.get(collection).map(|c| c.documents.len()).unwrap_or(0) as u64)
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str, path: &str, vector: Vec<f32>) -> VectorDocument {
        VectorDocument::new(
            id.to_string(),
            vector,
            "content".to_string(),
            path.to_string(),
            1,
            2,
            crate::domain::Language::Rust,
            0,
        )
    }

    #[tokio::test]
    async fn test_create_and_has_collection() {
        let store = InMemoryVectorStore::new();
        assert!(!store.has_collection("c").await.unwrap());
        store.create_collection("c", 2).await.unwrap();
        assert!(store.has_collection("c").await.unwrap());
    }

    #[tokio::test]
    async fn test_upsert_rejects_dimension_mismatch() {
        let store = InMemoryVectorStore::new();
        store.create_collection("c", 2).await.unwrap();
        let bad = doc("a", "a.rs", vec![1.0, 2.0, 3.0]);
        assert!(store.upsert("c", &[bad]).await.is_err());
    }

    #[tokio::test]
    async fn test_query_ranks_by_similarity() {
        let store = InMemoryVectorStore::new();
        store.create_collection("c", 2).await.unwrap();
        store
            .upsert(
                "c",
                &[doc("a", "a.rs", vec![1.0, 0.0]), doc("b", "b.rs", vec![0.0, 1.0])],
            )
            .await
            .unwrap();

        let results = store
            .query("c", &[1.0, 0.0], 10, &VectorFilter::default())
            .await
            .unwrap();
        assert_eq!(results[0].0.id(), "a");
    }

    #[tokio::test]
    async fn test_delete_by_paths() {
        let store = InMemoryVectorStore::new();
        store.create_collection("c", 2).await.unwrap();
        store
            .upsert("c", &[doc("a", "a.rs", vec![1.0, 0.0]), doc("b", "b.rs", vec![0.0, 1.0])])
            .await
            .unwrap();

        let removed = store.delete_by_paths("c", &["a.rs".to_string()]).await.unwrap();
        assert_eq!(removed, 1);
        assert_eq!(store.count("c").await.unwrap(), 1);
    }
}
