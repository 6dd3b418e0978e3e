use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use async_trait::async_trait;
use rand::Rng;
use rand::SeedableRng;
use tracing::debug;

use crate::application::interfaces::Embedder;
use crate::domain::DomainError;

/// A deterministic, hash-seeded embedder with no learned semantics — the
/// default wired by the CLI so the pipeline is exercisable without a
/// network call or a model download. Real provider clients plug in
/// behind `Embedder` the same way.
pub struct MockEmbedder {
    dimension: usize,
    model_name: String,
}

impl MockEmbedder {
    pub fn new() -> Self {
        Self::with_dimension(384)
    }

    pub fn with_dimension(dimension: usize) -> Self {
        Self {
            dimension,
            model_name: "mock-embedder".to_string(),
        }
    }

    fn generate(&self, text: &str) -> Vec<f32> {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let seed = hasher.finish();

        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        let mut vector: Vec<f32> = (0..self.dimension).map(|_| rng.gen_range(-1.0..1.0)).collect();

        let magnitude: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for x in &mut vector {
                *x /= magnitude;
            }
        }
        vector
    }
}

impl Default for MockEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Embedder for MockEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, DomainError> {
        let vectors: Vec<Vec<f32>> = texts.iter().map(|t| self.generate(t)).collect();
        debug!("generated {} mock embeddings", vectors.len());
        Ok(vectors)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_embedding_is_deterministic() {
        let embedder = MockEmbedder::new();
        let a = embedder.embed("hello world").await.unwrap();
        let b = embedder.embed("hello world").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_dimension_is_configurable() {
        let embedder = MockEmbedder::with_dimension(128);
        let vector = embedder.embed("test").await.unwrap();
        assert_eq!(vector.len(), 128);
        assert_eq!(embedder.dimension(), 128);
    }

    #[tokio::test]
    async fn test_embedding_is_normalized() {
        let embedder = MockEmbedder::new();
        let vector = embedder.embed("test").await.unwrap();
        let magnitude: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((magnitude - 1.0).abs() < 0.001);
    }

    #[tokio::test]
    async fn test_embed_batch_preserves_order() {
        let embedder = MockEmbedder::new();
        let texts = vec!["a".to_string(), "b".to_string()];
        let vectors = embedder.embed_batch(&texts).await.unwrap();
        assert_eq!(vectors[0], embedder.embed("a").await.unwrap());
        assert_eq!(vectors[1], embedder.embed("b").await.unwrap());
    }
}
