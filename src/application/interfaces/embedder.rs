use async_trait::async_trait;

use crate::domain::DomainError;

/// Turns text into vectors. The only concrete realization this crate
/// ships is `MockEmbedder`; real provider clients (OpenAI, Voyage, local
/// ONNX runtimes) plug in behind this trait without touching the pipeline.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embeds a batch of chunk contents, in order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, DomainError>;

    /// Embeds a single query string.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        let mut vectors = self.embed_batch(std::slice::from_ref(&text.to_string())).await?;
        vectors
            .pop()
            .ok_or_else(|| DomainError::internal("embedder returned no vector for one input"))
    }

    /// The fixed output dimension of this embedder. A `VectorStore`
    /// collection is created with this dimension and any later mismatch
    /// is a `SchemaMismatch`.
    fn dimension(&self) -> usize;

    /// A stable identifier for the embedding model in use, stored
    /// alongside vectors for diagnostics.
    fn model_name(&self) -> &str;
}
