//! Text embedding trait for the semantic search pipeline.

use async_trait::async_trait;

use crate::error::Result;
use crate::vector::Vector;

/// Trait for converting text to vector embeddings.
///
/// Implementations must be deterministic for a given text and model
/// version, and every vector they return must have [`dimension`] entries.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use hybridqa::embedding::TextEmbedder;
/// use hybridqa::error::Result;
/// use hybridqa::vector::Vector;
///
/// struct ConstantEmbedder {
///     dimension: usize,
/// }
///
/// #[async_trait]
/// impl TextEmbedder for ConstantEmbedder {
///     async fn embed(&self, _text: &str) -> Result<Vector> {
///         Ok(Vector::new(vec![1.0; self.dimension]))
///     }
///
///     fn dimension(&self) -> usize {
///         self.dimension
///     }
/// }
/// ```
///
/// [`dimension`]: TextEmbedder::dimension
#[async_trait]
pub trait TextEmbedder: Send + Sync {
    /// Generate an embedding vector for the given text.
    async fn embed(&self, text: &str) -> Result<Vector>;

    /// Generate embeddings for multiple texts in batch.
    ///
    /// The default implementation calls `embed` sequentially.
    /// Override this method for better performance with batch processing.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vector>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }

    /// Get the dimension of generated embeddings.
    fn dimension(&self) -> usize;

    /// Get the name/identifier of this embedder, for logging.
    fn name(&self) -> &str {
        "unknown"
    }
}
