//! Text embedding trait consumed by the term expander.

use async_trait::async_trait;

use crate::error::Result;
use crate::vector::Vector;

/// Trait for converting text to vector embeddings.
///
/// Implementations are expected to be deterministic for a given model and
/// text. Failures are reported as [`TermweaveError::Provider`] so callers can
/// tell a transient provider problem from a configuration mistake.
///
/// [`TermweaveError::Provider`]: crate::error::TermweaveError::Provider
#[async_trait]
pub trait TextEmbedder: Send + Sync {
    /// Generate an embedding vector for the given text.
    async fn embed(&self, text: &str) -> Result<Vector>;

    /// Generate embeddings for multiple texts in batch.
    ///
    /// The result is aligned positionally with `texts`. The default
    /// implementation calls `embed` sequentially; override it when the
    /// provider has a real batch endpoint.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vector>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }

    /// Get the dimension of generated embeddings.
    fn dimension(&self) -> usize;

    /// Get the name/identifier of this embedder (e.g. the model name).
    fn name(&self) -> &str {
        "unknown"
    }
}
