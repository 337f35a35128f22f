use crate::error::{CoreError, Result};
use async_trait::async_trait;

/// Converts text into fixed-dimension vectors
///
/// Implementations never retry internally. An unreachable or misconfigured
/// backend surfaces as [`CoreError::ProviderUnavailable`].
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Short backend name used in logs and CLI output
    fn name(&self) -> &str;

    fn dimension(&self) -> usize;

    /// Embed many texts. An empty slice yields an empty result.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        if text.trim().is_empty() {
            return Err(CoreError::InvalidInput(
                "query text is empty".to_string(),
            ));
        }
        let mut vectors = self.embed_batch(&[text.to_string()]).await?;
        vectors
            .pop()
            .ok_or_else(|| CoreError::unavailable(self.name(), "no vector returned for query"))
    }

    /// Cheap capability probe; does not embed anything
    async fn is_available(&self) -> bool {
        true
    }
}

/// One vector per requested text, or the whole response is unusable
pub fn check_embedding_count(
    provider: &str,
    expected_count: usize,
    vectors: &[Vec<f32>],
) -> Result<()> {
    if vectors.len() != expected_count {
        return Err(CoreError::unavailable(
            provider,
            format!(
                "expected {} embeddings, received {}",
                expected_count,
                vectors.len()
            ),
        ));
    }
    Ok(())
}

/// Check a provider response against what was requested
pub fn check_embeddings(
    provider: &str,
    expected_count: usize,
    dimension: usize,
    vectors: &[Vec<f32>],
) -> Result<()> {
    check_embedding_count(provider, expected_count, vectors)?;
    if let Some(bad) = vectors.iter().find(|v| v.len() != dimension) {
        return Err(CoreError::DimensionMismatch {
            expected: dimension,
            actual: bad.len(),
        });
    }
    Ok(())
}
