use async_trait::async_trait;
use licita_core::{EmbeddingProvider, Result};
use std::collections::HashMap;

/// Offline provider: hashes terms into fixed buckets weighted by frequency
///
/// Deterministic and always available. Identical texts map to identical
/// vectors, texts sharing vocabulary land close together.
#[derive(Debug, Clone)]
pub struct HashingProvider {
    dimension: usize,
}

impl HashingProvider {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    /// FNV-1a bucket for a term
    fn bucket(&self, term: &str) -> usize {
        let mut h: u64 = 0xcbf29ce484222325;
        for b in term.as_bytes() {
            h ^= *b as u64;
            h = h.wrapping_mul(0x100000001b3);
        }
        (h % self.dimension as u64) as usize
    }

    fn tokenize(text: &str) -> Vec<String> {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_lowercase())
            .collect()
    }

    pub fn vectorize(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return vector;
        }

        let tokens = Self::tokenize(trimmed);
        if tokens.is_empty() {
            // punctuation only
            vector[self.bucket(trimmed)] = 1.0;
            return vector;
        }

        let mut tf: HashMap<&str, f32> = HashMap::new();
        for tok in &tokens {
            *tf.entry(tok.as_str()).or_default() += 1.0;
        }

        let total = tokens.len() as f32;
        for (term, count) in tf {
            let idf = 1.0 + (term.chars().count() as f32).ln();
            vector[self.bucket(term)] += (count / total) * idf;
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            for v in &mut vector {
                *v /= norm;
            }
        }
        vector
    }
}

#[async_trait]
impl EmbeddingProvider for HashingProvider {
    fn name(&self) -> &str {
        "local"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.vectorize(t)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cosine(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b).map(|(x, y)| x * y).sum()
    }

    #[test]
    fn test_deterministic_and_unit_length() {
        let p = HashingProvider::new(128);
        let a = p.vectorize("Atestado de capacidade técnica");
        let b = p.vectorize("Atestado de capacidade técnica");
        assert_eq!(a, b);
        let norm: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_shared_vocabulary_is_closer() {
        let p = HashingProvider::new(256);
        let q = p.vectorize("garantia da proposta");
        let near = p.vectorize("a garantia da proposta será de um por cento");
        let far = p.vectorize("cronograma físico financeiro");
        assert!(cosine(&q, &near) > cosine(&q, &far));
    }

    #[test]
    fn test_punctuation_only_is_not_zero() {
        let p = HashingProvider::new(16);
        assert!(p.vectorize("...").iter().any(|&x| x > 0.0));
        assert!(p.vectorize("").iter().all(|&x| x == 0.0));
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let p = HashingProvider::new(8);
        assert!(p.embed_batch(&[]).await.unwrap().is_empty());
    }
}
