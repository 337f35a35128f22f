//! Evidence retrieval configuration

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievalConfig {
    /// Number of index entries fetched per requirement
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Hits scoring below this cosine similarity are not used as evidence
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f32,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            similarity_threshold: default_similarity_threshold(),
        }
    }
}

impl crate::validation::Validate for RetrievalConfig {
    fn validate(&self) -> crate::error::Result<()> {
        use crate::error::ConfigError;
        use crate::validation::{validate_positive, validate_range};

        validate_positive("retrieval.top_k", self.top_k, 0)?;

        if self.top_k > 1000 {
            return Err(ConfigError::ValidationError {
                field: "retrieval.top_k".to_string(),
                message: format!("top_k too large ({}), consider using <= 1000", self.top_k),
            });
        }

        validate_range(
            "retrieval.similarity_threshold",
            self.similarity_threshold,
            0.0,
            1.0,
        )?;

        Ok(())
    }
}

fn default_top_k() -> usize {
    5
}

fn default_similarity_threshold() -> f32 {
    0.7
}
