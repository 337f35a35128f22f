//! Document chunking configuration

use serde::{Deserialize, Serialize};

/// Window sizes for the boundary-aware chunker, in characters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChunkingConfig {
    /// Maximum characters per chunk
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Characters shared between consecutive chunks
    ///
    /// Must be smaller than `chunk_size`.
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
        }
    }
}

impl crate::validation::Validate for ChunkingConfig {
    fn validate(&self) -> crate::error::Result<()> {
        use crate::error::ConfigError;
        use crate::validation::validate_positive;

        validate_positive("chunking.chunk_size", self.chunk_size, 0)?;

        if self.chunk_overlap >= self.chunk_size {
            return Err(ConfigError::ValidationError {
                field: "chunking.chunk_overlap".to_string(),
                message: format!(
                    "chunk_overlap ({}) must be < chunk_size ({})",
                    self.chunk_overlap, self.chunk_size
                ),
            });
        }

        Ok(())
    }
}

fn default_chunk_size() -> usize {
    1000
}

fn default_chunk_overlap() -> usize {
    200
}
