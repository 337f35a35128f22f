//! Configuration type definitions
//!
//! One module per concern. Each type carries serde defaults and a
//! `Validate` impl.

pub mod chunking;
pub mod conformity;
pub mod core;
pub mod embedding;
pub mod retrieval;

pub use chunking::ChunkingConfig;
pub use conformity::ConformityConfig;
pub use self::core::CoreConfig;
pub use embedding::{EmbeddingBackend, EmbeddingConfig};
pub use retrieval::RetrievalConfig;

use serde::{Deserialize, Serialize};

/// Top-level configuration, organized by functional area
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Knowledge base location, index location, file selection
    #[serde(default)]
    pub core: CoreConfig,

    /// Document chunking
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// Embedding provider settings
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Evidence retrieval
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Verdict thresholds
    #[serde(default)]
    pub conformity: ConformityConfig,
}

impl crate::validation::Validate for Config {
    fn validate(&self) -> crate::error::Result<()> {
        self.core.validate()?;
        self.chunking.validate()?;
        self.embedding.validate()?;
        self.retrieval.validate()?;
        self.conformity.validate()?;
        Ok(())
    }
}
