//! Shared building blocks for the licita conformity engine
//!
//! Holds the data model passed between ingestion, the vector index and the
//! analyzer, the `EmbeddingProvider` contract, the text chunker and the
//! knowledge-base directory scanner.

pub mod chunking;
pub mod error;
pub mod frontmatter;
pub mod models;
pub mod scanner;
pub mod traits;

pub use chunking::{Chunker, TextChunker};
pub use error::{CoreError, Result};
pub use models::{
    Chunk, ChunkMetadata, ConformityAnalysis, ConformityVerdict, Document, DocumentMetadata,
    Evidence, Requirement, SearchHit,
};
pub use traits::EmbeddingProvider;
