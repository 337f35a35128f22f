//! Requirement analysis on top of the retrieval stack
//!
//! [`ConformityAnalyzer`] turns retrieved evidence into a confidence score
//! and verdict. [`RetrievalEngine`] wires the index, the embedding provider
//! and ingestion together behind one handle.

pub mod analyzer;
pub mod engine;
pub mod stats;

pub use analyzer::ConformityAnalyzer;
pub use engine::RetrievalEngine;
pub use stats::VerdictStatistics;
