//! Configuration management for licita
//!
//! This crate provides a validated configuration system with support for:
//! - Multiple formats (YAML, TOML, JSON)
//! - Config validation with helpful error messages
//! - Config merging (file + environment + explicit overrides)
//!
//! A `Config` value is built once and handed to the engine constructors;
//! nothing in the workspace reads configuration from global state.
//!
//! # Example
//!
//! ```no_run
//! use licita_config::Config;
//!
//! // Load from default location (.licita.{toml,yml,json})
//! let config = Config::load()?;
//!
//! // Or load from specific file
//! let config = Config::from_file("path/to/config.toml")?;
//!
//! let chunk_size = config.chunking.chunk_size;
//! let top_k = config.retrieval.top_k;
//! # Ok::<(), licita_config::ConfigError>(())
//! ```

pub mod error;
pub mod loader;
pub mod types;
pub mod validation;

pub use error::{ConfigError, ErrorFormatter, Result};
pub use loader::ConfigBuilder;
pub use types::{
    ChunkingConfig, Config, ConformityConfig, CoreConfig, EmbeddingBackend, EmbeddingConfig,
    RetrievalConfig,
};

pub use validation::Validate;
