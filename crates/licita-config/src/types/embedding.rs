//! Embedding provider configuration

use serde::{Deserialize, Serialize};

/// Embedding provider configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbeddingConfig {
    /// Embedding backend to use
    #[serde(default)]
    pub backend: EmbeddingBackend,

    /// Model name for the selected backend
    ///
    /// Examples:
    /// - OpenAI: "text-embedding-3-small"
    /// - Ollama: "nomic-embed-text"
    /// - Local: ignored
    #[serde(default = "default_model_name")]
    pub model_name: String,

    /// Vector length produced by the backend. Every index built with this
    /// config stores vectors of exactly this dimension.
    #[serde(default = "default_dimension")]
    pub dimension: usize,

    /// Override for the backend base URL
    #[serde(default)]
    pub api_base: Option<String>,

    /// HTTP timeout for remote backends
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum texts per remote request
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    /// OpenAI API (requires OPENAI_API_KEY)
    #[serde(rename = "openai")]
    External,

    /// Local Ollama server
    Ollama,

    /// In-process term hashing, no network
    #[default]
    Local,
}

impl EmbeddingBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmbeddingBackend::External => "openai",
            EmbeddingBackend::Ollama => "ollama",
            EmbeddingBackend::Local => "local",
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: EmbeddingBackend::default(),
            model_name: default_model_name(),
            dimension: default_dimension(),
            api_base: None,
            timeout_secs: default_timeout_secs(),
            batch_size: default_batch_size(),
        }
    }
}

impl crate::validation::Validate for EmbeddingConfig {
    fn validate(&self) -> crate::error::Result<()> {
        use crate::error::ConfigError;
        use crate::validation::validate_positive;

        if self.model_name.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: "embedding.model_name".to_string(),
                message: "Model name cannot be empty".to_string(),
            });
        }

        validate_positive("embedding.dimension", self.dimension, 0)?;
        validate_positive("embedding.batch_size", self.batch_size, 0)?;

        if self.timeout_secs == 0 {
            return Err(ConfigError::ValidationError {
                field: "embedding.timeout_secs".to_string(),
                message: "Timeout must be at least one second".to_string(),
            });
        }

        if let Some(base) = &self.api_base {
            if !(base.starts_with("http://") || base.starts_with("https://")) {
                return Err(ConfigError::ValidationError {
                    field: "embedding.api_base".to_string(),
                    message: format!("Expected an http(s) URL, got '{}'", base),
                });
            }
        }

        Ok(())
    }
}

fn default_model_name() -> String {
    "nomic-embed-text".to_string()
}

fn default_dimension() -> usize {
    384
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_batch_size() -> usize {
    64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Validate;

    #[test]
    fn test_default_is_valid() {
        let config = EmbeddingConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.backend, EmbeddingBackend::Local);
    }

    #[test]
    fn test_empty_model_name_invalid() {
        let config = EmbeddingConfig {
            model_name: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_dimension_invalid() {
        let config = EmbeddingConfig {
            dimension: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_api_base_invalid() {
        let config = EmbeddingConfig {
            api_base: Some("localhost:11434".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_backend_serialization() {
        assert_eq!(
            serde_json::to_string(&EmbeddingBackend::External).unwrap(),
            "\"openai\""
        );
        assert_eq!(
            serde_json::to_string(&EmbeddingBackend::Ollama).unwrap(),
            "\"ollama\""
        );
        assert_eq!(
            serde_json::to_string(&EmbeddingBackend::Local).unwrap(),
            "\"local\""
        );
    }
}
