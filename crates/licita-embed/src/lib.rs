//! Embedding providers
//!
//! One implementation per [`EmbeddingBackend`], chosen once at construction
//! time by [`select_provider`].

mod hashing;
mod ollama;
mod openai;

pub use hashing::HashingProvider;
pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;

use licita_config::{EmbeddingBackend, EmbeddingConfig};
use licita_core::{EmbeddingProvider, Result};
use std::env;
use std::sync::Arc;
use tracing::info;

/// Build the provider named by `config.backend`
///
/// The OpenAI backend reads its key from `OPENAI_API_KEY`; Ollama honors
/// `OLLAMA_BASE_URL` when `api_base` is not set.
pub fn select_provider(config: &EmbeddingConfig) -> Result<Arc<dyn EmbeddingProvider>> {
    let provider: Arc<dyn EmbeddingProvider> = match config.backend {
        EmbeddingBackend::External => {
            Arc::new(OpenAiProvider::new(config, env::var("OPENAI_API_KEY").ok())?)
        }
        EmbeddingBackend::Ollama => {
            let mut config = config.clone();
            if config.api_base.is_none() {
                config.api_base = env::var("OLLAMA_BASE_URL").ok();
            }
            Arc::new(OllamaProvider::new(&config)?)
        }
        EmbeddingBackend::Local => Arc::new(HashingProvider::new(config.dimension)),
    };

    info!(
        "Using {} embeddings (dimension {})",
        provider.name(),
        provider.dimension()
    );
    Ok(provider)
}

/// Every backend, for availability listings
pub fn all_backends() -> [EmbeddingBackend; 3] {
    [
        EmbeddingBackend::External,
        EmbeddingBackend::Ollama,
        EmbeddingBackend::Local,
    ]
}

fn request_error(provider: &str, err: reqwest::Error) -> licita_core::CoreError {
    let message = if err.is_timeout() {
        format!("request timed out: {}", err)
    } else if err.is_connect() {
        format!("connection failed: {}", err)
    } else {
        err.to_string()
    };
    licita_core::CoreError::unavailable(provider, message)
}

fn build_client(provider: &str, timeout_secs: u64) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| licita_core::CoreError::unavailable(provider, e.to_string()))
}
