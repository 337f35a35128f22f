use crate::{build_client, request_error};
use async_trait::async_trait;
use licita_config::EmbeddingConfig;
use licita_core::traits::check_embeddings;
use licita_core::{CoreError, EmbeddingProvider, Result};
use reqwest::Client;
use serde::Deserialize;

const DEFAULT_BASE_URL: &str = "http://localhost:11434";
const NAME: &str = "ollama";

/// Local Ollama server, one `/api/embeddings` call per text
pub struct OllamaProvider {
    model: String,
    base_url: String,
    dimension: usize,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

impl OllamaProvider {
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        Ok(Self {
            model: config.model_name.clone(),
            base_url: config
                .api_base
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            dimension: config.dimension,
            client: build_client(NAME, config.timeout_secs)?,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        let resp = self
            .client
            .post(self.endpoint("api/embeddings"))
            .json(&serde_json::json!({
                "model": self.model,
                "prompt": text,
            }))
            .send()
            .await
            .map_err(|e| request_error(NAME, e))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(CoreError::unavailable(
                NAME,
                format!("embeddings request failed ({}): {}", status, body),
            ));
        }

        let parsed: EmbeddingResponse = resp.json().await.map_err(|e| request_error(NAME, e))?;
        Ok(parsed.embedding)
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaProvider {
    fn name(&self) -> &str {
        NAME
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed_one(text).await?);
        }
        check_embeddings(NAME, texts.len(), self.dimension, &embeddings)?;
        Ok(embeddings)
    }

    async fn is_available(&self) -> bool {
        match self.client.get(self.endpoint("api/tags")).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }
}
