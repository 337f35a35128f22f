use crate::{build_client, request_error};
use async_trait::async_trait;
use licita_config::EmbeddingConfig;
use licita_core::traits::check_embeddings;
use licita_core::{CoreError, EmbeddingProvider, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
const NAME: &str = "openai";

/// OpenAI-compatible `/embeddings` endpoint
pub struct OpenAiProvider {
    model: String,
    api_key: String,
    base_url: String,
    dimension: usize,
    batch_size: usize,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingItem {
    #[serde(default)]
    index: Option<usize>,
    embedding: Vec<f32>,
}

impl OpenAiProvider {
    pub fn new(config: &EmbeddingConfig, api_key: Option<String>) -> Result<Self> {
        let api_key = api_key
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| CoreError::unavailable(NAME, "OPENAI_API_KEY is not set"))?;

        Ok(Self {
            model: config.model_name.clone(),
            api_key,
            base_url: config
                .api_base
                .clone()
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            dimension: config.dimension,
            batch_size: config.batch_size.max(1),
            client: build_client(NAME, config.timeout_secs)?,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn request(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut body = serde_json::json!({
            "model": self.model,
            "input": texts,
        });
        // only the v3 family accepts a target dimension
        if self.model.starts_with("text-embedding-3") {
            body["dimensions"] = serde_json::json!(self.dimension);
        }

        let resp = self
            .client
            .post(self.endpoint("embeddings"))
            .bearer_auth(&self.api_key)
            .json(&body)
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

        let mut parsed: EmbeddingResponse =
            resp.json().await.map_err(|e| request_error(NAME, e))?;
        parsed.data.sort_by_key(|item| item.index.unwrap_or(usize::MAX));
        Ok(parsed.data.into_iter().map(|d| d.embedding).collect())
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiProvider {
    fn name(&self) -> &str {
        NAME
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.batch_size) {
            debug!("Embedding batch of {} texts with {}", batch.len(), self.model);
            let embedded = self.request(batch).await?;
            check_embeddings(NAME, batch.len(), self.dimension, &embedded)?;
            vectors.extend(embedded);
        }
        Ok(vectors)
    }

    async fn is_available(&self) -> bool {
        match self
            .client
            .get(self.endpoint("models"))
            .bearer_auth(&self.api_key)
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }
}
