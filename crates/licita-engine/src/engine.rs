use crate::analyzer::ConformityAnalyzer;
use crate::stats::VerdictStatistics;
use licita_config::{Config, Validate};
use licita_core::error::{CoreError, Result};
use licita_core::{ConformityAnalysis, DocumentMetadata, EmbeddingProvider, Requirement, SearchHit};
use licita_index::{IndexStats, VectorIndex};
use licita_pipeline::{IngestionPipeline, IngestionReport};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Index, provider, ingestion and analysis behind one handle
///
/// Searches and analyses share read access to the index. Ingestion embeds
/// without the lock and only takes the write lock to append and persist.
pub struct RetrievalEngine {
    config: Config,
    provider: Arc<dyn EmbeddingProvider>,
    index: RwLock<VectorIndex>,
    pipeline: IngestionPipeline,
    analyzer: ConformityAnalyzer,
}

impl RetrievalEngine {
    /// Build an engine over the snapshot in `config.core.index_dir`
    ///
    /// Fails when the provider, the configured dimension and a stored
    /// snapshot disagree on vector length.
    pub fn new(config: Config, provider: Arc<dyn EmbeddingProvider>) -> Result<Self> {
        config.validate()?;

        let dimension = config.embedding.dimension;
        if provider.dimension() != dimension {
            return Err(CoreError::DimensionMismatch {
                expected: dimension,
                actual: provider.dimension(),
            });
        }

        let index = VectorIndex::load_or_empty(&config.core.index_dir, dimension);
        if index.dimension() != dimension {
            return Err(CoreError::DimensionMismatch {
                expected: dimension,
                actual: index.dimension(),
            });
        }

        let pipeline =
            IngestionPipeline::new(provider.clone(), &config.chunking, config.core.clone())?;
        let analyzer =
            ConformityAnalyzer::new(config.retrieval.clone(), config.conformity.clone());

        info!(
            "Engine ready: {} entries, {} provider",
            index.len(),
            provider.name()
        );

        Ok(Self {
            config,
            provider,
            index: RwLock::new(index),
            pipeline,
            analyzer,
        })
    }

    /// Build the provider named in the config, then the engine
    pub fn from_config(config: Config) -> Result<Self> {
        let provider = licita_embed::select_provider(&config.embedding)?;
        Self::new(config, provider)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn provider(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.provider
    }

    /// Ingest a knowledge-base directory; documents already indexed with the
    /// same content are skipped, changed files replace their old entries
    pub async fn ingest_directory(&self, dir: &Path) -> Result<IngestionReport> {
        let known = self.index.read().await.document_ids();
        let batch = self.pipeline.prepare_directory(dir, &known).await?;
        let mut index = self.index.write().await;
        self.pipeline.commit(batch, &mut index)
    }

    pub async fn ingest_document(
        &self,
        text: &str,
        metadata: DocumentMetadata,
    ) -> Result<IngestionReport> {
        let known = self.index.read().await.document_ids();
        let batch = self.pipeline.prepare_document(text, metadata, &known).await?;
        let mut index = self.index.write().await;
        self.pipeline.commit(batch, &mut index)
    }

    /// Drop all in-memory entries; the next ingestion overwrites the snapshot
    pub async fn clear(&self) {
        self.index.write().await.delete_all();
    }

    pub async fn search(&self, query: &str, k: usize) -> Result<Vec<SearchHit>> {
        let vector = self.provider.embed_query(query).await?;
        self.index.read().await.search(&vector, k)
    }

    pub async fn stats(&self) -> IndexStats {
        self.index.read().await.get_stats()
    }

    pub async fn analyze(&self, requirement: &Requirement) -> Result<ConformityAnalysis> {
        let index = self.index.read().await;
        self.analyzer
            .analyze(requirement, self.provider.as_ref(), &index)
            .await
    }

    /// Analyze every requirement; failed ones are logged and dropped
    pub async fn analyze_batch(&self, requirements: &[Requirement]) -> Vec<ConformityAnalysis> {
        let index = self.index.read().await;
        self.analyzer
            .analyze_batch(requirements, self.provider.as_ref(), &index)
            .await
    }

    pub fn verdict_stats(&self) -> VerdictStatistics {
        self.analyzer.stats()
    }

    pub fn reset_verdict_stats(&self) {
        self.analyzer.reset_stats();
    }
}
