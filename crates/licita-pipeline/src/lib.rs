//! Ingestion pipeline
//!
//! Work is split in two phases so callers can embed without holding the
//! index: [`IngestionPipeline::prepare_directory`] /
//! [`IngestionPipeline::prepare_document`] load, chunk and embed, then
//! [`IngestionPipeline::commit`] appends to the index and writes the snapshot.
//!
//! Documents are committed one at a time, so a document whose vectors the
//! index rejects is recorded as failed without affecting the others. A
//! document already stored with the same id is skipped, and a changed file
//! replaces the entries of its previous version.

mod report;

pub use report::{FailedFile, IngestionReport};

use licita_config::{ChunkingConfig, CoreConfig};
use licita_core::chunking::{Chunker, TextChunker};
use licita_core::error::Result;
use licita_core::traits::check_embedding_count;
use licita_core::{frontmatter, scanner, Chunk, Document, DocumentMetadata, EmbeddingProvider};
use licita_index::VectorIndex;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// One document's chunks with a vector per chunk
#[derive(Debug)]
pub struct PreparedDocument {
    pub document_id: String,
    pub filename: String,
    pub chunks: Vec<Chunk>,
    pub vectors: Vec<Vec<f32>>,
}

/// Documents ready to be appended to an index
#[derive(Debug)]
pub struct PreparedBatch {
    pub documents: Vec<PreparedDocument>,
    pub report: IngestionReport,
    started: Instant,
}

pub struct IngestionPipeline {
    provider: Arc<dyn EmbeddingProvider>,
    chunker: TextChunker,
    core: CoreConfig,
}

impl IngestionPipeline {
    pub fn new(
        provider: Arc<dyn EmbeddingProvider>,
        chunking: &ChunkingConfig,
        core: CoreConfig,
    ) -> Result<Self> {
        Ok(Self {
            provider,
            chunker: TextChunker::from_config(chunking)?,
            core,
        })
    }

    /// Load every matching file under `dir`, chunk and embed it
    ///
    /// Documents whose id is in `known` are listed as unchanged and not
    /// embedded. Files that cannot be read or decoded are recorded in
    /// `failed_files` and skipped. Embedding failures abort the whole run.
    pub async fn prepare_directory(
        &self,
        dir: &Path,
        known: &BTreeSet<String>,
    ) -> Result<PreparedBatch> {
        let started = Instant::now();
        let files = scanner::scan_directory(dir, &self.core)?;
        info!("Found {} documents in {}", files.len(), dir.display());

        let mut report = IngestionReport::default();
        let mut documents = Vec::with_capacity(files.len());

        for path in files {
            let name = relative_name(dir, &path);
            match fs::read_to_string(&path) {
                Ok(text) => documents.push(frontmatter::parse_document(&name, &text)),
                Err(err) => {
                    warn!("Skipping {}: {}", name, err);
                    report.record_failure(name, err.to_string());
                }
            }
        }

        self.prepare(documents, known, report, started).await
    }

    /// Chunk and embed one in-memory document
    pub async fn prepare_document(
        &self,
        text: &str,
        metadata: DocumentMetadata,
        known: &BTreeSet<String>,
    ) -> Result<PreparedBatch> {
        let started = Instant::now();
        let document = Document::new(text, metadata);
        self.prepare(vec![document], known, IngestionReport::default(), started)
            .await
    }

    async fn prepare(
        &self,
        documents: Vec<Document>,
        known: &BTreeSet<String>,
        mut report: IngestionReport,
        started: Instant,
    ) -> Result<PreparedBatch> {
        let mut pending = Vec::with_capacity(documents.len());
        for document in documents {
            if known.contains(&document.id) {
                debug!("{} unchanged, skipping", document.metadata.filename);
                report.unchanged_files.push(document.metadata.filename);
                continue;
            }
            let chunks = self.chunker.chunk(&document);
            if chunks.is_empty() {
                debug!("{} has no text to index", document.metadata.filename);
            }
            pending.push(PreparedDocument {
                document_id: document.id,
                filename: document.metadata.filename,
                chunks,
                vectors: Vec::new(),
            });
        }

        let texts: Vec<String> = pending
            .iter()
            .flat_map(|d| d.chunks.iter().map(|c| c.text.clone()))
            .collect();
        if !texts.is_empty() {
            debug!(
                "Embedding {} chunks with {}",
                texts.len(),
                self.provider.name()
            );
            let vectors = self.provider.embed_batch(&texts).await?;
            check_embedding_count(self.provider.name(), texts.len(), &vectors)?;

            let mut vectors = vectors.into_iter();
            for document in &mut pending {
                document.vectors = vectors.by_ref().take(document.chunks.len()).collect();
            }
        }

        Ok(PreparedBatch {
            documents: pending,
            report,
            started,
        })
    }

    /// Append a prepared batch to `index` and persist the snapshot
    pub fn commit(&self, batch: PreparedBatch, index: &mut VectorIndex) -> Result<IngestionReport> {
        let PreparedBatch {
            documents,
            mut report,
            started,
        } = batch;

        for document in documents {
            if index.contains_document(&document.document_id) {
                debug!("{} already indexed, skipping", document.filename);
                report.unchanged_files.push(document.filename);
                continue;
            }

            let chunk_count = document.chunks.len();
            let (texts, metadatas): (Vec<String>, Vec<_>) = document
                .chunks
                .into_iter()
                .map(|c| (c.text, c.metadata))
                .unzip();

            match index.add(document.vectors, texts, metadatas) {
                Ok(added) => {
                    let replaced = index.remove_stale(&document.filename, &document.document_id);
                    if replaced > 0 {
                        info!(
                            "Replaced {} entries of previous {}",
                            replaced, document.filename
                        );
                    }
                    report.documents_loaded += 1;
                    report.total_chunks += chunk_count;
                    report.total_embeddings += added;
                    report
                        .per_file_breakdown
                        .insert(document.filename, chunk_count);
                }
                Err(err) => {
                    warn!("Skipping {}: {}", document.filename, err);
                    report.record_failure(document.filename, err.to_string());
                }
            }
        }
        index.save()?;

        report.time_elapsed = started.elapsed();
        info!(
            "Ingested {} documents, {} chunks in {:.2?}",
            report.documents_loaded, report.total_chunks, report.time_elapsed
        );
        Ok(report)
    }

    pub async fn ingest_from_directory(
        &self,
        dir: &Path,
        index: &mut VectorIndex,
    ) -> Result<IngestionReport> {
        let batch = self.prepare_directory(dir, &index.document_ids()).await?;
        self.commit(batch, index)
    }

    pub async fn ingest_single_document(
        &self,
        text: &str,
        metadata: DocumentMetadata,
        index: &mut VectorIndex,
    ) -> Result<IngestionReport> {
        let batch = self
            .prepare_document(text, metadata, &index.document_ids())
            .await?;
        self.commit(batch, index)
    }
}

fn relative_name(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_name_uses_forward_slashes() {
        let root = Path::new("/kb");
        let path = root.join("normas").join("lei.txt");
        assert_eq!(relative_name(root, &path), "normas/lei.txt");
    }
}
