use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FailedFile {
    pub path: String,
    pub reason: String,
}

/// Summary of one ingestion run
#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestionReport {
    pub documents_loaded: usize,
    pub total_chunks: usize,
    pub total_embeddings: usize,
    pub time_elapsed: Duration,
    /// Chunks produced per file, keyed by path relative to the knowledge base
    pub per_file_breakdown: BTreeMap<String, usize>,
    pub failed_files: Vec<FailedFile>,
    /// Documents already in the index with identical content, not re-embedded
    pub unchanged_files: Vec<String>,
}

impl IngestionReport {
    pub fn record_failure(&mut self, path: impl Into<String>, reason: impl Into<String>) {
        self.failed_files.push(FailedFile {
            path: path.into(),
            reason: reason.into(),
        });
    }

    pub fn has_failures(&self) -> bool {
        !self.failed_files.is_empty()
    }
}
