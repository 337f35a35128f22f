//! Exact nearest-neighbour search over L2-normalized vectors
//!
//! Every stored vector has unit length, so cosine similarity is recovered
//! from squared Euclidean distance as `1 - d / 2`.

pub mod math;
pub mod snapshot;

use licita_core::error::{CoreError, Result};
use licita_core::{ChunkMetadata, SearchHit};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct IndexStats {
    pub dimension: usize,
    pub total_documents: usize,
    pub is_ready: bool,
}

/// Append-only store of normalized vectors with their texts and metadata
///
/// Position in the arrays is the implicit entry id for the life of the
/// process.
#[derive(Debug, Clone)]
pub struct VectorIndex {
    dimension: usize,
    dir: PathBuf,
    vectors: Vec<Vec<f32>>,
    texts: Vec<String>,
    metadatas: Vec<ChunkMetadata>,
}

impl VectorIndex {
    pub fn new(dimension: usize, dir: impl Into<PathBuf>) -> Self {
        Self {
            dimension,
            dir: dir.into(),
            vectors: Vec::new(),
            texts: Vec::new(),
            metadatas: Vec::new(),
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn contains_document(&self, document_id: &str) -> bool {
        self.metadatas.iter().any(|m| m.document_id == document_id)
    }

    /// Ids of every document with at least one stored chunk
    pub fn document_ids(&self) -> BTreeSet<String> {
        self.metadatas
            .iter()
            .map(|m| m.document_id.clone())
            .collect()
    }

    /// Drop entries of `filename` that belong to any document other than
    /// `current_document_id`; returns how many were removed
    pub fn remove_stale(&mut self, filename: &str, current_document_id: &str) -> usize {
        let keep: Vec<bool> = self
            .metadatas
            .iter()
            .map(|m| m.filename != filename || m.document_id == current_document_id)
            .collect();
        let removed = keep.iter().filter(|k| !**k).count();
        if removed == 0 {
            return 0;
        }

        let mut flags = keep.iter();
        self.vectors.retain(|_| *flags.next().unwrap_or(&true));
        let mut flags = keep.iter();
        self.texts.retain(|_| *flags.next().unwrap_or(&true));
        let mut flags = keep.iter();
        self.metadatas.retain(|_| *flags.next().unwrap_or(&true));

        debug!("Removed {} stale entries of {}", removed, filename);
        removed
    }

    /// Append a batch of entries
    ///
    /// The whole batch is validated before anything is stored, so a failed
    /// call leaves the index unchanged. Returns the number of entries added.
    pub fn add(
        &mut self,
        vectors: Vec<Vec<f32>>,
        texts: Vec<String>,
        metadatas: Vec<ChunkMetadata>,
    ) -> Result<usize> {
        if vectors.len() != texts.len() || vectors.len() != metadatas.len() {
            return Err(CoreError::InvalidInput(format!(
                "batch length mismatch: {} vectors, {} texts, {} metadata entries",
                vectors.len(),
                texts.len(),
                metadatas.len()
            )));
        }

        let mut normalized = Vec::with_capacity(vectors.len());
        for (position, vector) in vectors.iter().enumerate() {
            if vector.len() != self.dimension {
                return Err(CoreError::DimensionMismatch {
                    expected: self.dimension,
                    actual: vector.len(),
                });
            }
            let unit = math::normalize(vector)
                .ok_or(CoreError::DegenerateVector { position })?;
            normalized.push(unit);
        }

        let added = normalized.len();
        self.vectors.extend(normalized);
        self.texts.extend(texts);
        self.metadatas.extend(metadatas);
        debug!("Added {} entries, index now holds {}", added, self.len());
        Ok(added)
    }

    /// Top `k` entries by cosine similarity, best first
    ///
    /// Equal scores keep insertion order. `k` is clamped to the index size.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit>> {
        if query.len() != self.dimension {
            return Err(CoreError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }
        if self.is_empty() || k == 0 {
            return Ok(Vec::new());
        }
        let query = math::normalize(query).ok_or(CoreError::DegenerateVector { position: 0 })?;

        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(i, v)| (i, math::cosine_from_distance(math::squared_distance(&query, v))))
            .collect();
        // stable: ties stay in insertion order
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        Ok(scored
            .into_iter()
            .take(k.min(self.len()))
            .map(|(i, score)| SearchHit {
                text: self.texts[i].clone(),
                score,
                metadata: self.metadatas[i].clone(),
            })
            .collect())
    }

    /// Drop every entry. The snapshot on disk is left alone.
    pub fn delete_all(&mut self) {
        self.vectors.clear();
        self.texts.clear();
        self.metadatas.clear();
    }

    pub fn get_stats(&self) -> IndexStats {
        IndexStats {
            dimension: self.dimension,
            total_documents: self.len(),
            is_ready: !self.is_empty(),
        }
    }

    /// Write the full snapshot to the index directory
    pub fn save(&self) -> Result<()> {
        snapshot::write(&self.dir, self.dimension, &self.vectors, &self.texts, &self.metadatas)?;
        info!(
            "Saved index snapshot ({} entries) to {}",
            self.len(),
            self.dir.display()
        );
        Ok(())
    }

    /// Restore an index from the snapshot in `dir`
    pub fn load(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        let snap = snapshot::read(&dir)?;
        info!(
            "Loaded index snapshot ({} entries, dimension {}) from {}",
            snap.vectors.len(),
            snap.dimension,
            dir.display()
        );
        Ok(Self {
            dimension: snap.dimension,
            dir,
            vectors: snap.vectors,
            texts: snap.texts,
            metadatas: snap.metadatas,
        })
    }

    /// Load the snapshot, or start empty with `dimension` when it is missing
    /// or unreadable
    pub fn load_or_empty(dir: impl Into<PathBuf>, dimension: usize) -> Self {
        let dir = dir.into();
        match Self::load(&dir) {
            Ok(index) => index,
            Err(CoreError::IndexNotFound { .. }) => {
                debug!("No snapshot at {}, starting empty", dir.display());
                Self::new(dimension, dir)
            }
            Err(err) => {
                warn!("Ignoring unusable index snapshot: {}", err);
                Self::new(dimension, dir)
            }
        }
    }
}
