use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Metadata attached to a document at load time
///
/// Known frontmatter keys land in the typed fields, anything else in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentMetadata {
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl DocumentMetadata {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            ..Default::default()
        }
    }
}

/// A knowledge-base document before chunking
#[derive(Debug, Clone)]
pub struct Document {
    pub id: String,
    pub raw_text: String,
    pub metadata: DocumentMetadata,
}

impl Document {
    pub fn new(raw_text: impl Into<String>, metadata: DocumentMetadata) -> Self {
        let raw_text = raw_text.into();
        let id = document_id(&metadata.filename, &raw_text);
        Self {
            id,
            raw_text,
            metadata,
        }
    }
}

/// SHA-256 hex digest of filename followed by content
pub fn document_id(filename: &str, raw_text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(filename.as_bytes());
    hasher.update(raw_text.as_bytes());
    hex::encode(hasher.finalize())
}

/// Per-entry metadata stored in the index alongside each chunk
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChunkMetadata {
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
    #[serde(default)]
    pub document_id: String,
    pub chunk_index: usize,
    /// Character offset of the window start in the source text
    pub start_offset: usize,
    /// Character offset one past the window end
    pub end_offset: usize,
}

impl ChunkMetadata {
    pub fn from_document(
        doc: &DocumentMetadata,
        document_id: &str,
        chunk_index: usize,
        start_offset: usize,
        end_offset: usize,
    ) -> Self {
        Self {
            filename: doc.filename.clone(),
            title: doc.title.clone(),
            url: doc.url.clone(),
            source: doc.source.clone(),
            date: doc.date.clone(),
            extra: doc.extra.clone(),
            document_id: document_id.to_string(),
            chunk_index,
            start_offset,
            end_offset,
        }
    }
}

/// A bounded window of a document, the unit that gets embedded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub text: String,
    pub index: usize,
    pub start_offset: usize,
    pub end_offset: usize,
    pub metadata: ChunkMetadata,
}

/// One similarity search result
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SearchHit {
    pub text: String,
    /// Cosine similarity clamped into [0, 1]
    pub score: f32,
    pub metadata: ChunkMetadata,
}

/// A retrieved chunk judged relevant to a requirement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Evidence {
    pub source: String,
    pub text: String,
    pub relevance: f32,
    pub chunk_index: usize,
}

impl Evidence {
    pub fn from_hit(hit: &SearchHit) -> Self {
        Self {
            source: hit.metadata.filename.clone(),
            text: hit.text.clone(),
            relevance: hit.score,
            chunk_index: hit.metadata.chunk_index,
        }
    }

    /// First `max_chars` characters of the text, with an ellipsis when cut
    pub fn snippet(&self, max_chars: usize) -> String {
        let mut chars = self.text.chars();
        let head: String = chars.by_ref().take(max_chars).collect();
        if chars.next().is_some() {
            format!("{}...", head)
        } else {
            head
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ConformityVerdict {
    Conforme,
    NaoConforme,
    Revisao,
}

impl ConformityVerdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConformityVerdict::Conforme => "conforme",
            ConformityVerdict::NaoConforme => "nao_conforme",
            ConformityVerdict::Revisao => "revisao",
        }
    }
}

impl fmt::Display for ConformityVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A requirement extracted from a procurement notice
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Requirement {
    pub id: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl Requirement {
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }
}

/// Result of analyzing one requirement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConformityAnalysis {
    pub requirement_id: String,
    pub verdict: ConformityVerdict,
    pub confidence: f32,
    pub evidence: Vec<Evidence>,
    pub reasoning: String,
    pub recommendations: Vec<String>,
    pub sources: BTreeSet<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}
