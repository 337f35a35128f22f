//! Core configuration (paths, file scanning)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where the knowledge base lives and where the index snapshot is written
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoreConfig {
    /// Directory scanned by `ingest`
    #[serde(default = "default_knowledge_base_dir")]
    pub knowledge_base_dir: PathBuf,

    /// Directory holding `vectors.bin` and `metadata.json`
    #[serde(default = "default_index_dir")]
    pub index_dir: PathBuf,

    /// Glob patterns (relative to the knowledge base) for documents to ingest
    ///
    /// Examples: `["**/*.txt", "normas/**/*.md"]`
    #[serde(default = "default_include_paths")]
    pub include_paths: Vec<String>,

    /// Glob patterns for files to skip
    #[serde(default)]
    pub exclude_paths: Vec<String>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            knowledge_base_dir: default_knowledge_base_dir(),
            index_dir: default_index_dir(),
            include_paths: default_include_paths(),
            exclude_paths: vec![],
        }
    }
}

impl crate::validation::Validate for CoreConfig {
    fn validate(&self) -> crate::error::Result<()> {
        use crate::error::ConfigError;

        if self.include_paths.is_empty() {
            return Err(ConfigError::ValidationError {
                field: "core.include_paths".to_string(),
                message: "Must have at least one include pattern".to_string(),
            });
        }

        if self.include_paths.iter().any(|p| p.trim().is_empty()) {
            return Err(ConfigError::ValidationError {
                field: "core.include_paths".to_string(),
                message: "Include patterns cannot be empty strings".to_string(),
            });
        }

        if self.index_dir.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError {
                field: "core.index_dir".to_string(),
                message: "Index directory cannot be empty".to_string(),
            });
        }

        Ok(())
    }
}

fn default_knowledge_base_dir() -> PathBuf {
    PathBuf::from("knowledge_base")
}

fn default_index_dir() -> PathBuf {
    PathBuf::from(".licita").join("index")
}

fn default_include_paths() -> Vec<String> {
    vec!["**/*.txt".to_string(), "**/*.md".to_string()]
}
