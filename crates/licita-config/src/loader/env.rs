//! Environment variable configuration overlay
//!
//! Variables take the form `LICITA_<SECTION>_<FIELD>=value`, for example:
//! - `LICITA_EMBEDDING_BACKEND=ollama`
//! - `LICITA_RETRIEVAL_TOP_K=10`
//! - `LICITA_CONFORMITY_HIGH_CONFIDENCE_THRESHOLD=0.9`

use crate::error::ConfigError;
use crate::types::{
    ChunkingConfig, ConformityConfig, CoreConfig, EmbeddingBackend, EmbeddingConfig,
    RetrievalConfig,
};
use crate::{Config, Result};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

const PREFIX: &str = "LICITA_";

/// Build a config from `LICITA_*` variables, or `None` when none are set
///
/// Unparseable values are reported on stderr and skipped.
pub fn from_env() -> Result<Option<Config>> {
    let env_vars: Vec<(String, String)> = env::vars()
        .filter(|(k, _)| k.starts_with(PREFIX))
        .collect();

    if env_vars.is_empty() {
        return Ok(None);
    }

    let mut config = Config::default();
    for (key, value) in env_vars {
        if let Err(e) = apply_env_var(&mut config, &key, &value) {
            eprintln!("Warning: ignoring {}: {}", key, e);
        }
    }

    Ok(Some(config))
}

fn apply_env_var(config: &mut Config, key: &str, value: &str) -> Result<()> {
    let key = key.strip_prefix(PREFIX).unwrap_or(key);

    let Some((section, field)) = key.split_once('_') else {
        return Err(ConfigError::EnvVarError {
            var: format!("{}{}", PREFIX, key),
            message: "Expected format: LICITA_<SECTION>_<FIELD>".to_string(),
        });
    };

    let section = section.to_lowercase();
    let field = field.to_lowercase();

    match section.as_str() {
        "core" => apply_core_var(&mut config.core, &field, value),
        "chunking" => apply_chunking_var(&mut config.chunking, &field, value),
        "embedding" => apply_embedding_var(&mut config.embedding, &field, value),
        "retrieval" => apply_retrieval_var(&mut config.retrieval, &field, value),
        "conformity" => apply_conformity_var(&mut config.conformity, &field, value),
        _ => Err(ConfigError::EnvVarError {
            var: format!("{}{}", PREFIX, key),
            message: format!("Unknown section: {}", section),
        }),
    }
}

fn var_name(section: &str, field: &str) -> String {
    format!("{}{}_{}", PREFIX, section, field.to_uppercase())
}

fn parse_num<T: FromStr>(section: &str, field: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| ConfigError::EnvVarError {
        var: var_name(section, field),
        message: format!("Invalid number: {}", value),
    })
}

fn unknown_field(section: &str, field: &str) -> ConfigError {
    ConfigError::EnvVarError {
        var: var_name(section, field),
        message: format!("Unknown field: {}", field),
    }
}

/// Comma-separated glob list
fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn apply_core_var(config: &mut CoreConfig, field: &str, value: &str) -> Result<()> {
    match field {
        "knowledge_base_dir" => config.knowledge_base_dir = PathBuf::from(value),
        "index_dir" => config.index_dir = PathBuf::from(value),
        "include_paths" => config.include_paths = parse_list(value),
        "exclude_paths" => config.exclude_paths = parse_list(value),
        _ => return Err(unknown_field("CORE", field)),
    }
    Ok(())
}

fn apply_chunking_var(config: &mut ChunkingConfig, field: &str, value: &str) -> Result<()> {
    match field {
        "chunk_size" => config.chunk_size = parse_num("CHUNKING", field, value)?,
        "chunk_overlap" => config.chunk_overlap = parse_num("CHUNKING", field, value)?,
        _ => return Err(unknown_field("CHUNKING", field)),
    }
    Ok(())
}

fn apply_embedding_var(config: &mut EmbeddingConfig, field: &str, value: &str) -> Result<()> {
    match field {
        "backend" => {
            config.backend = match value.to_lowercase().as_str() {
                "openai" | "external" => EmbeddingBackend::External,
                "ollama" => EmbeddingBackend::Ollama,
                "local" => EmbeddingBackend::Local,
                _ => {
                    return Err(ConfigError::invalid_enum(
                        "embedding.backend",
                        value,
                        &["openai", "ollama", "local"],
                    ))
                }
            };
        }
        "model_name" => config.model_name = value.to_string(),
        "dimension" => config.dimension = parse_num("EMBEDDING", field, value)?,
        "api_base" => config.api_base = Some(value.to_string()),
        "timeout_secs" => config.timeout_secs = parse_num("EMBEDDING", field, value)?,
        "batch_size" => config.batch_size = parse_num("EMBEDDING", field, value)?,
        _ => return Err(unknown_field("EMBEDDING", field)),
    }
    Ok(())
}

fn apply_retrieval_var(config: &mut RetrievalConfig, field: &str, value: &str) -> Result<()> {
    match field {
        "top_k" => config.top_k = parse_num("RETRIEVAL", field, value)?,
        "similarity_threshold" => {
            config.similarity_threshold = parse_num("RETRIEVAL", field, value)?
        }
        _ => return Err(unknown_field("RETRIEVAL", field)),
    }
    Ok(())
}

fn apply_conformity_var(config: &mut ConformityConfig, field: &str, value: &str) -> Result<()> {
    match field {
        "high_confidence_threshold" => {
            config.high_confidence_threshold = parse_num("CONFORMITY", field, value)?
        }
        "low_confidence_threshold" => {
            config.low_confidence_threshold = parse_num("CONFORMITY", field, value)?
        }
        "min_evidence_count" => {
            config.min_evidence_count = parse_num("CONFORMITY", field, value)?
        }
        "weak_relevance_threshold" => {
            config.weak_relevance_threshold = parse_num("CONFORMITY", field, value)?
        }
        _ => return Err(unknown_field("CONFORMITY", field)),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Serializes tests that touch the process environment
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn cleanup_licita_env_vars() {
        let keys: Vec<String> = env::vars()
            .filter(|(k, _)| k.starts_with(PREFIX))
            .map(|(k, _)| k)
            .collect();
        for key in keys {
            env::remove_var(&key);
        }
    }

    #[test]
    fn test_no_env_vars() {
        let _lock = ENV_LOCK.lock().unwrap();
        cleanup_licita_env_vars();
        assert!(from_env().unwrap().is_none());
    }

    #[test]
    fn test_embedding_backend_env() {
        let _lock = ENV_LOCK.lock().unwrap();
        cleanup_licita_env_vars();
        env::set_var("LICITA_EMBEDDING_BACKEND", "ollama");
        env::set_var("LICITA_EMBEDDING_DIMENSION", "768");
        let config = from_env().unwrap().unwrap();
        assert_eq!(config.embedding.backend, EmbeddingBackend::Ollama);
        assert_eq!(config.embedding.dimension, 768);
        cleanup_licita_env_vars();
    }

    #[test]
    fn test_threshold_env() {
        let _lock = ENV_LOCK.lock().unwrap();
        cleanup_licita_env_vars();
        env::set_var("LICITA_CONFORMITY_HIGH_CONFIDENCE_THRESHOLD", "0.9");
        let config = from_env().unwrap().unwrap();
        assert_eq!(config.conformity.high_confidence_threshold, 0.9);
        cleanup_licita_env_vars();
    }

    #[test]
    fn test_bad_value_is_skipped() {
        let _lock = ENV_LOCK.lock().unwrap();
        cleanup_licita_env_vars();
        env::set_var("LICITA_RETRIEVAL_TOP_K", "many");
        let config = from_env().unwrap().unwrap();
        assert_eq!(config.retrieval.top_k, RetrievalConfig::default().top_k);
        cleanup_licita_env_vars();
    }

    #[test]
    fn test_apply_core_list() {
        let mut config = Config::default();
        apply_env_var(&mut config, "LICITA_CORE_EXCLUDE_PATHS", "a/**, b/*.md").unwrap();
        assert_eq!(config.core.exclude_paths, vec!["a/**", "b/*.md"]);
    }

    #[test]
    fn test_unknown_section() {
        let mut config = Config::default();
        assert!(apply_env_var(&mut config, "LICITA_GRAPH_DEPTH", "2").is_err());
        assert!(apply_env_var(&mut config, "LICITA_NOSECTION", "2").is_err());
    }
}
