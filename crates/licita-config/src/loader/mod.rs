//! Configuration loading from various sources

pub mod env;
pub mod file;
pub mod formats;
pub mod merge;

use crate::{Config, Result, Validate};
use std::path::{Path, PathBuf};

/// Format for configuration files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML format (.yml, .yaml)
    Yaml,
    /// TOML format (.toml)
    Toml,
    /// JSON format (.json)
    Json,
}

/// Configuration source for layered loading
#[derive(Debug, Clone)]
pub enum ConfigSource {
    File(PathBuf),
    Environment,
    /// Explicit config object (CLI flags, tests)
    Explicit(Config),
}

/// Files probed by [`Config::load`], in order
pub const DEFAULT_CONFIG_FILES: [&str; 4] =
    [".licita.toml", ".licita.yml", ".licita.yaml", ".licita.json"];

/// Builder for loading and merging configurations
///
/// Precedence: defaults < file < environment < explicit overrides
///
/// # Example
///
/// ```no_run
/// use licita_config::loader::ConfigBuilder;
///
/// let config = ConfigBuilder::new()
///     .with_file(".licita.toml")
///     .with_env()
///     .build()?;
/// # Ok::<(), licita_config::ConfigError>(())
/// ```
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    sources: Vec<ConfigSource>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.sources
            .push(ConfigSource::File(path.as_ref().to_path_buf()));
        self
    }

    pub fn with_env(mut self) -> Self {
        self.sources.push(ConfigSource::Environment);
        self
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.sources.push(ConfigSource::Explicit(config));
        self
    }

    /// Merge all sources in order and validate the result
    pub fn build(self) -> Result<Config> {
        let mut config = Config::default();

        for source in self.sources {
            match source {
                ConfigSource::File(path) => {
                    let file_config = file::load_from_file(&path)?;
                    config = merge::merge(config, file_config);
                }
                ConfigSource::Environment => {
                    if let Some(env_config) = env::from_env()? {
                        config = merge::merge(config, env_config);
                    }
                }
                ConfigSource::Explicit(explicit) => {
                    config = merge::merge(config, explicit);
                }
            }
        }

        config.validate()?;
        Ok(config)
    }
}

impl Config {
    /// Load configuration from the first default file found in the working
    /// directory, then apply the environment overlay.
    ///
    /// Falls back to defaults when no file exists.
    pub fn load() -> Result<Self> {
        Self::load_from_dir(Path::new("."))
    }

    /// Same as [`Config::load`] but probes `dir` instead of the working directory
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let mut builder = ConfigBuilder::new();

        if let Some(found) = DEFAULT_CONFIG_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|p| p.exists())
        {
            builder = builder.with_file(found);
        }

        builder.with_env().build()
    }

    /// Load configuration from a specific file plus the environment overlay
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        ConfigBuilder::new().with_file(path).with_env().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_builder_default() {
        let config = ConfigBuilder::new().build().unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_explicit_overrides_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cfg.toml");
        fs::write(&path, "[retrieval]\ntop_k = 8\n").unwrap();

        let mut explicit = Config::default();
        explicit.retrieval.top_k = 12;

        let config = ConfigBuilder::new()
            .with_file(&path)
            .with_config(explicit)
            .build()
            .unwrap();
        assert_eq!(config.retrieval.top_k, 12);
    }

    #[test]
    fn test_load_from_dir_picks_toml_first() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(".licita.toml"),
            "[chunking]\nchunk_size = 500\nchunk_overlap = 50\n",
        )
        .unwrap();
        fs::write(
            dir.path().join(".licita.json"),
            r#"{"chunking": {"chunk_size": 700}}"#,
        )
        .unwrap();

        let config = Config::load_from_dir(dir.path()).unwrap();
        assert_eq!(config.chunking.chunk_size, 500);
        assert_eq!(config.chunking.chunk_overlap, 50);
    }

    #[test]
    fn test_invalid_file_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.yml");
        fs::write(&path, "conformity:\n  high_confidence_threshold: 1.5\n").unwrap();
        assert!(ConfigBuilder::new().with_file(&path).build().is_err());
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        let result = ConfigBuilder::new()
            .with_file(dir.path().join("nope.toml"))
            .build();
        assert!(result.is_err());
    }
}
