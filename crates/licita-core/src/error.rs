use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

/// Failure taxonomy shared by every licita crate below the CLI
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Backend missing, misconfigured or unreachable. Never retried internally.
    #[error("Embedding provider '{provider}' unavailable: {message}")]
    ProviderUnavailable { provider: String, message: String },

    #[error("Cannot normalize zero-length vector at position {position}")]
    DegenerateVector { position: usize },

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("No index snapshot found at {}", path.display())]
    IndexNotFound { path: PathBuf },

    #[error("Index snapshot at {} is corrupt: {message}", path.display())]
    IndexCorrupt { path: PathBuf, message: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] licita_config::ConfigError),
}

impl CoreError {
    pub fn unavailable(provider: impl Into<String>, message: impl Into<String>) -> Self {
        CoreError::ProviderUnavailable {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CoreError::Io {
            path: path.into(),
            source,
        }
    }
}
