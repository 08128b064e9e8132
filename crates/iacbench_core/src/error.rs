//! Error types for the benchmark core.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for core operations.
pub type BenchResult<T> = Result<T, BenchError>;

/// Errors that can occur while configuring or emitting a comparison report.
///
/// Unreadable metric inputs are not errors: the loader degrades them to an
/// empty record. Only configuration and output failures surface here.
#[derive(Error, Debug)]
pub enum BenchError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to read config {path:?}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to create output directory {path:?}: {source}")]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path:?}: {source}")]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Rendering failed: {0}")]
    Render(#[from] std::fmt::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl BenchError {
    /// Whether this error came from writing report artifacts.
    pub fn is_output_failure(&self) -> bool {
        matches!(self, Self::OutputDir { .. } | Self::OutputWrite { .. })
    }
}
