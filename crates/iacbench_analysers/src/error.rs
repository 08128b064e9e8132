//! Error types for the analysers.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for analyser operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Errors that can occur while analysing collaborator output.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Required input not found: {0:?}")]
    MissingInput(PathBuf),

    #[error("Failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid input {path:?}: {message}")]
    InvalidInput { path: PathBuf, message: String },

    #[error("Unsupported tool: {0}")]
    UnsupportedTool(String),

    #[error("Invalid file pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Output error: {0}")]
    Output(#[from] iacbench_core::BenchError),
}
