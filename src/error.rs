use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for everything outside the pruning engine.
///
/// The engine itself never fails: anything it cannot safely decide is left
/// untouched. Errors only come from reading transcripts and configuration.
#[derive(Error, Debug)]
pub enum PrunerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Transcript error: {0}")]
    Transcript(#[from] TranscriptError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    ParsingFailed(String),

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Unsupported configuration format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
}

#[derive(Error, Debug)]
pub enum TranscriptError {
    #[error("Transcript not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Malformed transcript {}: {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },
}

pub type Result<T> = std::result::Result<T, PrunerError>;
