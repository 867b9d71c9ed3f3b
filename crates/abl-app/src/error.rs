//! Error types for the abl-app service layer.

use std::path::PathBuf;

/// Application error type shared by the loader, the cache and front ends.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Corpus root directory does not exist: {path}")]
    RootNotFound { path: PathBuf },

    #[error("No data loaded successfully from {path}")]
    NoData { path: PathBuf },

    #[error("Failed to read config file: {path}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Failed to read run file: {path}")]
    RunRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse run file {path}: {source}")]
    RunParse {
        path: PathBuf,
        source: abl_results::ResultsError,
    },

    #[error("Run file has no fields: {path}")]
    EmptyRun { path: PathBuf },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for abl-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<abl_core::AblError> for AppError {
    fn from(err: abl_core::AblError) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}
