//! abl-results: run documents, tolerant parsing, and per-iteration tables.

pub mod document;
pub mod extract;
pub mod hash;
pub mod naming;
pub mod sanitize;
pub mod types;

pub use document::{CutInfo, RawRunDocument, StageSizes};
pub use extract::{Extraction, extract};
pub use hash::compute_corpus_key;
pub use naming::{DatasetInfo, InstanceType, classify_dataset, normalize_instance_name};
pub use sanitize::{parse_run_document, parse_tolerant, sanitize_numeric_tokens};
pub use types::*;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Run document is not a JSON object (found {found})")]
    NotAnObject { found: &'static str },
}
