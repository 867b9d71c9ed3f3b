//! Shared application service layer for ablview.
//!
//! This crate sits between the run-file parsing in `abl-results` and any
//! front end. It walks a corpus of ablation runs into a [`Catalog`] and
//! answers the queries a dashboard needs over it.

pub mod cache;
pub mod catalog;
pub mod config;
pub mod corpus;
pub mod error;
pub mod progress;
pub mod query;

// Re-export key types for convenience
pub use cache::{CacheLookup, CatalogCache, CorpusFingerprint, corpus_fingerprint};
pub use catalog::{Catalog, DuplicateGroup, RunSummaryRecord, SkippedRun};
pub use config::{CorpusConfig, DEFAULT_CONDITIONS, DEFAULT_DATASETS};
pub use corpus::{load_catalog, load_catalog_with_progress};
pub use error::{AppError, AppResult};
pub use progress::{LoadProgressEvent, LoadStage};
pub use query::{
    ConditionSeries, SummaryField, SummaryStats, available_conditions,
    available_customer_counts, compare_conditions, cuts_start, extract_series,
    get_iteration_data, get_summary_stats, list_instances,
};
