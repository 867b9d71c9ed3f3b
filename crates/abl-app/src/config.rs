//! Corpus layout configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Dataset directories a data drop may contain.
pub const DEFAULT_DATASETS: [&str; 11] = [
    "C1_numCust_25",
    "C1_numCust_50",
    "C1_numCust_100",
    "C2_numCust_100",
    "R1_numCust_50",
    "R1_numCust_100",
    "RC1_numCust_25",
    "RC1_numCust_50",
    "RC1_numCust_100",
    "RC2_numCust_25",
    "RC2_numCust_50",
];

/// Recognized ablation conditions.
pub const DEFAULT_CONDITIONS: [&str; 5] = [
    "normal",
    "cuts_off_graphs_on",
    "cuts_off_graph_on",
    "no_ub_use_remove",
    "no_cuts_or_graphs",
];

pub const DEFAULT_ROOT_DIR: &str = "data/WillRezAbl";
pub const DEFAULT_ENTRY_PREFIX: &str = "jy_";

/// Where the corpus lives and which parts of it are read.
///
/// Layout: `<root_dir>/<dataset>/<condition>/<entry_prefix>*`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    pub root_dir: PathBuf,
    pub datasets: Vec<String>,
    pub conditions: Vec<String>,
    pub entry_prefix: String,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from(DEFAULT_ROOT_DIR),
            datasets: DEFAULT_DATASETS.iter().map(|s| s.to_string()).collect(),
            conditions: DEFAULT_CONDITIONS.iter().map(|s| s.to_string()).collect(),
            entry_prefix: DEFAULT_ENTRY_PREFIX.to_string(),
        }
    }
}

impl CorpusConfig {
    /// Default enumerations rooted at `root_dir`.
    pub fn with_root(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            ..Self::default()
        }
    }

    /// Load from a YAML file. Keys left out take their defaults.
    pub fn load_yaml(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AppError::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: CorpusConfig = serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.datasets.is_empty() {
            return Err(AppError::Config(
                "At least one dataset must be configured".to_string(),
            ));
        }
        if self.conditions.is_empty() {
            return Err(AppError::Config(
                "At least one condition must be configured".to_string(),
            ));
        }
        if self.entry_prefix.is_empty() {
            return Err(AppError::Config(
                "Entry prefix must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Stable key for caching the catalog this configuration loads.
    pub fn cache_key(&self) -> String {
        abl_results::compute_corpus_key(
            &self.root_dir,
            &self.datasets,
            &self.conditions,
            &self.entry_prefix,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_takes_defaults() {
        let config: CorpusConfig =
            serde_yaml::from_str("root_dir: /data/sept19\nconditions: [normal]\n").unwrap();
        assert_eq!(config.root_dir, PathBuf::from("/data/sept19"));
        assert_eq!(config.conditions, vec!["normal".to_string()]);
        assert_eq!(config.datasets.len(), DEFAULT_DATASETS.len());
        assert_eq!(config.entry_prefix, "jy_");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_enumerations_are_rejected() {
        let config = CorpusConfig {
            conditions: Vec::new(),
            ..CorpusConfig::default()
        };
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn cache_key_tracks_root() {
        let a = CorpusConfig::with_root("a");
        let b = CorpusConfig::with_root("b");
        assert_eq!(a.cache_key(), CorpusConfig::with_root("a").cache_key());
        assert_ne!(a.cache_key(), b.cache_key());
    }
}
