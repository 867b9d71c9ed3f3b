//! Caller-owned catalog cache.
//!
//! Loading stays a pure function of the configuration; this cache only
//! decides when to call it again. An entry is reused while the
//! [`CorpusFingerprint`] of the configured corpus directories is unchanged.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::SystemTime;

use chrono::{DateTime, Utc};

use crate::catalog::Catalog;
use crate::config::CorpusConfig;
use crate::corpus::load_catalog;
use crate::error::AppResult;

struct CachedCatalog {
    catalog: Arc<Catalog>,
    fingerprint: CorpusFingerprint,
    loaded_at: DateTime<Utc>,
}

/// Result of a cache lookup.
#[derive(Debug, Clone)]
pub struct CacheLookup {
    pub catalog: Arc<Catalog>,
    pub loaded_at: DateTime<Utc>,
    pub from_cache: bool,
}

#[derive(Default)]
pub struct CatalogCache {
    entries: HashMap<String, CachedCatalog>,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached catalog for `config`, loading it when absent or stale.
    ///
    /// Failed loads are not cached.
    pub fn get_or_load(&mut self, config: &CorpusConfig) -> AppResult<CacheLookup> {
        let key = config.cache_key();
        let fingerprint = corpus_fingerprint(config);

        if let Some(cached) = self.entries.get(&key)
            && cached.fingerprint == fingerprint
        {
            tracing::debug!(key = %key, "catalog cache hit");
            return Ok(CacheLookup {
                catalog: Arc::clone(&cached.catalog),
                loaded_at: cached.loaded_at,
                from_cache: true,
            });
        }

        let catalog = Arc::new(load_catalog(config)?);
        let loaded_at = Utc::now();
        self.entries.insert(
            key,
            CachedCatalog {
                catalog: Arc::clone(&catalog),
                fingerprint,
                loaded_at,
            },
        );

        Ok(CacheLookup {
            catalog,
            loaded_at,
            from_cache: false,
        })
    }

    pub fn invalidate(&mut self, config: &CorpusConfig) {
        self.entries.remove(&config.cache_key());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Cheap summary of the corpus tree used to detect changes between loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CorpusFingerprint {
    /// Newest modification time seen; `None` when nothing could be inspected.
    pub newest: Option<SystemTime>,
    /// Total size in bytes of the files seen.
    pub total_bytes: u64,
    /// Number of paths inspected.
    pub entries: usize,
}

impl CorpusFingerprint {
    fn observe(&mut self, path: &Path) {
        let Ok(meta) = fs::metadata(path) else {
            return;
        };
        self.entries += 1;
        if meta.is_file() {
            self.total_bytes += meta.len();
        }
        self.newest = self.newest.max(meta.modified().ok());
    }
}

/// Fingerprint of the root, configured dataset and condition directories,
/// their run entries, and files inside entry directories.
///
/// A file replaced in place by one of the same size with an older
/// modification time goes unnoticed; use [`CatalogCache::invalidate`] then.
pub fn corpus_fingerprint(config: &CorpusConfig) -> CorpusFingerprint {
    let mut print = CorpusFingerprint::default();
    print.observe(&config.root_dir);

    for dataset in &config.datasets {
        let dataset_dir = config.root_dir.join(dataset);
        print.observe(&dataset_dir);
        for condition in &config.conditions {
            let condition_dir = dataset_dir.join(condition);
            print.observe(&condition_dir);
            let Ok(items) = fs::read_dir(&condition_dir) else {
                continue;
            };
            for item in items.flatten() {
                let path = item.path();
                print.observe(&path);
                if path.is_dir()
                    && let Ok(inner) = fs::read_dir(&path)
                {
                    for file in inner.flatten() {
                        print.observe(&file.path());
                    }
                }
            }
        }
    }

    print
}
