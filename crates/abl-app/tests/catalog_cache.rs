use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use abl_app::{CatalogCache, CorpusConfig, corpus_fingerprint};

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    dir.push(format!("{}_{}", prefix, nanos));
    dir
}

#[test]
fn second_lookup_is_served_from_cache() {
    let root = unique_temp_dir("abl_cache_hit");
    let normal = root.join("C1_numCust_25").join("normal");
    fs::create_dir_all(&normal).expect("failed to create corpus dirs");
    fs::write(normal.join("jy_c101.json"), r#"{"lblp_lower": [1.0]}"#).expect("failed to write run");

    let config = CorpusConfig::with_root(&root);
    let mut cache = CatalogCache::new();

    let first = cache.get_or_load(&config).expect("first load failed");
    assert!(!first.from_cache);
    assert_eq!(first.catalog.len(), 1);

    let second = cache.get_or_load(&config).expect("second load failed");
    assert!(second.from_cache);
    assert!(Arc::ptr_eq(&first.catalog, &second.catalog));
    assert_eq!(second.loaded_at, first.loaded_at);
    assert_eq!(cache.len(), 1);

    cache.invalidate(&config);
    assert!(cache.is_empty());
    let third = cache.get_or_load(&config).expect("reload failed");
    assert!(!third.from_cache);

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn changed_corpus_is_reloaded() {
    let root = unique_temp_dir("abl_cache_stale");
    let normal = root.join("C1_numCust_25").join("normal");
    fs::create_dir_all(&normal).expect("failed to create corpus dirs");
    let run = normal.join("jy_c101.json");
    fs::write(&run, r#"{"lblp_lower": [1.0]}"#).expect("failed to write run");

    let config = CorpusConfig::with_root(&root);
    let mut cache = CatalogCache::new();
    let first = cache.get_or_load(&config).expect("first load failed");
    assert!(!first.from_cache);

    let before = corpus_fingerprint(&config)
        .newest
        .expect("fingerprint available");
    // Push the mtime forward explicitly so coarse filesystem clocks still see a change.
    let file = fs::File::options()
        .write(true)
        .open(&run)
        .expect("failed to open run");
    file.set_modified(before + Duration::from_secs(5))
        .expect("failed to set mtime");

    let second = cache.get_or_load(&config).expect("reload failed");
    assert!(!second.from_cache);

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn replacement_with_older_mtime_is_reloaded() {
    let root = unique_temp_dir("abl_cache_older");
    let normal = root.join("C1_numCust_25").join("normal");
    fs::create_dir_all(&normal).expect("failed to create corpus dirs");
    let run = normal.join("jy_c101.json");
    fs::write(&run, r#"{"lblp_lower": [1.0]}"#).expect("failed to write run");

    let config = CorpusConfig::with_root(&root);
    let mut cache = CatalogCache::new();
    let first = cache.get_or_load(&config).expect("first load failed");
    let before = corpus_fingerprint(&config);
    let old_mtime = before.newest.expect("fingerprint available") - Duration::from_secs(3600);

    // Same path, new content, mtime pushed into the past as `cp -p` would leave it.
    fs::write(&run, r#"{"lblp_lower": [1.0, 2.0, 3.0]}"#).expect("failed to rewrite run");
    let file = fs::File::options()
        .write(true)
        .open(&run)
        .expect("failed to open run");
    file.set_modified(old_mtime).expect("failed to set mtime");
    drop(file);

    let after = corpus_fingerprint(&config);
    assert_ne!(after, before);
    assert_eq!(after.entries, before.entries);
    assert!(after.total_bytes > before.total_bytes);

    let second = cache.get_or_load(&config).expect("reload failed");
    assert!(!second.from_cache);
    assert!(!Arc::ptr_eq(&first.catalog, &second.catalog));
    assert_eq!(second.catalog.records()[0].iterations, 3);

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn new_run_entry_changes_fingerprint() {
    let root = unique_temp_dir("abl_cache_added");
    let normal = root.join("C1_numCust_25").join("normal");
    fs::create_dir_all(&normal).expect("failed to create corpus dirs");
    fs::write(normal.join("jy_c101.json"), r#"{"lblp_lower": [1.0]}"#).expect("failed to write run");

    let config = CorpusConfig::with_root(&root);
    let before = corpus_fingerprint(&config);
    fs::write(normal.join("jy_c102.json"), r#"{"lblp_lower": [1.0]}"#).expect("failed to write run");
    let after = corpus_fingerprint(&config);
    assert_eq!(after.entries, before.entries + 1);

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn failed_loads_are_not_cached() {
    let root = unique_temp_dir("abl_cache_missing");
    let config = CorpusConfig::with_root(&root);
    let mut cache = CatalogCache::new();

    assert!(cache.get_or_load(&config).is_err());
    assert!(cache.is_empty());
}
