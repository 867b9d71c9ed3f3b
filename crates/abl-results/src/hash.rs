//! Content-based hashing for catalog cache keys.

use sha2::{Digest, Sha256};
use std::path::Path;

/// Key identifying one corpus load: root directory plus the enumerations that
/// decide which files are read.
pub fn compute_corpus_key(
    root_dir: &Path,
    datasets: &[String],
    conditions: &[String],
    entry_prefix: &str,
) -> String {
    let mut hasher = Sha256::new();

    hasher.update(root_dir.to_string_lossy().as_bytes());
    // Separators keep ["ab", "c"] and ["a", "bc"] apart.
    for dataset in datasets {
        hasher.update(b"\x1fd");
        hasher.update(dataset.as_bytes());
    }
    for condition in conditions {
        hasher.update(b"\x1fc");
        hasher.update(condition.as_bytes());
    }
    hasher.update(b"\x1fp");
    hasher.update(entry_prefix.as_bytes());

    let result = hasher.finalize();
    format!("{:x}", result)
}
