//! Corpus loading: directory tree to [`Catalog`].
//!
//! A failure inside one run entry is logged and recorded as a skip; only a
//! missing root or a corpus that yields no record at all fails the load.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use abl_results::{DatasetInfo, RawRunDocument, classify_dataset, extract, normalize_instance_name};
use rayon::prelude::*;

use crate::catalog::{Catalog, RunSummaryRecord, SkippedRun};
use crate::config::CorpusConfig;
use crate::error::{AppError, AppResult};
use crate::progress::{LoadProgressEvent, LoadStage};

/// Load every recognized run under the configured root.
pub fn load_catalog(config: &CorpusConfig) -> AppResult<Catalog> {
    load_catalog_with_progress(config, None)
}

pub fn load_catalog_with_progress(
    config: &CorpusConfig,
    mut progress_cb: Option<&mut dyn FnMut(LoadProgressEvent)>,
) -> AppResult<Catalog> {
    let started = Instant::now();
    let root = &config.root_dir;
    emit_progress(
        &mut progress_cb,
        LoadProgressEvent::stage(LoadStage::CheckingRoot, 0.0),
    );

    if !root.is_dir() {
        return Err(AppError::RootNotFound { path: root.clone() });
    }

    let mut records = Vec::new();
    let mut skipped = Vec::new();

    for dataset in &config.datasets {
        let dataset_dir = root.join(dataset);
        if !dataset_dir.is_dir() {
            tracing::debug!(dataset = %dataset, "dataset directory not found, skipping");
            continue;
        }
        let info = classify_dataset(dataset);

        let available = match subdirectory_names(&dataset_dir) {
            Ok(names) => names,
            Err(err) => {
                tracing::warn!(path = %dataset_dir.display(), error = %err, "cannot list dataset directory");
                continue;
            }
        };

        for condition in config.conditions.iter().filter(|c| available.contains(*c)) {
            let condition_dir = dataset_dir.join(condition);
            let entries = match run_entries(&condition_dir, &config.entry_prefix) {
                Ok(entries) => entries,
                Err(err) => {
                    tracing::warn!(path = %condition_dir.display(), error = %err, "cannot list condition directory");
                    continue;
                }
            };
            tracing::info!(
                dataset = %dataset,
                condition = %condition,
                entries = entries.len(),
                "processing condition directory"
            );

            // Entries are independent; collect keeps enumeration order.
            let outcomes: Vec<EntryOutcome> = entries
                .par_iter()
                .map(|entry| load_entry(entry, dataset, info, condition))
                .collect();

            for outcome in outcomes {
                match outcome {
                    EntryOutcome::Loaded(record) => records.push(*record),
                    EntryOutcome::Skipped(skip) => {
                        tracing::warn!(path = %skip.path.display(), reason = %skip.reason, "skipping run");
                        skipped.push(skip);
                    }
                    EntryOutcome::Ignored => {}
                }
            }

            emit_progress(
                &mut progress_cb,
                LoadProgressEvent {
                    dataset: Some(dataset.clone()),
                    condition: Some(condition.clone()),
                    records_loaded: records.len(),
                    runs_skipped: skipped.len(),
                    ..LoadProgressEvent::stage(
                        LoadStage::ScanningCondition,
                        started.elapsed().as_secs_f64(),
                    )
                },
            );
        }
    }

    if records.is_empty() {
        return Err(AppError::NoData { path: root.clone() });
    }

    let catalog = Catalog::new(records, skipped);
    for group in catalog.duplicates() {
        tracing::warn!(
            instance = %group.instance,
            condition = %group.condition,
            count = group.indices.len(),
            "duplicate instance/condition pair, queries use the first record"
        );
    }

    emit_progress(
        &mut progress_cb,
        LoadProgressEvent {
            records_loaded: catalog.len(),
            runs_skipped: catalog.skipped().len(),
            ..LoadProgressEvent::stage(LoadStage::Completed, started.elapsed().as_secs_f64())
        },
    );

    Ok(catalog)
}

fn emit_progress(
    progress_cb: &mut Option<&mut dyn FnMut(LoadProgressEvent)>,
    event: LoadProgressEvent,
) {
    tracing::debug!(
        stage = event.stage.label(),
        records = event.records_loaded,
        skipped = event.runs_skipped,
        "load progress"
    );
    if let Some(cb) = progress_cb.as_deref_mut() {
        cb(event);
    }
}

enum EntryOutcome {
    Loaded(Box<RunSummaryRecord>),
    Skipped(SkippedRun),
    /// Neither a file nor a directory holding a run file.
    Ignored,
}

fn load_entry(entry: &Path, dataset: &str, info: DatasetInfo, condition: &str) -> EntryOutcome {
    let file = match resolve_run_file(entry) {
        Ok(Some(file)) => file,
        Ok(None) => return EntryOutcome::Ignored,
        Err(err) => {
            return EntryOutcome::Skipped(SkippedRun {
                path: entry.to_path_buf(),
                reason: err.to_string(),
            });
        }
    };

    let doc = match read_run(&file) {
        Ok(doc) => doc,
        Err(err) => {
            return EntryOutcome::Skipped(SkippedRun {
                path: file,
                reason: err.to_string(),
            });
        }
    };

    let extraction = extract(&doc);
    if !extraction.has_iterations() {
        tracing::debug!(path = %file.display(), "run has no iteration data");
    }

    let entry_name = entry
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    EntryOutcome::Loaded(Box::new(RunSummaryRecord::from_extraction(
        dataset,
        info,
        condition,
        normalize_instance_name(&entry_name),
        file,
        extraction,
    )))
}

/// Read and parse one run file.
fn read_run(path: &Path) -> AppResult<RawRunDocument> {
    let text = fs::read_to_string(path).map_err(|e| AppError::RunRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let doc = abl_results::parse_run_document(&text).map_err(|e| AppError::RunParse {
        path: path.to_path_buf(),
        source: e,
    })?;

    if doc.empty {
        return Err(AppError::EmptyRun {
            path: path.to_path_buf(),
        });
    }
    Ok(doc)
}

/// The file holding a run: the entry itself, or the run file inside an entry directory.
fn resolve_run_file(entry: &Path) -> AppResult<Option<PathBuf>> {
    let meta = fs::metadata(entry)?;
    if meta.is_file() {
        Ok(Some(entry.to_path_buf()))
    } else if meta.is_dir() {
        run_file_in_dir(entry)
    } else {
        Ok(None)
    }
}

/// Pick the run file inside an entry directory.
///
/// `.json` files win over `.txt`, ties break lexicographically.
fn run_file_in_dir(dir: &Path) -> AppResult<Option<PathBuf>> {
    let mut candidates: Vec<(bool, PathBuf)> = Vec::new();
    for item in fs::read_dir(dir)? {
        let path = item?.path();
        if !path.is_file() {
            continue;
        }
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => candidates.push((false, path)),
            Some("txt") => candidates.push((true, path)),
            _ => {}
        }
    }
    candidates.sort();

    if candidates.len() > 1 {
        tracing::warn!(
            path = %dir.display(),
            candidates = candidates.len(),
            chosen = %candidates[0].1.display(),
            "several run files in entry directory"
        );
    }
    Ok(candidates.into_iter().next().map(|(_, path)| path))
}

fn subdirectory_names(dir: &Path) -> AppResult<Vec<String>> {
    let mut names = Vec::new();
    for item in fs::read_dir(dir)? {
        let item = item?;
        if item.path().is_dir() {
            names.push(item.file_name().to_string_lossy().into_owned());
        }
    }
    Ok(names)
}

/// Entries of a condition directory whose names carry the run prefix, sorted.
fn run_entries(dir: &Path, prefix: &str) -> AppResult<Vec<PathBuf>> {
    let mut entries = Vec::new();
    for item in fs::read_dir(dir)? {
        let item = item?;
        if item.file_name().to_string_lossy().starts_with(prefix) {
            entries.push(item.path());
        }
    }
    entries.sort();
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_temp_dir(prefix: &str) -> PathBuf {
        let mut dir = std::env::temp_dir();
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        dir.push(format!("{}_{}", prefix, nanos));
        fs::create_dir_all(&dir).expect("failed to create temp dir");
        dir
    }

    #[test]
    fn json_wins_over_txt_inside_entry_directory() {
        let dir = unique_temp_dir("abl_corpus_pick");
        fs::write(dir.join("a_run.txt"), "{}").unwrap();
        fs::write(dir.join("z_run.json"), "{}").unwrap();
        fs::write(dir.join("b_run.json"), "{}").unwrap();
        fs::write(dir.join("notes.md"), "").unwrap();

        let chosen = run_file_in_dir(&dir).unwrap().unwrap();
        assert_eq!(chosen.file_name().unwrap(), "b_run.json");

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn entry_directory_without_run_file_is_ignored() {
        let dir = unique_temp_dir("abl_corpus_empty_entry");
        fs::write(dir.join("readme.md"), "").unwrap();
        assert!(resolve_run_file(&dir).unwrap().is_none());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn run_entries_filter_by_prefix_and_sort() {
        let dir = unique_temp_dir("abl_corpus_entries");
        for name in ["jy_c102.json", "BACK_jy_c101.txt", "jy_c101.json", "other.json"] {
            fs::write(dir.join(name), "{}").unwrap();
        }
        let names: Vec<String> = run_entries(&dir, "jy_")
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["jy_c101.json", "jy_c102.json"]);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn empty_object_run_is_rejected() {
        let dir = unique_temp_dir("abl_corpus_empty_run");
        let path = dir.join("jy_c101.json");
        fs::write(&path, "{}").unwrap();
        assert!(matches!(read_run(&path), Err(AppError::EmptyRun { .. })));
        let _ = fs::remove_dir_all(&dir);
    }
}
