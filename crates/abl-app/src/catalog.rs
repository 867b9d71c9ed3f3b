//! The in-memory catalog of loaded runs.

use std::collections::HashMap;
use std::path::PathBuf;

use abl_core::{MaybeReal, Real};
use abl_results::{DatasetInfo, Extraction, InstanceType, IterationTable};

/// One run: a (dataset, condition, instance) triple with its metrics.
#[derive(Debug, Clone)]
pub struct RunSummaryRecord {
    pub dataset: String,
    pub num_cust: u32,
    pub instance_type: InstanceType,
    pub condition: String,
    pub instance: String,
    pub source_path: PathBuf,
    pub root_lp: MaybeReal,
    pub final_lb: MaybeReal,
    pub ilp_objective: MaybeReal,
    pub ilp_time: MaybeReal,
    pub total_lp_time: Real,
    pub iterations: usize,
    pub total_cuts: Real,
    pub iteration_data: IterationTable,
}

impl RunSummaryRecord {
    pub fn from_extraction(
        dataset: &str,
        info: DatasetInfo,
        condition: &str,
        instance: String,
        source_path: PathBuf,
        extraction: Extraction,
    ) -> Self {
        let Extraction { table, scalars } = extraction;
        Self {
            dataset: dataset.to_string(),
            num_cust: info.num_cust,
            instance_type: info.instance_type,
            condition: condition.to_string(),
            instance,
            source_path,
            root_lp: scalars.root_lp,
            final_lb: scalars.final_lb,
            ilp_objective: scalars.ilp_objective,
            ilp_time: scalars.ilp_time,
            total_lp_time: scalars.total_lp_time,
            iterations: scalars.iterations,
            total_cuts: scalars.total_cuts,
            iteration_data: table,
        }
    }

    pub fn matches(&self, instance: &str, condition: &str) -> bool {
        self.instance == instance && self.condition == condition
    }
}

/// A run entry that was excluded from the catalog.
#[derive(Debug, Clone)]
pub struct SkippedRun {
    pub path: PathBuf,
    pub reason: String,
}

/// Records sharing one (instance, condition) pair. Queries only see the first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    pub instance: String,
    pub condition: String,
    pub indices: Vec<usize>,
}

/// All runs from one corpus load. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<RunSummaryRecord>,
    skipped: Vec<SkippedRun>,
}

impl Catalog {
    pub fn new(records: Vec<RunSummaryRecord>, skipped: Vec<SkippedRun>) -> Self {
        Self { records, skipped }
    }

    pub fn records(&self) -> &[RunSummaryRecord] {
        &self.records
    }

    pub fn skipped(&self) -> &[SkippedRun] {
        &self.skipped
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RunSummaryRecord> {
        self.records.iter()
    }

    /// First record for the pair, in load order.
    pub fn find(&self, instance: &str, condition: &str) -> Option<&RunSummaryRecord> {
        self.records.iter().find(|r| r.matches(instance, condition))
    }

    /// Pairs that appear more than once, ordered by first occurrence.
    pub fn duplicates(&self) -> Vec<DuplicateGroup> {
        let mut by_key: HashMap<(&str, &str), Vec<usize>> = HashMap::new();
        for (i, r) in self.records.iter().enumerate() {
            by_key
                .entry((r.instance.as_str(), r.condition.as_str()))
                .or_default()
                .push(i);
        }

        let mut groups: Vec<DuplicateGroup> = by_key
            .into_iter()
            .filter(|(_, indices)| indices.len() > 1)
            .map(|((instance, condition), indices)| DuplicateGroup {
                instance: instance.to_string(),
                condition: condition.to_string(),
                indices,
            })
            .collect();
        groups.sort_by_key(|g| g.indices[0]);
        groups
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::record;
    use super::*;

    #[test]
    fn find_returns_first_match() {
        let catalog = Catalog::new(
            vec![
                record("C1_numCust_25", "normal", "c101", &[Some(1.0)]),
                record("C1_numCust_50", "normal", "c101", &[Some(2.0)]),
            ],
            Vec::new(),
        );
        let found = catalog.find("c101", "normal").unwrap();
        assert_eq!(found.dataset, "C1_numCust_25");
        assert!(catalog.find("c101", "no_cuts_or_graphs").is_none());
    }

    #[test]
    fn duplicates_are_grouped() {
        let catalog = Catalog::new(
            vec![
                record("C1_numCust_25", "normal", "c101", &[]),
                record("C1_numCust_25", "normal", "c102", &[]),
                record("C1_numCust_50", "normal", "c101", &[]),
                record("C1_numCust_50", "no_cuts_or_graphs", "c101", &[]),
            ],
            Vec::new(),
        );
        assert_eq!(
            catalog.duplicates(),
            vec![DuplicateGroup {
                instance: "c101".to_string(),
                condition: "normal".to_string(),
                indices: vec![0, 2],
            }]
        );
    }
}
