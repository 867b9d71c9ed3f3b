//! Derive the iteration table and scalar metrics from a run document.

use abl_core::{MaybeReal, ensure_len, last_present, prefix_sum_or_zero, sum_present};

use crate::document::{CutInfo, RawRunDocument, StageSizes};
use crate::types::{Column, IterationRow, IterationTable, RunScalars};

/// Output of [`extract`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub table: IterationTable,
    pub scalars: RunScalars,
}

impl Extraction {
    pub fn has_iterations(&self) -> bool {
        !self.table.is_empty()
    }
}

/// Build the per-iteration table and scalar summary for one run.
///
/// Never fails. The row count is the length of `lblp_lower`; any source
/// series of a different length is dropped whole and its columns read as
/// missing for every row.
pub fn extract(doc: &RawRunDocument) -> Extraction {
    let n = doc.iteration_count();
    let table = if n == 0 {
        IterationTable::default()
    } else {
        build_table(doc, n)
    };

    let lp_lb = doc.lp_time_lb.as_deref().unwrap_or_default();
    let lp_project = doc.lp_time_project.as_deref().unwrap_or_default();
    let total_cuts = if table.is_empty() {
        0.0
    } else {
        sum_present(&table.column(Column::CutTotGenCut))
    };

    let scalars = RunScalars {
        root_lp: doc.root_lp,
        final_lb: doc.lblp_lower.as_deref().and_then(last_present),
        ilp_objective: doc.ilp_objective,
        ilp_time: doc.ilp_time,
        total_lp_time: sum_present(lp_lb) + sum_present(lp_project),
        iterations: n,
        total_cuts,
    };

    Extraction { table, scalars }
}

fn build_table(doc: &RawRunDocument, n: usize) -> IterationTable {
    let lblp_lower = gate("lblp_lower", doc.lblp_lower.as_deref(), n);
    let ub_lp = gate("ub_lp", doc.ub_lp.as_deref(), n);
    let did_compress = gate("did_compress", doc.did_compress.as_deref(), n);
    let lp_time_project = gate("lp_time_project", doc.lp_time_project.as_deref(), n);
    let lp_time_lb = gate("lp_time_LB", doc.lp_time_lb.as_deref(), n);
    let time_compress = gate("time_compress", doc.time_compress.as_deref(), n);

    let start = gate("prob_sizes_at_start", doc.prob_sizes_at_start.as_deref(), n);
    let compress = gate(
        "prob_sizes_after_compress",
        doc.prob_sizes_after_compress.as_deref(),
        n,
    );
    let split = gate(
        "prob_sizes_after_split",
        doc.prob_sizes_after_split.as_deref(),
        n,
    );
    let cuts = gate(
        "cuttingPlaneBendInfo",
        doc.cutting_plane_bend_info.as_deref(),
        n,
    );

    let lblp_lower = pick(lblp_lower, n, |v: &f64| Some(*v));
    let ub_lp = pick(ub_lp, n, |v: &f64| Some(*v));
    let did_compress = pick(did_compress, n, |v: &f64| Some(*v));
    let lp_time_project = pick(lp_time_project, n, |v: &f64| Some(*v));
    let lp_time_lb = pick(lp_time_lb, n, |v: &f64| Some(*v));
    let time_compress = pick(time_compress, n, |v: &f64| Some(*v));

    // Dropped time columns are all-missing placeholders here and add zero.
    let cumulative_time: Vec<MaybeReal> = prefix_sum_or_zero(&lp_time_lb, &lp_time_project)
        .map(|sums| sums.into_iter().map(Some).collect())
        .unwrap_or_else(|_| vec![None; n]);

    let start_time_graph = pick(start, n, |s: &StageSizes| s.time_graph);
    let start_ng_graph = pick(start, n, |s: &StageSizes| s.ng_graph);
    let compress_time_graph = pick(compress, n, |s: &StageSizes| s.time_graph);
    let compress_ng_graph = pick(compress, n, |s: &StageSizes| s.ng_graph);
    let split_time_graph = pick(split, n, |s: &StageSizes| s.time_graph);
    let split_ng_graph = pick(split, n, |s: &StageSizes| s.ng_graph);

    let cut_tot_cut_value = pick(cuts, n, |c: &CutInfo| c.tot_cut_value);
    let cut_tot_gen_cut = pick(cuts, n, |c: &CutInfo| c.tot_gen_cut);
    let cut_tot_time_opt = pick(cuts, n, |c: &CutInfo| c.tot_time_opt);
    let cut_max_time_opt = pick(cuts, n, |c: &CutInfo| c.max_time_opt);

    let rows = (0..n)
        .map(|i| IterationRow {
            iteration: i + 1,
            lblp_lower: lblp_lower[i],
            ub_lp: ub_lp[i],
            did_compress: did_compress[i],
            lp_time_project: lp_time_project[i],
            lp_time_lb: lp_time_lb[i],
            time_compress: time_compress[i],
            start_time_graph: start_time_graph[i],
            start_ng_graph: start_ng_graph[i],
            compress_time_graph: compress_time_graph[i],
            compress_ng_graph: compress_ng_graph[i],
            split_time_graph: split_time_graph[i],
            split_ng_graph: split_ng_graph[i],
            cut_tot_cut_value: cut_tot_cut_value[i],
            cut_tot_gen_cut: cut_tot_gen_cut[i],
            cut_tot_time_opt: cut_tot_time_opt[i],
            cut_max_time_opt: cut_max_time_opt[i],
            cumulative_time: cumulative_time[i],
        })
        .collect();

    IterationTable::new(rows)
}

/// Keep a source series only if it has exactly `n` entries.
fn gate<'a, T>(what: &'static str, series: Option<&'a [T]>, n: usize) -> Option<&'a [T]> {
    let series = series?;
    match ensure_len(what, series.len(), n) {
        Ok(()) => Some(series),
        Err(err) => {
            tracing::debug!(%err, "dropping column");
            None
        }
    }
}

/// One output column from a gated series; all-missing when the series was dropped.
fn pick<T>(series: Option<&[Option<T>]>, n: usize, read: impl Fn(&T) -> MaybeReal) -> Vec<MaybeReal> {
    match series {
        Some(items) => items
            .iter()
            .map(|item| item.as_ref().and_then(&read))
            .collect(),
        None => vec![None; n],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sanitize::parse_run_document;

    fn extract_json(text: &str) -> Extraction {
        extract(&parse_run_document(text).unwrap())
    }

    #[test]
    fn missing_lower_bound_gives_empty_table() {
        let out = extract_json(r#"{"ub_lp": [1, 2], "OUR_ilp_objective": 827.3}"#);
        assert!(!out.has_iterations());
        assert_eq!(out.scalars.iterations, 0);
        assert_eq!(out.scalars.final_lb, None);
        assert_eq!(out.scalars.ilp_objective, Some(827.3));
        assert_eq!(out.scalars.total_cuts, 0.0);
    }

    #[test]
    fn empty_lower_bound_gives_empty_table() {
        let out = extract_json(r#"{"lblp_lower": []}"#);
        assert!(out.table.is_empty());
        assert_eq!(out.scalars.final_lb, None);
    }

    #[test]
    fn length_mismatch_drops_whole_column() {
        let out = extract_json(r#"{"lblp_lower": [1, 2, 3], "ub_lp": [5, 6]}"#);
        assert_eq!(out.table.len(), 3);
        assert_eq!(out.table.column(Column::UbLp), vec![None, None, None]);
        assert_eq!(
            out.table.column(Column::LblpLower),
            vec![Some(1.0), Some(2.0), Some(3.0)]
        );
        assert_eq!(
            out.table.column(Column::Iteration),
            vec![Some(1.0), Some(2.0), Some(3.0)]
        );
    }

    #[test]
    fn cumulative_time_sums_both_lp_times() {
        let out = extract_json(
            r#"{"lblp_lower": [10, 11], "lp_time_LB": [1.0, 2.0], "lp_time_project": [0.5, null]}"#,
        );
        assert_eq!(
            out.table.column(Column::CumulativeTime),
            vec![Some(1.5), Some(3.5)]
        );
        assert_eq!(out.scalars.total_lp_time, 3.5);
    }

    #[test]
    fn cumulative_time_uses_placeholders_for_absent_time_column() {
        let out = extract_json(r#"{"lblp_lower": [1, 2, 3], "lp_time_LB": [1.0, 2.0, 3.0]}"#);
        assert_eq!(out.table.column(Column::LpTimeProject), vec![None, None, None]);
        assert_eq!(
            out.table.column(Column::CumulativeTime),
            vec![Some(1.0), Some(3.0), Some(6.0)]
        );
        // The raw total still counts what is there.
        assert_eq!(out.scalars.total_lp_time, 6.0);
    }

    #[test]
    fn cumulative_time_uses_placeholders_for_mismatched_time_column() {
        let out = extract_json(
            r#"{"lblp_lower": [1, 2, 3], "lp_time_LB": [1.0, 2.0, 3.0], "lp_time_project": [1.0, 2.0]}"#,
        );
        assert_eq!(
            out.table.column(Column::CumulativeTime),
            vec![Some(1.0), Some(3.0), Some(6.0)]
        );
    }

    #[test]
    fn cumulative_time_is_zero_when_no_times_are_recorded() {
        let out = extract_json(r#"{"lblp_lower": [1, 2]}"#);
        assert_eq!(
            out.table.column(Column::CumulativeTime),
            vec![Some(0.0), Some(0.0)]
        );
    }

    #[test]
    fn total_lp_time_uses_raw_arrays_regardless_of_length() {
        let out = extract_json(
            r#"{"lblp_lower": [1], "lp_time_LB": [1.0, 2.0], "lp_time_project": [4.0]}"#,
        );
        assert_eq!(out.scalars.total_lp_time, 7.0);
        assert_eq!(out.table.column(Column::LpTimeLb), vec![None]);
    }

    #[test]
    fn final_lb_is_last_entry() {
        let out = extract_json(r#"{"lblp_lower": [10.0, 12.0, 15.0]}"#);
        assert_eq!(out.scalars.final_lb, Some(15.0));
        assert_eq!(out.scalars.iterations, 3);
    }

    #[test]
    fn stage_sizes_and_cut_stats_are_spread_into_columns() {
        let out = extract_json(
            r#"{
                "lblp_lower": [1, 2],
                "prob_sizes_at_start": [{"timeGraph": 100, "ngGraph": 40}, "bad"],
                "prob_sizes_after_compress": [{"timeGraph": 80}],
                "cuttingPlaneBendInfo": [
                    {"tot_cut_value": 0.5, "TOT_gen_cut": 3, "tot_time_opt": 0.1, "max_time_opt": 0.05},
                    {"TOT_gen_cut": NaN}
                ]
            }"#,
        );
        let t = &out.table;
        assert_eq!(t.column(Column::StartTimeGraph), vec![Some(100.0), None]);
        assert_eq!(t.column(Column::StartNgGraph), vec![Some(40.0), None]);
        assert_eq!(t.column(Column::CompressTimeGraph), vec![None, None]);
        assert_eq!(t.column(Column::SplitNgGraph), vec![None, None]);
        assert_eq!(t.column(Column::CutTotGenCut), vec![Some(3.0), None]);
        assert_eq!(t.column(Column::CutMaxTimeOpt), vec![Some(0.05), None]);
        assert_eq!(out.scalars.total_cuts, 3.0);
    }
}
