//! Per-iteration table types.

use std::fmt;
use std::str::FromStr;

use abl_core::{AblError, MaybeReal, Real};
use serde::{Deserialize, Serialize};

/// One solver iteration. Field names serialize under the solver's column names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IterationRow {
    /// 1-based.
    pub iteration: usize,
    pub lblp_lower: MaybeReal,
    pub ub_lp: MaybeReal,
    pub did_compress: MaybeReal,
    pub lp_time_project: MaybeReal,
    #[serde(rename = "lp_time_LB")]
    pub lp_time_lb: MaybeReal,
    pub time_compress: MaybeReal,
    #[serde(rename = "start_timeGraph")]
    pub start_time_graph: MaybeReal,
    #[serde(rename = "start_ngGraph")]
    pub start_ng_graph: MaybeReal,
    #[serde(rename = "compress_timeGraph")]
    pub compress_time_graph: MaybeReal,
    #[serde(rename = "compress_ngGraph")]
    pub compress_ng_graph: MaybeReal,
    #[serde(rename = "split_timeGraph")]
    pub split_time_graph: MaybeReal,
    #[serde(rename = "split_ngGraph")]
    pub split_ng_graph: MaybeReal,
    pub cut_tot_cut_value: MaybeReal,
    #[serde(rename = "cut_TOT_gen_cut")]
    pub cut_tot_gen_cut: MaybeReal,
    pub cut_tot_time_opt: MaybeReal,
    pub cut_max_time_opt: MaybeReal,
    pub cumulative_time: MaybeReal,
}

/// Named column of an iteration table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Iteration,
    LblpLower,
    UbLp,
    DidCompress,
    LpTimeProject,
    LpTimeLb,
    TimeCompress,
    StartTimeGraph,
    StartNgGraph,
    CompressTimeGraph,
    CompressNgGraph,
    SplitTimeGraph,
    SplitNgGraph,
    CutTotCutValue,
    CutTotGenCut,
    CutTotTimeOpt,
    CutMaxTimeOpt,
    CumulativeTime,
}

impl Column {
    pub const ALL: [Column; 18] = [
        Column::Iteration,
        Column::LblpLower,
        Column::UbLp,
        Column::DidCompress,
        Column::LpTimeProject,
        Column::LpTimeLb,
        Column::TimeCompress,
        Column::StartTimeGraph,
        Column::StartNgGraph,
        Column::CompressTimeGraph,
        Column::CompressNgGraph,
        Column::SplitTimeGraph,
        Column::SplitNgGraph,
        Column::CutTotCutValue,
        Column::CutTotGenCut,
        Column::CutTotTimeOpt,
        Column::CutMaxTimeOpt,
        Column::CumulativeTime,
    ];

    /// Columns shown in the raw-data view, in display order.
    pub const DISPLAY: [Column; 15] = [
        Column::Iteration,
        Column::LblpLower,
        Column::UbLp,
        Column::LpTimeLb,
        Column::LpTimeProject,
        Column::CumulativeTime,
        Column::StartTimeGraph,
        Column::CompressTimeGraph,
        Column::SplitTimeGraph,
        Column::StartNgGraph,
        Column::CompressNgGraph,
        Column::SplitNgGraph,
        Column::CutTotCutValue,
        Column::CutTotGenCut,
        Column::CutTotTimeOpt,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Column::Iteration => "iteration",
            Column::LblpLower => "lblp_lower",
            Column::UbLp => "ub_lp",
            Column::DidCompress => "did_compress",
            Column::LpTimeProject => "lp_time_project",
            Column::LpTimeLb => "lp_time_LB",
            Column::TimeCompress => "time_compress",
            Column::StartTimeGraph => "start_timeGraph",
            Column::StartNgGraph => "start_ngGraph",
            Column::CompressTimeGraph => "compress_timeGraph",
            Column::CompressNgGraph => "compress_ngGraph",
            Column::SplitTimeGraph => "split_timeGraph",
            Column::SplitNgGraph => "split_ngGraph",
            Column::CutTotCutValue => "cut_tot_cut_value",
            Column::CutTotGenCut => "cut_TOT_gen_cut",
            Column::CutTotTimeOpt => "cut_tot_time_opt",
            Column::CutMaxTimeOpt => "cut_max_time_opt",
            Column::CumulativeTime => "cumulative_time",
        }
    }

    pub fn value(self, row: &IterationRow) -> MaybeReal {
        match self {
            Column::Iteration => Some(row.iteration as Real),
            Column::LblpLower => row.lblp_lower,
            Column::UbLp => row.ub_lp,
            Column::DidCompress => row.did_compress,
            Column::LpTimeProject => row.lp_time_project,
            Column::LpTimeLb => row.lp_time_lb,
            Column::TimeCompress => row.time_compress,
            Column::StartTimeGraph => row.start_time_graph,
            Column::StartNgGraph => row.start_ng_graph,
            Column::CompressTimeGraph => row.compress_time_graph,
            Column::CompressNgGraph => row.compress_ng_graph,
            Column::SplitTimeGraph => row.split_time_graph,
            Column::SplitNgGraph => row.split_ng_graph,
            Column::CutTotCutValue => row.cut_tot_cut_value,
            Column::CutTotGenCut => row.cut_tot_gen_cut,
            Column::CutTotTimeOpt => row.cut_tot_time_opt,
            Column::CutMaxTimeOpt => row.cut_max_time_opt,
            Column::CumulativeTime => row.cumulative_time,
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Column {
    type Err = AblError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Column::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| AblError::UnknownColumn {
                name: s.to_string(),
            })
    }
}

/// Per-iteration table of one run. Either empty or one row per lower-bound entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IterationTable {
    rows: Vec<IterationRow>,
}

impl IterationTable {
    pub fn new(rows: Vec<IterationRow>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[IterationRow] {
        &self.rows
    }

    /// All values of one column, in row order.
    pub fn column(&self, column: Column) -> Vec<MaybeReal> {
        self.rows.iter().map(|r| column.value(r)).collect()
    }

    /// Whether the column holds at least one present value.
    pub fn has_values(&self, column: Column) -> bool {
        self.rows.iter().any(|r| column.value(r).is_some())
    }
}

/// Scalar metrics of one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunScalars {
    pub root_lp: MaybeReal,
    pub final_lb: MaybeReal,
    pub ilp_objective: MaybeReal,
    pub ilp_time: MaybeReal,
    pub total_lp_time: Real,
    pub iterations: usize,
    pub total_cuts: Real,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_names_round_trip_through_from_str() {
        for column in Column::ALL {
            assert_eq!(column.name().parse::<Column>().unwrap(), column);
        }
        assert!("lp_time_lb".parse::<Column>().is_err());
    }

    #[test]
    fn row_serializes_with_solver_column_names() {
        let row = IterationRow {
            iteration: 1,
            lp_time_lb: Some(0.5),
            cut_tot_gen_cut: Some(3.0),
            ..Default::default()
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["lp_time_LB"].as_f64(), Some(0.5));
        assert_eq!(json["cut_TOT_gen_cut"].as_f64(), Some(3.0));
        assert!(json["start_timeGraph"].is_null());
    }

    #[test]
    fn iteration_column_is_always_present() {
        let table = IterationTable::new(vec![
            IterationRow {
                iteration: 1,
                ..Default::default()
            },
            IterationRow {
                iteration: 2,
                ..Default::default()
            },
        ]);
        assert_eq!(table.column(Column::Iteration), vec![Some(1.0), Some(2.0)]);
        assert!(!table.has_values(Column::UbLp));
    }
}
