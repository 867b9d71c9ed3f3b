//! Typed view of one solver run document.
//!
//! The solver writes loosely structured JSON: keys come and go between solver
//! versions and array entries may be `null`. Every field here is optional and
//! construction never fails; anything of the wrong shape reads as absent.

use abl_core::MaybeReal;
use serde_json::{Map, Value};

/// Graph sizes recorded for one iteration at one stage.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StageSizes {
    pub time_graph: MaybeReal,
    pub ng_graph: MaybeReal,
}

/// Cutting-plane statistics for one iteration.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CutInfo {
    pub tot_cut_value: MaybeReal,
    pub tot_gen_cut: MaybeReal,
    pub tot_time_opt: MaybeReal,
    pub max_time_opt: MaybeReal,
}

/// Per-iteration series, `None` when the key is absent or not an array.
pub type Series = Option<Vec<MaybeReal>>;

/// Per-iteration records; an element is `None` when it is not an object.
pub type RecordSeries<T> = Option<Vec<Option<T>>>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRunDocument {
    pub lblp_lower: Series,
    pub ub_lp: Series,
    pub did_compress: Series,
    pub lp_time_project: Series,
    pub lp_time_lb: Series,
    pub time_compress: Series,
    pub prob_sizes_at_start: RecordSeries<StageSizes>,
    pub prob_sizes_after_compress: RecordSeries<StageSizes>,
    pub prob_sizes_after_split: RecordSeries<StageSizes>,
    pub cutting_plane_bend_info: RecordSeries<CutInfo>,
    pub root_lp: MaybeReal,
    pub ilp_objective: MaybeReal,
    pub ilp_time: MaybeReal,
    /// Whether the source object had no keys at all.
    pub empty: bool,
}

impl RawRunDocument {
    pub fn from_object(map: &Map<String, Value>) -> Self {
        Self {
            lblp_lower: series(map, "lblp_lower"),
            ub_lp: series(map, "ub_lp"),
            did_compress: series(map, "did_compress"),
            lp_time_project: series(map, "lp_time_project"),
            lp_time_lb: series(map, "lp_time_LB"),
            time_compress: series(map, "time_compress"),
            prob_sizes_at_start: records(map, "prob_sizes_at_start", stage_sizes),
            prob_sizes_after_compress: records(map, "prob_sizes_after_compress", stage_sizes),
            prob_sizes_after_split: records(map, "prob_sizes_after_split", stage_sizes),
            cutting_plane_bend_info: records(map, "cuttingPlaneBendInfo", cut_info),
            root_lp: map.get("ROOT_LP_PRIOR_ADDING_CUTS").and_then(as_real),
            ilp_objective: map.get("OUR_ilp_objective").and_then(as_real),
            ilp_time: map.get("OUR_ilp_time").and_then(as_real),
            empty: map.is_empty(),
        }
    }

    /// Number of solver iterations, defined by the lower-bound series.
    pub fn iteration_count(&self) -> usize {
        self.lblp_lower.as_ref().map_or(0, Vec::len)
    }
}

/// Numbers as-is, booleans as 1/0, anything else missing.
fn as_real(value: &Value) -> MaybeReal {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

fn series(map: &Map<String, Value>, key: &str) -> Series {
    let items = map.get(key)?.as_array()?;
    Some(items.iter().map(as_real).collect())
}

fn records<T>(
    map: &Map<String, Value>,
    key: &str,
    read: fn(&Map<String, Value>) -> T,
) -> RecordSeries<T> {
    let items = map.get(key)?.as_array()?;
    Some(items.iter().map(|item| item.as_object().map(read)).collect())
}

fn stage_sizes(obj: &Map<String, Value>) -> StageSizes {
    StageSizes {
        time_graph: obj.get("timeGraph").and_then(as_real),
        ng_graph: obj.get("ngGraph").and_then(as_real),
    }
}

fn cut_info(obj: &Map<String, Value>) -> CutInfo {
    CutInfo {
        tot_cut_value: obj.get("tot_cut_value").and_then(as_real),
        tot_gen_cut: obj.get("TOT_gen_cut").and_then(as_real),
        tot_time_opt: obj.get("tot_time_opt").and_then(as_real),
        max_time_opt: obj.get("max_time_opt").and_then(as_real),
    }
}
