//! Query helpers for extracting data from a loaded catalog.
//!
//! Where several records share an (instance, condition) pair, the first one
//! in load order is authoritative.

use std::collections::BTreeSet;

use abl_core::{MaybeReal, Real, first_present, last_present};
use abl_results::{Column, IterationTable};

use crate::catalog::Catalog;

/// Instances available for a customer count and condition, sorted and deduplicated.
pub fn list_instances(catalog: &Catalog, num_cust: u32, condition: &str) -> Vec<String> {
    catalog
        .iter()
        .filter(|r| r.num_cust == num_cust && r.condition == condition)
        .map(|r| r.instance.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Customer counts present in the catalog, ascending.
pub fn available_customer_counts(catalog: &Catalog) -> Vec<u32> {
    catalog
        .iter()
        .map(|r| r.num_cust)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Conditions present in the catalog, ascending.
pub fn available_conditions(catalog: &Catalog) -> Vec<String> {
    catalog
        .iter()
        .map(|r| r.condition.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Iteration table of the first matching run; `None` if there is none or it is empty.
pub fn get_iteration_data<'a>(
    catalog: &'a Catalog,
    instance: &str,
    condition: &str,
) -> Option<&'a IterationTable> {
    catalog
        .find(instance, condition)
        .map(|r| &r.iteration_data)
        .filter(|t| !t.is_empty())
}

/// Named summary statistic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryField {
    RootLp,
    FinalLb,
    IlpObjective,
    IlpTime,
    TotalLpTime,
    Iterations,
    TotalCuts,
    LbImprovement,
}

impl SummaryField {
    pub fn label(self) -> &'static str {
        match self {
            SummaryField::RootLp => "Root LP",
            SummaryField::FinalLb => "Final LB",
            SummaryField::IlpObjective => "ILP Objective",
            SummaryField::IlpTime => "ILP Time",
            SummaryField::TotalLpTime => "Total LP Time",
            SummaryField::Iterations => "Iterations",
            SummaryField::TotalCuts => "Total Cuts",
            SummaryField::LbImprovement => "LB Improvement",
        }
    }

    /// Display form: objectives to 2 decimals, times to 3 decimals in seconds,
    /// counts as integers.
    pub fn format_value(self, value: Real) -> String {
        match self {
            SummaryField::RootLp
            | SummaryField::FinalLb
            | SummaryField::IlpObjective
            | SummaryField::LbImprovement => format!("{:.2}", value),
            SummaryField::IlpTime | SummaryField::TotalLpTime => format!("{:.3}s", value),
            SummaryField::Iterations | SummaryField::TotalCuts => format!("{}", value.round() as i64),
        }
    }
}

/// Ordered mapping from [`SummaryField`] to value. A missing value is kept as
/// `None`; `LbImprovement` is only inserted when it can be computed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryStats {
    entries: Vec<(SummaryField, MaybeReal)>,
}

impl SummaryStats {
    pub fn get(&self, field: SummaryField) -> Option<MaybeReal> {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| *v)
    }

    pub fn contains(&self, field: SummaryField) -> bool {
        self.entries.iter().any(|(f, _)| *f == field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SummaryField, MaybeReal)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Summary statistics of the first matching run.
pub fn get_summary_stats(catalog: &Catalog, instance: &str, condition: &str) -> Option<SummaryStats> {
    let record = catalog.find(instance, condition)?;

    let mut entries = vec![
        (SummaryField::RootLp, record.root_lp),
        (SummaryField::FinalLb, record.final_lb),
        (SummaryField::IlpObjective, record.ilp_objective),
        (SummaryField::IlpTime, record.ilp_time),
        (SummaryField::TotalLpTime, Some(record.total_lp_time)),
        (SummaryField::Iterations, Some(record.iterations as Real)),
        (SummaryField::TotalCuts, Some(record.total_cuts)),
    ];

    let bounds = record.iteration_data.column(Column::LblpLower);
    if let (Some(first), Some(last)) = (first_present(&bounds), last_present(&bounds)) {
        entries.push((SummaryField::LbImprovement, Some(last - first)));
    }

    Some(SummaryStats { entries })
}

/// `(x, y)` pairs for rows where both columns are present.
pub fn extract_series(table: &IterationTable, x: Column, y: Column) -> Vec<(Real, Real)> {
    table
        .rows()
        .iter()
        .filter_map(|row| Some((x.value(row)?, y.value(row)?)))
        .collect()
}

/// `x` value of the first row that generated cuts.
pub fn cuts_start(table: &IterationTable, x: Column) -> Option<Real> {
    table
        .rows()
        .iter()
        .find(|row| row.cut_tot_gen_cut.is_some_and(|c| c > 0.0))
        .and_then(|row| x.value(row))
}

/// Lower bound by iteration for one condition.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionSeries {
    pub condition: String,
    pub points: Vec<(Real, Real)>,
}

/// Lower-bound convergence of one instance under several conditions.
///
/// Conditions without data for the instance are left out.
pub fn compare_conditions(
    catalog: &Catalog,
    instance: &str,
    conditions: &[String],
) -> Vec<ConditionSeries> {
    conditions
        .iter()
        .filter_map(|condition| {
            let table = get_iteration_data(catalog, instance, condition)?;
            let points = extract_series(table, Column::Iteration, Column::LblpLower);
            if points.is_empty() {
                return None;
            }
            Some(ConditionSeries {
                condition: condition.clone(),
                points,
            })
        })
        .collect()
}
