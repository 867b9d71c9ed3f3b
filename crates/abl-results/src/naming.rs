//! Instance and dataset naming conventions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical instance name for a run file name.
///
/// Rules, first match wins:
/// 1. strip a trailing `.txt` or `.json`
/// 2. `BACK_jy_<x>` -> `<x>_BACK`
/// 3. `<...>_better` -> every `jy_` removed, then `_better` re-appended
/// 4. `jy_<x>` -> `<x>`
/// 5. otherwise the stripped name as-is
pub fn normalize_instance_name(filename: &str) -> String {
    let base = filename
        .strip_suffix(".txt")
        .or_else(|| filename.strip_suffix(".json"))
        .unwrap_or(filename);

    if let Some(rest) = base.strip_prefix("BACK_jy_") {
        return format!("{rest}_BACK");
    }
    if let Some(rest) = base.strip_suffix("_better") {
        return format!("{}_better", rest.replace("jy_", ""));
    }
    if let Some(rest) = base.strip_prefix("jy_") {
        return rest.to_string();
    }
    base.to_string()
}

/// Solomon instance family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum InstanceType {
    C1,
    C2,
    R1,
    R2,
    RC1,
    RC2,
    Unknown,
}

impl InstanceType {
    pub fn as_str(self) -> &'static str {
        match self {
            InstanceType::C1 => "C1",
            InstanceType::C2 => "C2",
            InstanceType::R1 => "R1",
            InstanceType::R2 => "R2",
            InstanceType::RC1 => "RC1",
            InstanceType::RC2 => "RC2",
            InstanceType::Unknown => "Unknown",
        }
    }

    /// Match the family code at the start of a dataset name.
    pub fn from_dataset(dataset: &str) -> Self {
        // RC must be tried before R.
        const PREFIXES: [(&str, InstanceType); 6] = [
            ("RC1", InstanceType::RC1),
            ("RC2", InstanceType::RC2),
            ("C1", InstanceType::C1),
            ("C2", InstanceType::C2),
            ("R1", InstanceType::R1),
            ("R2", InstanceType::R2),
        ];
        PREFIXES
            .into_iter()
            .find(|(prefix, _)| dataset.starts_with(prefix))
            .map_or(InstanceType::Unknown, |(_, kind)| kind)
    }
}

impl fmt::Display for InstanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a dataset directory name says about its instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetInfo {
    pub num_cust: u32,
    pub instance_type: InstanceType,
}

/// Customer count and family from a name like `RC1_numCust_25`.
///
/// The count is matched by substring: "100", then "50", else 25.
pub fn classify_dataset(dataset: &str) -> DatasetInfo {
    let num_cust = if dataset.contains("100") {
        100
    } else if dataset.contains("50") {
        50
    } else {
        25
    };
    DatasetInfo {
        num_cust,
        instance_type: InstanceType::from_dataset(dataset),
    }
}
