#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStage {
    CheckingRoot,
    ScanningCondition,
    Completed,
}

impl LoadStage {
    pub fn label(&self) -> &'static str {
        match self {
            LoadStage::CheckingRoot => "checking root",
            LoadStage::ScanningCondition => "scanning condition",
            LoadStage::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadProgressEvent {
    pub stage: LoadStage,
    pub elapsed_wall_s: f64,
    pub dataset: Option<String>,
    pub condition: Option<String>,
    pub records_loaded: usize,
    pub runs_skipped: usize,
}

impl LoadProgressEvent {
    pub fn stage(stage: LoadStage, elapsed_wall_s: f64) -> Self {
        Self {
            stage,
            elapsed_wall_s,
            dataset: None,
            condition: None,
            records_loaded: 0,
            runs_skipped: 0,
        }
    }
}
