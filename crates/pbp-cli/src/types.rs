use std::path::PathBuf;

use pbp_model::{BatchReport, GameSummary};

#[derive(Debug)]
pub struct RunResult {
    pub input_dir: PathBuf,
    /// `None` on a dry run.
    pub output_dir: Option<PathBuf>,
    pub report: BatchReport<GameSummary>,
    /// Files that failed to load and whose stem is not a game id.
    pub load_failures: Vec<String>,
}

impl RunResult {
    pub fn has_failures(&self) -> bool {
        !self.report.skipped.is_empty() || !self.load_failures.is_empty()
    }
}
