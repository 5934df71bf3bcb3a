//! Run directory layout: `<scenario_dir>/<subproblem>/<stage>/{inputs,results}`.

use gridplan_core::GridplanResult;
use std::path::{Path, PathBuf};

pub const INPUTS_DIR: &str = "inputs";
pub const RESULTS_DIR: &str = "results";
pub const RUN_MANIFEST: &str = "run_manifest.json";

/// Directory of one (subproblem, stage) unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunDirectory {
    scenario_dir: PathBuf,
    subproblem: u32,
    stage: u32,
}

impl RunDirectory {
    pub fn new(scenario_dir: impl Into<PathBuf>, subproblem: u32, stage: u32) -> Self {
        Self {
            scenario_dir: scenario_dir.into(),
            subproblem,
            stage,
        }
    }

    pub fn subproblem(&self) -> u32 {
        self.subproblem
    }

    pub fn stage(&self) -> u32 {
        self.stage
    }

    pub fn root(&self) -> PathBuf {
        self.scenario_dir
            .join(self.subproblem.to_string())
            .join(self.stage.to_string())
    }

    pub fn inputs_dir(&self) -> PathBuf {
        self.root().join(INPUTS_DIR)
    }

    pub fn results_dir(&self) -> PathBuf {
        self.root().join(RESULTS_DIR)
    }

    pub fn input(&self, file: &str) -> PathBuf {
        self.inputs_dir().join(file)
    }

    pub fn result(&self, file: &str) -> PathBuf {
        self.results_dir().join(file)
    }

    /// Create `results/` if needed and return it.
    pub fn ensure_results_dir(&self) -> GridplanResult<PathBuf> {
        let dir = self.results_dir();
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}

pub fn run_manifest_path(scenario_dir: &Path) -> PathBuf {
    scenario_dir.join(RUN_MANIFEST)
}
