pub mod job;
pub mod manifest;
pub mod runner;

pub use job::{jobs_from_subproblems, UnitJob};
pub use manifest::{load_run_manifest, write_run_manifest, RunManifest, UnitOutcome, UnitRecord};
pub use runner::{run_scenario, RunSummary, RunnerConfig};
