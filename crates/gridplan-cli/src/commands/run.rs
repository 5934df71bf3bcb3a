use super::scenario::load_store;
use anyhow::{bail, Result};
use gridplan_algo::LpSolverKind;
use gridplan_batch::{run_scenario, RunnerConfig};
use std::path::Path;

pub fn handle(config: &Path, scenario_id: u32, scenario_dir: &Path, solver: &str) -> Result<()> {
    let solver = solver.parse::<LpSolverKind>()?;
    let store = load_store(config)?;
    let summary = run_scenario(
        &store,
        &RunnerConfig {
            scenario_id,
            scenario_dir: scenario_dir.to_path_buf(),
            solver,
        },
    )?;
    println!(
        "Scenario {}: {} unit(s) solved, {} failed; manifest at {}",
        scenario_id,
        summary.solved,
        summary.failed,
        summary.manifest_path.display()
    );
    if summary.failed > 0 {
        bail!(
            "{} of {} unit(s) failed",
            summary.failed,
            summary.solved + summary.failed
        );
    }
    Ok(())
}
