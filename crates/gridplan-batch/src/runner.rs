use crate::job::{jobs_from_subproblems, UnitJob};
use crate::manifest::{write_run_manifest, RunManifest, UnitOutcome, UnitRecord};
use anyhow::{Context, Result};
use gridplan_algo::{run_unit, LpSolverKind};
use gridplan_io::run_manifest_path;
use gridplan_scenarios::{
    required_modules, resolve_scenario, subproblems_for, ConfigSource, RequiredModules,
};
use std::fs;
use std::path::PathBuf;
use tracing::{error, info};

pub struct RunnerConfig {
    pub scenario_id: u32,
    pub scenario_dir: PathBuf,
    pub solver: LpSolverKind,
}

/// Counts and manifest location after a scenario run.
#[derive(Debug)]
pub struct RunSummary {
    pub solved: usize,
    pub failed: usize,
    pub manifest_path: PathBuf,
    pub manifest: RunManifest,
}

/// Run every (subproblem, stage) unit of a scenario in order.
///
/// Configuration problems (unknown scenario, unbound subscenario, orphan
/// stage) abort before any unit is built. A unit that fails to load, build or
/// solve is recorded in the manifest and the remaining units still run; units
/// are independent because nothing is forwarded between them.
pub fn run_scenario<S: ConfigSource + ?Sized>(
    source: &S,
    config: &RunnerConfig,
) -> Result<RunSummary> {
    let scenario = resolve_scenario(source, config.scenario_id)
        .with_context(|| format!("resolving scenario {}", config.scenario_id))?;
    scenario
        .validate_required_subscenarios()
        .with_context(|| format!("validating scenario {}", config.scenario_id))?;
    let subproblems = subproblems_for(source, &scenario)
        .with_context(|| format!("enumerating stages of scenario {}", config.scenario_id))?;
    let required = required_modules(source, &scenario)
        .with_context(|| format!("selecting modules for scenario {}", config.scenario_id))?;

    fs::create_dir_all(&config.scenario_dir).with_context(|| {
        format!(
            "creating scenario directory '{}'",
            config.scenario_dir.display()
        )
    })?;

    let jobs = jobs_from_subproblems(&subproblems);
    info!(
        scenario_id = scenario.scenario_id,
        scenario = %scenario.scenario_name,
        units = jobs.len(),
        solver = config.solver.as_str(),
        "starting scenario run"
    );

    let mut manifest = RunManifest::new(
        scenario.scenario_id,
        &scenario.scenario_name,
        config.solver.as_str(),
        required
            .load_order()
            .into_iter()
            .map(String::from)
            .collect(),
    );
    for job in &jobs {
        manifest.record(job, run_job(job, &required, config))?;
    }

    let manifest_path = run_manifest_path(&config.scenario_dir);
    write_run_manifest(&manifest_path, &manifest)?;
    let (solved, failed) = (manifest.solved(), manifest.failed());
    info!(solved, failed, manifest = %manifest_path.display(), "scenario run finished");

    Ok(RunSummary {
        solved,
        failed,
        manifest_path,
        manifest,
    })
}

fn run_job(job: &UnitJob, required: &RequiredModules, config: &RunnerConfig) -> UnitRecord {
    let run = job.run_directory(&config.scenario_dir);
    let outcome = match run_unit(&run, required, config.solver) {
        Ok(outcome) => {
            info!(
                unit = %job,
                objective = outcome.objective,
                files = outcome.files.len(),
                "unit solved"
            );
            UnitOutcome::Solved {
                objective: outcome.objective,
                files: outcome.files.len(),
            }
        }
        Err(err) => {
            error!(unit = %job, "unit failed: {err}");
            UnitOutcome::Failed {
                error: err.to_string(),
            }
        }
    };
    UnitRecord {
        periods: job.periods.clone(),
        results_dir: run.results_dir(),
        outcome,
    }
}
