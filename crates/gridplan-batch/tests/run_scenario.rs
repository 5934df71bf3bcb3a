use gridplan_algo::LpSolverKind;
use gridplan_batch::{load_run_manifest, run_scenario, RunnerConfig, UnitOutcome};
use gridplan_core::Period;
use gridplan_io::RunDirectory;
use gridplan_scenarios::load_config_from_path;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const CONFIG: &str = r#"
scenarios:
  - scenario_id: 1
    scenario_name: coal_two_stages
    subscenarios:
      temporal_scenario_id: 1
      project_portfolio_scenario_id: 1
  - scenario_id: 2
    scenario_name: no_portfolio
    subscenarios:
      temporal_scenario_id: 1
temporal:
  - id: 1
    periods: [2020, 2022]
    subproblems:
      - id: 1
        stages:
          - id: 1
            periods: [2020]
          - id: 2
            periods: [2022]
project_portfolios:
  - id: 1
    projects:
      - project: CoalPlant1
        capacity_type: gen_ret_lin
        operational_type: gen_simple
"#;

fn write_unit(run: &RunDirectory, period: u32) {
    let dir = run.inputs_dir();
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("periods.tab"), format!("period\n{}\n", period)).unwrap();
    fs::write(
        dir.join("timepoints.tab"),
        format!("timepoint\tperiod\n1\t{}\n", period),
    )
    .unwrap();
    fs::write(
        dir.join("projects.tab"),
        "project\tcapacity_type\toperational_type\ttechnology\tload_zone\nCoalPlant1\tgen_ret_lin\tgen_simple\tcoal\tZ1\n",
    )
    .unwrap();
    fs::write(
        dir.join("existing_generation_period_params.tab"),
        format!(
            "project\tperiod\texisting_capacity_mw\tfixed_cost_per_mw_yr\nCoalPlant1\t{}\t500\t50\n",
            period
        ),
    )
    .unwrap();
    fs::write(
        dir.join("load_zones.tab"),
        "load_zone\tovergeneration_penalty_per_mw\tunserved_energy_penalty_per_mw\nZ1\t1000\t10000\n",
    )
    .unwrap();
    fs::write(dir.join("load_mw.tab"), "load_zone\ttimepoint\tload_mw\nZ1\t1\t100\n").unwrap();
}

fn write_config(dir: &Path) -> gridplan_scenarios::ConfigStore {
    let path = dir.join("config.yaml");
    fs::write(&path, CONFIG).unwrap();
    load_config_from_path(&path).unwrap()
}

#[test]
fn runs_every_unit_and_records_failures() {
    let dir = tempdir().unwrap();
    let store = write_config(dir.path());
    let scenario_dir = dir.path().join("coal");
    write_unit(&RunDirectory::new(&scenario_dir, 1, 1), 2020);
    // stage 2 has no inputs at all

    let config = RunnerConfig {
        scenario_id: 1,
        scenario_dir: scenario_dir.clone(),
        solver: LpSolverKind::Clarabel,
    };
    let summary = run_scenario(&store, &config).unwrap();
    assert_eq!(summary.solved, 1);
    assert_eq!(summary.failed, 1);

    let manifest = load_run_manifest(&summary.manifest_path).unwrap();
    assert_eq!(manifest.scenario_name, "coal_two_stages");
    assert_eq!(manifest.modules, vec!["gen_ret_lin", "gen_simple"]);
    assert_eq!(manifest.units().count(), 2);
    assert_eq!(manifest.subproblems[&1].len(), 2);

    let first = manifest.unit(1, 1).unwrap();
    assert_eq!(first.periods, vec![Period::new(2020)]);
    // 100 MW kept at 50 $/MW-yr
    match &first.outcome {
        UnitOutcome::Solved { objective, files } => {
            assert!((objective - 5_000.0).abs() < 0.5);
            assert!(*files > 0);
        }
        other => panic!("unit 1/1 did not solve: {:?}", other),
    }

    match &manifest.unit(1, 2).unwrap().outcome {
        UnitOutcome::Failed { error } => assert!(error.contains("periods.tab")),
        other => panic!("unit 1/2 should have failed: {:?}", other),
    }

    assert!(RunDirectory::new(&scenario_dir, 1, 1)
        .result("capacity_all.csv")
        .exists());
}

#[test]
fn configuration_errors_abort_before_any_unit() {
    let dir = tempdir().unwrap();
    let store = write_config(dir.path());
    let scenario_dir = dir.path().join("unbound");

    let config = RunnerConfig {
        scenario_id: 2,
        scenario_dir: scenario_dir.clone(),
        solver: LpSolverKind::Clarabel,
    };
    let err = run_scenario(&store, &config).unwrap_err();
    assert!(format!("{:#}", err).contains("project_portfolio_scenario_id"));
    assert!(!scenario_dir.exists());

    let missing = RunnerConfig {
        scenario_id: 99,
        scenario_dir,
        solver: LpSolverKind::Clarabel,
    };
    let err = run_scenario(&store, &missing).unwrap_err();
    assert!(format!("{:#}", err).contains("scenario '99' not found"));
}
