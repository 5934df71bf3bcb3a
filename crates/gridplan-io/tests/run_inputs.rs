use gridplan_core::{CapacityType, OperationalType, Period, ProjectId, ReserveProduct, Timepoint};
use gridplan_io::{RunDirectory, RunInputs};
use std::fs;
use tempfile::tempdir;

fn write_inputs(run: &RunDirectory, projects: &str) {
    let dir = run.inputs_dir();
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("periods.tab"), "period\tdiscount_factor\tnumber_years_represented\n2020\t1\t2\n2022\t1\t2\n").unwrap();
    fs::write(
        dir.join("timepoints.tab"),
        "timepoint\tperiod\tnumber_of_hours_in_timepoint\n1\t2020\t1\n2\t2022\t1\n",
    )
    .unwrap();
    fs::write(dir.join("projects.tab"), projects).unwrap();
    fs::write(
        dir.join("existing_generation_period_params.tab"),
        "project\tperiod\texisting_capacity_mw\tfixed_cost_per_mw_yr\nA\t2020\t100\t5\nA\t2022\t100\t5\nB\t2022\t60\t3\n",
    )
    .unwrap();
    fs::write(
        dir.join("load_zones.tab"),
        "load_zone\tovergeneration_penalty_per_mw\tunserved_energy_penalty_per_mw\nZ1\t99\t999\n",
    )
    .unwrap();
    fs::write(dir.join("load_mw.tab"), "load_zone\ttimepoint\tload_mw\nZ1\t1\t40\n").unwrap();
}

const PROJECTS: &str = "project\tcapacity_type\toperational_type\ttechnology\tload_zone\tregulation_up_ba\tregulation_up_derate\n\
A\tgen_ret_lin\tgen_simple\tcoal\tZ1\tZ\t0.5\n\
B\tgen_spec\tgen_must_run\tnuclear\tZ1\t.\t.\n";

#[test]
fn loads_base_tables() {
    let dir = tempdir().unwrap();
    let run = RunDirectory::new(dir.path(), 1, 1);
    write_inputs(&run, PROJECTS);

    let inputs = RunInputs::load(&run).unwrap();
    assert_eq!(inputs.temporal().first_period(), Some(Period::new(2020)));
    assert_eq!(inputs.projects().count(), 2);
    let a = inputs.project(&ProjectId::new("A")).unwrap();
    assert_eq!(a.capacity_type, CapacityType::GenRetLin);
    assert_eq!(a.operational_type, OperationalType::GenSimple);
    assert_eq!(inputs.period_params_for(CapacityType::GenRetLin).count(), 2);
    assert_eq!(inputs.period_params_for(CapacityType::GenSpec).count(), 1);
    assert!(!inputs.is_operational(&ProjectId::new("B"), Period::new(2020)));
    assert_eq!(inputs.load_mw(&"Z1".into(), Timepoint::new(1)), 40.0);
    assert_eq!(inputs.load_mw(&"Z1".into(), Timepoint::new(2)), 0.0);
}

#[test]
fn operational_timepoints_follow_period_params() {
    let dir = tempdir().unwrap();
    let run = RunDirectory::new(dir.path(), 1, 1);
    write_inputs(&run, PROJECTS);
    let inputs = RunInputs::load(&run).unwrap();

    let must_run = inputs.operational_timepoints(OperationalType::GenMustRun);
    assert_eq!(must_run.len(), 1);
    assert_eq!(must_run[0].1.timepoint, Timepoint::new(2));
}

#[test]
fn reserve_columns_are_read_per_product() {
    let dir = tempdir().unwrap();
    let run = RunDirectory::new(dir.path(), 1, 1);
    write_inputs(&run, PROJECTS);
    let inputs = RunInputs::load(&run).unwrap();

    let eligible = inputs.reserve_eligibility(ReserveProduct::RegulationUp).unwrap();
    assert_eq!(eligible.len(), 1);
    assert_eq!(eligible[&ProjectId::new("A")].derate, 0.5);
    assert_eq!(eligible[&ProjectId::new("A")].balancing_area.as_str(), "Z");

    // no column at all for another product
    assert!(inputs
        .reserve_eligibility(ReserveProduct::SpinningReserves)
        .unwrap()
        .is_empty());
}

#[test]
fn unknown_capacity_type_names_projects_file() {
    let dir = tempdir().unwrap();
    let run = RunDirectory::new(dir.path(), 1, 1);
    write_inputs(
        &run,
        "project\tcapacity_type\toperational_type\tload_zone\nA\tgen_new_lin\tgen_simple\tZ1\n",
    );
    let err = RunInputs::load(&run).unwrap_err().to_string();
    assert!(err.contains("projects.tab"));
    assert!(err.contains("gen_new_lin"));
}

#[test]
fn missing_requirement_file_fails_only_when_requested() {
    let dir = tempdir().unwrap();
    let run = RunDirectory::new(dir.path(), 1, 1);
    write_inputs(&run, PROJECTS);
    let inputs = RunInputs::load(&run).unwrap();

    let err = inputs
        .reserve_requirements(ReserveProduct::RegulationUp)
        .unwrap_err()
        .to_string();
    assert!(err.contains("regulation_up_requirement.tab"));
}

#[test]
fn duplicate_period_row_is_rejected() {
    let dir = tempdir().unwrap();
    let run = RunDirectory::new(dir.path(), 1, 1);
    write_inputs(&run, PROJECTS);
    fs::write(
        run.input("existing_generation_period_params.tab"),
        "project\tperiod\texisting_capacity_mw\tfixed_cost_per_mw_yr\nA\t2020\t100\t5\nA\t2020\t90\t5\n",
    )
    .unwrap();
    let err = RunInputs::load(&run).unwrap_err().to_string();
    assert!(err.contains("existing_generation_period_params.tab"));
    assert!(err.contains("more than one row for period 2020"));
}

#[test]
fn operational_lookup_covers_large_portfolios() {
    let dir = tempdir().unwrap();
    let run = RunDirectory::new(dir.path(), 1, 1);
    write_inputs(&run, PROJECTS);

    let projects = 400;
    let timepoints = 500;
    let mut project_rows = String::from("project\tcapacity_type\toperational_type\tload_zone\n");
    let mut param_rows =
        String::from("project\tperiod\texisting_capacity_mw\tfixed_cost_per_mw_yr\n");
    for i in 0..projects {
        project_rows.push_str(&format!("P{i}\tgen_spec\tgen_simple\tZ1\n"));
        // odd projects only start in 2022
        if i % 2 == 0 {
            param_rows.push_str(&format!("P{i}\t2020\t10\t1\n"));
        }
        param_rows.push_str(&format!("P{i}\t2022\t10\t1\n"));
    }
    let mut timepoint_rows = String::from("timepoint\tperiod\n");
    for t in 1..=timepoints {
        let period = if t <= timepoints / 2 { 2020 } else { 2022 };
        timepoint_rows.push_str(&format!("{t}\t{period}\n"));
    }
    fs::write(run.input("projects.tab"), project_rows).unwrap();
    fs::write(run.input("existing_generation_period_params.tab"), param_rows).unwrap();
    fs::write(run.input("timepoints.tab"), timepoint_rows).unwrap();

    let inputs = RunInputs::load(&run).unwrap();
    assert!(inputs.is_operational(&ProjectId::new("P0"), Period::new(2020)));
    assert!(!inputs.is_operational(&ProjectId::new("P1"), Period::new(2020)));
    assert!(inputs.is_operational(&ProjectId::new("P1"), Period::new(2022)));

    let pairs = inputs.operational_timepoints(OperationalType::GenSimple);
    let half = (timepoints / 2) as usize;
    assert_eq!(pairs.len(), projects / 2 * timepoints as usize + projects / 2 * half);
}
