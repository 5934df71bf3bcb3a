#![allow(dead_code)]

use gridplan_core::{LpModel, VarId};
use gridplan_io::{RunDirectory, RunInputs};
use std::fs;
use tempfile::TempDir;

/// Scenario directory with one (1, 1) run unit.
pub struct Fixture {
    _dir: TempDir,
    pub run: RunDirectory,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let run = RunDirectory::new(dir.path(), 1, 1);
        fs::create_dir_all(run.inputs_dir()).unwrap();
        Self { _dir: dir, run }
    }

    pub fn write(&self, file: &str, contents: &str) -> &Self {
        fs::write(self.run.input(file), contents).unwrap();
        self
    }

    pub fn inputs(&self) -> RunInputs {
        RunInputs::load(&self.run).unwrap()
    }
}

/// CoalPlant1: 500 MW of `gen_ret_lin` at 50 $/MW-yr in 2020, 2022 and 2024,
/// one one-hour timepoint per period, no load.
pub fn coal_plant() -> Fixture {
    let fx = Fixture::new();
    fx.write(
        "periods.tab",
        "period\tdiscount_factor\tnumber_years_represented\n2020\t1\t1\n2022\t1\t1\n2024\t1\t1\n",
    )
    .write(
        "timepoints.tab",
        "timepoint\tperiod\tnumber_of_hours_in_timepoint\n1\t2020\t1\n2\t2022\t1\n3\t2024\t1\n",
    )
    .write(
        "projects.tab",
        "project\tcapacity_type\toperational_type\ttechnology\tload_zone\tvariable_om_cost_per_mwh\n\
         CoalPlant1\tgen_ret_lin\tgen_simple\tcoal\tZ1\t1\n",
    )
    .write(
        "existing_generation_period_params.tab",
        "project\tperiod\texisting_capacity_mw\tfixed_cost_per_mw_yr\n\
         CoalPlant1\t2020\t500\t50\n\
         CoalPlant1\t2022\t500\t50\n\
         CoalPlant1\t2024\t500\t50\n",
    )
    .write(
        "load_zones.tab",
        "load_zone\tovergeneration_penalty_per_mw\tunserved_energy_penalty_per_mw\nZ1\t1000\t10000\n",
    )
    .write("load_mw.tab", "load_zone\ttimepoint\tload_mw\n");
    fx
}

/// Two `gen_simple` units A and B (100 MW each, 2020) in zone Z1, both
/// providing regulation up in balancing area Z with an 80 MW requirement.
pub fn regulation_pair(allow_violation: bool) -> Fixture {
    let fx = Fixture::new();
    fx.write("periods.tab", "period\n2020\n")
        .write("timepoints.tab", "timepoint\tperiod\n1\t2020\n")
        .write(
            "projects.tab",
            "project\tcapacity_type\toperational_type\ttechnology\tload_zone\tregulation_up_ba\tregulation_up_derate\n\
             A\tgen_spec\tgen_simple\tgas\tZ1\tZ\t1\n\
             B\tgen_spec\tgen_simple\tgas\tZ1\tZ\t.\n",
        )
        .write(
            "existing_generation_period_params.tab",
            "project\tperiod\texisting_capacity_mw\tfixed_cost_per_mw_yr\nA\t2020\t100\t0\nB\t2020\t100\t0\n",
        )
        .write(
            "load_zones.tab",
            "load_zone\tovergeneration_penalty_per_mw\tunserved_energy_penalty_per_mw\nZ1\t1000\t10000\n",
        )
        .write("load_mw.tab", "load_zone\ttimepoint\tload_mw\nZ1\t1\t110\n")
        .write(
            "regulation_up_requirement.tab",
            "ba\ttimepoint\trequirement_mw\nZ\t1\t80\n",
        )
        .write(
            "regulation_up_balancing_areas.tab",
            &format!(
                "balancing_area\tallow_violation\tviolation_penalty_per_mw\nZ\t{}\t500\n",
                u8::from(allow_violation)
            ),
        );
    fx
}

/// One 100 MW unit A (2020) in zone Z1 with a 40% minimum stable level,
/// providing regulation down in balancing area Z against a 30 MW requirement.
/// `operational_type` is the `projects.tab` tag of A.
pub fn regulation_down_unit(operational_type: &str) -> Fixture {
    let fx = Fixture::new();
    fx.write("periods.tab", "period\n2020\n")
        .write("timepoints.tab", "timepoint\tperiod\n1\t2020\n")
        .write(
            "projects.tab",
            &format!(
                "project\tcapacity_type\toperational_type\tload_zone\tmin_stable_level_fraction\tregulation_down_ba\tregulation_down_derate\n\
                 A\tgen_spec\t{}\tZ1\t0.4\tZ\t1\n",
                operational_type
            ),
        )
        .write(
            "existing_generation_period_params.tab",
            "project\tperiod\texisting_capacity_mw\tfixed_cost_per_mw_yr\nA\t2020\t100\t0\n",
        )
        .write(
            "load_zones.tab",
            "load_zone\tovergeneration_penalty_per_mw\tunserved_energy_penalty_per_mw\nZ1\t1000\t10000\n",
        )
        .write("load_mw.tab", "load_zone\ttimepoint\tload_mw\nZ1\t1\t100\n")
        .write(
            "regulation_down_requirement.tab",
            "ba\ttimepoint\trequirement_mw\nZ\t1\t30\n",
        )
        .write(
            "regulation_down_balancing_areas.tab",
            "balancing_area\tallow_violation\tviolation_penalty_per_mw\nZ\t0\t0\n",
        );
    fx
}

/// Look up a variable by name, failing the test if it is absent.
pub fn var(model: &LpModel, name: &str) -> VarId {
    model
        .find_variable(name)
        .unwrap_or_else(|| panic!("variable {} not in model", name))
}

/// A point with every variable at zero and the given overrides.
pub fn point(model: &LpModel, overrides: &[(&str, f64)]) -> Vec<f64> {
    let mut values = vec![0.0; model.num_variables()];
    for (name, value) in overrides {
        values[var(model, name).index()] = *value;
    }
    values
}
