mod common;

use common::{coal_plant, point, var, Fixture};
use gridplan_algo::capacity::GEN_RET_LIN_OPR_PRDS;
use gridplan_algo::{GenRetLin, ModelBuild, PROJECT_OPERATIONAL_PERIODS};
use gridplan_core::{CapacityType, OperationalType, Period, ProjectId};
use gridplan_scenarios::RequiredModules;

const RETIRE_FOREVER: &str = "GenRetLin_Retire_Forever_Constraint";

fn coal_required() -> RequiredModules {
    RequiredModules {
        capacity_types: [CapacityType::GenRetLin].into_iter().collect(),
        operational_types: [OperationalType::GenSimple].into_iter().collect(),
        reserve_products: Vec::new(),
    }
}

fn assembled(fx: &Fixture) -> ModelBuild {
    let mut build = ModelBuild::new(fx.inputs(), &coal_required());
    build.assemble().unwrap();
    build
}

#[test]
fn retire_variables_are_bounded_by_existing_capacity() {
    let fx = coal_plant();
    let build = assembled(&fx);
    let model = build.model();
    for period in [2020, 2022, 2024] {
        let v = var(model, &format!("GenRetLin_Retire_MW[CoalPlant1,{}]", period));
        let def = model.variable(v).unwrap();
        assert_eq!(def.lower, 0.0);
        assert_eq!(def.upper, Some(500.0));
    }
}

#[test]
fn irreversibility_skips_first_period() {
    let fx = coal_plant();
    let build = assembled(&fx);
    let names: Vec<&str> = build
        .model()
        .constraint_family(RETIRE_FOREVER)
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(
        names,
        vec![
            "GenRetLin_Retire_Forever_Constraint[CoalPlant1,2022]",
            "GenRetLin_Retire_Forever_Constraint[CoalPlant1,2024]",
        ]
    );
}

#[test]
fn un_retiring_capacity_violates_irreversibility() {
    let fx = coal_plant();
    let build = assembled(&fx);
    let model = build.model();

    let unretire = point(
        model,
        &[
            ("GenRetLin_Retire_MW[CoalPlant1,2022]", 300.0),
            ("GenRetLin_Retire_MW[CoalPlant1,2024]", 200.0),
        ],
    );
    let violations = model.violations(&unretire);
    assert_eq!(violations.len(), 1, "{:?}", violations);
    assert!(violations[0].starts_with("GenRetLin_Retire_Forever_Constraint[CoalPlant1,2024]"));

    let stay_retired = point(
        model,
        &[
            ("GenRetLin_Retire_MW[CoalPlant1,2022]", 300.0),
            ("GenRetLin_Retire_MW[CoalPlant1,2024]", 300.0),
        ],
    );
    assert!(model.violations(&stay_retired).is_empty());
}

#[test]
fn fixed_cost_counts_only_net_capacity() {
    let fx = coal_plant();
    let build = assembled(&fx);
    let model = build.model();

    let keep_all = point(model, &[]);
    assert!((model.objective_value(&keep_all) - 75_000.0).abs() < 1e-9);

    // 25000 in 2020, then 200 MW * 50 in 2022 and 2024
    let retire_300 = point(
        model,
        &[
            ("GenRetLin_Retire_MW[CoalPlant1,2022]", 300.0),
            ("GenRetLin_Retire_MW[CoalPlant1,2024]", 300.0),
        ],
    );
    assert!((model.objective_value(&retire_300) - 45_000.0).abs() < 1e-9);
}

#[test]
fn single_period_project_has_no_irreversibility_constraints() {
    let fx = coal_plant();
    fx.write(
        "existing_generation_period_params.tab",
        "project\tperiod\texisting_capacity_mw\tfixed_cost_per_mw_yr\nCoalPlant1\t2022\t500\t50\n",
    );
    let build = assembled(&fx);
    assert_eq!(build.model().constraint_family(RETIRE_FOREVER).count(), 0);
}

#[test]
fn late_start_project_is_exempt_in_its_first_period() {
    let fx = coal_plant();
    fx.write(
        "existing_generation_period_params.tab",
        "project\tperiod\texisting_capacity_mw\tfixed_cost_per_mw_yr\n\
         CoalPlant1\t2022\t500\t50\n\
         CoalPlant1\t2024\t500\t50\n",
    );
    let build = assembled(&fx);
    let names: Vec<&str> = build
        .model()
        .constraint_family(RETIRE_FOREVER)
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(names, vec!["GenRetLin_Retire_Forever_Constraint[CoalPlant1,2024]"]);
}

#[test]
fn operational_periods_are_joined_in_contribution_order() {
    let fx = coal_plant();
    let build = assembled(&fx);
    let model = build.model();
    assert_eq!(
        model.project_period_set(PROJECT_OPERATIONAL_PERIODS),
        model.project_period_set(GEN_RET_LIN_OPR_PRDS)
    );
    let joined = model.project_period_set(PROJECT_OPERATIONAL_PERIODS).unwrap();
    assert_eq!(joined.len(), 3);
    assert_eq!(joined[0], (ProjectId::new("CoalPlant1"), Period::new(2020)));
}

#[test]
fn periods_outside_the_stage_are_ignored() {
    let fx = coal_plant();
    fx.write(
        "existing_generation_period_params.tab",
        "project\tperiod\texisting_capacity_mw\tfixed_cost_per_mw_yr\n\
         CoalPlant1\t2020\t500\t50\n\
         CoalPlant1\t2030\t500\t50\n",
    );
    let mut build = ModelBuild::empty(fx.inputs());
    build.add_module(Box::new(GenRetLin::default())).unwrap();
    build.assemble().unwrap();
    assert!(build
        .model()
        .find_variable("GenRetLin_Retire_MW[CoalPlant1,2030]")
        .is_none());
    assert!(build
        .model()
        .find_variable("GenRetLin_Retire_MW[CoalPlant1,2020]")
        .is_some());
}

#[test]
fn named_sets_reach_the_model_only_at_assembly() {
    let fx = coal_plant();
    let mut build = ModelBuild::new(fx.inputs(), &coal_required());
    build.contribute_all().unwrap();
    assert!(build.model().project_period_set(GEN_RET_LIN_OPR_PRDS).is_none());

    build.assemble().unwrap();
    assert_eq!(
        build.model().project_period_set(GEN_RET_LIN_OPR_PRDS).map(<[_]>::len),
        Some(3)
    );
}

#[test]
fn gap_in_eligibility_bounds_by_the_last_eligible_period() {
    let fx = coal_plant();
    fx.write(
        "existing_generation_period_params.tab",
        "project\tperiod\texisting_capacity_mw\tfixed_cost_per_mw_yr\n\
         CoalPlant1\t2020\t500\t50\n\
         CoalPlant1\t2024\t400\t50\n",
    );
    let build = assembled(&fx);
    let model = build.model();
    let names: Vec<&str> = model
        .constraint_family(RETIRE_FOREVER)
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(names, vec!["GenRetLin_Retire_Forever_Constraint[CoalPlant1,2024]"]);

    // 400 - 0 <= 500 - 150 fails; 400 - 50 <= 500 - 150 holds
    let regrown = point(model, &[("GenRetLin_Retire_MW[CoalPlant1,2020]", 150.0)]);
    assert_eq!(model.violations(&regrown).len(), 1);
    let retired = point(
        model,
        &[
            ("GenRetLin_Retire_MW[CoalPlant1,2020]", 150.0),
            ("GenRetLin_Retire_MW[CoalPlant1,2024]", 50.0),
        ],
    );
    assert!(model.violations(&retired).is_empty(), "{:?}", model.violations(&retired));
}
