mod common;

use common::{coal_plant, point, regulation_pair, var};
use gridplan_algo::{
    run_unit, ContributionContext, GenSpec, LpSolverKind, ModelBuild, ModelModule,
};
use gridplan_core::{
    CapacityType, GridplanError, GridplanResult, LpSolution, OperationalType, Period, ProjectId,
    ReserveProduct,
};
use gridplan_scenarios::RequiredModules;
use std::fs;

fn coal_required() -> RequiredModules {
    RequiredModules {
        capacity_types: [CapacityType::GenRetLin].into_iter().collect(),
        operational_types: [OperationalType::GenSimple].into_iter().collect(),
        reserve_products: Vec::new(),
    }
}

fn regulation_required() -> RequiredModules {
    RequiredModules {
        capacity_types: [CapacityType::GenSpec].into_iter().collect(),
        operational_types: [OperationalType::GenSimple].into_iter().collect(),
        reserve_products: vec![ReserveProduct::RegulationUp],
    }
}

#[test]
fn modules_load_in_type_then_reserve_order() {
    let fx = regulation_pair(false);
    let build = ModelBuild::new(fx.inputs(), &regulation_required());
    assert_eq!(build.module_names(), vec!["gen_spec", "gen_simple", "regulation_up"]);
    assert_eq!(build.module_names(), regulation_required().load_order());
}

#[test]
fn contribution_after_assembly_fails_fast() {
    let fx = coal_plant();
    let mut build = ModelBuild::new(fx.inputs(), &coal_required());
    build.assemble().unwrap();
    assert!(build.is_assembled());

    let err = build.add_module(Box::new(GenSpec::default())).unwrap_err();
    assert!(matches!(err, GridplanError::Registry(_)), "{}", err);
    assert!(matches!(build.contribute_all(), Err(GridplanError::Registry(_))));
    assert!(matches!(build.assemble(), Err(GridplanError::Registry(_))));
}

#[test]
fn unassembled_model_is_never_solved_or_exported() {
    let fx = coal_plant();
    let build = ModelBuild::new(fx.inputs(), &coal_required());
    assert!(matches!(
        build.solve(LpSolverKind::Clarabel),
        Err(GridplanError::Registry(_))
    ));
    let solution = LpSolution {
        values: Vec::new(),
        objective: 0.0,
    };
    assert!(build.export(&solution, &fx.run.results_dir()).is_err());
}

/// Claims the same project as `gen_ret_lin` through a second set.
struct ShadowCapacity;

impl ModelModule for ShadowCapacity {
    fn name(&self) -> &'static str {
        "shadow_capacity"
    }

    fn contribute(&mut self, ctx: &mut ContributionContext<'_>) -> GridplanResult<()> {
        ctx.components.add_operational_period_set(
            "SHADOW_OPR_PRDS",
            vec![(ProjectId::new("CoalPlant1"), Period::new(2020))],
        )
    }
}

#[test]
fn project_in_two_operational_sets_is_rejected() {
    let fx = coal_plant();
    let mut build = ModelBuild::new(fx.inputs(), &coal_required());
    build.add_module(Box::new(ShadowCapacity)).unwrap();
    let err = build.assemble().unwrap_err();
    assert!(matches!(err, GridplanError::Validation(_)), "{}", err);
    assert!(err.to_string().contains("CoalPlant1"));
}

#[test]
fn production_in_unknown_zone_is_rejected() {
    let fx = coal_plant();
    fx.write(
        "load_zones.tab",
        "load_zone\tovergeneration_penalty_per_mw\tunserved_energy_penalty_per_mw\nZ2\t1\t1\n",
    );
    let mut build = ModelBuild::new(fx.inputs(), &coal_required());
    let err = build.assemble().unwrap_err();
    assert!(matches!(err, GridplanError::Validation(_)), "{}", err);
}

#[test]
fn exporting_twice_yields_identical_files() {
    let fx = regulation_pair(false);
    let mut build = ModelBuild::new(fx.inputs(), &regulation_required());
    build.assemble().unwrap();
    let model = build.model();
    let values = point(
        model,
        &[
            ("GenSimple_Provide_Power_MW[A,1]", 50.0),
            ("GenSimple_Provide_Power_MW[B,1]", 60.0),
            ("Provide_Regulation_Up_MW[A,1]", 50.0),
            ("Provide_Regulation_Up_MW[B,1]", 40.0),
        ],
    );
    let solution = LpSolution {
        objective: model.objective_value(&values),
        values,
    };

    let out = tempfile::tempdir().unwrap();
    let first = build.export(&solution, &out.path().join("a")).unwrap();
    let second = build.export(&solution, &out.path().join("b")).unwrap();
    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.file_name(), b.file_name());
        assert_eq!(fs::read_to_string(a).unwrap(), fs::read_to_string(b).unwrap());
    }

    let names: Vec<String> = first
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec![
            "capacity_gen_spec.csv",
            "dispatch_gen_simple.csv",
            "reserves_provision_regulation_up.csv",
            "capacity_all.csv",
            "dispatch_all.csv",
            "load_balance.csv",
            "reserve_balance_regulation_up.csv",
        ]
    );

    let balance = fs::read_to_string(out.path().join("a/reserve_balance_regulation_up.csv")).unwrap();
    assert_eq!(
        balance,
        "balancing_area,timepoint,requirement_mw,provision_mw,violation_mw\nZ,1,80,90,0\n"
    );
    let load = fs::read_to_string(out.path().join("a/load_balance.csv")).unwrap();
    assert!(load.contains("Z1,1,110,110,0,0"));
}

#[test]
fn clarabel_retires_unneeded_coal() {
    // 100 MW of load each period; keeping capacity costs 50 $/MW-yr, so the
    // cheapest plan keeps exactly 100 MW throughout.
    let fx = coal_plant();
    fx.write(
        "load_mw.tab",
        "load_zone\ttimepoint\tload_mw\nZ1\t1\t100\nZ1\t2\t100\nZ1\t3\t100\n",
    );
    let mut build = ModelBuild::new(fx.inputs(), &coal_required());
    build.assemble().unwrap();
    let solution = build.solve(LpSolverKind::Clarabel).unwrap();

    // 3 * 100 MW * 50 fixed + 3 * 100 MWh * 1 variable
    assert!((solution.objective - 15_300.0).abs() < 0.5, "{}", solution.objective);
    for period in [2020, 2022, 2024] {
        let retire = var(build.model(), &format!("GenRetLin_Retire_MW[CoalPlant1,{}]", period));
        assert!((solution.value(retire) - 400.0).abs() < 1e-2);
    }
}

#[test]
fn run_unit_writes_results_next_to_inputs() {
    let fx = regulation_pair(false);
    let outcome = run_unit(&fx.run, &regulation_required(), LpSolverKind::default()).unwrap();
    assert!(outcome.objective.abs() < 1e-1, "{}", outcome.objective);
    assert!(outcome.variables > 0);
    for file in &outcome.files {
        assert!(file.starts_with(fx.run.results_dir()));
        assert!(file.exists());
    }
    let capacity = fs::read_to_string(fx.run.result("capacity_all.csv")).unwrap();
    assert!(capacity.starts_with("project,period,capacity_type,technology,load_zone,capacity_mw\n"));
    assert!(capacity.contains("A,2020,gen_spec,gas,Z1,100\n"));
}
