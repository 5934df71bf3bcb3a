//! Model assembly: turns the frozen registry into cross-cutting constraints.
//!
//! Runs once per build, after every module has contributed:
//!
//! 1. attaches each operational-period set to the model and joins them into
//!    `PROJECT_OPERATIONAL_PERIODS`
//! 2. bounds power and reserve provision by each project's capacity
//! 3. balances load in every (zone, timepoint)
//! 4. meets each reserve product's requirement per (balancing area, timepoint)
//! 5. sums cost components and penalties into the objective

use gridplan_core::{
    BalancingArea, ConstraintDef, FrozenComponents, GridplanError, GridplanResult, LinearExpr,
    LoadZone, LpModel, Period, ProjectId, ReserveDirection, ReserveProduct, RoomTarget, Timepoint,
    VarId,
};
use gridplan_io::RunInputs;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

pub const PROJECT_OPERATIONAL_PERIODS: &str = "PROJECT_OPERATIONAL_PERIODS";
pub const MAX_POWER_CONSTRAINT: &str = "Max_Power_Constraint";
pub const MIN_POWER_CONSTRAINT: &str = "Min_Power_Constraint";
pub const MEET_LOAD_CONSTRAINT: &str = "Meet_Load_Constraint";

#[derive(Debug, Clone)]
pub struct CapacityEntry {
    pub project: ProjectId,
    pub period: Period,
    pub capacity: LinearExpr,
}

#[derive(Debug, Clone)]
pub struct DispatchEntry {
    pub project: ProjectId,
    pub timepoint: Timepoint,
    pub period: Period,
    pub load_zone: LoadZone,
    pub power: VarId,
}

#[derive(Debug, Clone)]
pub struct LoadBalanceEntry {
    pub zone: LoadZone,
    pub timepoint: Timepoint,
    pub load_mw: f64,
    pub production: Vec<VarId>,
    pub unserved: VarId,
    pub overgeneration: VarId,
}

#[derive(Debug, Clone)]
pub struct ReserveBalanceEntry {
    pub area: BalancingArea,
    pub timepoint: Timepoint,
    pub requirement_mw: f64,
    pub provision: Vec<VarId>,
    pub violation: Option<VarId>,
}

/// What assembly produced, kept for export.
#[derive(Debug, Clone, Default)]
pub struct Assembly {
    /// Capacity per operational (project, period), in union order
    pub capacity: Vec<CapacityEntry>,
    pub dispatch: Vec<DispatchEntry>,
    pub load_balance: Vec<LoadBalanceEntry>,
    pub reserve_balance: BTreeMap<ReserveProduct, Vec<ReserveBalanceEntry>>,
}

pub fn assemble(
    model: &mut LpModel,
    components: &FrozenComponents,
    inputs: &RunInputs,
) -> GridplanResult<Assembly> {
    let mut assembly = Assembly::default();
    let mut objective = LinearExpr::new();

    join_operational_periods(model, components, &mut assembly)?;
    add_capacity_envelopes(model, components, &mut assembly)?;
    add_load_balance(model, components, inputs, &mut assembly, &mut objective)?;
    add_reserve_balance(model, components, inputs, &mut assembly, &mut objective)?;

    for component in components.cost_components() {
        objective += &component.expr;
    }
    model.add_to_objective(&objective);

    info!(
        modules = components.contributors().len(),
        variables = model.num_variables(),
        constraints = model.constraints().len(),
        "model assembled"
    );
    Ok(assembly)
}

fn join_operational_periods(
    model: &mut LpModel,
    components: &FrozenComponents,
    assembly: &mut Assembly,
) -> GridplanResult<()> {
    let mut set_names: Vec<&str> = Vec::new();
    let mut owner: BTreeMap<&ProjectId, &str> = BTreeMap::new();
    for (name, members) in components.operational_period_sets() {
        for (project, _) in members {
            match owner.get(project) {
                Some(other) if *other != name => {
                    return Err(GridplanError::Validation(format!(
                        "project '{}' appears in both {} and {}",
                        project, other, name
                    )));
                }
                _ => {
                    owner.insert(project, name);
                }
            }
        }
        model.add_project_period_set(name, members.to_vec())?;
        set_names.push(name);
    }

    let joined = model.join_sets(&set_names)?;
    for (project, period) in &joined {
        let capacity = components
            .capacity_expression(project, *period)
            .ok_or_else(|| {
                GridplanError::Validation(format!(
                    "project '{}' is operational in {} but has no capacity",
                    project, period
                ))
            })?;
        assembly.capacity.push(CapacityEntry {
            project: project.clone(),
            period: *period,
            capacity: capacity.clone(),
        });
    }
    debug!(
        sets = set_names.len(),
        project_periods = joined.len(),
        "joined operational periods"
    );
    model.add_project_period_set(PROJECT_OPERATIONAL_PERIODS, joined)
}

fn add_capacity_envelopes(
    model: &mut LpModel,
    components: &FrozenComponents,
    assembly: &mut Assembly,
) -> GridplanResult<()> {
    let dispatched: BTreeSet<&(ProjectId, Timepoint)> =
        components.dispatch_envelopes().map(|(key, _)| key).collect();
    for target in [RoomTarget::Headroom, RoomTarget::Footroom] {
        for (key, _) in components.all_provisions(target) {
            if !dispatched.contains(key) {
                let (project, tmp) = key;
                return Err(GridplanError::Validation(format!(
                    "project '{}' provides reserves in timepoint {} but is not dispatched",
                    project, tmp
                )));
            }
        }
    }

    for ((project, tmp), envelope) in components.dispatch_envelopes() {
        let capacity = components
            .capacity_expression(project, envelope.period)
            .ok_or_else(|| {
                GridplanError::Validation(format!(
                    "project '{}' is dispatched in timepoint {} but has no capacity in period {}",
                    project, tmp, envelope.period
                ))
            })?;
        let power = LinearExpr::from(envelope.power);
        let max_output = capacity.scaled(envelope.max_fraction);
        let min_output = capacity.scaled(envelope.min_fraction);

        let headroom = components.provisions(RoomTarget::Headroom, project, *tmp);
        let footroom = components.provisions(RoomTarget::Footroom, project, *tmp);

        let upward = power.clone() + LinearExpr::sum(headroom.iter().map(|p| &p.variable));
        model.add_constraint(ConstraintDef::leq(
            format!("{}[{},{}]", MAX_POWER_CONSTRAINT, project, tmp),
            upward,
            max_output.clone(),
        ));
        let downward = power.clone() - LinearExpr::sum(footroom.iter().map(|p| &p.variable));
        model.add_constraint(ConstraintDef::geq(
            format!("{}[{},{}]", MIN_POWER_CONSTRAINT, project, tmp),
            downward,
            min_output.clone(),
        ));

        for provision in headroom.iter().chain(footroom) {
            let descriptor = provision.product.descriptor();
            let room = match descriptor.direction {
                ReserveDirection::Up => max_output.clone() - power.clone(),
                ReserveDirection::Down => power.clone() - min_output.clone(),
            };
            model.add_constraint(ConstraintDef::leq(
                format!("Max_{}[{},{}]", descriptor.provision_variable, project, tmp),
                LinearExpr::from(provision.variable),
                room.scaled(provision.derate),
            ));
        }

        assembly.dispatch.push(DispatchEntry {
            project: project.clone(),
            timepoint: *tmp,
            period: envelope.period,
            load_zone: envelope.load_zone.clone(),
            power: envelope.power,
        });
    }
    Ok(())
}

fn add_load_balance(
    model: &mut LpModel,
    components: &FrozenComponents,
    inputs: &RunInputs,
    assembly: &mut Assembly,
    objective: &mut LinearExpr,
) -> GridplanResult<()> {
    let zones: BTreeSet<&LoadZone> = inputs.load_zones().map(|z| &z.load_zone).collect();
    for (zone, tmp) in components.load_balance_production().keys() {
        if !zones.contains(zone) {
            return Err(GridplanError::Validation(format!(
                "load zone '{}' has production in timepoint {} but is not in load_zones.tab",
                zone, tmp
            )));
        }
    }

    let temporal = inputs.temporal();
    for zone in inputs.load_zones() {
        for tmp in temporal.timepoints() {
            let key = (zone.load_zone.clone(), tmp.timepoint);
            let production = components
                .load_balance_production()
                .get(&key)
                .cloned()
                .unwrap_or_default();
            let load_mw = inputs.load_mw(&zone.load_zone, tmp.timepoint);
            let unserved = model.add_variable(
                format!("Unserved_Energy_MW[{},{}]", zone.load_zone, tmp.timepoint),
                0.0,
                None,
            );
            let overgeneration = model.add_variable(
                format!("Overgeneration_MW[{},{}]", zone.load_zone, tmp.timepoint),
                0.0,
                None,
            );
            let supply = LinearExpr::sum(&production) + LinearExpr::from(unserved)
                - LinearExpr::from(overgeneration);
            model.add_constraint(ConstraintDef::eq(
                format!("{}[{},{}]", MEET_LOAD_CONSTRAINT, zone.load_zone, tmp.timepoint),
                supply,
                LinearExpr::constant(load_mw),
            ));

            let weight = temporal.timepoint_objective_weight(tmp.timepoint);
            objective.add_term(unserved, zone.unserved_energy_penalty_per_mw * weight);
            objective.add_term(overgeneration, zone.overgeneration_penalty_per_mw * weight);

            assembly.load_balance.push(LoadBalanceEntry {
                zone: zone.load_zone.clone(),
                timepoint: tmp.timepoint,
                load_mw,
                production,
                unserved,
                overgeneration,
            });
        }
    }
    Ok(())
}

fn add_reserve_balance(
    model: &mut LpModel,
    components: &FrozenComponents,
    inputs: &RunInputs,
    assembly: &mut Assembly,
    objective: &mut LinearExpr,
) -> GridplanResult<()> {
    let temporal = inputs.temporal();
    for product in components.reserve_products() {
        let descriptor = product.descriptor();
        let empty = BTreeMap::new();
        let contributions = components.reserve_contributions(product).unwrap_or(&empty);
        let Some(requirements) = components.reserve_requirements(product) else {
            continue;
        };

        let mut entries = Vec::with_capacity(requirements.len());
        for ((area, tmp), requirement_mw) in requirements {
            let provision = contributions
                .get(&(area.clone(), *tmp))
                .cloned()
                .unwrap_or_default();
            let settings = components.balancing_area_settings(product, area);
            let mut supply = LinearExpr::sum(&provision);
            let violation = if settings.allow_violation {
                let var = model.add_variable(
                    format!("{}_Violation_MW[{},{}]", descriptor.product, area, tmp),
                    0.0,
                    None,
                );
                supply.add_term(var, 1.0);
                objective.add_term(
                    var,
                    settings.violation_penalty_per_mw * temporal.timepoint_objective_weight(*tmp),
                );
                Some(var)
            } else {
                None
            };
            model.add_constraint(ConstraintDef::geq(
                format!("{}[{},{}]", descriptor.balance_constraint, area, tmp),
                supply,
                LinearExpr::constant(*requirement_mw),
            ));
            entries.push(ReserveBalanceEntry {
                area: area.clone(),
                timepoint: *tmp,
                requirement_mw: *requirement_mw,
                provision,
                violation,
            });
        }
        debug!(
            product = descriptor.product,
            balance_constraints = entries.len(),
            "reserve balance assembled"
        );
        assembly.reserve_balance.insert(product, entries);
    }
    Ok(())
}
