//! Operational-type modules.
//!
//! These create one power variable per operational (project, timepoint),
//! register it for the zone's load balance and describe the dispatch envelope
//! the assembler turns into capacity constraints.

mod gen_must_run;
mod gen_simple;

pub use gen_must_run::GenMustRun;
pub use gen_simple::GenSimple;

use crate::traits::{ContributionContext, ExportContext, ModelModule};
use gridplan_core::{
    DispatchEnvelope, GridplanResult, LinearExpr, OperationalType, ProjectId, Timepoint, VarId,
};
use gridplan_io::{format_value, write_table, ProjectRecord};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::debug;

pub fn operational_module(operational_type: OperationalType) -> Box<dyn ModelModule> {
    match operational_type {
        OperationalType::GenSimple => Box::new(GenSimple::default()),
        OperationalType::GenMustRun => Box::new(GenMustRun::default()),
    }
}

/// Power variables keyed by (project, timepoint).
pub(crate) type PowerVariables = BTreeMap<(ProjectId, Timepoint), VarId>;

/// Shared contribution of the operational types. `fractions` maps a project
/// to its (max, min) envelope fractions.
pub(crate) fn contribute_dispatch(
    ctx: &mut ContributionContext<'_>,
    operational_type: OperationalType,
    variable_prefix: &str,
    fractions: impl Fn(&ProjectRecord) -> (f64, f64),
) -> GridplanResult<PowerVariables> {
    let inputs = ctx.inputs;
    let temporal = inputs.temporal();
    let mut power = PowerVariables::new();
    let mut variable_cost = LinearExpr::new();

    for (project, tmp) in inputs.operational_timepoints(operational_type) {
        let var = ctx.model.add_variable(
            format!("{}_Provide_Power_MW[{},{}]", variable_prefix, project.project, tmp.timepoint),
            0.0,
            None,
        );
        let (max_fraction, min_fraction) = fractions(project);
        ctx.components.add_dispatch_envelope(
            project.project.clone(),
            tmp.timepoint,
            DispatchEnvelope {
                power: var,
                load_zone: project.load_zone.clone(),
                period: tmp.period,
                max_fraction,
                min_fraction,
            },
        )?;
        ctx.components
            .add_load_balance_production(project.load_zone.clone(), tmp.timepoint, var);
        variable_cost.add_term(
            var,
            project.variable_om_cost_per_mwh * temporal.timepoint_objective_weight(tmp.timepoint),
        );
        power.insert((project.project.clone(), tmp.timepoint), var);
    }

    ctx.components.add_cost_component(
        format!("{}_Variable_OM_Cost", variable_prefix),
        variable_cost,
    );
    debug!(
        operational_type = operational_type.as_str(),
        project_timepoints = power.len(),
        "dispatch contributed"
    );
    Ok(power)
}

/// Write `dispatch_<operational type>.csv` for one module's power variables.
pub(crate) fn export_dispatch(
    power: &PowerVariables,
    operational_type: OperationalType,
    ctx: &ExportContext<'_>,
) -> GridplanResult<Vec<PathBuf>> {
    let path = ctx
        .results_dir
        .join(format!("dispatch_{}.csv", operational_type.as_str()));
    let rows = power.iter().map(|((project, timepoint), var)| {
        let period = ctx
            .inputs
            .temporal()
            .period_of(*timepoint)
            .map(|p| p.to_string())
            .unwrap_or_default();
        vec![
            project.to_string(),
            timepoint.to_string(),
            period,
            format_value(ctx.solution.value(*var)),
        ]
    });
    write_table(&path, &["project", "timepoint", "period", "power_mw"], rows)?;
    Ok(vec![path])
}
