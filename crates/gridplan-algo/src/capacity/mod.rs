//! Capacity-type modules.
//!
//! Each project's capacity type selects exactly one of these. A capacity
//! module owns the project's (project, period) operational set and registers
//! a capacity expression for every member.

mod gen_ret_lin;
mod gen_spec;

pub use gen_ret_lin::{GenRetLin, GEN_RET_LIN_OPR_PRDS};
pub use gen_spec::{GenSpec, GEN_SPEC_OPR_PRDS};

use crate::traits::ModelModule;
use gridplan_core::{CapacityType, Period, ProjectId, TemporalStructure};
use gridplan_io::{PeriodParams, RunInputs};
use tracing::warn;

pub fn capacity_module(capacity_type: CapacityType) -> Box<dyn ModelModule> {
    match capacity_type {
        CapacityType::GenSpec => Box::new(GenSpec::default()),
        CapacityType::GenRetLin => Box::new(GenRetLin::default()),
    }
}

/// Period-parameter rows of one capacity type whose period is modeled in this
/// build, sorted by (project, period).
pub(crate) fn eligible_rows(
    inputs: &RunInputs,
    temporal: &TemporalStructure,
    capacity_type: CapacityType,
) -> Vec<PeriodParams> {
    let mut rows: Vec<PeriodParams> = inputs
        .period_params_for(capacity_type)
        .filter(|row| {
            let modeled = temporal.contains_period(row.period);
            if !modeled {
                warn!(
                    project = %row.project,
                    period = %row.period,
                    capacity_type = capacity_type.as_str(),
                    "ignoring period parameters for a period outside this stage"
                );
            }
            modeled
        })
        .cloned()
        .collect();
    rows.sort_by(|a, b| (&a.project, a.period).cmp(&(&b.project, b.period)));
    rows
}

pub(crate) fn members(rows: &[PeriodParams]) -> Vec<(ProjectId, Period)> {
    rows.iter()
        .map(|row| (row.project.clone(), row.period))
        .collect()
}

/// Technology and load zone columns for result rows.
pub(crate) fn project_labels(inputs: &RunInputs, project: &ProjectId) -> (String, String) {
    inputs
        .project(project)
        .map(|p| (p.technology.clone(), p.load_zone.to_string()))
        .unwrap_or_default()
}
