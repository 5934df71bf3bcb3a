//! `gen_ret_lin`: pre-specified generation that may be retired, linearly.
//!
//! Partial retirement is allowed (200 MW of a 500 MW unit). Retired capacity
//! avoids its fixed cost, and retirement can never be undone: net capacity
//! is non-increasing from one eligible period to the next.

use super::{eligible_rows, members, project_labels};
use crate::traits::{ContributionContext, ExportContext, ModelModule};
use gridplan_core::{
    CapacityType, ConstraintDef, GridplanResult, LinearExpr, Period, ProjectId, VarId,
};
use gridplan_io::{format_value, write_table};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, warn};

pub const GEN_RET_LIN_OPR_PRDS: &str = "GEN_RET_LIN_OPR_PRDS";
pub const RETIRE_FOREVER_CONSTRAINT: &str = "GenRetLin_Retire_Forever_Constraint";
pub const RESULTS_FILE: &str = "capacity_gen_ret_lin.csv";

#[derive(Debug, Clone)]
struct Entry {
    capacity_mw: f64,
    retire: VarId,
}

impl Entry {
    fn net_capacity(&self) -> LinearExpr {
        LinearExpr::constant(self.capacity_mw) - LinearExpr::term(self.retire, 1.0)
    }
}

#[derive(Debug, Default)]
pub struct GenRetLin {
    entries: BTreeMap<(ProjectId, Period), Entry>,
}

impl ModelModule for GenRetLin {
    fn name(&self) -> &'static str {
        CapacityType::GenRetLin.as_str()
    }

    fn contribute(&mut self, ctx: &mut ContributionContext<'_>) -> GridplanResult<()> {
        let temporal = ctx.inputs.temporal();
        let rows = eligible_rows(ctx.inputs, temporal, CapacityType::GenRetLin);

        let mut fixed_cost = LinearExpr::new();
        for row in &rows {
            let retire = ctx.model.add_variable(
                format!("GenRetLin_Retire_MW[{},{}]", row.project, row.period),
                0.0,
                Some(row.existing_capacity_mw),
            );
            let entry = Entry {
                capacity_mw: row.existing_capacity_mw,
                retire,
            };
            let weight = temporal
                .period(row.period)
                .map(|p| p.objective_weight())
                .unwrap_or(0.0);
            fixed_cost.add_scaled(&entry.net_capacity(), row.fixed_cost_per_mw_yr * weight);
            ctx.components.add_capacity_expression(
                row.project.clone(),
                row.period,
                entry.net_capacity(),
            )?;
            self.entries.insert((row.project.clone(), row.period), entry);
        }

        // Periods are ordered, so the first entry of each project is its first
        // eligible period and is skipped along with the study's first period.
        let first_period = temporal.first_period();
        let mut previous: Option<(&ProjectId, Period, &Entry)> = None;
        let mut constraints = 0usize;
        for ((project, period), entry) in &self.entries {
            let earlier = match previous {
                Some((prev_project, prev_period, prev_entry)) if prev_project == project => {
                    Some((prev_period, prev_entry))
                }
                _ => None,
            };
            previous = Some((project, *period, entry));
            let Some((earlier_period, earlier_entry)) = earlier else {
                continue;
            };
            if Some(*period) == first_period {
                continue;
            }
            if temporal.previous_period(*period) != Some(earlier_period) {
                warn!(
                    project = %project,
                    period = %period,
                    earlier_period = %earlier_period,
                    "no capacity in the preceding study period; bounding by the last eligible period"
                );
            }
            ctx.model.add_constraint(ConstraintDef::leq(
                format!("{}[{},{}]", RETIRE_FOREVER_CONSTRAINT, project, period),
                entry.net_capacity(),
                earlier_entry.net_capacity(),
            ));
            constraints += 1;
        }

        ctx.components
            .add_operational_period_set(GEN_RET_LIN_OPR_PRDS, members(&rows))?;
        ctx.components
            .add_cost_component("GenRetLin_Fixed_Cost", fixed_cost);

        debug!(
            project_periods = rows.len(),
            retire_forever_constraints = constraints,
            "gen_ret_lin contributed"
        );
        Ok(())
    }

    fn export_results(&self, ctx: &ExportContext<'_>) -> GridplanResult<Vec<PathBuf>> {
        let path = ctx.results_dir.join(RESULTS_FILE);
        let rows = self.entries.iter().map(|((project, period), entry)| {
            let (technology, load_zone) = project_labels(ctx.inputs, project);
            vec![
                project.to_string(),
                period.to_string(),
                technology,
                load_zone,
                format_value(ctx.solution.value(entry.retire)),
            ]
        });
        write_table(
            &path,
            &["project", "period", "technology", "load_zone", "retire_mw"],
            rows,
        )?;
        Ok(vec![path])
    }
}
