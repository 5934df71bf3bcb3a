//! `gen_spec`: pre-specified generation capacity with no decisions.

use super::{eligible_rows, members, project_labels};
use crate::traits::{ContributionContext, ExportContext, ModelModule};
use gridplan_core::{CapacityType, GridplanResult, LinearExpr, Period, ProjectId};
use gridplan_io::{format_value, write_table};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::debug;

pub const GEN_SPEC_OPR_PRDS: &str = "GEN_SPEC_OPR_PRDS";
pub const RESULTS_FILE: &str = "capacity_gen_spec.csv";

#[derive(Debug, Default)]
pub struct GenSpec {
    capacity_mw: BTreeMap<(ProjectId, Period), f64>,
}

impl ModelModule for GenSpec {
    fn name(&self) -> &'static str {
        CapacityType::GenSpec.as_str()
    }

    fn contribute(&mut self, ctx: &mut ContributionContext<'_>) -> GridplanResult<()> {
        let temporal = ctx.inputs.temporal();
        let rows = eligible_rows(ctx.inputs, temporal, CapacityType::GenSpec);

        let mut fixed_cost = 0.0;
        for row in &rows {
            let weight = temporal
                .period(row.period)
                .map(|p| p.objective_weight())
                .unwrap_or(0.0);
            fixed_cost += row.existing_capacity_mw * row.fixed_cost_per_mw_yr * weight;
            ctx.components.add_capacity_expression(
                row.project.clone(),
                row.period,
                LinearExpr::constant(row.existing_capacity_mw),
            )?;
            self.capacity_mw
                .insert((row.project.clone(), row.period), row.existing_capacity_mw);
        }

        ctx.components
            .add_operational_period_set(GEN_SPEC_OPR_PRDS, members(&rows))?;
        ctx.components
            .add_cost_component("GenSpec_Fixed_Cost", LinearExpr::constant(fixed_cost));

        debug!(project_periods = rows.len(), "gen_spec contributed");
        Ok(())
    }

    fn export_results(&self, ctx: &ExportContext<'_>) -> GridplanResult<Vec<PathBuf>> {
        let path = ctx.results_dir.join(RESULTS_FILE);
        let rows = self.capacity_mw.iter().map(|((project, period), mw)| {
            let (technology, load_zone) = project_labels(ctx.inputs, project);
            vec![
                project.to_string(),
                period.to_string(),
                technology,
                load_zone,
                format_value(*mw),
            ]
        });
        write_table(
            &path,
            &["project", "period", "technology", "load_zone", "capacity_mw"],
            rows,
        )?;
        Ok(vec![path])
    }
}
