//! Reserve provision, one module per reserve product.
//!
//! All products share this implementation; a [`ReserveDescriptor`] supplies
//! the names (input columns, variable and constraint names, file names) and
//! whether provision draws on headroom or footroom.
//!
//! For each project with a balancing area for the product and each timepoint
//! in which the project is operational, the module creates a non-negative
//! provision variable, adds it to the project's headroom or footroom list and
//! to the product's (balancing area, timepoint) aggregation. The derated
//! upper bound and the balance against the requirement are left to the
//! assembler.

use crate::traits::{ContributionContext, ExportContext, ModelModule};
use gridplan_core::{
    BalancingArea, GridplanError, GridplanResult, Period, ProjectId, ProvisionRef,
    ReserveDescriptor, ReserveProduct, Timepoint, VarId,
};
use gridplan_io::{format_value, write_table, PROJECTS_FILE};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Clone)]
struct Provision {
    period: Period,
    area: BalancingArea,
    variable: VarId,
}

#[derive(Debug)]
pub struct ReserveProvision {
    product: ReserveProduct,
    provisions: BTreeMap<(ProjectId, Timepoint), Provision>,
}

impl ReserveProvision {
    pub fn new(product: ReserveProduct) -> Self {
        Self {
            product,
            provisions: BTreeMap::new(),
        }
    }

    pub fn descriptor(&self) -> &'static ReserveDescriptor {
        self.product.descriptor()
    }

    pub fn provision_variable(&self, project: &ProjectId, timepoint: Timepoint) -> Option<VarId> {
        self.provisions
            .get(&(project.clone(), timepoint))
            .map(|p| p.variable)
    }

    pub fn results_file(&self) -> String {
        format!("reserves_provision_{}.csv", self.product.as_str())
    }
}

impl ModelModule for ReserveProvision {
    fn name(&self) -> &'static str {
        self.product.as_str()
    }

    fn contribute(&mut self, ctx: &mut ContributionContext<'_>) -> GridplanResult<()> {
        let descriptor = self.product.descriptor();
        let inputs = ctx.inputs;
        let temporal = inputs.temporal();

        let areas = inputs.reserve_balancing_areas(self.product)?;
        let requirements = inputs.reserve_requirements(self.product)?;
        let eligibility = inputs.reserve_eligibility(self.product)?;

        for (project, eligible) in &eligibility {
            if !areas.contains_key(&eligible.balancing_area) {
                return Err(GridplanError::input(
                    inputs.inputs_dir().join(PROJECTS_FILE),
                    format!(
                        "project '{}' has {} '{}' which is not in {}",
                        project,
                        descriptor.ba_column,
                        eligible.balancing_area,
                        descriptor.balancing_areas_file
                    ),
                ));
            }
            for tmp in temporal.timepoints() {
                if !inputs.is_operational(project, tmp.period) {
                    continue;
                }
                let variable = ctx.model.add_variable(
                    format!("{}[{},{}]", descriptor.provision_variable, project, tmp.timepoint),
                    0.0,
                    None,
                );
                ctx.components.add_provision(
                    descriptor.room_target(),
                    project.clone(),
                    tmp.timepoint,
                    ProvisionRef {
                        product: self.product,
                        variable,
                        derate: eligible.derate,
                    },
                );
                ctx.components.add_reserve_contribution(
                    self.product,
                    eligible.balancing_area.clone(),
                    tmp.timepoint,
                    variable,
                );
                self.provisions.insert(
                    (project.clone(), tmp.timepoint),
                    Provision {
                        period: tmp.period,
                        area: eligible.balancing_area.clone(),
                        variable,
                    },
                );
            }
        }

        for ((area, timepoint), requirement_mw) in requirements {
            if !areas.contains_key(&area) {
                return Err(GridplanError::input(
                    inputs.inputs_dir().join(descriptor.requirement_file),
                    format!(
                        "balancing area '{}' is not in {}",
                        area, descriptor.balancing_areas_file
                    ),
                ));
            }
            ctx.components
                .add_reserve_requirement(self.product, area, timepoint, requirement_mw);
        }
        for (area, settings) in areas {
            ctx.components
                .add_reserve_balancing_area(self.product, area, settings);
        }

        debug!(
            product = descriptor.product,
            target = descriptor.room_target().as_str(),
            projects = eligibility.len(),
            provision_variables = self.provisions.len(),
            "reserve provision contributed"
        );
        Ok(())
    }

    fn export_results(&self, ctx: &ExportContext<'_>) -> GridplanResult<Vec<PathBuf>> {
        let path = ctx.results_dir.join(self.results_file());
        let rows = self.provisions.iter().map(|((project, timepoint), p)| {
            vec![
                project.to_string(),
                timepoint.to_string(),
                p.period.to_string(),
                p.area.to_string(),
                format_value(ctx.solution.value(p.variable)),
            ]
        });
        write_table(
            &path,
            &["project", "timepoint", "period", "balancing_area", "reserve_provision_mw"],
            rows,
        )?;
        Ok(vec![path])
    }
}
