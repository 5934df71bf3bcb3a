//! `gen_simple`: dispatchable between a minimum stable level and capacity.

use super::{contribute_dispatch, export_dispatch, PowerVariables};
use crate::traits::{ContributionContext, ExportContext, ModelModule};
use gridplan_core::{GridplanResult, OperationalType};
use std::path::PathBuf;

#[derive(Debug, Default)]
pub struct GenSimple {
    power: PowerVariables,
}

impl ModelModule for GenSimple {
    fn name(&self) -> &'static str {
        OperationalType::GenSimple.as_str()
    }

    fn contribute(&mut self, ctx: &mut ContributionContext<'_>) -> GridplanResult<()> {
        self.power = contribute_dispatch(ctx, OperationalType::GenSimple, "GenSimple", |project| {
            (1.0, project.min_stable_level_fraction.clamp(0.0, 1.0))
        })?;
        Ok(())
    }

    fn export_results(&self, ctx: &ExportContext<'_>) -> GridplanResult<Vec<PathBuf>> {
        export_dispatch(&self.power, OperationalType::GenSimple, ctx)
    }
}
