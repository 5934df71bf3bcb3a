//! `gen_must_run`: output pinned at available capacity, so no headroom or
//! footroom is left for reserves.

use super::{contribute_dispatch, export_dispatch, PowerVariables};
use crate::traits::{ContributionContext, ExportContext, ModelModule};
use gridplan_core::{GridplanResult, OperationalType};
use std::path::PathBuf;

#[derive(Debug, Default)]
pub struct GenMustRun {
    power: PowerVariables,
}

impl ModelModule for GenMustRun {
    fn name(&self) -> &'static str {
        OperationalType::GenMustRun.as_str()
    }

    fn contribute(&mut self, ctx: &mut ContributionContext<'_>) -> GridplanResult<()> {
        self.power = contribute_dispatch(ctx, OperationalType::GenMustRun, "GenMustRun", |_| {
            (1.0, 1.0)
        })?;
        Ok(())
    }

    fn export_results(&self, ctx: &ExportContext<'_>) -> GridplanResult<Vec<PathBuf>> {
        export_dispatch(&self.power, OperationalType::GenMustRun, ctx)
    }
}
