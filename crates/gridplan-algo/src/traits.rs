//! The interface every model module implements.
//!
//! Capacity types, operational types and reserve products are all modules.
//! The build instantiates the ones a scenario needs, calls
//! [`ModelModule::contribute`] once each in load order, and after the solve
//! lets each one write its own result files.

use gridplan_core::{DynamicComponents, GridplanResult, LpModel, LpSolution};
use gridplan_io::RunInputs;
use std::path::{Path, PathBuf};

/// Mutable state a module may touch while contributing.
///
/// `components` is the append-only registry and also holds the module's named
/// sets until assembly; `model` receives the module's own variables and
/// constraints.
pub struct ContributionContext<'a> {
    pub model: &'a mut LpModel,
    pub components: &'a mut DynamicComponents,
    pub inputs: &'a RunInputs,
}

/// Read-only state available when writing results.
pub struct ExportContext<'a> {
    pub solution: &'a LpSolution,
    pub inputs: &'a RunInputs,
    pub results_dir: &'a Path,
}

pub trait ModelModule: Send + Sync {
    /// Module name, e.g. "gen_ret_lin" or "regulation_up"
    fn name(&self) -> &'static str;

    /// Add this module's fragment to the model and registry.
    fn contribute(&mut self, ctx: &mut ContributionContext<'_>) -> GridplanResult<()>;

    /// Write this module's result files and return their paths.
    fn export_results(&self, _ctx: &ExportContext<'_>) -> GridplanResult<Vec<PathBuf>> {
        Ok(Vec::new())
    }
}
