//! One (subproblem, stage) build: contribute, assemble, solve, export.
//!
//! The registry lives in an `Option` that assembly takes, so once the model
//! is assembled there is nowhere left to contribute to.

use crate::assembler::{assemble, Assembly};
use crate::capacity::capacity_module;
use crate::operations::operational_module;
use crate::reserves::ReserveProvision;
use crate::solve::{solve_model, LpSolverKind};
use crate::traits::{ContributionContext, ExportContext, ModelModule};
use gridplan_core::{DynamicComponents, GridplanError, GridplanResult, LpModel, LpSolution};
use gridplan_io::{format_value, write_table, RunDirectory, RunInputs};
use gridplan_scenarios::RequiredModules;
use std::path::{Path, PathBuf};
use tracing::{error, info};

pub const CAPACITY_ALL_FILE: &str = "capacity_all.csv";
pub const DISPATCH_ALL_FILE: &str = "dispatch_all.csv";
pub const LOAD_BALANCE_FILE: &str = "load_balance.csv";

pub struct ModelBuild {
    inputs: RunInputs,
    modules: Vec<Box<dyn ModelModule>>,
    contributed: usize,
    model: LpModel,
    components: Option<DynamicComponents>,
    assembly: Option<Assembly>,
}

impl ModelBuild {
    /// Build with no modules; add them with [`ModelBuild::add_module`].
    pub fn empty(inputs: RunInputs) -> Self {
        Self {
            inputs,
            modules: Vec::new(),
            contributed: 0,
            model: LpModel::new(),
            components: Some(DynamicComponents::new()),
            assembly: None,
        }
    }

    /// Instantiate the required modules in load order: capacity types,
    /// operational types, then reserve products.
    pub fn new(inputs: RunInputs, required: &RequiredModules) -> Self {
        let mut build = Self::empty(inputs);
        build.modules.extend(
            required
                .capacity_types
                .iter()
                .map(|ct| capacity_module(*ct)),
        );
        build.modules.extend(
            required
                .operational_types
                .iter()
                .map(|ot| operational_module(*ot)),
        );
        build.modules.extend(
            required
                .reserve_products
                .iter()
                .map(|p| Box::new(ReserveProvision::new(*p)) as Box<dyn ModelModule>),
        );
        build
    }

    pub fn inputs(&self) -> &RunInputs {
        &self.inputs
    }

    pub fn module_names(&self) -> Vec<&'static str> {
        self.modules.iter().map(|m| m.name()).collect()
    }

    pub fn model(&self) -> &LpModel {
        &self.model
    }

    pub fn assembly(&self) -> Option<&Assembly> {
        self.assembly.as_ref()
    }

    pub fn is_assembled(&self) -> bool {
        self.assembly.is_some()
    }

    pub fn add_module(&mut self, module: Box<dyn ModelModule>) -> GridplanResult<()> {
        if self.components.is_none() {
            return Err(frozen_error(&format!("add module '{}'", module.name())));
        }
        self.modules.push(module);
        Ok(())
    }

    /// Let every module that has not yet contributed do so, in order.
    pub fn contribute_all(&mut self) -> GridplanResult<()> {
        let Some(components) = self.components.as_mut() else {
            return Err(frozen_error("contribute"));
        };
        while self.contributed < self.modules.len() {
            let module = &mut self.modules[self.contributed];
            info!(module = module.name(), "loading module");
            components.begin_module(module.name());
            let mut ctx = ContributionContext {
                model: &mut self.model,
                components: &mut *components,
                inputs: &self.inputs,
            };
            module.contribute(&mut ctx)?;
            self.contributed += 1;
        }
        Ok(())
    }

    /// Freeze the registry and add the cross-cutting constraints and objective.
    pub fn assemble(&mut self) -> GridplanResult<&Assembly> {
        self.contribute_all()?;
        let components = self
            .components
            .take()
            .ok_or_else(|| frozen_error("assemble"))?;
        let frozen = components.freeze();
        let assembly = assemble(&mut self.model, &frozen, &self.inputs)?;
        Ok(self.assembly.insert(assembly))
    }

    pub fn solve(&self, kind: LpSolverKind) -> GridplanResult<LpSolution> {
        if !self.is_assembled() {
            return Err(GridplanError::Registry(
                "model must be assembled before it is solved".into(),
            ));
        }
        solve_model(&self.model, kind)
    }

    /// Write every result file and return the paths in write order.
    pub fn export(&self, solution: &LpSolution, results_dir: &Path) -> GridplanResult<Vec<PathBuf>> {
        let assembly = self.assembly.as_ref().ok_or_else(|| {
            GridplanError::Registry("model must be assembled before results are exported".into())
        })?;
        std::fs::create_dir_all(results_dir)?;
        let ctx = ExportContext {
            solution,
            inputs: &self.inputs,
            results_dir,
        };
        let mut written = Vec::new();
        for module in &self.modules {
            written.extend(module.export_results(&ctx)?);
        }
        written.push(export_capacity_all(assembly, &ctx)?);
        written.push(export_dispatch_all(assembly, &ctx)?);
        written.push(export_load_balance(assembly, &ctx)?);
        written.extend(export_reserve_balance(assembly, &ctx)?);
        info!(files = written.len(), dir = %results_dir.display(), "results exported");
        Ok(written)
    }
}

fn frozen_error(what: &str) -> GridplanError {
    error!(action = what, "registry is frozen; model already assembled");
    GridplanError::Registry(format!("cannot {} after the model is assembled", what))
}

fn export_capacity_all(assembly: &Assembly, ctx: &ExportContext<'_>) -> GridplanResult<PathBuf> {
    let path = ctx.results_dir.join(CAPACITY_ALL_FILE);
    let rows = assembly.capacity.iter().map(|entry| {
        let (capacity_type, technology, load_zone) = ctx
            .inputs
            .project(&entry.project)
            .map(|p| {
                (
                    p.capacity_type.to_string(),
                    p.technology.clone(),
                    p.load_zone.to_string(),
                )
            })
            .unwrap_or_default();
        vec![
            entry.project.to_string(),
            entry.period.to_string(),
            capacity_type,
            technology,
            load_zone,
            format_value(ctx.solution.eval(&entry.capacity)),
        ]
    });
    write_table(
        &path,
        &["project", "period", "capacity_type", "technology", "load_zone", "capacity_mw"],
        rows,
    )?;
    Ok(path)
}

fn export_dispatch_all(assembly: &Assembly, ctx: &ExportContext<'_>) -> GridplanResult<PathBuf> {
    let path = ctx.results_dir.join(DISPATCH_ALL_FILE);
    let rows = assembly.dispatch.iter().map(|entry| {
        let operational_type = ctx
            .inputs
            .project(&entry.project)
            .map(|p| p.operational_type.to_string())
            .unwrap_or_default();
        vec![
            entry.project.to_string(),
            entry.timepoint.to_string(),
            entry.period.to_string(),
            operational_type,
            entry.load_zone.to_string(),
            format_value(ctx.solution.value(entry.power)),
        ]
    });
    write_table(
        &path,
        &["project", "timepoint", "period", "operational_type", "load_zone", "power_mw"],
        rows,
    )?;
    Ok(path)
}

fn export_load_balance(assembly: &Assembly, ctx: &ExportContext<'_>) -> GridplanResult<PathBuf> {
    let path = ctx.results_dir.join(LOAD_BALANCE_FILE);
    let rows = assembly.load_balance.iter().map(|entry| {
        let production: f64 = entry.production.iter().map(|v| ctx.solution.value(*v)).sum();
        vec![
            entry.zone.to_string(),
            entry.timepoint.to_string(),
            format_value(entry.load_mw),
            format_value(production),
            format_value(ctx.solution.value(entry.unserved)),
            format_value(ctx.solution.value(entry.overgeneration)),
        ]
    });
    write_table(
        &path,
        &[
            "load_zone",
            "timepoint",
            "load_mw",
            "production_mw",
            "unserved_energy_mw",
            "overgeneration_mw",
        ],
        rows,
    )?;
    Ok(path)
}

fn export_reserve_balance(
    assembly: &Assembly,
    ctx: &ExportContext<'_>,
) -> GridplanResult<Vec<PathBuf>> {
    let mut written = Vec::new();
    for (product, entries) in &assembly.reserve_balance {
        let path = ctx
            .results_dir
            .join(format!("reserve_balance_{}.csv", product.as_str()));
        let rows = entries.iter().map(|entry| {
            let provided: f64 = entry.provision.iter().map(|v| ctx.solution.value(*v)).sum();
            let violation = entry
                .violation
                .map(|v| ctx.solution.value(v))
                .unwrap_or(0.0);
            vec![
                entry.area.to_string(),
                entry.timepoint.to_string(),
                format_value(entry.requirement_mw),
                format_value(provided),
                format_value(violation),
            ]
        });
        write_table(
            &path,
            &["balancing_area", "timepoint", "requirement_mw", "provision_mw", "violation_mw"],
            rows,
        )?;
        written.push(path);
    }
    Ok(written)
}

/// Outcome of one solved and exported unit.
#[derive(Debug, Clone)]
pub struct UnitOutcome {
    pub objective: f64,
    pub variables: usize,
    pub constraints: usize,
    pub files: Vec<PathBuf>,
}

/// Load inputs, build, solve and export one (subproblem, stage) unit.
///
/// Each call builds a fresh registry and fresh module instances.
pub fn run_unit(
    run: &RunDirectory,
    required: &RequiredModules,
    solver: LpSolverKind,
) -> GridplanResult<UnitOutcome> {
    let inputs = RunInputs::load(run)?;
    info!(
        subproblem = run.subproblem(),
        stage = run.stage(),
        modules = ?required.load_order(),
        "building unit"
    );
    let mut build = ModelBuild::new(inputs, required);
    build.assemble()?;
    let solution = build.solve(solver)?;
    let results_dir = run.ensure_results_dir()?;
    let files = build.export(&solution, &results_dir)?;
    Ok(UnitOutcome {
        objective: solution.objective,
        variables: build.model().num_variables(),
        constraints: build.model().constraints().len(),
        files,
    })
}
