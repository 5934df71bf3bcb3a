//! # gridplan-algo: model build, assembly and solve
//!
//! A build runs in four steps:
//!
//! | Step | Entry point | Effect |
//! |------|-------------|--------|
//! | Contribute | [`ModelBuild::contribute_all`] | each module adds variables, constraints and registry entries |
//! | Assemble | [`ModelBuild::assemble`] | registry frozen; envelopes, balances and objective added |
//! | Solve | [`ModelBuild::solve`] | model handed to a good_lp backend |
//! | Export | [`ModelBuild::export`] | per-module and cross-cutting CSVs written |
//!
//! ## Modules
//!
//! - [`capacity`]: `gen_spec`, `gen_ret_lin`
//! - [`operations`]: `gen_simple`, `gen_must_run`
//! - [`reserves`]: one generic module per reserve product
//!
//! ## Example
//!
//! ```ignore
//! use gridplan_algo::{run_unit, LpSolverKind};
//! use gridplan_io::RunDirectory;
//!
//! let run = RunDirectory::new("scenarios/coal", 1, 1);
//! let outcome = run_unit(&run, &required, LpSolverKind::Clarabel)?;
//! println!("objective {}", outcome.objective);
//! ```

pub mod assembler;
pub mod build;
pub mod capacity;
pub mod operations;
pub mod reserves;
pub mod solve;
pub mod traits;

pub use assembler::{assemble, Assembly, PROJECT_OPERATIONAL_PERIODS};
pub use build::{run_unit, ModelBuild, UnitOutcome};
pub use capacity::{capacity_module, GenRetLin, GenSpec};
pub use operations::{operational_module, GenMustRun, GenSimple};
pub use reserves::ReserveProvision;
pub use solve::{solve_model, LpSolverKind};
pub use traits::{ContributionContext, ExportContext, ModelModule};
