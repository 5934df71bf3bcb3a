//! # gridplan-io: run directories and tabular files
//!
//! Every (subproblem, stage) unit reads tab-separated inputs from
//! `<scenario_dir>/<subproblem>/<stage>/inputs` and writes comma-separated
//! results to the sibling `results` directory. Errors always name the file.

pub mod inputs;
pub mod layout;
pub mod results;
pub mod tab;

pub use inputs::{
    LoadZoneParams, PeriodParams, ProjectRecord, ReserveEligibility, RunInputs, LOAD_FILE,
    LOAD_ZONES_FILE, PERIODS_FILE, PERIOD_PARAMS_FILE, PROJECTS_FILE, TIMEPOINTS_FILE,
};
pub use layout::{run_manifest_path, RunDirectory, INPUTS_DIR, RESULTS_DIR, RUN_MANIFEST};
pub use results::{format_value, write_table};
pub use tab::{read_rows, TabTable, MISSING};
