//! Unified error type for model resolution, assembly and solving.
//!
//! Library code across the workspace returns [`GridplanResult`]; the batch
//! runner and CLI wrap these in `anyhow` with additional context.
//!
//! # Example
//!
//! ```ignore
//! use gridplan_core::{GridplanError, GridplanResult};
//!
//! fn first_period(periods: &[u32]) -> GridplanResult<u32> {
//!     periods
//!         .first()
//!         .copied()
//!         .ok_or_else(|| GridplanError::Config("no periods defined".into()))
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Error type for all gridplan operations.
///
/// Configuration-class errors (`NotFound`, `Config`, `MissingSubscenario`)
/// are raised before any model is built. `Registry` signals a programming
/// error in module ordering and is never caused by user data.
#[derive(Error, Debug)]
pub enum GridplanError {
    /// A scenario (or other keyed record) does not exist
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    /// Invalid or inconsistent configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// A scenario does not reference a subscenario it needs
    #[error("Scenario {scenario_id} is missing required subscenario '{category}'")]
    MissingSubscenario { scenario_id: u32, category: String },

    /// Missing or malformed tabular input/output artifact
    #[error("Input error in '{}': {message}", path.display())]
    Input { path: PathBuf, message: String },

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Registry used out of phase (contribution after assembly, unknown set)
    #[error("Registry error: {0}")]
    Registry(String),

    /// Solver failed or returned an unusable status
    #[error("Solver error: {0}")]
    Solver(String),

    /// Data validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Generic errors (for wrapping external errors)
    #[error("{0}")]
    Other(String),
}

impl GridplanError {
    pub fn input(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        GridplanError::Input {
            path: path.into(),
            message: message.into(),
        }
    }

    /// True for errors that must abort the run before model build.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            GridplanError::NotFound { .. }
                | GridplanError::Config(_)
                | GridplanError::MissingSubscenario { .. }
        )
    }
}

/// Convenience type alias for Results using GridplanError.
pub type GridplanResult<T> = Result<T, GridplanError>;

impl From<anyhow::Error> for GridplanError {
    fn from(err: anyhow::Error) -> Self {
        GridplanError::Other(err.to_string())
    }
}

impl From<String> for GridplanError {
    fn from(s: String) -> Self {
        GridplanError::Other(s)
    }
}

impl From<&str> for GridplanError {
    fn from(s: &str) -> Self {
        GridplanError::Other(s.to_string())
    }
}

impl From<serde_json::Error> for GridplanError {
    fn from(err: serde_json::Error) -> Self {
        GridplanError::Other(format!("JSON error: {err}"))
    }
}
