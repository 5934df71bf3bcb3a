//! # gridplan-core: model building blocks
//!
//! Shared vocabulary for the planning model:
//!
//! - [`ids`]: newtype identifiers for projects, zones, areas, periods and timepoints
//! - [`temporal`]: ordered periods and timepoints of one build
//! - [`kinds`]: closed enums for capacity types, operational types, reserve
//!   products and optional features
//! - [`lp`]: a solver-independent linear program that can be checked against
//!   any candidate point
//! - [`registry`]: the two-phase dynamic component registry
//! - [`error`]: [`GridplanError`] and [`GridplanResult`]

pub mod error;
pub mod ids;
pub mod kinds;
pub mod lp;
pub mod registry;
pub mod temporal;

pub use error::{GridplanError, GridplanResult};
pub use ids::{BalancingArea, LoadZone, Period, ProjectId, Timepoint};
pub use kinds::{
    CapacityType, Feature, OperationalType, ReserveDescriptor, ReserveDirection, ReserveProduct,
    RoomTarget,
};
pub use lp::{ConstraintDef, LinearExpr, LpModel, LpSolution, Sense, VarId, VariableDef};
pub use registry::{
    BalancingAreaSettings, CostComponent, DispatchEnvelope, DynamicComponents, FrozenComponents,
    ProvisionRef,
};
pub use temporal::{PeriodInfo, TemporalStructure, TimepointInfo};
