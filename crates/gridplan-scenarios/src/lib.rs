//! Scenario configuration: the store, scenario resolution, subproblem/stage
//! enumeration and the required-module resolver.

pub mod modules;
pub mod resolver;
pub mod stages;
pub mod store;

pub use modules::{
    required_capacity_types, required_modules, required_operational_types,
    required_reserve_products, RequiredModules,
};
pub use resolver::{
    resolve_scenario, ResolvedScenario, PROJECT_PORTFOLIO, SUBSCENARIO_CATEGORIES, TEMPORAL,
};
pub use stages::{resolve_subproblems, subproblems_for, Stage, Subproblem};
pub use store::{
    load_config_from_path, ConfigSource, ConfigStore, PortfolioEntry, ProjectPortfolio,
    ScenarioConfig, ScenarioRecord, StageSpec, SubproblemSpec, TemporalSubscenario,
};
