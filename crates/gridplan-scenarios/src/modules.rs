//! Which capacity-type, operational-type and reserve modules a scenario needs.
//!
//! Tags from the project portfolio are parsed here and nowhere else. Anything
//! not listed in [`RequiredModules`] is never instantiated for the run.

use crate::resolver::{ResolvedScenario, PROJECT_PORTFOLIO};
use crate::store::{ConfigSource, ProjectPortfolio};
use gridplan_core::{CapacityType, GridplanError, GridplanResult, OperationalType, ReserveProduct};
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequiredModules {
    pub capacity_types: BTreeSet<CapacityType>,
    pub operational_types: BTreeSet<OperationalType>,
    pub reserve_products: Vec<ReserveProduct>,
}

impl RequiredModules {
    /// Module names in load order.
    pub fn load_order(&self) -> Vec<&'static str> {
        self.capacity_types
            .iter()
            .map(CapacityType::as_str)
            .chain(self.operational_types.iter().map(OperationalType::as_str))
            .chain(self.reserve_products.iter().map(ReserveProduct::as_str))
            .collect()
    }
}

fn portfolio<'a, S: ConfigSource + ?Sized>(
    source: &'a S,
    scenario: &ResolvedScenario,
) -> GridplanResult<&'a ProjectPortfolio> {
    let id = scenario.require_subscenario(PROJECT_PORTFOLIO)?;
    source.project_portfolio(id).ok_or_else(|| {
        GridplanError::Config(format!(
            "scenario {} references project portfolio {} which does not exist",
            scenario.scenario_id, id
        ))
    })
}

/// Distinct capacity types among the scenario's portfolio projects.
pub fn required_capacity_types<S: ConfigSource + ?Sized>(
    source: &S,
    scenario: &ResolvedScenario,
) -> GridplanResult<BTreeSet<CapacityType>> {
    portfolio(source, scenario)?
        .projects
        .iter()
        .map(|entry| {
            entry.capacity_type.parse::<CapacityType>().map_err(|e| {
                GridplanError::Config(format!("project '{}': {}", entry.project, e))
            })
        })
        .collect()
}

/// Distinct operational types among the scenario's portfolio projects.
pub fn required_operational_types<S: ConfigSource + ?Sized>(
    source: &S,
    scenario: &ResolvedScenario,
) -> GridplanResult<BTreeSet<OperationalType>> {
    portfolio(source, scenario)?
        .projects
        .iter()
        .map(|entry| {
            entry.operational_type.parse::<OperationalType>().map_err(|e| {
                GridplanError::Config(format!("project '{}': {}", entry.project, e))
            })
        })
        .collect()
}

/// Reserve products whose feature is enabled, in fixed product order.
pub fn required_reserve_products(scenario: &ResolvedScenario) -> Vec<ReserveProduct> {
    ReserveProduct::ALL
        .into_iter()
        .filter(|product| scenario.has_feature(product.feature()))
        .collect()
}

pub fn required_modules<S: ConfigSource + ?Sized>(
    source: &S,
    scenario: &ResolvedScenario,
) -> GridplanResult<RequiredModules> {
    Ok(RequiredModules {
        capacity_types: required_capacity_types(source, scenario)?,
        operational_types: required_operational_types(source, scenario)?,
        reserve_products: required_reserve_products(scenario),
    })
}
