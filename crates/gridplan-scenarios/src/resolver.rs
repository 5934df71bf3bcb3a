//! Scenario id → enabled features and subscenario ids.

use crate::store::ConfigSource;
use gridplan_core::{Feature, GridplanError, GridplanResult};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

pub const TEMPORAL: &str = "temporal_scenario_id";
pub const PROJECT_PORTFOLIO: &str = "project_portfolio_scenario_id";

/// Every subscenario category a scenario record may bind.
pub const SUBSCENARIO_CATEGORIES: &[&str] = &[
    "temporal_scenario_id",
    "load_zone_scenario_id",
    "lf_reserves_up_ba_scenario_id",
    "lf_reserves_down_ba_scenario_id",
    "regulation_up_ba_scenario_id",
    "regulation_down_ba_scenario_id",
    "frequency_response_ba_scenario_id",
    "spinning_reserves_ba_scenario_id",
    "rps_zone_scenario_id",
    "carbon_cap_zone_scenario_id",
    "prm_zone_scenario_id",
    "local_capacity_zone_scenario_id",
    "project_portfolio_scenario_id",
    "project_load_zone_scenario_id",
    "project_lf_reserves_up_ba_scenario_id",
    "project_lf_reserves_down_ba_scenario_id",
    "project_regulation_up_ba_scenario_id",
    "project_regulation_down_ba_scenario_id",
    "project_frequency_response_ba_scenario_id",
    "project_spinning_reserves_ba_scenario_id",
    "project_rps_zone_scenario_id",
    "project_carbon_cap_zone_scenario_id",
    "project_prm_zone_scenario_id",
    "project_elcc_chars_scenario_id",
    "project_local_capacity_zone_scenario_id",
    "project_local_capacity_chars_scenario_id",
    "project_existing_capacity_scenario_id",
    "project_existing_fixed_cost_scenario_id",
    "project_new_cost_scenario_id",
    "project_new_potential_scenario_id",
    "prm_energy_only_scenario_id",
    "project_operational_chars_scenario_id",
    "project_availability_scenario_id",
    "fuel_scenario_id",
    "fuel_price_scenario_id",
    "transmission_portfolio_scenario_id",
    "transmission_load_zone_scenario_id",
    "transmission_existing_capacity_scenario_id",
    "transmission_operational_chars_scenario_id",
    "transmission_hurdle_rate_scenario_id",
    "transmission_carbon_cap_zone_scenario_id",
    "transmission_simultaneous_flow_limit_scenario_id",
    "transmission_simultaneous_flow_limit_line_group_scenario_id",
    "load_scenario_id",
    "lf_reserves_up_scenario_id",
    "lf_reserves_down_scenario_id",
    "regulation_up_scenario_id",
    "regulation_down_scenario_id",
    "frequency_response_scenario_id",
    "spinning_reserves_scenario_id",
    "rps_target_scenario_id",
    "carbon_cap_target_scenario_id",
    "prm_requirement_scenario_id",
    "elcc_surface_scenario_id",
    "local_capacity_requirement_scenario_id",
    "tuning_scenario_id",
];

fn check_category(category: &str) -> GridplanResult<()> {
    if SUBSCENARIO_CATEGORIES.contains(&category) {
        Ok(())
    } else {
        Err(GridplanError::Config(format!(
            "unknown subscenario category '{}'",
            category
        )))
    }
}

/// Read-only view of one scenario for the duration of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedScenario {
    pub scenario_id: u32,
    pub scenario_name: String,
    pub features: BTreeSet<Feature>,
    pub subscenario_ids: BTreeMap<String, u32>,
    /// Categories each enabled feature needs bound.
    pub subscenarios_by_feature: BTreeMap<Feature, Vec<String>>,
}

impl ResolvedScenario {
    pub fn has_feature(&self, feature: Feature) -> bool {
        self.features.contains(&feature)
    }

    /// Enabled features in canonical order.
    pub fn feature_list(&self) -> Vec<Feature> {
        self.features.iter().copied().collect()
    }

    pub fn subscenario(&self, category: &str) -> Option<u32> {
        self.subscenario_ids.get(category).copied()
    }

    pub fn require_subscenario(&self, category: &str) -> GridplanResult<u32> {
        self.subscenario(category)
            .ok_or_else(|| GridplanError::MissingSubscenario {
                scenario_id: self.scenario_id,
                category: category.to_string(),
            })
    }

    /// Categories that must be bound before a model can be built.
    pub fn required_subscenario_categories(&self) -> Vec<String> {
        let mut categories = vec![TEMPORAL.to_string(), PROJECT_PORTFOLIO.to_string()];
        for feature in &self.features {
            if let Some(needed) = self.subscenarios_by_feature.get(feature) {
                for category in needed {
                    if !categories.contains(category) {
                        categories.push(category.clone());
                    }
                }
            }
        }
        categories
    }

    pub fn validate_required_subscenarios(&self) -> GridplanResult<()> {
        for category in self.required_subscenario_categories() {
            self.require_subscenario(&category)?;
        }
        Ok(())
    }
}

/// Default categories of a feature when the store does not list any.
fn default_feature_subscenarios(feature: Feature) -> Vec<String> {
    match feature.reserve_product() {
        Some(product) => {
            let d = product.descriptor();
            vec![d.ba_subscenario.to_string(), d.requirement_subscenario.to_string()]
        }
        None => Vec::new(),
    }
}

/// Resolve a scenario id against the store.
///
/// Fails with `NotFound` for an unknown id and with a configuration error for
/// unknown feature names or subscenario categories.
pub fn resolve_scenario<S: ConfigSource + ?Sized>(
    source: &S,
    scenario_id: u32,
) -> GridplanResult<ResolvedScenario> {
    let record = source
        .scenario(scenario_id)
        .ok_or_else(|| GridplanError::NotFound {
            kind: "scenario",
            id: scenario_id.to_string(),
        })?;

    let mut features = BTreeSet::new();
    for (name, enabled) in &record.features {
        let feature: Feature = name.parse()?;
        if *enabled {
            features.insert(feature);
        }
    }

    for category in record.subscenarios.keys() {
        check_category(category)?;
    }

    let mut declared = BTreeMap::new();
    for (name, categories) in source.feature_subscenarios() {
        let feature: Feature = name.parse()?;
        for category in categories {
            check_category(category)?;
        }
        declared.insert(feature, categories.clone());
    }
    let subscenarios_by_feature = features
        .iter()
        .map(|feature| {
            let categories = declared
                .get(feature)
                .cloned()
                .unwrap_or_else(|| default_feature_subscenarios(*feature));
            (*feature, categories)
        })
        .collect();

    debug!(
        scenario_id,
        features = features.len(),
        subscenarios = record.subscenarios.len(),
        "resolved scenario"
    );

    Ok(ResolvedScenario {
        scenario_id,
        scenario_name: record.scenario_name.clone(),
        features,
        subscenario_ids: record.subscenarios.clone(),
        subscenarios_by_feature,
    })
}
