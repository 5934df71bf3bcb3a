//! Subproblem/stage enumeration.

use crate::resolver::{resolve_scenario, ResolvedScenario, TEMPORAL};
use crate::store::ConfigSource;
use gridplan_core::{GridplanError, GridplanResult, Period};
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stage {
    pub id: u32,
    pub periods: Vec<Period>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subproblem {
    pub id: u32,
    pub stages: Vec<Stage>,
}

/// Ordered subproblems and stages for a scenario id.
pub fn resolve_subproblems<S: ConfigSource + ?Sized>(
    source: &S,
    scenario_id: u32,
) -> GridplanResult<Vec<Subproblem>> {
    let scenario = resolve_scenario(source, scenario_id)?;
    subproblems_for(source, &scenario)
}

/// Ordered subproblems and stages of an already resolved scenario.
///
/// Every stage must reference at least one period, and each period must be
/// defined by the scenario's temporal subscenario.
pub fn subproblems_for<S: ConfigSource + ?Sized>(
    source: &S,
    scenario: &ResolvedScenario,
) -> GridplanResult<Vec<Subproblem>> {
    let temporal_id = scenario.require_subscenario(TEMPORAL)?;
    let temporal = source.temporal(temporal_id).ok_or_else(|| {
        GridplanError::Config(format!(
            "scenario {} references temporal subscenario {} which does not exist",
            scenario.scenario_id, temporal_id
        ))
    })?;
    if temporal.subproblems.is_empty() {
        return Err(GridplanError::Config(format!(
            "temporal subscenario {} defines no subproblems",
            temporal_id
        )));
    }

    let defined: BTreeSet<u32> = temporal.periods.iter().copied().collect();
    let mut subproblem_ids = BTreeSet::new();
    let mut subproblems = Vec::with_capacity(temporal.subproblems.len());
    for spec in &temporal.subproblems {
        if !subproblem_ids.insert(spec.id) {
            return Err(GridplanError::Config(format!(
                "temporal subscenario {} lists subproblem {} twice",
                temporal_id, spec.id
            )));
        }
        if spec.stages.is_empty() {
            return Err(GridplanError::Config(format!(
                "subproblem {} has no stages",
                spec.id
            )));
        }
        let mut stage_ids = BTreeSet::new();
        let mut stages = Vec::with_capacity(spec.stages.len());
        for stage in &spec.stages {
            if !stage_ids.insert(stage.id) {
                return Err(GridplanError::Config(format!(
                    "subproblem {} lists stage {} twice",
                    spec.id, stage.id
                )));
            }
            if stage.periods.is_empty() {
                return Err(GridplanError::Config(format!(
                    "stage {} of subproblem {} references no temporal period",
                    stage.id, spec.id
                )));
            }
            if let Some(orphan) = stage.periods.iter().find(|p| !defined.contains(*p)) {
                return Err(GridplanError::Config(format!(
                    "stage {} of subproblem {} references period {} not defined by temporal subscenario {}",
                    stage.id, spec.id, orphan, temporal_id
                )));
            }
            let mut periods: Vec<Period> = stage.periods.iter().map(|p| Period::new(*p)).collect();
            periods.sort();
            periods.dedup();
            stages.push(Stage {
                id: stage.id,
                periods,
            });
        }
        stages.sort_by_key(|s| s.id);
        subproblems.push(Subproblem {
            id: spec.id,
            stages,
        });
    }
    subproblems.sort_by_key(|s| s.id);
    Ok(subproblems)
}
