use anyhow::{Context, Result};
use gridplan_cli::cli::ScenarioCommands;
use gridplan_scenarios::{
    load_config_from_path, required_modules, resolve_scenario, resolve_subproblems, ConfigStore,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Serialize)]
struct ResolvedView<'a> {
    scenario_id: u32,
    scenario_name: &'a str,
    features: Vec<&'static str>,
    subscenarios: &'a BTreeMap<String, u32>,
    required_subscenarios: Vec<String>,
    modules: Vec<&'static str>,
}

pub fn handle(command: &ScenarioCommands) -> Result<()> {
    match command {
        ScenarioCommands::Resolve {
            config,
            scenario_id,
        } => resolve(config, *scenario_id),
        ScenarioCommands::Stages {
            config,
            scenario_id,
        } => stages(config, *scenario_id),
    }
}

pub fn load_store(path: &Path) -> Result<ConfigStore> {
    load_config_from_path(path)
        .with_context(|| format!("loading scenario configuration '{}'", path.display()))
}

fn resolve(config: &Path, scenario_id: u32) -> Result<()> {
    let store = load_store(config)?;
    let scenario = resolve_scenario(&store, scenario_id)
        .with_context(|| format!("resolving scenario {}", scenario_id))?;
    let modules = required_modules(&store, &scenario)
        .with_context(|| format!("selecting modules for scenario {}", scenario_id))?;
    let view = ResolvedView {
        scenario_id: scenario.scenario_id,
        scenario_name: &scenario.scenario_name,
        features: scenario.feature_list().iter().map(|f| f.as_str()).collect(),
        subscenarios: &scenario.subscenario_ids,
        required_subscenarios: scenario.required_subscenario_categories(),
        modules: modules.load_order(),
    };
    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}

fn stages(config: &Path, scenario_id: u32) -> Result<()> {
    let store = load_store(config)?;
    let subproblems = resolve_subproblems(&store, scenario_id)
        .with_context(|| format!("enumerating stages of scenario {}", scenario_id))?;
    println!("{}", serde_json::to_string_pretty(&subproblems)?);
    Ok(())
}
