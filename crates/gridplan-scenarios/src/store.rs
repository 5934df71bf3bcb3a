use gridplan_core::{GridplanError, GridplanResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

/// Contents of a scenario configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub scenarios: Vec<ScenarioRecord>,
    #[serde(default)]
    pub temporal: Vec<TemporalSubscenario>,
    #[serde(default)]
    pub project_portfolios: Vec<ProjectPortfolio>,
    /// Feature name → subscenario categories the feature needs.
    #[serde(default)]
    pub feature_subscenarios: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioRecord {
    pub scenario_id: u32,
    #[serde(default)]
    pub scenario_name: String,
    #[serde(default)]
    pub features: BTreeMap<String, bool>,
    #[serde(default)]
    pub subscenarios: BTreeMap<String, u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemporalSubscenario {
    pub id: u32,
    #[serde(default)]
    pub description: Option<String>,
    pub periods: Vec<u32>,
    #[serde(default)]
    pub subproblems: Vec<SubproblemSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubproblemSpec {
    pub id: u32,
    #[serde(default)]
    pub stages: Vec<StageSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageSpec {
    pub id: u32,
    #[serde(default)]
    pub periods: Vec<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectPortfolio {
    pub id: u32,
    #[serde(default)]
    pub projects: Vec<PortfolioEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioEntry {
    pub project: String,
    pub capacity_type: String,
    pub operational_type: String,
}

/// Read access to scenario and subscenario records.
///
/// Resolvers only go through this trait, so a database-backed store can
/// replace the file store without touching them.
pub trait ConfigSource {
    fn scenario(&self, scenario_id: u32) -> Option<&ScenarioRecord>;
    fn temporal(&self, subscenario_id: u32) -> Option<&TemporalSubscenario>;
    fn project_portfolio(&self, subscenario_id: u32) -> Option<&ProjectPortfolio>;
    fn feature_subscenarios(&self) -> &BTreeMap<String, Vec<String>>;
}

/// File-backed [`ConfigSource`].
#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    config: ScenarioConfig,
}

impl ConfigStore {
    /// Wrap parsed configuration, rejecting duplicate record ids.
    pub fn new(config: ScenarioConfig) -> GridplanResult<Self> {
        check_unique("scenario_id", config.scenarios.iter().map(|s| s.scenario_id))?;
        check_unique("temporal subscenario id", config.temporal.iter().map(|t| t.id))?;
        check_unique(
            "project portfolio id",
            config.project_portfolios.iter().map(|p| p.id),
        )?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ScenarioConfig {
        &self.config
    }
}

fn check_unique(label: &str, ids: impl Iterator<Item = u32>) -> GridplanResult<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(GridplanError::Config(format!(
                "duplicate {} '{}' in configuration",
                label, id
            )));
        }
    }
    Ok(())
}

impl ConfigSource for ConfigStore {
    fn scenario(&self, scenario_id: u32) -> Option<&ScenarioRecord> {
        self.config
            .scenarios
            .iter()
            .find(|s| s.scenario_id == scenario_id)
    }

    fn temporal(&self, subscenario_id: u32) -> Option<&TemporalSubscenario> {
        self.config.temporal.iter().find(|t| t.id == subscenario_id)
    }

    fn project_portfolio(&self, subscenario_id: u32) -> Option<&ProjectPortfolio> {
        self.config
            .project_portfolios
            .iter()
            .find(|p| p.id == subscenario_id)
    }

    fn feature_subscenarios(&self) -> &BTreeMap<String, Vec<String>> {
        &self.config.feature_subscenarios
    }
}

/// Load a configuration file; the extension picks YAML or JSON, YAML otherwise.
pub fn load_config_from_path(path: &Path) -> GridplanResult<ConfigStore> {
    let data = fs::read_to_string(path).map_err(|e| {
        GridplanError::Config(format!("reading configuration '{}': {}", path.display(), e))
    })?;
    let parse_err = |e: String| {
        GridplanError::Config(format!("parsing configuration '{}': {}", path.display(), e))
    };
    let config: ScenarioConfig = match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
            serde_yaml::from_str(&data).map_err(|e| parse_err(e.to_string()))?
        }
        Some(ext) if ext.eq_ignore_ascii_case("json") => {
            serde_json::from_str(&data).map_err(|e| parse_err(e.to_string()))?
        }
        _ => serde_yaml::from_str(&data)
            .or_else(|_| serde_json::from_str(&data))
            .map_err(|e| parse_err(e.to_string()))?,
    };
    ConfigStore::new(config)
}
