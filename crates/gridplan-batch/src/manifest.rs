//! `run_manifest.json`: what happened to every unit of a scenario run.
//!
//! Records are nested by subproblem id, then stage id, so a reader finds a
//! unit by its (subproblem, stage) coordinates rather than by a label.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use gridplan_core::Period;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::job::UnitJob;

/// How a unit ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UnitOutcome {
    Solved { objective: f64, files: usize },
    Failed { error: String },
}

impl UnitOutcome {
    pub fn is_solved(&self) -> bool {
        matches!(self, UnitOutcome::Solved { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitRecord {
    pub periods: Vec<Period>,
    pub results_dir: PathBuf,
    pub outcome: UnitOutcome,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub created_at: DateTime<Utc>,
    pub scenario_id: u32,
    pub scenario_name: String,
    pub solver: String,
    /// Modules in load order
    pub modules: Vec<String>,
    /// subproblem id -> stage id -> record
    pub subproblems: BTreeMap<u32, BTreeMap<u32, UnitRecord>>,
}

impl RunManifest {
    pub fn new(scenario_id: u32, scenario_name: &str, solver: &str, modules: Vec<String>) -> Self {
        Self {
            created_at: Utc::now(),
            scenario_id,
            scenario_name: scenario_name.to_string(),
            solver: solver.to_string(),
            modules,
            subproblems: BTreeMap::new(),
        }
    }

    pub fn record(&mut self, job: &UnitJob, record: UnitRecord) -> Result<()> {
        let stages = self.subproblems.entry(job.subproblem).or_default();
        if stages.contains_key(&job.stage) {
            bail!("unit {} recorded twice", job);
        }
        stages.insert(job.stage, record);
        Ok(())
    }

    pub fn unit(&self, subproblem: u32, stage: u32) -> Option<&UnitRecord> {
        self.subproblems.get(&subproblem)?.get(&stage)
    }

    /// ((subproblem, stage), record) in execution order.
    pub fn units(&self) -> impl Iterator<Item = ((u32, u32), &UnitRecord)> {
        self.subproblems.iter().flat_map(|(subproblem, stages)| {
            stages
                .iter()
                .map(move |(stage, record)| ((*subproblem, *stage), record))
        })
    }

    pub fn solved(&self) -> usize {
        self.units().filter(|(_, r)| r.outcome.is_solved()).count()
    }

    pub fn failed(&self) -> usize {
        self.units().filter(|(_, r)| !r.outcome.is_solved()).count()
    }
}

pub fn write_run_manifest(path: &Path, manifest: &RunManifest) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating manifest directory '{}'", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(manifest).context("serializing run manifest")?;
    fs::write(path, json).with_context(|| format!("writing run manifest '{}'", path.display()))
}

pub fn load_run_manifest(path: &Path) -> Result<RunManifest> {
    let file = fs::File::open(path)
        .with_context(|| format!("opening run manifest '{}'", path.display()))?;
    serde_json::from_reader(file)
        .with_context(|| format!("parsing run manifest '{}'", path.display()))
}
