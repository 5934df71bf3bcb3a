//! Typed per-run inputs read from a run directory's `inputs/` folder.
//!
//! The base tables every build needs are read eagerly by [`RunInputs::load`].
//! Reserve tables and the reserve columns of `projects.tab` are read on demand
//! so that inactive reserve products never touch (or validate) their inputs.

use crate::layout::RunDirectory;
use crate::tab::{read_rows, TabTable};
use gridplan_core::{
    BalancingArea, BalancingAreaSettings, CapacityType, GridplanError, GridplanResult, LoadZone,
    OperationalType, Period, PeriodInfo, ProjectId, ReserveProduct, TemporalStructure, Timepoint,
    TimepointInfo,
};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const PERIODS_FILE: &str = "periods.tab";
pub const TIMEPOINTS_FILE: &str = "timepoints.tab";
pub const PROJECTS_FILE: &str = "projects.tab";
pub const PERIOD_PARAMS_FILE: &str = "existing_generation_period_params.tab";
pub const LOAD_ZONES_FILE: &str = "load_zones.tab";
pub const LOAD_FILE: &str = "load_mw.tab";

fn default_weight() -> f64 {
    1.0
}

#[derive(Debug, Deserialize)]
struct PeriodRow {
    period: u32,
    #[serde(default = "default_weight")]
    discount_factor: f64,
    #[serde(default = "default_weight")]
    number_years_represented: f64,
}

#[derive(Debug, Deserialize)]
struct TimepointRow {
    timepoint: u32,
    period: u32,
    #[serde(default = "default_weight")]
    number_of_hours_in_timepoint: f64,
}

#[derive(Debug, Deserialize)]
struct ProjectRow {
    project: String,
    capacity_type: String,
    operational_type: String,
    #[serde(default)]
    technology: String,
    load_zone: String,
    #[serde(default)]
    variable_om_cost_per_mwh: f64,
    #[serde(default)]
    min_stable_level_fraction: f64,
}

/// Row of `projects.tab` with its module tags parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectRecord {
    pub project: ProjectId,
    pub capacity_type: CapacityType,
    pub operational_type: OperationalType,
    pub technology: String,
    pub load_zone: LoadZone,
    pub variable_om_cost_per_mwh: f64,
    pub min_stable_level_fraction: f64,
}

/// Row of `existing_generation_period_params.tab`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PeriodParams {
    pub project: ProjectId,
    pub period: Period,
    pub existing_capacity_mw: f64,
    pub fixed_cost_per_mw_yr: f64,
}

/// Row of `load_zones.tab`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoadZoneParams {
    pub load_zone: LoadZone,
    pub overgeneration_penalty_per_mw: f64,
    pub unserved_energy_penalty_per_mw: f64,
}

#[derive(Debug, Deserialize)]
struct LoadRow {
    load_zone: LoadZone,
    timepoint: Timepoint,
    load_mw: f64,
}

#[derive(Debug, Deserialize)]
struct RequirementRow {
    ba: BalancingArea,
    timepoint: Timepoint,
    requirement_mw: f64,
}

#[derive(Debug, Deserialize)]
struct BalancingAreaRow {
    balancing_area: BalancingArea,
    #[serde(default)]
    allow_violation: u8,
    #[serde(default)]
    violation_penalty_per_mw: f64,
}

/// Balancing area and derate of a project for one reserve product.
#[derive(Debug, Clone, PartialEq)]
pub struct ReserveEligibility {
    pub balancing_area: BalancingArea,
    pub derate: f64,
}

/// Everything a build reads from `inputs/`.
#[derive(Debug, Clone)]
pub struct RunInputs {
    inputs_dir: PathBuf,
    temporal: TemporalStructure,
    projects: BTreeMap<ProjectId, ProjectRecord>,
    period_params: Vec<PeriodParams>,
    operational: BTreeSet<(ProjectId, Period)>,
    load_zones: BTreeMap<LoadZone, LoadZoneParams>,
    load: BTreeMap<(LoadZone, Timepoint), f64>,
}

impl RunInputs {
    pub fn load(run: &RunDirectory) -> GridplanResult<Self> {
        Self::load_from_dir(&run.inputs_dir())
    }

    pub fn load_from_dir(inputs_dir: &Path) -> GridplanResult<Self> {
        let periods_path = inputs_dir.join(PERIODS_FILE);
        let periods: Vec<PeriodRow> = read_rows(&periods_path)?;
        let timepoints: Vec<TimepointRow> = read_rows(&inputs_dir.join(TIMEPOINTS_FILE))?;
        let temporal = TemporalStructure::new(
            periods.into_iter().map(|row| PeriodInfo {
                period: Period::new(row.period),
                discount_factor: row.discount_factor,
                number_years_represented: row.number_years_represented,
            }),
            timepoints.into_iter().map(|row| TimepointInfo {
                timepoint: Timepoint::new(row.timepoint),
                period: Period::new(row.period),
                number_of_hours_in_timepoint: row.number_of_hours_in_timepoint,
            }),
        )
        .map_err(|e| GridplanError::input(&periods_path, e.to_string()))?;

        let projects_path = inputs_dir.join(PROJECTS_FILE);
        let mut projects = BTreeMap::new();
        for row in read_rows::<ProjectRow>(&projects_path)? {
            let record = parse_project(&projects_path, row)?;
            if projects.contains_key(&record.project) {
                return Err(GridplanError::input(
                    &projects_path,
                    format!("project '{}' listed more than once", record.project),
                ));
            }
            projects.insert(record.project.clone(), record);
        }

        let params_path = inputs_dir.join(PERIOD_PARAMS_FILE);
        let period_params: Vec<PeriodParams> = read_rows(&params_path)?;
        let mut operational = BTreeSet::new();
        for row in &period_params {
            if !projects.contains_key(&row.project) {
                return Err(GridplanError::input(
                    &params_path,
                    format!("project '{}' is not in {}", row.project, PROJECTS_FILE),
                ));
            }
            if !operational.insert((row.project.clone(), row.period)) {
                return Err(GridplanError::input(
                    &params_path,
                    format!(
                        "project '{}' has more than one row for period {}",
                        row.project, row.period
                    ),
                ));
            }
        }

        let load_zones = read_rows::<LoadZoneParams>(&inputs_dir.join(LOAD_ZONES_FILE))?
            .into_iter()
            .map(|row| (row.load_zone.clone(), row))
            .collect();

        let load = read_rows::<LoadRow>(&inputs_dir.join(LOAD_FILE))?
            .into_iter()
            .map(|row| ((row.load_zone, row.timepoint), row.load_mw))
            .collect();

        debug!(
            dir = %inputs_dir.display(),
            projects = projects.len(),
            period_params = period_params.len(),
            "loaded run inputs"
        );

        Ok(Self {
            inputs_dir: inputs_dir.to_path_buf(),
            temporal,
            projects,
            period_params,
            operational,
            load_zones,
            load,
        })
    }

    pub fn inputs_dir(&self) -> &Path {
        &self.inputs_dir
    }

    pub fn temporal(&self) -> &TemporalStructure {
        &self.temporal
    }

    pub fn projects(&self) -> impl Iterator<Item = &ProjectRecord> {
        self.projects.values()
    }

    pub fn project(&self, project: &ProjectId) -> Option<&ProjectRecord> {
        self.projects.get(project)
    }

    /// Period-parameter rows of projects with the given capacity type, in file order.
    pub fn period_params_for(&self, capacity_type: CapacityType) -> impl Iterator<Item = &PeriodParams> {
        self.period_params.iter().filter(move |row| {
            self.projects
                .get(&row.project)
                .is_some_and(|p| p.capacity_type == capacity_type)
        })
    }

    /// Whether the project has capacity in `period`.
    pub fn is_operational(&self, project: &ProjectId, period: Period) -> bool {
        self.operational.contains(&(project.clone(), period))
    }

    /// (project, timepoint) pairs of projects with the given operational type.
    pub fn operational_timepoints(
        &self,
        operational_type: OperationalType,
    ) -> Vec<(&ProjectRecord, &TimepointInfo)> {
        let mut out = Vec::new();
        for project in self.projects.values() {
            if project.operational_type != operational_type {
                continue;
            }
            for tmp in self.temporal.timepoints() {
                if self.is_operational(&project.project, tmp.period) {
                    out.push((project, tmp));
                }
            }
        }
        out
    }

    pub fn load_zones(&self) -> impl Iterator<Item = &LoadZoneParams> {
        self.load_zones.values()
    }

    pub fn load_mw(&self, zone: &LoadZone, timepoint: Timepoint) -> f64 {
        self.load.get(&(zone.clone(), timepoint)).copied().unwrap_or(0.0)
    }

    /// Projects with a balancing area for `product`, read from the
    /// `<product>_ba` and `<product>_derate` columns of `projects.tab`.
    ///
    /// A missing `_ba` column means no project provides the product; a
    /// missing or `.` derate means 1.0.
    pub fn reserve_eligibility(
        &self,
        product: ReserveProduct,
    ) -> GridplanResult<BTreeMap<ProjectId, ReserveEligibility>> {
        let descriptor = product.descriptor();
        let table = TabTable::read(&self.inputs_dir.join(PROJECTS_FILE))?;
        let mut out = BTreeMap::new();
        let Some(ba_col) = table.column(descriptor.ba_column) else {
            return Ok(out);
        };
        let project_col = table.require_column("project")?;
        let derate_col = table.column(descriptor.derate_column);
        for row in table.rows() {
            let Some(area) = table.cell(row, ba_col) else {
                continue;
            };
            let project = table
                .cell(row, project_col)
                .ok_or_else(|| GridplanError::input(table.path(), "empty project name"))?;
            let derate = match derate_col {
                Some(col) => table.parse_f64(row, col)?.unwrap_or(1.0),
                None => 1.0,
            };
            out.insert(
                ProjectId::new(project),
                ReserveEligibility {
                    balancing_area: BalancingArea::new(area),
                    derate,
                },
            );
        }
        Ok(out)
    }

    /// `<product>_requirement.tab` keyed by (balancing area, timepoint).
    pub fn reserve_requirements(
        &self,
        product: ReserveProduct,
    ) -> GridplanResult<BTreeMap<(BalancingArea, Timepoint), f64>> {
        let path = self.inputs_dir.join(product.descriptor().requirement_file);
        let mut out = BTreeMap::new();
        for row in read_rows::<RequirementRow>(&path)? {
            if self.temporal.timepoint(row.timepoint).is_none() {
                return Err(GridplanError::input(
                    &path,
                    format!("timepoint {} is not in {}", row.timepoint, TIMEPOINTS_FILE),
                ));
            }
            out.insert((row.ba, row.timepoint), row.requirement_mw);
        }
        Ok(out)
    }

    /// `<product>_balancing_areas.tab`.
    pub fn reserve_balancing_areas(
        &self,
        product: ReserveProduct,
    ) -> GridplanResult<BTreeMap<BalancingArea, BalancingAreaSettings>> {
        let path = self.inputs_dir.join(product.descriptor().balancing_areas_file);
        Ok(read_rows::<BalancingAreaRow>(&path)?
            .into_iter()
            .map(|row| {
                (
                    row.balancing_area,
                    BalancingAreaSettings {
                        allow_violation: row.allow_violation != 0,
                        violation_penalty_per_mw: row.violation_penalty_per_mw,
                    },
                )
            })
            .collect())
    }
}

fn parse_project(path: &Path, row: ProjectRow) -> GridplanResult<ProjectRecord> {
    let capacity_type = row
        .capacity_type
        .parse::<CapacityType>()
        .map_err(|e| GridplanError::input(path, format!("project '{}': {}", row.project, e)))?;
    let operational_type = row
        .operational_type
        .parse::<OperationalType>()
        .map_err(|e| GridplanError::input(path, format!("project '{}': {}", row.project, e)))?;
    Ok(ProjectRecord {
        project: ProjectId::new(row.project),
        capacity_type,
        operational_type,
        technology: row.technology,
        load_zone: LoadZone::new(row.load_zone),
        variable_om_cost_per_mwh: row.variable_om_cost_per_mwh,
        min_stable_level_fraction: row.min_stable_level_fraction,
    })
}
