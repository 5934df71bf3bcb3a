//! Temporal structure of one (subproblem, stage) build.
//!
//! Periods are ordered by year; `first_period` and `previous_period` follow
//! that order. Timepoints belong to exactly one period.

use crate::error::{GridplanError, GridplanResult};
use crate::ids::{Period, Timepoint};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Objective weighting of a study period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodInfo {
    pub period: Period,
    pub discount_factor: f64,
    pub number_years_represented: f64,
}

impl PeriodInfo {
    pub fn new(period: u32) -> Self {
        Self {
            period: Period::new(period),
            discount_factor: 1.0,
            number_years_represented: 1.0,
        }
    }

    /// Multiplier applied to annualized costs incurred in this period.
    pub fn objective_weight(&self) -> f64 {
        self.discount_factor * self.number_years_represented
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimepointInfo {
    pub timepoint: Timepoint,
    pub period: Period,
    pub number_of_hours_in_timepoint: f64,
}

#[derive(Debug, Clone, Default)]
pub struct TemporalStructure {
    periods: BTreeMap<Period, PeriodInfo>,
    timepoints: BTreeMap<Timepoint, TimepointInfo>,
}

impl TemporalStructure {
    /// Build from period and timepoint rows.
    ///
    /// Fails when a period is listed twice, a timepoint is listed twice, or a
    /// timepoint points at an undefined period.
    pub fn new(
        periods: impl IntoIterator<Item = PeriodInfo>,
        timepoints: impl IntoIterator<Item = TimepointInfo>,
    ) -> GridplanResult<Self> {
        let mut by_period = BTreeMap::new();
        for info in periods {
            if by_period.insert(info.period, info).is_some() {
                return Err(GridplanError::Validation(format!(
                    "period {} is defined more than once",
                    info.period
                )));
            }
        }
        let mut by_timepoint = BTreeMap::new();
        for info in timepoints {
            if !by_period.contains_key(&info.period) {
                return Err(GridplanError::Validation(format!(
                    "timepoint {} references undefined period {}",
                    info.timepoint, info.period
                )));
            }
            if by_timepoint.insert(info.timepoint, info).is_some() {
                return Err(GridplanError::Validation(format!(
                    "timepoint {} is defined more than once",
                    info.timepoint
                )));
            }
        }
        Ok(Self {
            periods: by_period,
            timepoints: by_timepoint,
        })
    }

    pub fn periods(&self) -> impl Iterator<Item = &PeriodInfo> {
        self.periods.values()
    }

    pub fn timepoints(&self) -> impl Iterator<Item = &TimepointInfo> {
        self.timepoints.values()
    }

    pub fn first_period(&self) -> Option<Period> {
        self.periods.keys().next().copied()
    }

    /// Period immediately before `period` in the ordered period set.
    pub fn previous_period(&self, period: Period) -> Option<Period> {
        self.periods.range(..period).next_back().map(|(p, _)| *p)
    }

    pub fn period(&self, period: Period) -> Option<&PeriodInfo> {
        self.periods.get(&period)
    }

    pub fn contains_period(&self, period: Period) -> bool {
        self.periods.contains_key(&period)
    }

    pub fn period_of(&self, timepoint: Timepoint) -> Option<Period> {
        self.timepoints.get(&timepoint).map(|t| t.period)
    }

    pub fn timepoint(&self, timepoint: Timepoint) -> Option<&TimepointInfo> {
        self.timepoints.get(&timepoint)
    }

    /// Weight of one MW of output sustained through a timepoint, in objective units.
    pub fn timepoint_objective_weight(&self, timepoint: Timepoint) -> f64 {
        self.timepoints
            .get(&timepoint)
            .map(|t| {
                let period_weight = self
                    .periods
                    .get(&t.period)
                    .map(PeriodInfo::objective_weight)
                    .unwrap_or(0.0);
                t.number_of_hours_in_timepoint * period_weight
            })
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn structure() -> TemporalStructure {
        TemporalStructure::new(
            [PeriodInfo::new(2024), PeriodInfo::new(2020), PeriodInfo::new(2022)],
            [TimepointInfo {
                timepoint: Timepoint::new(1),
                period: Period::new(2020),
                number_of_hours_in_timepoint: 2.0,
            }],
        )
        .unwrap()
    }

    #[test]
    fn previous_period_follows_year_order() {
        let t = structure();
        assert_eq!(t.first_period(), Some(Period::new(2020)));
        assert_eq!(t.previous_period(Period::new(2020)), None);
        assert_eq!(t.previous_period(Period::new(2022)), Some(Period::new(2020)));
        assert_eq!(t.previous_period(Period::new(2024)), Some(Period::new(2022)));
    }

    #[test]
    fn timepoint_weight_includes_period_weight() {
        let t = TemporalStructure::new(
            [PeriodInfo {
                period: Period::new(2030),
                discount_factor: 0.5,
                number_years_represented: 10.0,
            }],
            [TimepointInfo {
                timepoint: Timepoint::new(7),
                period: Period::new(2030),
                number_of_hours_in_timepoint: 4.0,
            }],
        )
        .unwrap();
        assert_eq!(t.timepoint_objective_weight(Timepoint::new(7)), 20.0);
        assert_eq!(t.timepoint_objective_weight(Timepoint::new(8)), 0.0);
    }

    #[test]
    fn orphan_timepoint_is_rejected() {
        let err = TemporalStructure::new(
            [PeriodInfo::new(2020)],
            [TimepointInfo {
                timepoint: Timepoint::new(1),
                period: Period::new(2030),
                number_of_hours_in_timepoint: 1.0,
            }],
        )
        .unwrap_err();
        assert!(err.to_string().contains("undefined period 2030"));
    }
}
