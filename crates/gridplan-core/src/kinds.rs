//! Closed sets of module tags.
//!
//! Capacity types, operational types, reserve products and optional features
//! arrive as strings from the configuration store and the `projects.tab`
//! table. They are parsed here, once, into enums; everything downstream
//! matches on variants instead of comparing strings.
//!
//! Variant declaration order is the module load order.

use crate::error::GridplanError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

fn unknown_tag(kind: &str, label: &str, available: &[&str]) -> GridplanError {
    GridplanError::Config(format!(
        "unknown {} '{}'; supported values: {}",
        kind,
        label,
        available.join(", ")
    ))
}

/// Capacity-type module tag of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapacityType {
    /// Pre-specified capacity, no decisions
    GenSpec,
    /// Pre-specified capacity that may be retired linearly
    GenRetLin,
}

impl CapacityType {
    pub const ALL: [CapacityType; 2] = [CapacityType::GenSpec, CapacityType::GenRetLin];

    pub fn as_str(&self) -> &'static str {
        match self {
            CapacityType::GenSpec => "gen_spec",
            CapacityType::GenRetLin => "gen_ret_lin",
        }
    }

    pub fn available() -> &'static [&'static str] {
        &["gen_spec", "gen_ret_lin"]
    }
}

impl FromStr for CapacityType {
    type Err = GridplanError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "gen_spec" => Ok(CapacityType::GenSpec),
            "gen_ret_lin" => Ok(CapacityType::GenRetLin),
            other => Err(unknown_tag("capacity type", other, Self::available())),
        }
    }
}

impl fmt::Display for CapacityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operational-type module tag of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationalType {
    /// Dispatchable between a minimum stable level and capacity
    GenSimple,
    /// Always at full capacity
    GenMustRun,
}

impl OperationalType {
    pub const ALL: [OperationalType; 2] = [OperationalType::GenSimple, OperationalType::GenMustRun];

    pub fn as_str(&self) -> &'static str {
        match self {
            OperationalType::GenSimple => "gen_simple",
            OperationalType::GenMustRun => "gen_must_run",
        }
    }

    pub fn available() -> &'static [&'static str] {
        &["gen_simple", "gen_must_run"]
    }
}

impl FromStr for OperationalType {
    type Err = GridplanError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "gen_simple" => Ok(OperationalType::GenSimple),
            "gen_must_run" => Ok(OperationalType::GenMustRun),
            other => Err(unknown_tag("operational type", other, Self::available())),
        }
    }
}

impl fmt::Display for OperationalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of a reserve product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReserveDirection {
    Up,
    Down,
}

/// Registry collection a provision variable is aggregated into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RoomTarget {
    Headroom,
    Footroom,
}

impl RoomTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomTarget::Headroom => "headroom_variables",
            RoomTarget::Footroom => "footroom_variables",
        }
    }
}

impl ReserveDirection {
    pub fn room_target(&self) -> RoomTarget {
        match self {
            ReserveDirection::Up => RoomTarget::Headroom,
            ReserveDirection::Down => RoomTarget::Footroom,
        }
    }
}

/// Static parameterization of the generic reserve-provision module.
///
/// Every reserve product is an instantiation of the same template; only the
/// names below differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReserveDescriptor {
    pub product: &'static str,
    pub direction: ReserveDirection,
    /// `projects.tab` column naming the project's balancing area
    pub ba_column: &'static str,
    /// `projects.tab` column holding the provision derate
    pub derate_column: &'static str,
    pub provision_variable: &'static str,
    pub balance_constraint: &'static str,
    pub requirement_file: &'static str,
    pub balancing_areas_file: &'static str,
    pub ba_subscenario: &'static str,
    pub requirement_subscenario: &'static str,
}

impl ReserveDescriptor {
    pub fn room_target(&self) -> RoomTarget {
        self.direction.room_target()
    }
}

const LF_RESERVES_UP: ReserveDescriptor = ReserveDescriptor {
    product: "lf_reserves_up",
    direction: ReserveDirection::Up,
    ba_column: "lf_reserves_up_ba",
    derate_column: "lf_reserves_up_derate",
    provision_variable: "Provide_LF_Reserves_Up_MW",
    balance_constraint: "Meet_LF_Reserves_Up_Constraint",
    requirement_file: "lf_reserves_up_requirement.tab",
    balancing_areas_file: "load_following_up_balancing_areas.tab",
    ba_subscenario: "lf_reserves_up_ba_scenario_id",
    requirement_subscenario: "lf_reserves_up_scenario_id",
};

const LF_RESERVES_DOWN: ReserveDescriptor = ReserveDescriptor {
    product: "lf_reserves_down",
    direction: ReserveDirection::Down,
    ba_column: "lf_reserves_down_ba",
    derate_column: "lf_reserves_down_derate",
    provision_variable: "Provide_LF_Reserves_Down_MW",
    balance_constraint: "Meet_LF_Reserves_Down_Constraint",
    requirement_file: "lf_reserves_down_requirement.tab",
    balancing_areas_file: "load_following_down_balancing_areas.tab",
    ba_subscenario: "lf_reserves_down_ba_scenario_id",
    requirement_subscenario: "lf_reserves_down_scenario_id",
};

const REGULATION_UP: ReserveDescriptor = ReserveDescriptor {
    product: "regulation_up",
    direction: ReserveDirection::Up,
    ba_column: "regulation_up_ba",
    derate_column: "regulation_up_derate",
    provision_variable: "Provide_Regulation_Up_MW",
    balance_constraint: "Meet_Regulation_Up_Constraint",
    requirement_file: "regulation_up_requirement.tab",
    balancing_areas_file: "regulation_up_balancing_areas.tab",
    ba_subscenario: "regulation_up_ba_scenario_id",
    requirement_subscenario: "regulation_up_scenario_id",
};

const REGULATION_DOWN: ReserveDescriptor = ReserveDescriptor {
    product: "regulation_down",
    direction: ReserveDirection::Down,
    ba_column: "regulation_down_ba",
    derate_column: "regulation_down_derate",
    provision_variable: "Provide_Regulation_Down_MW",
    balance_constraint: "Meet_Regulation_Down_Constraint",
    requirement_file: "regulation_down_requirement.tab",
    balancing_areas_file: "regulation_down_balancing_areas.tab",
    ba_subscenario: "regulation_down_ba_scenario_id",
    requirement_subscenario: "regulation_down_scenario_id",
};

const FREQUENCY_RESPONSE: ReserveDescriptor = ReserveDescriptor {
    product: "frequency_response",
    direction: ReserveDirection::Up,
    ba_column: "frequency_response_ba",
    derate_column: "frequency_response_derate",
    provision_variable: "Provide_Frequency_Response_MW",
    balance_constraint: "Meet_Frequency_Response_Constraint",
    requirement_file: "frequency_response_requirement.tab",
    balancing_areas_file: "frequency_response_balancing_areas.tab",
    ba_subscenario: "frequency_response_ba_scenario_id",
    requirement_subscenario: "frequency_response_scenario_id",
};

const SPINNING_RESERVES: ReserveDescriptor = ReserveDescriptor {
    product: "spinning_reserves",
    direction: ReserveDirection::Up,
    ba_column: "spinning_reserves_ba",
    derate_column: "spinning_reserves_derate",
    provision_variable: "Provide_Spinning_Reserves_MW",
    balance_constraint: "Meet_Spinning_Reserves_Constraint",
    requirement_file: "spinning_reserves_requirement.tab",
    balancing_areas_file: "spinning_reserves_balancing_areas.tab",
    ba_subscenario: "spinning_reserves_ba_scenario_id",
    requirement_subscenario: "spinning_reserves_scenario_id",
};

/// Ancillary-service product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReserveProduct {
    LfReservesUp,
    LfReservesDown,
    RegulationUp,
    RegulationDown,
    FrequencyResponse,
    SpinningReserves,
}

impl ReserveProduct {
    pub const ALL: [ReserveProduct; 6] = [
        ReserveProduct::LfReservesUp,
        ReserveProduct::LfReservesDown,
        ReserveProduct::RegulationUp,
        ReserveProduct::RegulationDown,
        ReserveProduct::FrequencyResponse,
        ReserveProduct::SpinningReserves,
    ];

    pub fn descriptor(&self) -> &'static ReserveDescriptor {
        match self {
            ReserveProduct::LfReservesUp => &LF_RESERVES_UP,
            ReserveProduct::LfReservesDown => &LF_RESERVES_DOWN,
            ReserveProduct::RegulationUp => &REGULATION_UP,
            ReserveProduct::RegulationDown => &REGULATION_DOWN,
            ReserveProduct::FrequencyResponse => &FREQUENCY_RESPONSE,
            ReserveProduct::SpinningReserves => &SPINNING_RESERVES,
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.descriptor().product
    }

    pub fn feature(&self) -> Feature {
        match self {
            ReserveProduct::LfReservesUp => Feature::LfReservesUp,
            ReserveProduct::LfReservesDown => Feature::LfReservesDown,
            ReserveProduct::RegulationUp => Feature::RegulationUp,
            ReserveProduct::RegulationDown => Feature::RegulationDown,
            ReserveProduct::FrequencyResponse => Feature::FrequencyResponse,
            ReserveProduct::SpinningReserves => Feature::SpinningReserves,
        }
    }
}

impl fmt::Display for ReserveProduct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional feature that a scenario may switch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Fuels,
    MultiStage,
    Transmission,
    TransmissionHurdleRates,
    SimultaneousFlowLimits,
    LfReservesUp,
    LfReservesDown,
    RegulationUp,
    RegulationDown,
    FrequencyResponse,
    SpinningReserves,
    Rps,
    CarbonCap,
    TrackCarbonImports,
    Prm,
    ElccSurface,
    LocalCapacity,
}

impl Feature {
    pub const ALL: [Feature; 17] = [
        Feature::Fuels,
        Feature::MultiStage,
        Feature::Transmission,
        Feature::TransmissionHurdleRates,
        Feature::SimultaneousFlowLimits,
        Feature::LfReservesUp,
        Feature::LfReservesDown,
        Feature::RegulationUp,
        Feature::RegulationDown,
        Feature::FrequencyResponse,
        Feature::SpinningReserves,
        Feature::Rps,
        Feature::CarbonCap,
        Feature::TrackCarbonImports,
        Feature::Prm,
        Feature::ElccSurface,
        Feature::LocalCapacity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::Fuels => "fuels",
            Feature::MultiStage => "multi_stage",
            Feature::Transmission => "transmission",
            Feature::TransmissionHurdleRates => "transmission_hurdle_rates",
            Feature::SimultaneousFlowLimits => "simultaneous_flow_limits",
            Feature::LfReservesUp => "lf_reserves_up",
            Feature::LfReservesDown => "lf_reserves_down",
            Feature::RegulationUp => "regulation_up",
            Feature::RegulationDown => "regulation_down",
            Feature::FrequencyResponse => "frequency_response",
            Feature::SpinningReserves => "spinning_reserves",
            Feature::Rps => "rps",
            Feature::CarbonCap => "carbon_cap",
            Feature::TrackCarbonImports => "track_carbon_imports",
            Feature::Prm => "prm",
            Feature::ElccSurface => "elcc_surface",
            Feature::LocalCapacity => "local_capacity",
        }
    }

    /// Reserve product enabled by this feature, if any.
    pub fn reserve_product(&self) -> Option<ReserveProduct> {
        ReserveProduct::ALL
            .into_iter()
            .find(|product| product.feature() == *self)
    }
}

impl FromStr for Feature {
    type Err = GridplanError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        let normalized = normalized.strip_prefix("of_").unwrap_or(&normalized);
        Feature::ALL
            .into_iter()
            .find(|feature| feature.as_str() == normalized)
            .ok_or_else(|| {
                let names: Vec<&str> = Feature::ALL.iter().map(Feature::as_str).collect();
                unknown_tag("feature", value, &names)
            })
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
