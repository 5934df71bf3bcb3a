//! Type-safe identifiers for model indices.
//!
//! Projects, load zones and balancing areas are named by strings in the
//! input tables; periods and timepoints are integers. Wrapping them keeps a
//! (project, period) key from being confused with a (zone, timepoint) key.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! name_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                $name(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                $name(value.to_string())
            }
        }
    };
}

name_id!(
    /// Generation project identifier
    ProjectId
);
name_id!(
    /// Load zone (energy balance) identifier
    LoadZone
);
name_id!(
    /// Reserve balancing area identifier
    BalancingArea
);

/// Study period, identified by its (integer) year.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Period(pub u32);

impl Period {
    pub fn new(year: u32) -> Self {
        Period(year)
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Operational timepoint identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timepoint(pub u32);

impl Timepoint {
    pub fn new(id: u32) -> Self {
        Timepoint(id)
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Timepoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
