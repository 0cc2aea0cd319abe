//! Vehicles
//!
//! The three rentable vehicle classes and the fixed rate pair each one carries.

use std::fmt;

use clap::ValueEnum;
use thiserror::Error;

/// Errors decoding a vehicle class from its persisted flag columns.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VehicleFlagsError {
    /// More than one class flag was set on the same row.
    #[error("more than one vehicle class flag set (a={0}, b={1}, c={2})")]
    Conflicting(bool, bool, bool),
}

/// Per-unit rates for a vehicle class, in whole currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rates {
    /// Charge per rented hour
    pub hourly: u64,

    /// Charge per rented day
    pub daily: u64,
}

/// Vehicle class selected on the configuration screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum VehicleClass {
    /// Class A (Audi)
    A,

    /// Class B (BMW)
    B,

    /// Class C (Land Cruiser)
    C,
}

impl VehicleClass {
    /// Every class, in display order.
    pub const ALL: [VehicleClass; 3] = [VehicleClass::A, VehicleClass::B, VehicleClass::C];

    /// The rate pair for this class.
    pub const fn rates(self) -> Rates {
        match self {
            VehicleClass::A => Rates {
                hourly: 100,
                daily: 2000,
            },
            VehicleClass::B => Rates {
                hourly: 150,
                daily: 2500,
            },
            VehicleClass::C => Rates {
                hourly: 200,
                daily: 3000,
            },
        }
    }

    /// The vehicle model offered under this class.
    pub const fn model(self) -> &'static str {
        match self {
            VehicleClass::A => "Audi",
            VehicleClass::B => "BMW",
            VehicleClass::C => "Land Cruiser",
        }
    }

    /// Decode an optional class from the three mutually exclusive flag columns.
    ///
    /// # Errors
    ///
    /// Returns [`VehicleFlagsError::Conflicting`] when more than one flag is set.
    pub fn from_flags(a: bool, b: bool, c: bool) -> Result<Option<Self>, VehicleFlagsError> {
        match (a, b, c) {
            (false, false, false) => Ok(None),
            (true, false, false) => Ok(Some(VehicleClass::A)),
            (false, true, false) => Ok(Some(VehicleClass::B)),
            (false, false, true) => Ok(Some(VehicleClass::C)),
            _ => Err(VehicleFlagsError::Conflicting(a, b, c)),
        }
    }

    /// Encode an optional class as `(a, b, c)` flags.
    pub fn flags(class: Option<Self>) -> (bool, bool, bool) {
        (
            class == Some(VehicleClass::A),
            class == Some(VehicleClass::B),
            class == Some(VehicleClass::C),
        )
    }
}

impl fmt::Display for VehicleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            VehicleClass::A => "A",
            VehicleClass::B => "B",
            VehicleClass::C => "C",
        };

        write!(f, "{code} ({})", self.model())
    }
}
