//! Hydrogen bonds and void cavities

use serde::{Deserialize, Serialize};

use super::geometry::Point3;
use crate::DEHYDRON_WRAPPING_THRESHOLD;

/// A backbone i→i+4 hydrogen bond
///
/// Wrapped/unwrapped status lives in the session, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydrogenBond {
    pub id: String,
    pub donor: usize,
    pub acceptor: usize,
    pub midpoint: Point3,
    /// Simulated count of nonpolar atoms shielding the bond
    pub wrapping_count: u32,
}

impl HydrogenBond {
    pub fn new(
        id: impl Into<String>,
        donor: usize,
        acceptor: usize,
        midpoint: Point3,
        wrapping_count: u32,
    ) -> Self {
        Self {
            id: id.into(),
            donor,
            acceptor,
            midpoint,
            wrapping_count,
        }
    }

    /// Under-wrapped bonds are dehydrons
    pub fn is_dehydron(&self) -> bool {
        self.wrapping_count < DEHYDRON_WRAPPING_THRESHOLD
    }

    /// Display strength: 1.0 when well wrapped, scaled down otherwise
    pub fn strength(&self) -> f64 {
        if self.is_dehydron() {
            0.5 + self.wrapping_count as f64 / 38.0
        } else {
            1.0
        }
    }
}

/// A cavity holding frustrated water near one or more dehydrons
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Void {
    pub id: String,
    pub center: Point3,
    pub radius: f64,
    pub nearby_dehydrons: Vec<String>,
    pub frustrated_water_count: u32,
}
