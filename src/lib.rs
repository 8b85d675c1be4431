//! GOSP: protein stabilization state core
//!
//! Session reducer (dehydron wrapping, stabilizer placement, VDEM cascade),
//! DSM folding-state validator and the SEARCH → ALIGN → LOCK verification
//! machine, plus the CLI and HTTP surfaces that drive them.

pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod types;

pub use error::{GospError, Result};

// =============================================================================
// WRAPPING [C]
// =============================================================================

/// Bonds with fewer shielding atoms than this are dehydrons
pub const DEHYDRON_WRAPPING_THRESHOLD: u32 = 19;

/// Hard cap on simultaneously placed stabilizers
pub const MAX_STABILIZERS: usize = 3;

/// Picked points further than this from every unwrapped dehydron do not snap
pub const PLACEMENT_SNAP_DISTANCE: f64 = 2.0;

// =============================================================================
// BREATHING [C]
// =============================================================================

/// Breathing speed range accepted by the session (slider range)
pub const BREATHING_SPEED_MIN: f64 = 0.0;
pub const BREATHING_SPEED_MAX: f64 = 3.0;

/// Breathing speed at session start
pub const BREATHING_SPEED_DEFAULT: f64 = 1.0;

// =============================================================================
// LOCK VERIFICATION [C]
// =============================================================================

/// VERIFY_MA passes only below this energy (kcal/mol)
pub const LOCK_ENERGY_THRESHOLD: f64 = -15.5;

/// ALIGN samples its energy potential uniformly in [MIN, MAX)
pub const ALIGN_ENERGY_MIN: f64 = -20.0;
pub const ALIGN_ENERGY_MAX: f64 = 0.0;

/// Fidelity reported once LOCK is reached
pub const LOCKED_FIDELITY: f64 = 1.0;

// =============================================================================
// CATALOG DEFAULTS [C]
// =============================================================================

/// Seed used when neither config nor CLI provide one
pub const DEFAULT_CATALOG_SEED: u64 = 42;

/// Donor residues whose i→i+4 bond is generated under-wrapped
pub const DEFAULT_DEHYDRON_DONORS: [usize; 5] = [1, 4, 6, 19, 23];

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
