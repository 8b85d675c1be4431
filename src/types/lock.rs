//! Lock verification state, context and events

use serde::{Deserialize, Serialize};

use super::geometry::Point3;
use super::reason::ReasonCode;

/// Stabilizer id the YBR032W protocol locks in
pub const MA_STABILIZER_ID: &str = "ma_01_ybr032w";

/// The three verification states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LockState {
    /// Scanning for void topology
    Search,
    /// Computing geometric constraints
    Align,
    /// Deterministic state achieved (terminal)
    Lock,
}

impl LockState {
    pub fn is_final(&self) -> bool {
        matches!(self, LockState::Lock)
    }

    /// Hex colour used by renderers
    pub fn color(&self) -> &'static str {
        match self {
            LockState::Search => "#ff6644",
            LockState::Align => "#ffaa00",
            LockState::Lock => "#00ffff",
        }
    }

    /// Get ANSI color code for terminal display
    pub fn color_code(&self) -> &'static str {
        match self {
            LockState::Search => "\x1b[31m",
            LockState::Align => "\x1b[33m",
            LockState::Lock => "\x1b[36m",
        }
    }

    pub fn color_reset() -> &'static str {
        "\x1b[0m"
    }
}

impl std::fmt::Display for LockState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LockState::Search => "SEARCH",
            LockState::Align => "ALIGN",
            LockState::Lock => "LOCK",
        };
        write!(f, "{}", name)
    }
}

/// Extended state carried alongside `LockState`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockContext {
    /// Set by IDENTIFY_VOID
    pub coordinates: Option<Point3>,
    pub ma_stabilizer_id: String,
    pub fidelity_score: f64,
    pub is_physically_locked: bool,
    /// Sampled on each entry to ALIGN
    pub energy_potential: f64,
    pub ramachandran_valid: bool,
}

impl Default for LockContext {
    fn default() -> Self {
        Self {
            coordinates: None,
            ma_stabilizer_id: MA_STABILIZER_ID.to_string(),
            fidelity_score: 0.0,
            is_physically_locked: false,
            energy_potential: 0.0,
            ramachandran_valid: false,
        }
    }
}

/// Events accepted by the lock machine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LockEvent {
    IdentifyVoid {
        coordinates: Point3,
    },
    VerifyMa {
        energy_potential: f64,
        ramachandran_valid: bool,
    },
}

/// Result of one lock event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockOutput {
    pub state: LockState,
    pub reason: ReasonCode,
    pub context: LockContext,
}
