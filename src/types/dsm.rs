//! DSM (folding) state definitions

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The five folding states of the protein model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DsmState {
    /// Disordered chain
    Unfolded,
    /// Secondary structure forming
    Folding,
    /// Folded, at rest
    Native,
    /// Fluctuating, dehydrons exposed
    Breathing,
    /// Every dehydron wrapped
    Stabilized,
}

impl DsmState {
    /// All states in display order
    pub const ALL: [DsmState; 5] = [
        DsmState::Unfolded,
        DsmState::Folding,
        DsmState::Native,
        DsmState::Breathing,
        DsmState::Stabilized,
    ];

    /// Canonical wire name
    pub fn name(&self) -> &'static str {
        match self {
            DsmState::Unfolded => "UNFOLDED",
            DsmState::Folding => "FOLDING",
            DsmState::Native => "NATIVE",
            DsmState::Breathing => "BREATHING",
            DsmState::Stabilized => "STABILIZED",
        }
    }

    /// Position in the state graph
    pub fn index(&self) -> usize {
        match self {
            DsmState::Unfolded => 0,
            DsmState::Folding => 1,
            DsmState::Native => 2,
            DsmState::Breathing => 3,
            DsmState::Stabilized => 4,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DsmState::Unfolded => "Unfolded",
            DsmState::Folding => "Folding",
            DsmState::Native => "Native",
            DsmState::Breathing => "Breathing",
            DsmState::Stabilized => "Stabilized",
        }
    }

    /// Hex colour used by renderers
    pub fn color(&self) -> &'static str {
        match self {
            DsmState::Unfolded => "#888888",
            DsmState::Folding => "#ffaa44",
            DsmState::Native => "#44aaff",
            DsmState::Breathing => "#ff6644",
            DsmState::Stabilized => "#44ff88",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            DsmState::Unfolded => "Disordered polypeptide chain",
            DsmState::Folding => "Secondary structure forming",
            DsmState::Native => "Folded structure with breathing dynamics",
            DsmState::Breathing => "Conformational fluctuations expose dehydrons",
            DsmState::Stabilized => "All dehydrons wrapped — structure locked",
        }
    }

    /// Get ANSI color code for terminal display
    pub fn color_code(&self) -> &'static str {
        match self {
            DsmState::Unfolded => "\x1b[90m",   // Gray
            DsmState::Folding => "\x1b[33m",    // Orange/Yellow
            DsmState::Native => "\x1b[34m",     // Blue
            DsmState::Breathing => "\x1b[31m",  // Red
            DsmState::Stabilized => "\x1b[32m", // Green
        }
    }

    /// Reset ANSI color
    pub fn color_reset() -> &'static str {
        "\x1b[0m"
    }
}

impl std::fmt::Display for DsmState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for DsmState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        DsmState::ALL
            .into_iter()
            .find(|state| state.name() == upper)
            .ok_or_else(|| format!("unknown DSM state '{}'", s.trim()))
    }
}
