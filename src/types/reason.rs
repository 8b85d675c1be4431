//! Reason codes for dispatch outcomes
//!
//! Every intent or lock event yields exactly one code. Rejections are
//! ordinary outcomes, never errors.

use serde::{Deserialize, Serialize};

/// Reason codes for all session and lock decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum ReasonCode {
    // =========================================================================
    // R100: DSM
    // =========================================================================
    /// Legal transition applied
    R100_DSM_TRANSITIONED,
    /// Target not reachable from the current state
    R101_DSM_ILLEGAL_TRANSITION,

    // =========================================================================
    // R200: Stabilizers
    // =========================================================================
    /// Stabilizer placed, dehydron wrapped
    R200_STABILIZER_PLACED,
    /// Placement wrapped the last dehydron, DSM now STABILIZED
    R201_STABILIZER_PLACED_STABILIZED,
    /// Three stabilizers already placed
    R202_STABILIZER_CAP_REACHED,
    /// Target is not a dehydron in the catalog
    R203_STABILIZER_UNKNOWN_TARGET,
    /// Target dehydron is already wrapped
    R204_STABILIZER_ALREADY_WRAPPED,
    /// Stabilizer removed, dehydron exposed again
    R205_STABILIZER_REMOVED,
    /// Removal reverted STABILIZED to BREATHING
    R206_STABILIZER_REMOVED_DESTABILIZED,
    /// No stabilizer with that id
    R207_STABILIZER_NOT_FOUND,

    // =========================================================================
    // R300: VDEM cascade
    // =========================================================================
    /// Cascade moved one step
    R300_VDEM_ADVANCED,
    /// Cascade at its last step or not running
    R301_VDEM_AT_END,

    // =========================================================================
    // R400: Tools, selection, display
    // =========================================================================
    /// Template chosen, placement tool active
    R400_TOOL_PLACE,
    /// Back to inspect tool
    R401_TOOL_INSPECT,
    /// Residue or bond selected
    R402_SELECTION_CHANGED,
    /// Breathing speed stored
    R403_SPEED_SET,
    /// Breathing speed stored after clamping to range
    R404_SPEED_CLAMPED,
    /// Breathing speed not a number
    R405_SPEED_REJECTED,
    /// Visualization flag flipped
    R406_VIS_TOGGLED,

    // =========================================================================
    // R500: Session
    // =========================================================================
    /// Session restored to initial configuration
    R500_SESSION_RESET,
    /// Intent kind not recognized
    R501_INTENT_UNKNOWN,

    // =========================================================================
    // R600: Lock verification
    // =========================================================================
    /// Void identified, entering ALIGN
    R600_LOCK_VOID_IDENTIFIED,
    /// Constraint verified, entering LOCK
    R601_LOCK_ACCEPTED,
    /// Biological ghost, back to SEARCH
    R602_LOCK_REJECTED,
    /// Event not valid in the current lock state
    R603_LOCK_EVENT_IGNORED,
    /// Lock machine restarted at SEARCH
    R604_LOCK_RESET,
}

impl ReasonCode {
    /// Get the code string (for logging)
    pub fn code(&self) -> &'static str {
        match self {
            Self::R100_DSM_TRANSITIONED => "R100_DSM_TRANSITIONED",
            Self::R101_DSM_ILLEGAL_TRANSITION => "R101_DSM_ILLEGAL_TRANSITION",
            Self::R200_STABILIZER_PLACED => "R200_STABILIZER_PLACED",
            Self::R201_STABILIZER_PLACED_STABILIZED => "R201_STABILIZER_PLACED_STABILIZED",
            Self::R202_STABILIZER_CAP_REACHED => "R202_STABILIZER_CAP_REACHED",
            Self::R203_STABILIZER_UNKNOWN_TARGET => "R203_STABILIZER_UNKNOWN_TARGET",
            Self::R204_STABILIZER_ALREADY_WRAPPED => "R204_STABILIZER_ALREADY_WRAPPED",
            Self::R205_STABILIZER_REMOVED => "R205_STABILIZER_REMOVED",
            Self::R206_STABILIZER_REMOVED_DESTABILIZED => "R206_STABILIZER_REMOVED_DESTABILIZED",
            Self::R207_STABILIZER_NOT_FOUND => "R207_STABILIZER_NOT_FOUND",
            Self::R300_VDEM_ADVANCED => "R300_VDEM_ADVANCED",
            Self::R301_VDEM_AT_END => "R301_VDEM_AT_END",
            Self::R400_TOOL_PLACE => "R400_TOOL_PLACE",
            Self::R401_TOOL_INSPECT => "R401_TOOL_INSPECT",
            Self::R402_SELECTION_CHANGED => "R402_SELECTION_CHANGED",
            Self::R403_SPEED_SET => "R403_SPEED_SET",
            Self::R404_SPEED_CLAMPED => "R404_SPEED_CLAMPED",
            Self::R405_SPEED_REJECTED => "R405_SPEED_REJECTED",
            Self::R406_VIS_TOGGLED => "R406_VIS_TOGGLED",
            Self::R500_SESSION_RESET => "R500_SESSION_RESET",
            Self::R501_INTENT_UNKNOWN => "R501_INTENT_UNKNOWN",
            Self::R600_LOCK_VOID_IDENTIFIED => "R600_LOCK_VOID_IDENTIFIED",
            Self::R601_LOCK_ACCEPTED => "R601_LOCK_ACCEPTED",
            Self::R602_LOCK_REJECTED => "R602_LOCK_REJECTED",
            Self::R603_LOCK_EVENT_IGNORED => "R603_LOCK_EVENT_IGNORED",
            Self::R604_LOCK_RESET => "R604_LOCK_RESET",
        }
    }

    /// Get human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::R100_DSM_TRANSITIONED => "Folding state changed",
            Self::R101_DSM_ILLEGAL_TRANSITION => "Transition not allowed",
            Self::R200_STABILIZER_PLACED => "Stabilizer placed",
            Self::R201_STABILIZER_PLACED_STABILIZED => "All dehydrons wrapped - structure stabilized",
            Self::R202_STABILIZER_CAP_REACHED => "Stabilizer limit reached",
            Self::R203_STABILIZER_UNKNOWN_TARGET => "Target is not a dehydron",
            Self::R204_STABILIZER_ALREADY_WRAPPED => "Dehydron already wrapped",
            Self::R205_STABILIZER_REMOVED => "Stabilizer removed",
            Self::R206_STABILIZER_REMOVED_DESTABILIZED => "Stabilizer removed - breathing resumed",
            Self::R207_STABILIZER_NOT_FOUND => "No such stabilizer",
            Self::R300_VDEM_ADVANCED => "Cascade advanced",
            Self::R301_VDEM_AT_END => "Cascade at end",
            Self::R400_TOOL_PLACE => "Placement tool active",
            Self::R401_TOOL_INSPECT => "Inspect tool active",
            Self::R402_SELECTION_CHANGED => "Selection changed",
            Self::R403_SPEED_SET => "Breathing speed set",
            Self::R404_SPEED_CLAMPED => "Breathing speed clamped to range",
            Self::R405_SPEED_REJECTED => "Breathing speed is not a number",
            Self::R406_VIS_TOGGLED => "Visualization toggled",
            Self::R500_SESSION_RESET => "Session reset",
            Self::R501_INTENT_UNKNOWN => "Unknown intent ignored",
            Self::R600_LOCK_VOID_IDENTIFIED => "Void identified - aligning",
            Self::R601_LOCK_ACCEPTED => "Deterministic state achieved",
            Self::R602_LOCK_REJECTED => "Biological ghost detected - back to search",
            Self::R603_LOCK_EVENT_IGNORED => "Event ignored in current state",
            Self::R604_LOCK_RESET => "Verification restarted",
        }
    }

    /// Did the dispatch produce a new state?
    pub fn is_applied(&self) -> bool {
        !matches!(
            self,
            Self::R101_DSM_ILLEGAL_TRANSITION
                | Self::R202_STABILIZER_CAP_REACHED
                | Self::R203_STABILIZER_UNKNOWN_TARGET
                | Self::R204_STABILIZER_ALREADY_WRAPPED
                | Self::R207_STABILIZER_NOT_FOUND
                | Self::R301_VDEM_AT_END
                | Self::R405_SPEED_REJECTED
                | Self::R501_INTENT_UNKNOWN
                | Self::R603_LOCK_EVENT_IGNORED
        )
    }
}

impl std::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejections_are_not_applied() {
        assert!(!ReasonCode::R101_DSM_ILLEGAL_TRANSITION.is_applied());
        assert!(!ReasonCode::R202_STABILIZER_CAP_REACHED.is_applied());
        assert!(!ReasonCode::R501_INTENT_UNKNOWN.is_applied());
        assert!(ReasonCode::R404_SPEED_CLAMPED.is_applied());
        // A rejected verification still moves the lock machine
        assert!(ReasonCode::R602_LOCK_REJECTED.is_applied());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ReasonCode::R300_VDEM_ADVANCED.to_string(),
            "R300_VDEM_ADVANCED: Cascade advanced"
        );
    }
}
