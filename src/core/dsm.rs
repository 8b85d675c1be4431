//! DSM transition validator
//!
//! Transitions (directed, not symmetric):
//! - UNFOLDED → FOLDING
//! - FOLDING → NATIVE | UNFOLDED
//! - NATIVE → BREATHING | UNFOLDED
//! - BREATHING → STABILIZED | NATIVE
//! - STABILIZED → BREATHING

use crate::types::DsmState;

/// Adjacency table, one entry per state, targets in preference order
pub const DSM_TRANSITIONS: [(DsmState, &[DsmState]); 5] = [
    (DsmState::Unfolded, &[DsmState::Folding]),
    (DsmState::Folding, &[DsmState::Native, DsmState::Unfolded]),
    (DsmState::Native, &[DsmState::Breathing, DsmState::Unfolded]),
    (DsmState::Breathing, &[DsmState::Stabilized, DsmState::Native]),
    (DsmState::Stabilized, &[DsmState::Breathing]),
];

/// Legal targets from `from`
pub fn valid_transitions(from: DsmState) -> &'static [DsmState] {
    DSM_TRANSITIONS
        .iter()
        .find(|(state, _)| *state == from)
        .map(|(_, targets)| *targets)
        .unwrap_or(&[])
}

/// Is `from → to` in the table?
pub fn can_transition(from: DsmState, to: DsmState) -> bool {
    valid_transitions(from).contains(&to)
}

/// Same as `can_transition`, by state name. Unknown names are never legal.
pub fn can_transition_by_name(from: &str, to: &str) -> bool {
    match (from.parse::<DsmState>(), to.parse::<DsmState>()) {
        (Ok(from), Ok(to)) => can_transition(from, to),
        _ => false,
    }
}

/// Same as `valid_transitions`, by state name. Unknown names have no targets.
pub fn valid_transitions_by_name(from: &str) -> &'static [DsmState] {
    from.parse::<DsmState>()
        .map(valid_transitions)
        .unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_directed() {
        assert!(can_transition(DsmState::Unfolded, DsmState::Folding));
        assert!(!can_transition(DsmState::Folding, DsmState::Folding));
        assert!(can_transition(DsmState::Folding, DsmState::Unfolded));
        assert!(!can_transition(DsmState::Unfolded, DsmState::Native));
    }

    #[test]
    fn test_stabilized_is_not_terminal() {
        assert_eq!(valid_transitions(DsmState::Stabilized), &[DsmState::Breathing]);
    }

    #[test]
    fn test_unknown_names_degrade() {
        assert!(!can_transition_by_name("MOLTEN", "NATIVE"));
        assert!(!can_transition_by_name("NATIVE", "MOLTEN"));
        assert!(valid_transitions_by_name("MOLTEN").is_empty());
        assert!(can_transition_by_name("breathing", "stabilized"));
    }

    #[test]
    fn test_order_preserved() {
        assert_eq!(
            valid_transitions(DsmState::Native),
            &[DsmState::Breathing, DsmState::Unfolded]
        );
    }
}
