//! Output structures for terminal display

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use crate::types::{DsmState, ReasonCode, SessionState};

/// Output structure for each session dispatch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchOutput {
    /// Timestamp
    pub timestamp: DateTime<Utc>,
    /// Snapshot revision after the dispatch
    pub revision: u64,
    /// Did the intent change the state?
    pub applied: bool,
    /// Reason for the outcome
    pub reason: ReasonCode,
    /// DSM state after the dispatch
    pub dsm_state: DsmState,
    pub placed: usize,
    pub wrapped: usize,
    pub total_dehydrons: usize,
    pub breathing_enabled: bool,
    /// -1 when no cascade is running
    pub cascade_step: i64,
    /// Text of the current cascade step
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cascade_text: Option<String>,
}

impl DispatchOutput {
    /// Create new output
    pub fn new(state: &SessionState, revision: u64, reason: ReasonCode, total_dehydrons: usize) -> Self {
        Self {
            timestamp: Utc::now(),
            revision,
            applied: reason.is_applied(),
            reason,
            dsm_state: state.dsm_state,
            placed: state.placed_count(),
            wrapped: state.wrapped_dehydrons.len(),
            total_dehydrons,
            breathing_enabled: state.breathing_enabled,
            cascade_step: state.cascade.current_index(),
            cascade_text: state.cascade.current_step().map(str::to_string),
        }
    }

    /// Format for terminal display (with colors)
    pub fn to_terminal_string(&self) -> String {
        let color = self.dsm_state.color_code();
        let reset = DsmState::color_reset();
        let mark = if self.applied { "✓" } else { "·" };

        format!(
            "{}{} state={} | wrapped={}/{} | stabilizers={}/{} | {}{}",
            color,
            mark,
            self.dsm_state,
            self.wrapped,
            self.total_dehydrons,
            self.placed,
            crate::MAX_STABILIZERS,
            self.reason.code(),
            reset
        )
    }

    /// Format for parseable output (no colors)
    pub fn to_parseable_string(&self) -> String {
        format!(
            "state={} | wrapped={}/{} | stabilizers={} | breathing={} | cascade={} | reason={}",
            self.dsm_state,
            self.wrapped,
            self.total_dehydrons,
            self.placed,
            self.breathing_enabled,
            self.cascade_step,
            self.reason.code()
        )
    }
}
