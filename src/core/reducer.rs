//! GOSP session reducer: (state, intent) → next state
//!
//! Pure: no I/O, no logging, no clock. The only outside inputs are the
//! catalog (to decide "all dehydrons wrapped") and an id source for new
//! stabilizers. Illegal intents come back as `Reduction::Ignored` with a
//! reason and leave the state untouched.

use crate::core::catalog::Catalog;
use crate::core::dsm::can_transition;
use crate::types::{
    ActiveTool, DsmState, Intent, PlacedStabilizer, PlacementRequest, ReasonCode, Selection,
    SessionState, StabilizerId, VdemCascade,
};
use crate::{BREATHING_SPEED_MAX, BREATHING_SPEED_MIN, MAX_STABILIZERS};

/// Source of unique stabilizer ids
pub trait StabilizerIds {
    fn next_id(&mut self) -> StabilizerId;
}

/// `stab_1`, `stab_2`, ...
#[derive(Debug, Clone)]
pub struct SequentialIds {
    next: u64,
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new()
    }
}

impl SequentialIds {
    pub fn new() -> Self {
        Self { next: 1 }
    }
}

impl StabilizerIds for SequentialIds {
    fn next_id(&mut self) -> StabilizerId {
        let id = StabilizerId(format!("stab_{}", self.next));
        self.next += 1;
        id
    }
}

/// `stab_<millis>_<seq>`, unique across sessions of one process
#[derive(Debug, Clone, Default)]
pub struct TimestampIds {
    seq: u64,
}

impl StabilizerIds for TimestampIds {
    fn next_id(&mut self) -> StabilizerId {
        self.seq += 1;
        StabilizerId(format!(
            "stab_{}_{}",
            chrono::Utc::now().timestamp_millis(),
            self.seq
        ))
    }
}

/// Outcome of reducing one intent
#[derive(Debug, Clone, PartialEq)]
pub enum Reduction {
    /// New snapshot
    Applied(SessionState, ReasonCode),
    /// State unchanged
    Ignored(ReasonCode),
}

impl Reduction {
    pub fn reason(&self) -> ReasonCode {
        match self {
            Reduction::Applied(_, reason) | Reduction::Ignored(reason) => *reason,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, Reduction::Applied(..))
    }

    /// Resulting state, falling back to `previous` when ignored
    pub fn into_state(self, previous: &SessionState) -> SessionState {
        match self {
            Reduction::Applied(state, _) => state,
            Reduction::Ignored(_) => previous.clone(),
        }
    }
}

/// Reduce one intent
pub fn reduce(
    state: &SessionState,
    intent: &Intent,
    catalog: &Catalog,
    ids: &mut dyn StabilizerIds,
) -> Reduction {
    match intent {
        Intent::TransitionDsm { target } => transition_dsm(state, *target),
        Intent::SelectTemplate { template } => {
            let mut next = state.clone();
            next.active_tool = ActiveTool::PlaceStabilizer;
            next.selected_template = Some(*template);
            Reduction::Applied(next, ReasonCode::R400_TOOL_PLACE)
        }
        Intent::CancelPlacement => {
            let mut next = state.clone();
            next.active_tool = ActiveTool::Inspect;
            next.selected_template = None;
            Reduction::Applied(next, ReasonCode::R401_TOOL_INSPECT)
        }
        Intent::PlaceStabilizer(request) => place_stabilizer(state, request, catalog, ids),
        Intent::RemoveStabilizer { id } => remove_stabilizer(state, id),
        Intent::AdvanceVdem => {
            let mut cascade = state.cascade.clone();
            if !cascade.advance() {
                return Reduction::Ignored(ReasonCode::R301_VDEM_AT_END);
            }
            let mut next = state.clone();
            next.cascade = cascade;
            Reduction::Applied(next, ReasonCode::R300_VDEM_ADVANCED)
        }
        Intent::SelectResidue { residue } => select(state, Selection::Residue(*residue)),
        Intent::SelectBond { bond } => select(state, Selection::Bond(bond.clone())),
        Intent::SetBreathingSpeed { speed } => set_breathing_speed(state, *speed),
        Intent::ToggleVis { key } => {
            let mut next = state.clone();
            next.visibility.toggle(*key);
            Reduction::Applied(next, ReasonCode::R406_VIS_TOGGLED)
        }
        Intent::Reset => Reduction::Applied(SessionState::initial(), ReasonCode::R500_SESSION_RESET),
    }
}

/// Plain `(state, intent) → state` form of `reduce`
pub fn reduce_state(
    state: &SessionState,
    intent: &Intent,
    catalog: &Catalog,
    ids: &mut dyn StabilizerIds,
) -> SessionState {
    reduce(state, intent, catalog, ids).into_state(state)
}

/// Narrative shown after wrapping `dehydron_id` with a template worth `bonus`
pub fn cascade_steps(dehydron_id: &str, bonus: u32) -> Vec<String> {
    vec![
        format!("Stabilizer wraps dehydron {}", dehydron_id),
        "Frustrated water expelled from void".to_string(),
        format!("H-bond strengthened (wrapping +{})", bonus),
        "Local rigidity increases".to_string(),
        "Breathing arrested near stabilizer".to_string(),
    ]
}

fn transition_dsm(state: &SessionState, target: DsmState) -> Reduction {
    if !can_transition(state.dsm_state, target) {
        return Reduction::Ignored(ReasonCode::R101_DSM_ILLEGAL_TRANSITION);
    }
    let mut next = state.clone();
    next.dsm_state = target;
    match target {
        DsmState::Breathing => next.breathing_enabled = true,
        DsmState::Stabilized => next.breathing_enabled = false,
        _ => {}
    }
    Reduction::Applied(next, ReasonCode::R100_DSM_TRANSITIONED)
}

fn place_stabilizer(
    state: &SessionState,
    request: &PlacementRequest,
    catalog: &Catalog,
    ids: &mut dyn StabilizerIds,
) -> Reduction {
    if state.placed_stabilizers.len() >= MAX_STABILIZERS {
        return Reduction::Ignored(ReasonCode::R202_STABILIZER_CAP_REACHED);
    }
    let Some(bond) = catalog
        .bond(&request.target_dehydron_id)
        .filter(|b| b.is_dehydron())
    else {
        return Reduction::Ignored(ReasonCode::R203_STABILIZER_UNKNOWN_TARGET);
    };
    if state.is_wrapped(&bond.id) {
        return Reduction::Ignored(ReasonCode::R204_STABILIZER_ALREADY_WRAPPED);
    }

    let mut next = state.clone();
    next.placed_stabilizers.push(PlacedStabilizer {
        id: ids.next_id(),
        template_id: request.template_id,
        position: bond.midpoint,
        effect_radius: request.effect_radius,
        target_dehydron_id: bond.id.clone(),
        color: request.color.clone(),
        atom_count: request.atom_count,
    });
    next.wrapped_dehydrons.insert(bond.id.clone());
    next.active_tool = ActiveTool::Inspect;
    next.selected_template = None;

    let stabilized = catalog.all_wrapped(&next.wrapped_dehydrons)
        && can_transition(state.dsm_state, DsmState::Stabilized);
    if stabilized {
        next.dsm_state = DsmState::Stabilized;
    }
    next.breathing_enabled = next.dsm_state != DsmState::Stabilized;

    let bonus = request.template_id.template().wrapping_bonus;
    next.cascade = VdemCascade::start(cascade_steps(&bond.id, bonus));

    let reason = if stabilized {
        ReasonCode::R201_STABILIZER_PLACED_STABILIZED
    } else {
        ReasonCode::R200_STABILIZER_PLACED
    };
    Reduction::Applied(next, reason)
}

fn remove_stabilizer(state: &SessionState, id: &StabilizerId) -> Reduction {
    let Some(stabilizer) = state.stabilizer(id) else {
        return Reduction::Ignored(ReasonCode::R207_STABILIZER_NOT_FOUND);
    };

    let mut next = state.clone();
    next.wrapped_dehydrons.remove(&stabilizer.target_dehydron_id);
    next.placed_stabilizers.retain(|s| &s.id != id);

    let destabilized = state.dsm_state == DsmState::Stabilized
        && can_transition(DsmState::Stabilized, DsmState::Breathing);
    if destabilized {
        next.dsm_state = DsmState::Breathing;
    }
    next.breathing_enabled = next.dsm_state == DsmState::Breathing;
    next.cascade = VdemCascade::default();

    let reason = if destabilized {
        ReasonCode::R206_STABILIZER_REMOVED_DESTABILIZED
    } else {
        ReasonCode::R205_STABILIZER_REMOVED
    };
    Reduction::Applied(next, reason)
}

fn select(state: &SessionState, selection: Selection) -> Reduction {
    let mut next = state.clone();
    next.selection = selection;
    Reduction::Applied(next, ReasonCode::R402_SELECTION_CHANGED)
}

fn set_breathing_speed(state: &SessionState, speed: f64) -> Reduction {
    if speed.is_nan() {
        return Reduction::Ignored(ReasonCode::R405_SPEED_REJECTED);
    }
    let clamped = speed.clamp(BREATHING_SPEED_MIN, BREATHING_SPEED_MAX);
    let mut next = state.clone();
    next.breathing_speed = clamped;
    let reason = if clamped == speed {
        ReasonCode::R403_SPEED_SET
    } else {
        ReasonCode::R404_SPEED_CLAMPED
    };
    Reduction::Applied(next, reason)
}

// =============================================================================
// TESTS
// =============================================================================
