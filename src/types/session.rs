//! GOSP session state aggregate
//!
//! One value of `SessionState` is one immutable snapshot. The reducer in
//! `core::reducer` is the only producer of new snapshots.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

use super::dsm::DsmState;
use super::stabilizer::{PlacedStabilizer, StabilizerId, TemplateId};
use crate::BREATHING_SPEED_DEFAULT;

/// Current interaction tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActiveTool {
    #[default]
    Inspect,
    PlaceStabilizer,
}

/// The six visualization toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisToggle {
    Backbone,
    SideChains,
    HBonds,
    Dehydrons,
    Voids,
    Water,
}

impl VisToggle {
    pub const ALL: [VisToggle; 6] = [
        VisToggle::Backbone,
        VisToggle::SideChains,
        VisToggle::HBonds,
        VisToggle::Dehydrons,
        VisToggle::Voids,
        VisToggle::Water,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VisToggle::Backbone => "backbone",
            VisToggle::SideChains => "side_chains",
            VisToggle::HBonds => "h_bonds",
            VisToggle::Dehydrons => "dehydrons",
            VisToggle::Voids => "voids",
            VisToggle::Water => "water",
        }
    }
}

impl std::fmt::Display for VisToggle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for VisToggle {
    type Err = String;

    /// Accepts `side_chains`, `sidechains`, `showSideChains`, ...
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect();
        let compact = compact.strip_prefix("show").unwrap_or(&compact);
        VisToggle::ALL
            .into_iter()
            .find(|t| t.as_str().replace('_', "") == compact)
            .ok_or_else(|| format!("unknown visualization toggle '{}'", s.trim()))
    }
}

/// Visualization flags, all on at session start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visibility {
    pub backbone: bool,
    pub side_chains: bool,
    pub h_bonds: bool,
    pub dehydrons: bool,
    pub voids: bool,
    pub water: bool,
}

impl Default for Visibility {
    fn default() -> Self {
        Self {
            backbone: true,
            side_chains: true,
            h_bonds: true,
            dehydrons: true,
            voids: true,
            water: true,
        }
    }
}

impl Visibility {
    fn slot(&mut self, key: VisToggle) -> &mut bool {
        match key {
            VisToggle::Backbone => &mut self.backbone,
            VisToggle::SideChains => &mut self.side_chains,
            VisToggle::HBonds => &mut self.h_bonds,
            VisToggle::Dehydrons => &mut self.dehydrons,
            VisToggle::Voids => &mut self.voids,
            VisToggle::Water => &mut self.water,
        }
    }

    pub fn get(&self, key: VisToggle) -> bool {
        match key {
            VisToggle::Backbone => self.backbone,
            VisToggle::SideChains => self.side_chains,
            VisToggle::HBonds => self.h_bonds,
            VisToggle::Dehydrons => self.dehydrons,
            VisToggle::Voids => self.voids,
            VisToggle::Water => self.water,
        }
    }

    pub fn toggle(&mut self, key: VisToggle) {
        let slot = self.slot(key);
        *slot = !*slot;
    }
}

/// What the user has picked. Residue and bond selection exclude each other.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Selection {
    #[default]
    None,
    /// Residue index
    Residue(usize),
    /// Bond id
    Bond(String),
}

impl Selection {
    pub fn residue(&self) -> Option<usize> {
        match self {
            Selection::Residue(index) => Some(*index),
            _ => None,
        }
    }

    pub fn bond(&self) -> Option<&str> {
        match self {
            Selection::Bond(id) => Some(id),
            _ => None,
        }
    }
}

/// Narrative effect sequence shown after a placement
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VdemCascade {
    pub steps: Vec<String>,
    /// None while no cascade is running
    pub current: Option<usize>,
}

impl VdemCascade {
    /// Start at step 0. An empty step list yields an inactive cascade.
    pub fn start(steps: Vec<String>) -> Self {
        let current = if steps.is_empty() { None } else { Some(0) };
        Self { steps, current }
    }

    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    /// True when the last step is showing (or nothing is running)
    pub fn is_complete(&self) -> bool {
        match self.current {
            Some(i) => i + 1 >= self.steps.len(),
            None => true,
        }
    }

    /// Index as a signed value, -1 when inactive
    pub fn current_index(&self) -> i64 {
        self.current.map(|i| i as i64).unwrap_or(-1)
    }

    pub fn current_step(&self) -> Option<&str> {
        self.current
            .and_then(|i| self.steps.get(i))
            .map(String::as_str)
    }

    /// Move one step forward. Returns false at the last step.
    pub fn advance(&mut self) -> bool {
        match self.current {
            Some(i) if i + 1 < self.steps.len() => {
                self.current = Some(i + 1);
                true
            }
            _ => false,
        }
    }
}

/// The full GOSP session snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub dsm_state: DsmState,
    /// Placement order
    pub placed_stabilizers: Vec<PlacedStabilizer>,
    /// Exactly the targets of `placed_stabilizers`
    pub wrapped_dehydrons: BTreeSet<String>,
    pub breathing_enabled: bool,
    pub breathing_speed: f64,
    pub active_tool: ActiveTool,
    pub selected_template: Option<TemplateId>,
    pub selection: Selection,
    pub visibility: Visibility,
    pub cascade: VdemCascade,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::initial()
    }
}

impl SessionState {
    /// Configuration at session start and after reset
    pub fn initial() -> Self {
        Self {
            dsm_state: DsmState::Breathing,
            placed_stabilizers: Vec::new(),
            wrapped_dehydrons: BTreeSet::new(),
            breathing_enabled: true,
            breathing_speed: BREATHING_SPEED_DEFAULT,
            active_tool: ActiveTool::Inspect,
            selected_template: None,
            selection: Selection::None,
            visibility: Visibility::default(),
            cascade: VdemCascade::default(),
        }
    }

    pub fn stabilizer(&self, id: &StabilizerId) -> Option<&PlacedStabilizer> {
        self.placed_stabilizers.iter().find(|s| &s.id == id)
    }

    pub fn placed_count(&self) -> usize {
        self.placed_stabilizers.len()
    }

    pub fn can_place_more(&self) -> bool {
        self.placed_stabilizers.len() < crate::MAX_STABILIZERS
    }

    pub fn is_wrapped(&self, dehydron_id: &str) -> bool {
        self.wrapped_dehydrons.contains(dehydron_id)
    }

    pub fn selected_residue(&self) -> Option<usize> {
        self.selection.residue()
    }

    pub fn selected_bond(&self) -> Option<&str> {
        self.selection.bond()
    }

    pub fn is_placing(&self) -> bool {
        self.active_tool == ActiveTool::PlaceStabilizer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_configuration() {
        let s = SessionState::initial();
        assert_eq!(s.dsm_state, DsmState::Breathing);
        assert!(s.breathing_enabled);
        assert_eq!(s.breathing_speed, 1.0);
        assert_eq!(s.active_tool, ActiveTool::Inspect);
        assert!(s.wrapped_dehydrons.is_empty());
        assert!(VisToggle::ALL.iter().all(|k| s.visibility.get(*k)));
        assert_eq!(s.cascade.current_index(), -1);
    }

    #[test]
    fn test_toggle_flips_only_one_flag() {
        let mut v = Visibility::default();
        v.toggle(VisToggle::Water);
        assert!(!v.water);
        assert!(v.backbone && v.side_chains && v.h_bonds && v.dehydrons && v.voids);
        v.toggle(VisToggle::Water);
        assert!(v.water);
    }

    #[test]
    fn test_toggle_key_aliases() {
        assert_eq!("showHBonds".parse::<VisToggle>(), Ok(VisToggle::HBonds));
        assert_eq!("side_chains".parse::<VisToggle>(), Ok(VisToggle::SideChains));
        assert_eq!("sidechains".parse::<VisToggle>(), Ok(VisToggle::SideChains));
        assert!("showRibbons".parse::<VisToggle>().is_err());
    }

    #[test]
    fn test_cascade_advance_stops_at_last_step() {
        let mut c = VdemCascade::start(vec!["a".into(), "b".into()]);
        assert_eq!(c.current_step(), Some("a"));
        assert!(c.advance());
        assert!(c.is_complete());
        assert!(!c.advance());
        assert_eq!(c.current_index(), 1);
    }

    #[test]
    fn test_inactive_cascade_does_not_advance() {
        let mut c = VdemCascade::default();
        assert!(!c.advance());
        assert_eq!(c.current_index(), -1);
        assert!(!VdemCascade::start(Vec::new()).is_active());
    }

    #[test]
    fn test_selection_serde_shape() {
        let json = serde_json::to_value(Selection::Bond("hb3".into())).unwrap();
        assert_eq!(json["kind"], "bond");
        assert_eq!(json["value"], "hb3");
    }
}
