//! Intents: everything the presentation layer can ask the session to do

use serde::{Deserialize, Serialize};

use super::dsm::DsmState;
use super::geometry::Point3;
use super::session::VisToggle;
use super::stabilizer::{StabilizerId, TemplateId};

/// Payload of a stabilizer placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementRequest {
    pub template_id: TemplateId,
    pub position: Point3,
    pub effect_radius: f64,
    pub target_dehydron_id: String,
    pub color: String,
    pub atom_count: u32,
}

impl PlacementRequest {
    /// Request filled from the template's catalog values
    pub fn from_template(template_id: TemplateId, target_dehydron_id: impl Into<String>, position: Point3) -> Self {
        let template = template_id.template();
        Self {
            template_id,
            position,
            effect_radius: template.effect_radius,
            target_dehydron_id: target_dehydron_id.into(),
            color: template.color.to_string(),
            atom_count: template.atom_count,
        }
    }
}

/// Session intents, tagged by `type` on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intent {
    TransitionDsm { target: DsmState },
    SelectTemplate { template: TemplateId },
    CancelPlacement,
    PlaceStabilizer(PlacementRequest),
    RemoveStabilizer { id: StabilizerId },
    AdvanceVdem,
    SelectResidue { residue: usize },
    SelectBond { bond: String },
    SetBreathingSpeed { speed: f64 },
    ToggleVis { key: VisToggle },
    Reset,
}

impl Intent {
    /// Parse a JSON intent. Objects with an unrecognized `type` (or a
    /// payload that does not fit it) yield `None` and are treated as no-ops.
    pub fn from_json(value: serde_json::Value) -> Option<Intent> {
        serde_json::from_value(value).ok()
    }

    /// Wire name of the intent kind
    pub fn kind(&self) -> &'static str {
        match self {
            Intent::TransitionDsm { .. } => "TRANSITION_DSM",
            Intent::SelectTemplate { .. } => "SELECT_TEMPLATE",
            Intent::CancelPlacement => "CANCEL_PLACEMENT",
            Intent::PlaceStabilizer(_) => "PLACE_STABILIZER",
            Intent::RemoveStabilizer { .. } => "REMOVE_STABILIZER",
            Intent::AdvanceVdem => "ADVANCE_VDEM",
            Intent::SelectResidue { .. } => "SELECT_RESIDUE",
            Intent::SelectBond { .. } => "SELECT_BOND",
            Intent::SetBreathingSpeed { .. } => "SET_BREATHING_SPEED",
            Intent::ToggleVis { .. } => "TOGGLE_VIS",
            Intent::Reset => "RESET",
        }
    }
}
