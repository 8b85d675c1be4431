//! Turn a picked 3D point into a placement intent
//!
//! A click only places when the placement tool is armed with a template and
//! lands within `PLACEMENT_SNAP_DISTANCE` of an unwrapped dehydron midpoint.

use crate::core::catalog::Catalog;
use crate::types::geometry::{distance, Point3};
use crate::types::{ActiveTool, HydrogenBond, Intent, PlacementRequest, SessionState, TemplateId};
use crate::PLACEMENT_SNAP_DISTANCE;

/// Nearest unwrapped dehydron to `point`, with its distance
pub fn nearest_unwrapped<'a>(
    state: &SessionState,
    catalog: &'a Catalog,
    point: Point3,
) -> Option<(&'a HydrogenBond, f64)> {
    catalog
        .unwrapped_dehydrons(state)
        .into_iter()
        .map(|bond| (bond, distance(bond.midpoint, point)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

/// Snap a click to a `PlaceStabilizer` intent, if it qualifies
pub fn snap_placement(state: &SessionState, catalog: &Catalog, point: Point3) -> Option<Intent> {
    if state.active_tool != ActiveTool::PlaceStabilizer {
        return None;
    }
    let template = state.selected_template?;
    let (bond, dist) = nearest_unwrapped(state, catalog, point)?;
    if dist >= PLACEMENT_SNAP_DISTANCE {
        return None;
    }
    Some(Intent::PlaceStabilizer(PlacementRequest::from_template(
        template,
        bond.id.clone(),
        bond.midpoint,
    )))
}

/// Placement intent for an explicit target. The position is the target's
/// midpoint when the catalog knows it, the origin otherwise (the reducer
/// rejects unknown targets anyway).
pub fn placement_for(catalog: &Catalog, target: &str, template: TemplateId) -> Intent {
    let position = catalog.bond(target).map(|b| b.midpoint).unwrap_or([0.0; 3]);
    Intent::PlaceStabilizer(PlacementRequest::from_template(template, target, position))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::geometry::add;

    fn armed(template: TemplateId) -> SessionState {
        let mut state = SessionState::initial();
        state.active_tool = ActiveTool::PlaceStabilizer;
        state.selected_template = Some(template);
        state
    }

    #[test]
    fn test_snaps_to_nearest_dehydron() {
        let catalog = Catalog::default();
        let hb6 = catalog.bond("hb6").unwrap().midpoint;
        let intent = snap_placement(&armed(TemplateId::Tmao), &catalog, add(hb6, [0.3, 0.0, 0.0]));
        match intent {
            Some(Intent::PlaceStabilizer(req)) => {
                assert_eq!(req.target_dehydron_id, "hb6");
                assert_eq!(req.template_id, TemplateId::Tmao);
                assert_eq!(req.position, hb6);
            }
            other => panic!("expected placement, got {:?}", other),
        }
    }

    #[test]
    fn test_far_click_does_not_snap() {
        let catalog = Catalog::default();
        let far = [500.0, 500.0, 500.0];
        assert!(snap_placement(&armed(TemplateId::Trehalose), &catalog, far).is_none());
    }

    #[test]
    fn test_requires_armed_tool() {
        let catalog = Catalog::default();
        let hb1 = catalog.bond("hb1").unwrap().midpoint;
        assert!(snap_placement(&SessionState::initial(), &catalog, hb1).is_none());

        let mut state = armed(TemplateId::Glycerol);
        state.selected_template = None;
        assert!(snap_placement(&state, &catalog, hb1).is_none());
    }

    #[test]
    fn test_wrapped_dehydrons_are_skipped() {
        let catalog = Catalog::default();
        let mut state = armed(TemplateId::Glycerol);
        state.wrapped_dehydrons.insert("hb1".to_string());
        let hb1 = catalog.bond("hb1").unwrap().midpoint;
        if let Some((bond, _)) = nearest_unwrapped(&state, &catalog, hb1) {
            assert_ne!(bond.id, "hb1");
        }
    }

    #[test]
    fn test_placement_for_unknown_target() {
        let catalog = Catalog::default();
        match placement_for(&catalog, "hb99", TemplateId::Glycerol) {
            Intent::PlaceStabilizer(req) => assert_eq!(req.position, [0.0; 3]),
            other => panic!("unexpected {:?}", other),
        }
    }
}
