//! Session store: the single owner of the current snapshot
//!
//! Intents are processed one at a time to completion. Each applied intent
//! publishes a fresh `Arc<SessionState>` and bumps the revision; ignored
//! intents leave both untouched, so renderers can compare pointers.

use std::sync::Arc;

use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::core::catalog::Catalog;
use crate::core::dsm::valid_transitions;
use crate::core::reducer::{reduce, Reduction, SequentialIds, StabilizerIds};
use crate::types::{DispatchOutput, DsmState, Intent, ReasonCode, SessionState};
use crate::Result;

pub struct SessionStore {
    catalog: Arc<Catalog>,
    state: Arc<SessionState>,
    revision: u64,
    ids: Box<dyn StabilizerIds + Send + Sync>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("state", &self.state)
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Store with sequential stabilizer ids
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self::with_ids(catalog, SequentialIds::new())
    }

    pub fn with_ids(catalog: Arc<Catalog>, ids: impl StabilizerIds + Send + Sync + 'static) -> Self {
        Self {
            catalog,
            state: Arc::new(SessionState::initial()),
            revision: 0,
            ids: Box::new(ids),
        }
    }

    /// Run one intent through the reducer
    pub fn dispatch(&mut self, intent: &Intent) -> DispatchOutput {
        let reduction = reduce(&self.state, intent, &self.catalog, self.ids.as_mut());
        let reason = reduction.reason();
        if let Reduction::Applied(next, _) = reduction {
            self.state = Arc::new(next);
            self.revision += 1;
        }
        debug!(
            intent = intent.kind(),
            reason = reason.code(),
            revision = self.revision,
            dsm = %self.state.dsm_state,
            "dispatch"
        );
        self.output(reason)
    }

    /// Dispatch a JSON intent; unrecognized shapes are no-ops
    pub fn dispatch_json(&mut self, value: serde_json::Value) -> DispatchOutput {
        match Intent::from_json(value) {
            Some(intent) => self.dispatch(&intent),
            None => {
                debug!(revision = self.revision, "unknown intent ignored");
                self.output(ReasonCode::R501_INTENT_UNKNOWN)
            }
        }
    }

    fn output(&self, reason: ReasonCode) -> DispatchOutput {
        DispatchOutput::new(&self.state, self.revision, reason, self.catalog.dehydron_count())
    }

    /// Current snapshot (cheap clone of the `Arc`)
    pub fn snapshot(&self) -> Arc<SessionState> {
        Arc::clone(&self.state)
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Hex SHA-256 of the snapshot's JSON form
    pub fn fingerprint(&self) -> Result<String> {
        fingerprint(&self.state)
    }

    /// Snapshot plus the values a renderer derives from it
    pub fn view(&self) -> Result<SessionView> {
        let state = self.snapshot();
        Ok(SessionView {
            revision: self.revision,
            fingerprint: fingerprint(&state)?,
            unwrapped_dehydrons: self
                .catalog
                .unwrapped_dehydrons(&state)
                .into_iter()
                .map(|b| b.id.clone())
                .collect(),
            drained_voids: self
                .catalog
                .drained_voids(&state)
                .into_iter()
                .map(|v| v.id.clone())
                .collect(),
            can_place_more: state.can_place_more(),
            wrapping_progress: self.catalog.wrapping_progress(&state),
            cascade_text: state.cascade.current_step().map(str::to_string),
            valid_transitions: valid_transitions(state.dsm_state).to_vec(),
            state,
        })
    }
}

/// Hex SHA-256 of a snapshot's JSON form
pub fn fingerprint(state: &SessionState) -> Result<String> {
    let bytes = serde_json::to_vec(state)?;
    let digest = Sha256::digest(&bytes);
    Ok(digest.iter().map(|b| format!("{:02x}", b)).collect())
}

/// Read-only view served to renderers
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub revision: u64,
    pub fingerprint: String,
    pub state: Arc<SessionState>,
    pub unwrapped_dehydrons: Vec<String>,
    pub drained_voids: Vec<String>,
    pub can_place_more: bool,
    pub wrapping_progress: f64,
    pub cascade_text: Option<String>,
    pub valid_transitions: Vec<DsmState>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PlacementRequest, TemplateId};
    use serde_json::json;

    fn store() -> SessionStore {
        SessionStore::new(Arc::new(Catalog::default()))
    }

    #[test]
    fn test_ignored_intent_keeps_snapshot() {
        let mut store = store();
        let before = store.snapshot();
        let out = store.dispatch(&Intent::TransitionDsm { target: DsmState::Folding });
        assert!(!out.applied);
        assert_eq!(store.revision(), 0);
        assert!(Arc::ptr_eq(&before, &store.snapshot()));
    }

    #[test]
    fn test_applied_intent_publishes_new_snapshot() {
        let mut store = store();
        let before = store.snapshot();
        let out = store.dispatch(&Intent::AdvanceVdem);
        assert_eq!(out.reason, ReasonCode::R301_VDEM_AT_END);

        let out = store.dispatch(&Intent::Reset);
        assert!(out.applied);
        assert_eq!(out.revision, 1);
        assert!(!Arc::ptr_eq(&before, &store.snapshot()));
        // Reset from initial is still the initial state
        assert_eq!(*before, *store.snapshot());
    }

    #[test]
    fn test_unknown_json_is_noop() {
        let mut store = store();
        let out = store.dispatch_json(json!({"type": "FLY_AWAY"}));
        assert_eq!(out.reason, ReasonCode::R501_INTENT_UNKNOWN);
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let mut store = store();
        let a = store.fingerprint().unwrap();
        assert_eq!(a.len(), 64);
        store.dispatch(&Intent::Reset);
        assert_eq!(a, store.fingerprint().unwrap());
        store.dispatch(&Intent::SelectResidue { residue: 3 });
        assert_ne!(a, store.fingerprint().unwrap());
    }

    #[test]
    fn test_view_derived_values() {
        let mut store = store();
        store.dispatch(&Intent::PlaceStabilizer(PlacementRequest::from_template(
            TemplateId::Glycerol,
            "hb4",
            [0.0; 3],
        )));
        let view = store.view().unwrap();
        assert_eq!(view.unwrapped_dehydrons, vec!["hb1", "hb6", "hb9", "hb13"]);
        assert!((view.wrapping_progress - 0.2).abs() < 1e-9);
        assert_eq!(view.cascade_text.as_deref(), Some("Stabilizer wraps dehydron hb4"));
        assert_eq!(view.valid_transitions, vec![DsmState::Stabilized, DsmState::Native]);
    }
}
