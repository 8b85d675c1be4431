//! Integration tests for the lock verification machine

use gosp::core::LockMachine;
use gosp::types::{orphan_protein, LockEvent, LockState, ReasonCode, MA_STABILIZER_ID};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn identify_target() -> LockEvent {
    LockEvent::IdentifyVoid { coordinates: orphan_protein().void_target() }
}

#[test]
fn test_end_to_end_lock() {
    let mut machine = LockMachine::with_seed(2024);
    assert_eq!(machine.state(), LockState::Search);

    let out = machine.send(identify_target());
    assert_eq!(out.state, LockState::Align);
    assert_eq!(out.context.coordinates, Some([4.5, 4.5, 2.0]));

    let out = machine.send(LockEvent::VerifyMa { energy_potential: -17.2, ramachandran_valid: true });
    assert_eq!(out.state, LockState::Lock);
    assert_eq!(out.reason, ReasonCode::R601_LOCK_ACCEPTED);
    assert!(out.context.is_physically_locked);
    assert_eq!(out.context.fidelity_score, 1.0);
    assert_eq!(out.context.ma_stabilizer_id, MA_STABILIZER_ID);
    assert!(machine.state().is_final());
}

#[test]
fn test_rejection_then_retry() {
    let mut machine = LockMachine::with_rng(StdRng::seed_from_u64(5));
    machine.send(identify_target());

    let out = machine.send(LockEvent::VerifyMa { energy_potential: -3.0, ramachandran_valid: true });
    assert_eq!(out.state, LockState::Search);
    assert_eq!(out.reason, ReasonCode::R602_LOCK_REJECTED);
    assert!(!out.context.is_physically_locked);
    assert_eq!(out.context.fidelity_score, 0.0);

    // A second attempt re-enters ALIGN with a fresh sample
    let out = machine.send(LockEvent::IdentifyVoid { coordinates: [1.0, 2.0, 3.0] });
    assert_eq!(out.state, LockState::Align);
    assert_eq!(out.context.coordinates, Some([1.0, 2.0, 3.0]));
    assert!(out.context.energy_potential < 0.0);
    assert!(out.context.energy_potential >= -20.0);

    let out = machine.send(LockEvent::VerifyMa { energy_potential: -19.9, ramachandran_valid: true });
    assert_eq!(out.state, LockState::Lock);
}

#[test]
fn test_events_after_lock_are_ignored() {
    let mut machine = LockMachine::with_seed(8);
    machine.send(identify_target());
    machine.send(LockEvent::VerifyMa { energy_potential: -16.0, ramachandran_valid: true });
    let locked = machine.context().clone();

    let out = machine.send(identify_target());
    assert_eq!(out.reason, ReasonCode::R603_LOCK_EVENT_IGNORED);
    assert_eq!(out.context, locked);
}

#[test]
fn test_energy_samples_stay_in_range() {
    for seed in 0..200 {
        let mut machine = LockMachine::with_seed(seed);
        let energy = machine.send(identify_target()).context.energy_potential;
        assert!((-20.0..0.0).contains(&energy), "seed {} sampled {}", seed, energy);
    }
}

#[test]
fn test_event_json() {
    let event: LockEvent = serde_json::from_str(
        r#"{"type": "IDENTIFY_VOID", "coordinates": [4.5, 4.5, 2.0]}"#,
    )
    .unwrap();
    let mut machine = LockMachine::with_seed(1);
    assert_eq!(machine.send(event).state, LockState::Align);
}
