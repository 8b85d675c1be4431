//! Lock verification engine: SEARCH → ALIGN → LOCK
//!
//! State transitions:
//! - SEARCH → ALIGN: IDENTIFY_VOID (coordinates stored, energy sampled)
//! - ALIGN → LOCK: VERIFY_MA with energy < -15.5 AND Ramachandran valid
//! - ALIGN → SEARCH: VERIFY_MA otherwise ("biological ghost")
//! - LOCK: terminal

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

use crate::types::{LockContext, LockEvent, LockOutput, LockState, ReasonCode};
use crate::{ALIGN_ENERGY_MAX, ALIGN_ENERGY_MIN, LOCKED_FIDELITY, LOCK_ENERGY_THRESHOLD};

/// Lock verification state machine
#[derive(Debug)]
pub struct LockMachine<R: Rng = StdRng> {
    state: LockState,
    context: LockContext,
    rng: R,
    /// Number of events received
    event_count: u64,
}

impl LockMachine<StdRng> {
    /// Create a machine seeded from the OS
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Create a machine with a reproducible energy sample
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for LockMachine<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> LockMachine<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            state: LockState::Search,
            context: LockContext::default(),
            rng,
            event_count: 0,
        }
    }

    /// Feed one event, return the resulting state and reason
    pub fn send(&mut self, event: LockEvent) -> LockOutput {
        self.event_count += 1;

        let reason = match (self.state, event) {
            (LockState::Search, LockEvent::IdentifyVoid { coordinates }) => {
                self.context.coordinates = Some(coordinates);
                self.enter_align();
                ReasonCode::R600_LOCK_VOID_IDENTIFIED
            }

            // Event values feed the guard only; the ALIGN sample stays in the context
            (LockState::Align, LockEvent::VerifyMa { energy_potential, ramachandran_valid }) => {
                if energy_potential < LOCK_ENERGY_THRESHOLD && ramachandran_valid {
                    self.enter_lock();
                    ReasonCode::R601_LOCK_ACCEPTED
                } else {
                    warn!(
                        energy = energy_potential,
                        ramachandran_valid,
                        "biological ghost detected, returning to search"
                    );
                    self.state = LockState::Search;
                    ReasonCode::R602_LOCK_REJECTED
                }
            }

            _ => ReasonCode::R603_LOCK_EVENT_IGNORED,
        };

        self.output(reason)
    }

    fn enter_align(&mut self) {
        self.state = LockState::Align;
        self.context.energy_potential = self.rng.random_range(ALIGN_ENERGY_MIN..ALIGN_ENERGY_MAX);
    }

    fn enter_lock(&mut self) {
        self.state = LockState::Lock;
        self.context.is_physically_locked = true;
        self.context.fidelity_score = LOCKED_FIDELITY;
        info!(
            stabilizer = %self.context.ma_stabilizer_id,
            energy = self.context.energy_potential,
            "deterministic state achieved, constraint verified"
        );
    }

    fn output(&self, reason: ReasonCode) -> LockOutput {
        LockOutput {
            state: self.state,
            reason,
            context: self.context.clone(),
        }
    }

    pub fn state(&self) -> LockState {
        self.state
    }

    pub fn context(&self) -> &LockContext {
        &self.context
    }

    pub fn event_count(&self) -> u64 {
        self.event_count
    }

    /// Current output without sending an event
    pub fn current_output(&self) -> LockOutput {
        let reason = match self.state {
            LockState::Search => ReasonCode::R604_LOCK_RESET,
            LockState::Align => ReasonCode::R600_LOCK_VOID_IDENTIFIED,
            LockState::Lock => ReasonCode::R601_LOCK_ACCEPTED,
        };
        self.output(reason)
    }

    /// Back to SEARCH with a fresh context; the random source is kept
    pub fn reset(&mut self) -> LockOutput {
        self.state = LockState::Search;
        self.context = LockContext::default();
        self.event_count = 0;
        self.output(ReasonCode::R604_LOCK_RESET)
    }
}

// =============================================================================
// TESTS
// =============================================================================
