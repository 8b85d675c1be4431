//! Core modules for GOSP

pub mod dsm;
pub mod catalog;
pub mod reducer;
pub mod store;
pub mod lock_machine;
pub mod placement;
pub mod command;
pub mod api;

pub use dsm::{can_transition, can_transition_by_name, valid_transitions, valid_transitions_by_name};
pub use catalog::{Catalog, CatalogSpec};
pub use reducer::{reduce, reduce_state, Reduction, SequentialIds, StabilizerIds, TimestampIds};
pub use store::{fingerprint, SessionStore, SessionView};
pub use lock_machine::LockMachine;
pub use placement::{placement_for, snap_placement};
pub use command::{parse_command, Command};
pub use api::{create_router, run_server};
