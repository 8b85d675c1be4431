//! Core types for GOSP

pub mod geometry;
mod dsm;
mod residue;
mod bond;
mod stabilizer;
mod session;
mod intent;
mod reason;
mod lock;
mod orphan;
mod output;

pub use geometry::Point3;
pub use dsm::DsmState;
pub use residue::{AminoAcid, Residue, ResidueClass, SecondaryStructure};
pub use bond::{HydrogenBond, Void};
pub use stabilizer::{PlacedStabilizer, StabilizerId, StabilizerTemplate, TemplateId};
pub use session::{ActiveTool, Selection, SessionState, VdemCascade, Visibility, VisToggle};
pub use intent::{Intent, PlacementRequest};
pub use reason::ReasonCode;
pub use lock::{LockContext, LockEvent, LockOutput, LockState, MA_STABILIZER_ID};
pub use orphan::{orphan_protein, OrphanProtein, PotentialHBond};
pub use output::DispatchOutput;
