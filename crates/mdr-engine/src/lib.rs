//! MDR Engine - managed-item lifecycle and edit sessions
//!
//! Coordinates the core domain logic with the collaborators that hold
//! state: the graph store, the edit-lock registry and the audit sink.
//!
//! - [`lifecycle::Lifecycle`] reads and writes managed items
//! - [`session::EditService`] layers the lock protocol and audit trail on top
//! - [`terminology::GraphTerminology`] reads thesauri from the graph store

pub mod lifecycle;
pub mod outcome;
pub mod session;
pub mod terminology;

pub use lifecycle::Lifecycle;
pub use outcome::{
    CreateOutcome, DestroyOutcome, EditOutcome, SaveOutcome, UpdateOutcome, UpgradeOutcome,
};
pub use session::EditService;
pub use terminology::GraphTerminology;
