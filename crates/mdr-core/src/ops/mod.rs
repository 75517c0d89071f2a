//! Store-facing operations shared by the engine and the store crate

pub mod chain;
pub mod graph_store;
pub mod queries;

pub use chain::Versioned;
pub use graph_store::{FailMode, FaultyGraphStore, GraphStore, MemoryGraphStore, StoreResult};
