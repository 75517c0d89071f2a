//! MDR Store - SQLite persistence for the metadata repository
//!
//! Provides:
//! - SQLite schema with a checksummed migrations framework
//! - `SqliteStore`, one connection implementing the graph store, the
//!   edit-lock store and the audit sink
//! - N-Triples file import

pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;
pub mod seed;

// Re-export key types
pub use errors::Result;
pub use repo::SqliteStore;
pub use seed::import_ntriples_file;
