//! Schema migrations for the graph, lock and audit tables
//!
//! Each migration is applied once, inside a transaction, and its SHA-256
//! is recorded in `schema_version`. A recorded migration whose embedded SQL
//! no longer hashes the same is refused.

mod checksums;
mod embedded;
mod runner;

pub use embedded::{get_migrations, Migration};
pub use runner::apply_migrations;
