//! MDR Core - versioned managed items stored as graph triples
//!
//! This crate provides the kind-independent machinery of the metadata
//! repository:
//! - Managed items with scoped identifiers, registration state and
//!   kind-specific payloads (forms, biomedical concepts, thesauri)
//! - Version-chain arithmetic and URI derivation
//! - Graph codec and N-Triples reader/writer
//! - Collaborator contracts (graph store, lock store, audit sink, create
//!   policy, terminology source) with in-memory implementations
//! - The edit-lock registry
//! - Error, logging and configuration facilities shared by the other crates

pub mod audit;
pub mod config;
pub mod domains;
pub mod errors;
pub mod graph;
pub mod lock;
pub mod logging_facility;
pub mod model;
pub mod ops;
pub mod policy;
pub mod rules;
pub mod terminology;

// Macros reach the schema constants through this path
pub use mdr_core_types;

// Re-export commonly used types
pub use audit::{AuditEvent, AuditEventKind, AuditSink};
pub use config::MdrConfig;
pub use errors::{ExError, ExErrorKind, MdrError, Result};
pub use lock::{EditLock, LockRegistry, LockStore};
pub use model::{
    BiomedicalConcept, Form, ItemSummary, ItemUri, ManagedItem, OperationPayload, Payload, User,
};
pub use ops::GraphStore;
pub use policy::{AllowAllCreatePolicy, CreatePolicy, DenyAllCreatePolicy};
pub use terminology::TerminologySource;
