//! Graph store adapter contract and in-process implementations
//!
//! The lifecycle engine needs only two operations: pattern queries and
//! atomic mutations. Each `update` call is all-or-nothing; the engine never
//! assumes a transaction spanning two calls.

use crate::errors::{ExError, ExErrorKind};
use crate::graph::{GraphMutation, Triple, TriplePattern};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, RwLock};

/// Result type used by store collaborators
pub type StoreResult<T> = std::result::Result<T, ExError>;

/// Triple store seen by the lifecycle engine
pub trait GraphStore: Send + Sync {
    /// All triples matching the pattern
    fn query(&self, pattern: &TriplePattern) -> StoreResult<Vec<Triple>>;

    /// Apply deletions then insertions as one atomic unit
    fn update(&self, mutation: &GraphMutation) -> StoreResult<()>;
}

/// In-memory triple set
#[derive(Debug, Default)]
pub struct MemoryGraphStore {
    triples: RwLock<BTreeSet<Triple>>,
}

impl MemoryGraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.triples.read().map(|t| t.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned(op: &str) -> ExError {
    ExError::new(ExErrorKind::Concurrency)
        .with_op(op)
        .with_message("graph store lock poisoned")
}

impl GraphStore for MemoryGraphStore {
    fn query(&self, pattern: &TriplePattern) -> StoreResult<Vec<Triple>> {
        let triples = self.triples.read().map_err(|_| poisoned("graph_query"))?;
        Ok(triples.iter().filter(|t| pattern.matches(t)).cloned().collect())
    }

    fn update(&self, mutation: &GraphMutation) -> StoreResult<()> {
        let mut triples = self.triples.write().map_err(|_| poisoned("graph_update"))?;
        for t in &mutation.delete {
            triples.remove(t);
        }
        triples.extend(mutation.insert.iter().cloned());
        Ok(())
    }
}

/// Which mutations a [`FaultyGraphStore`] rejects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailMode {
    Never,
    /// Reject mutations that insert triples
    Inserts,
    /// Reject mutations that only delete
    Deletes,
    /// Reject the n-th mutation (0-based) and accept the rest
    NthUpdate(usize),
    Always,
}

/// Test double wrapping a real store and failing selected mutations
///
/// A rejected mutation leaves the inner store untouched.
pub struct FaultyGraphStore<S> {
    inner: S,
    mode: Mutex<FailMode>,
    updates: AtomicUsize,
}

impl<S: GraphStore> FaultyGraphStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            mode: Mutex::new(FailMode::Never),
            updates: AtomicUsize::new(0),
        }
    }

    pub fn set_mode(&self, mode: FailMode) {
        if let Ok(mut m) = self.mode.lock() {
            *m = mode;
        }
        self.updates.store(0, Ordering::SeqCst);
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: GraphStore> GraphStore for FaultyGraphStore<S> {
    fn query(&self, pattern: &TriplePattern) -> StoreResult<Vec<Triple>> {
        self.inner.query(pattern)
    }

    fn update(&self, mutation: &GraphMutation) -> StoreResult<()> {
        let index = self.updates.fetch_add(1, Ordering::SeqCst);
        let mode = self.mode.lock().map(|m| *m).unwrap_or(FailMode::Always);
        let fail = match mode {
            FailMode::Never => false,
            FailMode::Inserts => !mutation.insert.is_empty(),
            FailMode::Deletes => mutation.insert.is_empty() && !mutation.delete.is_empty(),
            FailMode::NthUpdate(n) => index == n,
            FailMode::Always => true,
        };
        if fail {
            return Err(ExError::new(ExErrorKind::Persistence)
                .with_op("graph_update")
                .with_message("injected store failure"));
        }
        self.inner.update(mutation)
    }
}
