//! Version-chain arithmetic
//!
//! A chain is every version sharing one `(scope, identifier)` pair. These
//! helpers are pure; the lifecycle engine feeds them whatever the store
//! returned.

use crate::model::{ChainKey, ManagedItem, Payload, Scope, ScopedIdentifier};
use std::collections::BTreeMap;

/// Anything that occupies a slot in a version chain
pub trait Versioned {
    fn chain_key(&self) -> ChainKey;
    fn version(&self) -> u32;
}

impl Versioned for ScopedIdentifier {
    fn chain_key(&self) -> ChainKey {
        ScopedIdentifier::chain_key(self)
    }

    fn version(&self) -> u32 {
        self.version
    }
}

impl<P: Payload> Versioned for ManagedItem<P> {
    fn chain_key(&self) -> ChainKey {
        ManagedItem::chain_key(self)
    }

    fn version(&self) -> u32 {
        ManagedItem::version(self)
    }
}

/// First identifier of a new chain
pub fn allocate(scope: &Scope, identifier: &str) -> ScopedIdentifier {
    ScopedIdentifier::new(identifier, 1, scope.clone())
}

/// Identifier for the version after the highest one in `chain`
///
/// An empty chain allocates version 1 in `scope`. `None` once the chain
/// holds `u32::MAX`.
pub fn next_version<T: Versioned>(
    chain: &[T],
    scope: &Scope,
    identifier: &str,
) -> Option<ScopedIdentifier> {
    let max = chain.iter().map(Versioned::version).max().unwrap_or(0);
    let next = max.checked_add(1)?;
    Some(ScopedIdentifier::new(identifier, next, scope.clone()))
}

/// Members of `key`'s chain, newest first
pub fn chain_of<T: Versioned + Clone>(items: &[T], key: &ChainKey) -> Vec<T> {
    let mut chain: Vec<T> = items
        .iter()
        .filter(|i| &i.chain_key() == key)
        .cloned()
        .collect();
    chain.sort_by(|a, b| b.version().cmp(&a.version()));
    chain.dedup_by_key(|i| i.version());
    chain
}

/// Highest version in `key`'s chain
pub fn latest_of<T: Versioned + Clone>(items: &[T], key: &ChainKey) -> Option<T> {
    items
        .iter()
        .filter(|i| &i.chain_key() == key)
        .max_by_key(|i| i.version())
        .cloned()
}

/// The latest member of every chain, ordered by chain key
pub fn latest_per_chain<T: Versioned + Clone>(items: &[T]) -> Vec<T> {
    let mut latest: BTreeMap<ChainKey, &T> = BTreeMap::new();
    for item in items {
        let key = item.chain_key();
        match latest.get(&key) {
            Some(current) if current.version() >= item.version() => {}
            _ => {
                latest.insert(key, item);
            }
        }
    }
    latest.into_values().cloned().collect()
}

/// True when `version` is already taken in `key`'s chain
pub fn version_taken<T: Versioned>(items: &[T], key: &ChainKey, version: u32) -> bool {
    items
        .iter()
        .any(|i| &i.chain_key() == key && i.version() == version)
}
