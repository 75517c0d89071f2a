//! Shared storage for edit-lock records

use crate::errors::{ExError, ExErrorKind};
use crate::lock::EditLock;
use crate::ops::StoreResult;
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Lock records keyed by subject URI
///
/// At most one record exists per subject. Expiry is not the store's
/// concern; the registry decides validity.
pub trait LockStore: Send + Sync {
    fn find_by_subject(&self, subject_uri: &str) -> StoreResult<Option<EditLock>>;

    /// Replace the record for `lock.subject_uri` only if the current record
    /// has id `expected_id` (`None`: no record). Returns whether it swapped.
    fn compare_and_swap(&self, expected_id: Option<&str>, lock: &EditLock) -> StoreResult<bool>;

    /// Overwrite an existing record with the same id; `false` if it is gone
    fn save(&self, lock: &EditLock) -> StoreResult<bool>;

    /// Delete by id; `false` if nothing was deleted
    fn remove(&self, lock_id: &str) -> StoreResult<bool>;

    fn list(&self) -> StoreResult<Vec<EditLock>>;
}

#[derive(Debug, Default)]
pub struct MemoryLockStore {
    locks: Mutex<BTreeMap<String, EditLock>>,
}

impl MemoryLockStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> StoreResult<std::sync::MutexGuard<'_, BTreeMap<String, EditLock>>> {
        self.locks.lock().map_err(|_| {
            ExError::new(ExErrorKind::Concurrency)
                .with_op("lock_store")
                .with_message("lock table poisoned")
        })
    }
}

impl LockStore for MemoryLockStore {
    fn find_by_subject(&self, subject_uri: &str) -> StoreResult<Option<EditLock>> {
        Ok(self.guard()?.get(subject_uri).cloned())
    }

    fn compare_and_swap(&self, expected_id: Option<&str>, lock: &EditLock) -> StoreResult<bool> {
        let mut locks = self.guard()?;
        let current = locks.get(&lock.subject_uri).map(|l| l.id.as_str());
        if current != expected_id {
            return Ok(false);
        }
        locks.insert(lock.subject_uri.clone(), lock.clone());
        Ok(true)
    }

    fn save(&self, lock: &EditLock) -> StoreResult<bool> {
        let mut locks = self.guard()?;
        match locks.get_mut(&lock.subject_uri) {
            Some(current) if current.id == lock.id => {
                *current = lock.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn remove(&self, lock_id: &str) -> StoreResult<bool> {
        let mut locks = self.guard()?;
        let before = locks.len();
        locks.retain(|_, l| l.id != lock_id);
        Ok(locks.len() != before)
    }

    fn list(&self) -> StoreResult<Vec<EditLock>> {
        Ok(self.guard()?.values().cloned().collect())
    }
}
