//! Edit-lock registry
//!
//! One user at a time may edit a given item. A lock is valid until
//! `refreshed_at + timeout`; expired records are not swept, they are simply
//! treated as absent and replaced by the next `obtain`.
//!
//! # Invariants
//!
//! - At most one valid lock per subject URI
//! - `obtain` by the current holder refreshes instead of failing
//! - A lock record is only replaced through compare-and-swap on its id
//!
//! Checking a lock and committing an edit are separate calls, so a lock can
//! expire between the two. Callers accept that window.

pub mod clock;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use store::{LockStore, MemoryLockStore};

use crate::errors::{ExError, ExErrorKind};
use crate::model::{ItemUri, User};
use crate::ops::StoreResult;
use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Time-bounded claim of one user on one item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditLock {
    pub id: String,
    pub subject_uri: String,
    pub user_id: String,
    pub user_email: String,
    pub issued_at: DateTime<Utc>,
    pub refreshed_at: DateTime<Utc>,
    pub refresh_count: u32,
}

impl EditLock {
    fn issue(subject: &ItemUri, user: &User, now: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::now_v7().to_string(),
            subject_uri: subject.to_string(),
            user_id: user.id.clone(),
            user_email: user.email.clone(),
            issued_at: now,
            refreshed_at: now,
            refresh_count: 0,
        }
    }

    pub fn held_by(&self, user: &User) -> bool {
        self.user_id == user.id
    }
}

pub struct LockRegistry {
    store: Arc<dyn LockStore>,
    clock: Arc<dyn Clock>,
    timeout: Duration,
}

impl LockRegistry {
    pub fn new(store: Arc<dyn LockStore>, clock: Arc<dyn Clock>, timeout: Duration) -> Self {
        Self {
            store,
            clock,
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Lock timestamps keep microseconds, the precision stores persist
    fn now(&self) -> DateTime<Utc> {
        self.clock.now().trunc_subsecs(6)
    }

    fn expires_at(&self, lock: &EditLock) -> Option<DateTime<Utc>> {
        lock.refreshed_at.checked_add_signed(self.timeout)
    }

    /// A lock whose expiry is past the end of time never expires
    pub fn is_expired(&self, lock: &EditLock) -> bool {
        let now = self.now();
        self.expires_at(lock).is_some_and(|expires| now > expires)
    }

    /// Claim `subject` for `user`
    ///
    /// Returns `None` when another user holds a valid lock. The current
    /// holder gets its lock back refreshed.
    pub fn obtain(&self, subject: &ItemUri, user: &User) -> StoreResult<Option<EditLock>> {
        let key = subject.to_string();
        let existing = self.store.find_by_subject(&key)?;

        if let Some(mut lock) = existing.clone().filter(|l| !self.is_expired(l)) {
            if !lock.held_by(user) {
                debug!(subject = %key, holder = %lock.user_id, "lock held by another user");
                return Ok(None);
            }
            if self.touch(&mut lock)? {
                return Ok(Some(lock));
            }
            // Released underneath us; fall through and claim afresh.
            return self.claim(subject, user, None);
        }

        let expected = existing.as_ref().map(|l| l.id.clone());
        self.claim(subject, user, expected.as_deref())
    }

    fn claim(
        &self,
        subject: &ItemUri,
        user: &User,
        expected_id: Option<&str>,
    ) -> StoreResult<Option<EditLock>> {
        let lock = EditLock::issue(subject, user, self.now());
        if self.store.compare_and_swap(expected_id, &lock)? {
            debug!(subject = %lock.subject_uri, lock_id = %lock.id, "lock issued");
            return Ok(Some(lock));
        }
        // Lost the race: whoever won decides.
        Ok(self.holder(subject)?.filter(|l| l.held_by(user)))
    }

    /// The caller's valid lock on `subject`, without creating one
    pub fn find_valid(&self, subject: &ItemUri, user: &User) -> StoreResult<Option<EditLock>> {
        Ok(self.holder(subject)?.filter(|l| l.held_by(user)))
    }

    /// The valid lock on `subject`, whoever holds it
    pub fn holder(&self, subject: &ItemUri) -> StoreResult<Option<EditLock>> {
        Ok(self
            .store
            .find_by_subject(&subject.to_string())?
            .filter(|l| !self.is_expired(l)))
    }

    /// Extend `lock` and return its new refresh count
    pub fn refresh(&self, lock: &mut EditLock) -> StoreResult<u32> {
        if self.touch(lock)? {
            Ok(lock.refresh_count)
        } else {
            Err(ExError::new(ExErrorKind::LockExpired)
                .with_op("lock_refresh")
                .with_entity_id(lock.subject_uri.clone())
                .with_message("lock no longer exists"))
        }
    }

    fn touch(&self, lock: &mut EditLock) -> StoreResult<bool> {
        let mut next = lock.clone();
        next.refresh_count += 1;
        next.refreshed_at = self.now();
        let saved = self.store.save(&next)?;
        if saved {
            *lock = next;
        }
        Ok(saved)
    }

    pub fn release(&self, lock: &EditLock) -> StoreResult<()> {
        if self.store.remove(&lock.id)? {
            debug!(subject = %lock.subject_uri, lock_id = %lock.id, "lock released");
        }
        Ok(())
    }

    /// Whole seconds before `lock` expires, never negative
    pub fn remaining(&self, lock: &EditLock) -> i64 {
        match self.expires_at(lock) {
            Some(expires) => expires
                .signed_duration_since(self.now())
                .num_seconds()
                .max(0),
            None => i64::MAX,
        }
    }

    /// Drop every lock held by `user`; returns how many were removed
    pub fn release_all_for_user(&self, user: &User) -> StoreResult<usize> {
        let mut released = 0;
        for lock in self.store.list()? {
            if lock.held_by(user) && self.store.remove(&lock.id)? {
                released += 1;
            }
        }
        Ok(released)
    }

    pub fn active_locks(&self) -> StoreResult<Vec<EditLock>> {
        Ok(self
            .store
            .list()?
            .into_iter()
            .filter(|l| !self.is_expired(l))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (LockRegistry, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        let registry = LockRegistry::new(
            Arc::new(MemoryLockStore::new()),
            clock.clone(),
            Duration::seconds(300),
        );
        (registry, clock)
    }

    fn subject() -> ItemUri {
        ItemUri::new("http://www.assero.co.uk/MDRForms/ACME/V1", "F-ACME_DM101")
    }

    fn alice() -> User {
        User::new("alice", "alice@example.com")
    }

    fn bob() -> User {
        User::new("bob", "bob@example.com")
    }

    #[test]
    fn test_second_user_is_refused() {
        let (registry, _) = fixture();
        assert!(registry.obtain(&subject(), &alice()).unwrap().is_some());
        assert!(registry.obtain(&subject(), &bob()).unwrap().is_none());
    }

    #[test]
    fn test_holder_obtaining_again_refreshes() {
        let (registry, clock) = fixture();
        let first = registry.obtain(&subject(), &alice()).unwrap().unwrap();
        clock.advance(Duration::seconds(10));
        let second = registry.obtain(&subject(), &alice()).unwrap().unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.refresh_count, first.refresh_count + 1);
        assert!(second.refreshed_at > first.refreshed_at);
    }

    #[test]
    fn test_expired_lock_is_replaced() {
        let (registry, clock) = fixture();
        let stale = registry.obtain(&subject(), &alice()).unwrap().unwrap();
        clock.advance(Duration::seconds(301));

        assert!(registry.find_valid(&subject(), &alice()).unwrap().is_none());
        let fresh = registry.obtain(&subject(), &bob()).unwrap().unwrap();
        assert_ne!(stale.id, fresh.id);
        assert!(fresh.held_by(&bob()));
    }

    #[test]
    fn test_refresh_counts_and_extends() {
        let (registry, clock) = fixture();
        let mut lock = registry.obtain(&subject(), &alice()).unwrap().unwrap();
        assert_eq!(registry.refresh(&mut lock).unwrap(), 1);
        clock.advance(Duration::seconds(200));
        assert_eq!(registry.refresh(&mut lock).unwrap(), 2);
        clock.advance(Duration::seconds(200));
        assert!(registry.find_valid(&subject(), &alice()).unwrap().is_some());
        assert_eq!(registry.remaining(&lock), 100);
    }

    #[test]
    fn test_timestamps_drop_sub_microsecond_precision() {
        let clock = Arc::new(ManualClock::new(
            DateTime::parse_from_rfc3339("2026-03-01T09:30:00.123456789Z")
                .unwrap()
                .with_timezone(&Utc),
        ));
        let registry =
            LockRegistry::new(Arc::new(MemoryLockStore::new()), clock, Duration::seconds(300));

        let lock = registry.obtain(&subject(), &alice()).unwrap().unwrap();

        assert_eq!(lock.issued_at.timestamp_subsec_nanos(), 123_456_000);
        assert_eq!(lock.refreshed_at, lock.issued_at);
        assert_eq!(registry.remaining(&lock), 300);
    }

    #[test]
    fn test_huge_timeout_never_expires() {
        // GIVEN a timeout that overflows any timestamp it is added to
        let clock = Arc::new(ManualClock::default());
        let registry = LockRegistry::new(
            Arc::new(MemoryLockStore::new()),
            clock.clone(),
            Duration::seconds(i64::MAX / 1000),
        );
        let lock = registry.obtain(&subject(), &alice()).unwrap().unwrap();

        // WHEN time moves on
        clock.advance(Duration::days(365));

        // THEN the lock is still held and remaining saturates
        assert!(!registry.is_expired(&lock));
        assert_eq!(registry.remaining(&lock), i64::MAX);
        assert!(registry.obtain(&subject(), &bob()).unwrap().is_none());
    }

    #[test]
    fn test_refresh_after_release_is_lock_expired() {
        let (registry, _) = fixture();
        let mut lock = registry.obtain(&subject(), &alice()).unwrap().unwrap();
        registry.release(&lock).unwrap();
        let err = registry.refresh(&mut lock).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::LockExpired);
    }

    #[test]
    fn test_release_all_for_user() {
        let (registry, _) = fixture();
        let other = subject().child("X");
        registry.obtain(&subject(), &alice()).unwrap();
        registry.obtain(&other, &alice()).unwrap();
        let third = ItemUri::new("http://www.assero.co.uk/MDRForms/ACME/V1", "F-ACME_AE1");
        registry.obtain(&third, &bob()).unwrap();

        assert_eq!(registry.release_all_for_user(&alice()).unwrap(), 2);
        let active = registry.active_locks().unwrap();
        assert_eq!(active.len(), 1);
        assert!(active[0].held_by(&bob()));
    }
}
