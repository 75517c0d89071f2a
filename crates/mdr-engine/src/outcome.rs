//! Results of lifecycle and edit-session operations
//!
//! Validation failures, lock conflicts and permission skips are expected
//! outcomes and are returned as values. Store failures are errors.

use mdr_core::lock::EditLock;
use mdr_core::model::{ManagedItem, OperationPayload};
use mdr_core::terminology::UpgradeConflict;

#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome<P> {
    /// The item was written
    Created(ManagedItem<P>),
    /// Nothing was written; `errors` on the item say why
    Invalid(ManagedItem<P>),
    /// Valid, but the create policy refused the write
    PermissionSkipped(ManagedItem<P>),
}

impl<P> CreateOutcome<P> {
    pub fn item(&self) -> &ManagedItem<P> {
        match self {
            CreateOutcome::Created(item)
            | CreateOutcome::Invalid(item)
            | CreateOutcome::PermissionSkipped(item) => item,
        }
    }

    pub fn into_item(self) -> ManagedItem<P> {
        match self {
            CreateOutcome::Created(item)
            | CreateOutcome::Invalid(item)
            | CreateOutcome::PermissionSkipped(item) => item,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, CreateOutcome::Created(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome<P> {
    Updated(ManagedItem<P>),
    Invalid(ManagedItem<P>),
}

impl<P> UpdateOutcome<P> {
    pub fn item(&self) -> &ManagedItem<P> {
        match self {
            UpdateOutcome::Updated(item) | UpdateOutcome::Invalid(item) => item,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome<P> {
    /// The caller holds the lock on `item` and may save `payload`
    Editing {
        item: ManagedItem<P>,
        lock: EditLock,
        payload: OperationPayload<P>,
    },
    /// Someone else holds a valid lock
    LockConflict { holder: Option<EditLock> },
    /// Retired and superseded items are closed
    NotEditable(ManagedItem<P>),
    /// The next version of a released item could not be written
    VersionNotCreated(CreateOutcome<P>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome<P> {
    Saved(ManagedItem<P>),
    Invalid(ManagedItem<P>),
    /// Another user holds the lock
    LockConflict { holder: Option<EditLock> },
    /// The caller's lock timed out and nobody else has claimed the item
    LockExpired,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DestroyOutcome {
    Destroyed,
    LockConflict { holder: Option<EditLock> },
}

#[derive(Debug, Clone, PartialEq)]
pub enum UpgradeOutcome<P> {
    /// References moved; the committed item is returned
    Upgraded(ManagedItem<P>),
    /// Every reference already points at a current thesaurus
    Unchanged(ManagedItem<P>),
    /// At least one reference would change meaning; nothing was written
    Aborted {
        item: ManagedItem<P>,
        conflicts: Vec<UpgradeConflict>,
    },
    Invalid(ManagedItem<P>),
    PermissionSkipped(ManagedItem<P>),
    /// Another user is editing the version that would be rewritten
    LockConflict { holder: Option<EditLock> },
}
