//! Edit sessions: the lock protocol and audit trail around the lifecycle
//!
//! Lock ownership is checked before a commit and the commit happens in a
//! separate store call, so a lock can expire between the two. That window
//! is accepted; nothing here retries.
//!
//! Audit events are recorded only after a successful write. A failing audit
//! sink is logged and never fails the operation.

#![allow(clippy::result_large_err)]

use crate::lifecycle::Lifecycle;
use crate::outcome::{
    CreateOutcome, DestroyOutcome, EditOutcome, SaveOutcome, UpdateOutcome, UpgradeOutcome,
};
use mdr_core::audit::{AuditEvent, AuditEventKind, AuditSink};
use mdr_core::errors::Result;
use mdr_core::lock::{EditLock, LockRegistry};
use mdr_core::model::{ItemSummary, ItemUri, ManagedItem, OperationPayload, Payload, User};
use mdr_core::terminology::TerminologySource;
use mdr_core_types::{RequestContext, TraceId};
use std::sync::Arc;
use tracing::{info_span, warn};

pub struct EditService {
    lifecycle: Lifecycle,
    locks: LockRegistry,
    audit: Arc<dyn AuditSink>,
    terminology: Arc<dyn TerminologySource>,
    trace_id: Option<TraceId>,
}

impl EditService {
    pub fn new(
        lifecycle: Lifecycle,
        locks: LockRegistry,
        audit: Arc<dyn AuditSink>,
        terminology: Arc<dyn TerminologySource>,
    ) -> Self {
        Self {
            lifecycle,
            locks,
            audit,
            terminology,
            trace_id: None,
        }
    }

    /// Tie every call of this service to one caller-side workflow
    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    pub fn locks(&self) -> &LockRegistry {
        &self.locks
    }

    fn context(&self) -> RequestContext {
        match &self.trace_id {
            Some(trace) => RequestContext::new().with_trace_id(trace.clone()),
            None => RequestContext::new(),
        }
    }

    /// # Errors
    ///
    /// `CreateFailed` when the store rejects the write.
    pub fn create<P: Payload>(
        &self,
        payload: &OperationPayload<P>,
        user: &User,
    ) -> Result<CreateOutcome<P>> {
        let ctx = self.context();
        let _span = session_span(&ctx, "create", user).entered();

        let outcome = self.lifecycle.create(payload, user)?;
        if let CreateOutcome::Created(item) = &outcome {
            let message = format!("{} created.", P::KIND.name);
            self.record(&ctx, AuditEventKind::Create, user, &item.summary(), message);
        }
        Ok(outcome)
    }

    /// # Errors
    ///
    /// `ItemNotFound` for an unknown source, `CreateFailed` on store failure.
    pub fn clone_item<P: Payload>(
        &self,
        source: &ItemUri,
        new_identifier: &str,
        new_label: &str,
        user: &User,
    ) -> Result<CreateOutcome<P>> {
        let ctx = self.context();
        let _span = session_span(&ctx, "clone", user).entered();

        let from = self.lifecycle.find::<P>(source, false)?;
        let outcome = self
            .lifecycle
            .clone_item::<P>(source, new_identifier, new_label, user)?;
        if let CreateOutcome::Created(item) = &outcome {
            let message = format!("{} cloned from {}.", P::KIND.name, from.identifier());
            self.record(&ctx, AuditEventKind::Create, user, &item.summary(), message);
        }
        Ok(outcome)
    }

    /// # Errors
    ///
    /// As [`EditService::clone_item`].
    pub fn branch<P: Payload>(
        &self,
        source: &ItemUri,
        new_identifier: &str,
        new_label: &str,
        user: &User,
    ) -> Result<CreateOutcome<P>> {
        let ctx = self.context();
        let _span = session_span(&ctx, "branch", user).entered();

        let from = self.lifecycle.find::<P>(source, false)?;
        let outcome = self
            .lifecycle
            .branch::<P>(source, new_identifier, new_label, user)?;
        if let CreateOutcome::Created(item) = &outcome {
            let message = format!("{} branched from {}.", P::KIND.name, from.identifier());
            self.record(&ctx, AuditEventKind::Create, user, &item.summary(), message);
        }
        Ok(outcome)
    }

    /// Lock the head of the item's chain for editing
    ///
    /// Editing always targets the latest version, and that version's status
    /// decides whether the chain is still open. When it is released its
    /// successor is created first and locked instead.
    ///
    /// # Errors
    ///
    /// `ItemNotFound`, store failures, and `CreateFailed` when the next
    /// version cannot be written.
    pub fn begin_edit<P: Payload>(&self, uri: &ItemUri, user: &User) -> Result<EditOutcome<P>> {
        let ctx = self.context();
        let _span = session_span(&ctx, "begin_edit", user).entered();

        let item = self.lifecycle.find::<P>(uri, false)?;
        let head = self
            .lifecycle
            .history::<P>(item.identifier(), &item.scope().id)?
            .into_iter()
            .next()
            .unwrap_or(item);
        if !head.status().is_editable() {
            return Ok(EditOutcome::NotEditable(head));
        }

        let target = if self.lifecycle.config().is_released(head.status()) {
            let full = self.lifecycle.find::<P>(&head.uri, true)?;
            let op = full.to_operation(self.lifecycle.config())?;
            match self.lifecycle.create(&op, user)? {
                CreateOutcome::Created(next) => {
                    let message = format!("{} created.", P::KIND.name);
                    self.record(&ctx, AuditEventKind::Create, user, &next.summary(), message);
                    next.uri
                }
                other => return Ok(EditOutcome::VersionNotCreated(other)),
            }
        } else {
            head.uri
        };

        let Some(lock) = self.locks.obtain(&target, user)? else {
            return Ok(EditOutcome::LockConflict {
                holder: self.locks.holder(&target)?,
            });
        };
        let item = self.lifecycle.find::<P>(&target, true)?;
        let payload = item.update_operation();
        Ok(EditOutcome::Editing {
            item,
            lock,
            payload,
        })
    }

    /// Commit an edit in place
    ///
    /// Requires a valid lock held by `user` on the edited version. The first
    /// save of an edit session is audited; later autosaves are not.
    ///
    /// # Errors
    ///
    /// `UpdateFailed` when the store fails part way; the lock stays held.
    pub fn save<P: Payload>(
        &self,
        payload: &OperationPayload<P>,
        user: &User,
    ) -> Result<SaveOutcome<P>> {
        let ctx = self.context();
        let _span = session_span(&ctx, "save", user).entered();

        let subject = &payload.managed_item.uri;
        let Some(mut lock) = self.locks.find_valid(subject, user)? else {
            return Ok(match self.locks.holder(subject)? {
                Some(holder) => SaveOutcome::LockConflict {
                    holder: Some(holder),
                },
                None => SaveOutcome::LockExpired,
            });
        };

        let item = match self.lifecycle.update(payload)? {
            UpdateOutcome::Updated(item) => item,
            UpdateOutcome::Invalid(item) => return Ok(SaveOutcome::Invalid(item)),
        };
        if self.locks.refresh(&mut lock)? == 1 {
            let message = format!("{} updated.", P::KIND.name);
            self.record(&ctx, AuditEventKind::Update, user, &item.summary(), message);
        }
        Ok(SaveOutcome::Saved(item))
    }

    /// Delete an item under a lock
    ///
    /// The lock is released only once the delete has succeeded.
    ///
    /// # Errors
    ///
    /// `DestroyFailed` when the store rejects the delete; the lock is kept.
    pub fn destroy<P: Payload>(&self, uri: &ItemUri, user: &User) -> Result<DestroyOutcome> {
        let ctx = self.context();
        let _span = session_span(&ctx, "destroy", user).entered();

        let item = self.lifecycle.find::<P>(uri, false)?;
        let Some(lock) = self.locks.obtain(uri, user)? else {
            return Ok(DestroyOutcome::LockConflict {
                holder: self.locks.holder(uri)?,
            });
        };

        self.lifecycle.destroy(uri)?;
        let message = format!("{} deleted.", P::KIND.name);
        self.record(&ctx, AuditEventKind::Delete, user, &item.summary(), message);
        self.locks.release(&lock)?;
        Ok(DestroyOutcome::Destroyed)
    }

    /// Abandon an edit
    ///
    /// # Errors
    ///
    /// Lock store failures.
    pub fn cancel_edit(&self, lock: &EditLock) -> Result<()> {
        self.locks.release(lock)?;
        Ok(())
    }

    /// Chain heads whose status still permits editing
    ///
    /// # Errors
    ///
    /// Store read failures.
    pub fn editable<P: Payload>(&self) -> Result<Vec<ManagedItem<P>>> {
        Ok(self
            .lifecycle
            .unique::<P>()?
            .into_iter()
            .filter(|item| item.status().is_editable())
            .collect())
    }

    /// Move terminology references to current thesauri
    ///
    /// An in-place upgrade needs the edit lock. A lock the caller already
    /// holds is used and kept; otherwise one is taken for the duration of
    /// the upgrade.
    ///
    /// # Errors
    ///
    /// Store failures while reading terminology or committing.
    pub fn upgrade<P: Payload>(&self, uri: &ItemUri, user: &User) -> Result<UpgradeOutcome<P>> {
        let ctx = self.context();
        let _span = session_span(&ctx, "upgrade", user).entered();

        let item = self.lifecycle.find::<P>(uri, false)?;
        let in_place = !self.lifecycle.config().is_released(item.status());
        let claimed = if in_place && self.locks.find_valid(uri, user)?.is_none() {
            let Some(lock) = self.locks.obtain(uri, user)? else {
                return Ok(UpgradeOutcome::LockConflict {
                    holder: self.locks.holder(uri)?,
                });
            };
            Some(lock)
        } else {
            None
        };

        let result = self
            .lifecycle
            .upgrade::<P>(uri, self.terminology.as_ref(), user);
        if let Some(lock) = &claimed {
            self.locks.release(lock)?;
        }
        let outcome = result?;
        if let UpgradeOutcome::Upgraded(item) = &outcome {
            let message = format!("{} updated.", P::KIND.name);
            self.record(&ctx, AuditEventKind::Update, user, &item.summary(), message);
        }
        Ok(outcome)
    }

    fn record(
        &self,
        ctx: &RequestContext,
        kind: AuditEventKind,
        user: &User,
        item: &ItemSummary,
        message: String,
    ) {
        let event = AuditEvent::new(kind, user, item, message, self.lifecycle.now());
        if let Err(e) = self.audit.record(&event) {
            warn!(
                request_id = %ctx.request_id,
                item_uri = %item.uri,
                err_code = e.code(),
                err_message = e.message(),
                "audit record failed"
            );
        }
    }
}

fn session_span(ctx: &RequestContext, action: &'static str, user: &User) -> tracing::Span {
    info_span!(
        "edit_session",
        action,
        request_id = %ctx.request_id,
        trace_id = ctx.trace_str(),
        user_id = %user.id
    )
}
