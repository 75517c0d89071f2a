//! Managed-item lifecycle engine
//!
//! Every operation reads the graph store afresh; no item state is cached
//! between calls. Writes are single `GraphStore::update` calls except
//! `update`, which deletes the old node and writes the new one as two
//! separate mutations.
//!
//! Public operations follow the canonical logging pattern:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure

#![allow(clippy::result_large_err)]

use crate::outcome::{CreateOutcome, UpdateOutcome, UpgradeOutcome};
use chrono::{DateTime, Utc};
use mdr_core::errors::{MdrError, Result};
use mdr_core::graph::{ntriples, GraphMutation};
use mdr_core::lock::{Clock, SystemClock};
use mdr_core::model::{
    Action, BiomedicalConcept, BiomedicalConceptTemplate, ChainKey, ItemUri, ManagedItem,
    OperationPayload, Payload, User,
};
use mdr_core::ops::{chain, queries, GraphStore};
use mdr_core::policy::{AllowAllCreatePolicy, CreatePolicy};
use mdr_core::terminology::{self, TerminologySource, UpgradePlan};
use mdr_core::{log_op_end, log_op_error, log_op_start, MdrConfig};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Message attached to `identifier` when the target version already exists
pub const IDENTIFIER_IN_USE: &str = "The item cannot be created. The identifier is already in use.";

/// Message attached to `identifier` when an update would move the item
pub const IDENTITY_CHANGED: &str =
    "The item cannot be updated. The identifier and version cannot be changed.";

pub struct Lifecycle {
    graph: Arc<dyn GraphStore>,
    config: MdrConfig,
    policy: Arc<dyn CreatePolicy>,
    clock: Arc<dyn Clock>,
}

impl Lifecycle {
    /// Engine permitting every create and stamping wall-clock dates
    pub fn new(graph: Arc<dyn GraphStore>, config: MdrConfig) -> Self {
        Self {
            graph,
            config,
            policy: Arc::new(AllowAllCreatePolicy),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_policy(mut self, policy: Arc<dyn CreatePolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &MdrConfig {
        &self.config
    }

    pub fn graph(&self) -> &Arc<dyn GraphStore> {
        &self.graph
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Load one item; shallow loads leave the payload at its default
    ///
    /// # Errors
    ///
    /// `ItemNotFound` when no graph node of this kind exists at `uri`.
    pub fn find<P: Payload>(&self, uri: &ItemUri, with_children: bool) -> Result<ManagedItem<P>> {
        log_op_start!("item_find", uri = %uri, with_children = with_children);
        let start = Instant::now();

        let result = queries::load_item::<P>(self.graph.as_ref(), uri, with_children)
            .and_then(|found| {
                found.ok_or_else(|| MdrError::ItemNotFound {
                    uri: uri.to_string(),
                })
            })
            .map_err(|e| {
                log_op_error!(
                    "item_find",
                    e.clone(),
                    duration_ms = start.elapsed().as_millis() as u64
                );
                e
            })?;

        log_op_end!("item_find", duration_ms = start.elapsed().as_millis() as u64);
        Ok(result)
    }

    /// Every version of every chain of kind `P` (headers only)
    ///
    /// # Errors
    ///
    /// Store read failures and malformed stored items.
    pub fn all<P: Payload>(&self) -> Result<Vec<ManagedItem<P>>> {
        queries::load_all::<P>(self.graph.as_ref(), false)
    }

    /// The latest version of each chain
    ///
    /// # Errors
    ///
    /// As [`Lifecycle::all`].
    pub fn unique<P: Payload>(&self) -> Result<Vec<ManagedItem<P>>> {
        Ok(chain::latest_per_chain(&self.all::<P>()?))
    }

    /// Chain members in a released status
    ///
    /// # Errors
    ///
    /// As [`Lifecycle::all`].
    pub fn list<P: Payload>(&self) -> Result<Vec<ManagedItem<P>>> {
        Ok(self
            .all::<P>()?
            .into_iter()
            .filter(|item| self.config.is_released(item.status()))
            .collect())
    }

    /// One chain, newest first; empty when the identifier is unknown
    ///
    /// # Errors
    ///
    /// As [`Lifecycle::all`].
    pub fn history<P: Payload>(
        &self,
        identifier: &str,
        scope_id: &str,
    ) -> Result<Vec<ManagedItem<P>>> {
        let key = ChainKey::new(scope_id, identifier);
        Ok(chain::chain_of(&self.all::<P>()?, &key))
    }

    /// Validate and write a new graph node
    ///
    /// # Errors
    ///
    /// `CreateFailed` when the store rejects the write; nothing is written.
    pub fn create<P: Payload>(
        &self,
        payload: &OperationPayload<P>,
        user: &User,
    ) -> Result<CreateOutcome<P>> {
        let identifier = payload.managed_item.identifier().to_string();
        log_op_start!("item_create", kind = P::KIND.name, identifier = %identifier);
        let start = Instant::now();

        let result = self.create_impl(payload, user).map_err(|e| {
            log_op_error!(
                "item_create",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

        log_op_end!(
            "item_create",
            duration_ms = start.elapsed().as_millis() as u64,
            uri = %result.item().uri,
            created = result.is_created()
        );
        Ok(result)
    }

    fn create_impl<P: Payload>(
        &self,
        payload: &OperationPayload<P>,
        user: &User,
    ) -> Result<CreateOutcome<P>> {
        let mut item = payload.build(&self.config, self.now());
        if !item.is_valid() {
            return Ok(CreateOutcome::Invalid(item));
        }
        let existing = self.all::<P>()?;
        if chain::version_taken(&existing, &item.chain_key(), item.version())
            || !queries::subtree_triples(self.graph.as_ref(), &item.uri)?.is_empty()
        {
            item.errors.add("identifier", IDENTIFIER_IN_USE);
            return Ok(CreateOutcome::Invalid(item));
        }
        if !self.policy.create_permitted(&item.summary(), user) {
            debug!(uri = %item.uri, user_id = %user.id, "create not permitted, write skipped");
            return Ok(CreateOutcome::PermissionSkipped(item));
        }

        self.graph
            .update(&GraphMutation::insert(item.to_graph()))
            .map_err(|e| MdrError::CreateFailed {
                uri: item.uri.to_string(),
                reason: e.message().to_string(),
            })?;
        Ok(CreateOutcome::Created(item))
    }

    /// Replace an existing version in place
    ///
    /// The caller must already hold the edit lock on the payload's URI. The
    /// payload may not change the identifier or version, so the node
    /// rewritten is always the one at that URI. The old node is deleted
    /// before the new one is written; a failed write leaves the version
    /// missing from its chain.
    ///
    /// # Errors
    ///
    /// `ItemNotFound` when the version does not exist, `UpdateFailed` when
    /// either store call fails.
    pub fn update<P: Payload>(&self, payload: &OperationPayload<P>) -> Result<UpdateOutcome<P>> {
        let uri = payload.managed_item.uri.to_string();
        log_op_start!("item_update", kind = P::KIND.name, uri = %uri);
        let start = Instant::now();

        let result = self.update_impl(payload).map_err(|e| {
            log_op_error!(
                "item_update",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

        log_op_end!("item_update", duration_ms = start.elapsed().as_millis() as u64);
        Ok(result)
    }

    fn update_impl<P: Payload>(&self, payload: &OperationPayload<P>) -> Result<UpdateOutcome<P>> {
        let mut item = payload.build(&self.config, self.now());
        if payload.operation.action != Action::Update || item.uri != payload.managed_item.uri {
            item.errors.add("identifier", IDENTITY_CHANGED);
            return Ok(UpdateOutcome::Invalid(item));
        }
        if !item.is_valid() {
            return Ok(UpdateOutcome::Invalid(item));
        }
        let old = queries::subtree_triples(self.graph.as_ref(), &item.uri)?;
        if old.is_empty() {
            return Err(MdrError::ItemNotFound {
                uri: item.uri.to_string(),
            });
        }

        let failed = |stage: &str, e: mdr_core::ExError| MdrError::UpdateFailed {
            uri: item.uri.to_string(),
            reason: format!("{}: {}", stage, e.message()),
        };
        self.graph
            .update(&GraphMutation::delete(old))
            .map_err(|e| failed("delete", e))?;
        self.graph
            .update(&GraphMutation::insert(item.to_graph()))
            .map_err(|e| failed("insert", e))?;
        Ok(UpdateOutcome::Updated(item))
    }

    /// Start a fresh chain at version 1 with the source's content
    ///
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
        let op = self.copy_operation::<P>(source, new_identifier, new_label)?;
        self.create(&op, user)
    }

    /// As [`Lifecycle::clone_item`], recording the source as parent branch
    ///
    /// # Errors
    ///
    /// As [`Lifecycle::clone_item`].
    pub fn branch<P: Payload>(
        &self,
        source: &ItemUri,
        new_identifier: &str,
        new_label: &str,
        user: &User,
    ) -> Result<CreateOutcome<P>> {
        let mut op = self.copy_operation::<P>(source, new_identifier, new_label)?;
        op.managed_item.parent_branch = Some(source.clone());
        self.create(&op, user)
    }

    fn copy_operation<P: Payload>(
        &self,
        source: &ItemUri,
        new_identifier: &str,
        new_label: &str,
    ) -> Result<OperationPayload<P>> {
        let source = self.find::<P>(source, true)?;
        let mut op = source.to_clone();
        op.managed_item.scoped_identifier.identifier = new_identifier.to_string();
        op.managed_item.label = new_label.to_string();
        Ok(op)
    }

    /// Delete the item node and every node it owns
    ///
    /// # Errors
    ///
    /// `ItemNotFound` when nothing is stored at `uri`, `DestroyFailed` when
    /// the store rejects the delete.
    pub fn destroy(&self, uri: &ItemUri) -> Result<()> {
        log_op_start!("item_destroy", uri = %uri);
        let start = Instant::now();

        self.destroy_impl(uri).map_err(|e| {
            log_op_error!(
                "item_destroy",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

        log_op_end!("item_destroy", duration_ms = start.elapsed().as_millis() as u64);
        Ok(())
    }

    fn destroy_impl(&self, uri: &ItemUri) -> Result<()> {
        let triples = queries::subtree_triples(self.graph.as_ref(), uri)?;
        if triples.is_empty() {
            return Err(MdrError::ItemNotFound {
                uri: uri.to_string(),
            });
        }
        self.graph
            .update(&GraphMutation::delete(triples))
            .map_err(|e| MdrError::DestroyFailed {
                uri: uri.to_string(),
                reason: e.message().to_string(),
            })
    }

    /// Move terminology references to current thesauri
    ///
    /// All-or-nothing: if any referenced concept differs in its current
    /// thesaurus the item is left untouched. A released item is upgraded
    /// into its next version, anything else in place.
    ///
    /// # Errors
    ///
    /// Store failures while reading terminology or committing.
    pub fn upgrade<P: Payload>(
        &self,
        uri: &ItemUri,
        source: &dyn TerminologySource,
        user: &User,
    ) -> Result<UpgradeOutcome<P>> {
        log_op_start!("item_upgrade", uri = %uri);
        let start = Instant::now();

        let result = self.upgrade_impl(uri, source, user).map_err(|e| {
            log_op_error!(
                "item_upgrade",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

        log_op_end!("item_upgrade", duration_ms = start.elapsed().as_millis() as u64);
        Ok(result)
    }

    fn upgrade_impl<P: Payload>(
        &self,
        uri: &ItemUri,
        source: &dyn TerminologySource,
        user: &User,
    ) -> Result<UpgradeOutcome<P>> {
        let item = self.find::<P>(uri, true)?;
        let map = terminology::build_term_map(&source.thesauri()?);
        let plan = terminology::plan_upgrade(&item.payload.terminology_refs(), &map, source)?;

        let repoint = match plan {
            UpgradePlan::NothingToDo => return Ok(UpgradeOutcome::Unchanged(item)),
            UpgradePlan::Conflicts(conflicts) => {
                debug!(uri = %uri, conflicts = conflicts.len(), "upgrade aborted");
                return Ok(UpgradeOutcome::Aborted { item, conflicts });
            }
            UpgradePlan::Repoint(repoint) => repoint,
        };

        let mut op = item.to_operation(&self.config)?;
        let moved = terminology::apply_repoint(op.managed_item.payload.terminology_refs_mut(), &repoint);
        debug!(uri = %uri, moved, "references repointed");

        Ok(match op.operation.action {
            Action::Create => match self.create(&op, user)? {
                CreateOutcome::Created(item) => UpgradeOutcome::Upgraded(item),
                CreateOutcome::Invalid(item) => UpgradeOutcome::Invalid(item),
                CreateOutcome::PermissionSkipped(item) => UpgradeOutcome::PermissionSkipped(item),
            },
            Action::Update => match self.update(&op)? {
                UpdateOutcome::Updated(item) => UpgradeOutcome::Upgraded(item),
                UpdateOutcome::Invalid(item) => UpgradeOutcome::Invalid(item),
            },
        })
    }

    /// Build and write a concept instance from a stored template
    ///
    /// # Errors
    ///
    /// `TemplateMissing` when nothing is stored at `template`.
    pub fn create_bc_from_template(
        &self,
        template: &ItemUri,
        identifier: &str,
        label: &str,
        user: &User,
    ) -> Result<CreateOutcome<BiomedicalConcept>> {
        let template =
            queries::load_item::<BiomedicalConceptTemplate>(self.graph.as_ref(), template, true)?;
        let bc = BiomedicalConcept::from_template(&self.config, template.as_ref(), identifier, label)?;
        self.create(&bc.create_operation(), user)
    }

    /// The item as a JSON document
    ///
    /// # Errors
    ///
    /// As [`Lifecycle::find`].
    pub fn export_json<P: Payload>(&self, uri: &ItemUri) -> Result<serde_json::Value> {
        self.find::<P>(uri, true)?.to_json()
    }

    /// The item subtree as N-Triples, in stable order
    ///
    /// # Errors
    ///
    /// `ItemNotFound` when nothing is stored at `uri`.
    pub fn export_ntriples(&self, uri: &ItemUri) -> Result<String> {
        let triples = queries::subtree_triples(self.graph.as_ref(), uri)?;
        if triples.is_empty() {
            return Err(MdrError::ItemNotFound {
                uri: uri.to_string(),
            });
        }
        Ok(ntriples::write(&triples))
    }
}
