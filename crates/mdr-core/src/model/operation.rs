//! Operation payloads: the structured input of create and update

use crate::config::MdrConfig;
use crate::errors::{MdrError, Result};
use crate::model::managed_item::{ManagedItem, Payload};
use crate::model::registration::RegistrationStatus;
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    /// Write a new graph node (new chain or next version)
    Create,
    /// Replace the node of an existing version in place
    Update,
}

/// What the caller intends to do with the enclosed item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub action: Action,
    pub new_version: u32,
    pub new_state: RegistrationStatus,
    /// Whether the caller may still choose the identifier (clone/branch forms)
    #[serde(default)]
    pub identifier_edit: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "P: Payload")]
pub struct OperationPayload<P> {
    pub operation: Operation,
    pub managed_item: ManagedItem<P>,
}

impl<P: Payload> ManagedItem<P> {
    /// Operation for editing this item
    ///
    /// Released items are never edited in place: the edit becomes the next
    /// version of the chain, restarting at `Incomplete`.
    ///
    /// # Errors
    ///
    /// `VersionExhausted` when a released item is already at `u32::MAX`.
    pub fn to_operation(&self, config: &MdrConfig) -> Result<OperationPayload<P>> {
        if !config.is_released(self.status()) {
            return Ok(self.update_operation());
        }
        let new_version =
            self.version()
                .checked_add(1)
                .ok_or_else(|| MdrError::VersionExhausted {
                    identifier: self.identifier().to_string(),
                    version: self.version(),
                })?;
        Ok(OperationPayload {
            operation: Operation {
                action: Action::Create,
                new_version,
                new_state: RegistrationStatus::Incomplete,
                identifier_edit: false,
            },
            managed_item: self.clone(),
        })
    }

    /// Operation for saving this version in place
    pub fn update_operation(&self) -> OperationPayload<P> {
        OperationPayload {
            operation: Operation {
                action: Action::Update,
                new_version: self.version(),
                new_state: self.status(),
                identifier_edit: false,
            },
            managed_item: self.clone(),
        }
    }

    /// Operation writing this item as a new node at its own version
    pub fn create_operation(&self) -> OperationPayload<P> {
        OperationPayload {
            operation: Operation {
                action: Action::Create,
                new_version: self.version(),
                new_state: self.status(),
                identifier_edit: false,
            },
            managed_item: self.clone(),
        }
    }

    /// Operation starting a fresh chain from this item's content
    pub fn to_clone(&self) -> OperationPayload<P> {
        let mut copy = self.clone();
        copy.parent_branch = None;
        copy.creation_date = None;
        copy.last_changed_date = None;
        copy.registration_state.effective_date = None;
        copy.registration_state.until_date = None;
        copy.registration_state.current = false;
        OperationPayload {
            operation: Operation {
                action: Action::Create,
                new_version: 1,
                new_state: RegistrationStatus::Incomplete,
                identifier_edit: true,
            },
            managed_item: copy,
        }
    }
}

impl<P: Payload> OperationPayload<P> {
    /// Materialise the item the operation describes
    ///
    /// Stamps version, state, owner and derived URI. `Create` sets both
    /// dates to `now`; `Update` preserves the creation date.
    pub fn build(&self, config: &MdrConfig, now: DateTime<Utc>) -> ManagedItem<P> {
        let now = now.trunc_subsecs(6);
        let mut item = self.managed_item.clone();
        item.scoped_identifier.version = self.operation.new_version;
        item.registration_state.status = self.operation.new_state;
        if self.operation.action == Action::Create {
            item.registration_state.authority = config.owner.clone();
            item.scoped_identifier.scope = config.owner.scope.clone();
            item.creation_date = Some(now);
        } else if item.creation_date.is_none() {
            item.creation_date = Some(now);
        }
        item.last_changed_date = Some(now);
        item.uri = P::KIND.uri_for(&config.base_uri, &item.scoped_identifier);
        item.rdf_type = P::KIND.rdf_type.to_string();
        item.errors.clear();
        item
    }
}
