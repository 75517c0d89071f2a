//! The kind-independent managed item and its payload contract

use crate::config::MdrConfig;
use crate::errors::{MdrError, Result};
use crate::graph::vocab::{iso_i, iso_r, iso_t, rdfs};
use crate::graph::{GraphWriter, SubjectGraph, Triple};
use crate::model::identifier::{ChainKey, ItemKind, ItemUri, Scope, ScopedIdentifier};
use crate::model::reference::OperationalReference;
use crate::model::registration::{
    RegistrationAuthority, RegistrationState, RegistrationStatus,
};
use crate::rules::validation::{self, ValidationErrors};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind-specific substructure of a managed item
///
/// Payloads form a strict ownership tree: every child node is written under
/// an id derived from its parent (see [`ItemUri::child`]) and siblings are
/// ordered by an explicit `ordinal`.
pub trait Payload:
    Clone + fmt::Debug + PartialEq + Default + Serialize + DeserializeOwned + Send + Sync
{
    const KIND: ItemKind;

    /// Append kind-specific validation errors
    fn validate(&self, errors: &mut ValidationErrors);

    /// Write the payload nodes below `subject`; must not read the store
    fn write_graph(&self, subject: &ItemUri, out: &mut GraphWriter);

    /// Rebuild the payload from a loaded subtree
    fn read_graph(subject: &ItemUri, graph: &SubjectGraph) -> Result<Self>;

    /// Terminology references held anywhere in the payload
    fn terminology_refs(&self) -> Vec<&OperationalReference> {
        Vec::new()
    }

    fn terminology_refs_mut(&mut self) -> Vec<&mut OperationalReference> {
        Vec::new()
    }
}

/// A versioned, registered item with a kind-specific payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "P: Payload")]
pub struct ManagedItem<P> {
    pub uri: ItemUri,
    pub rdf_type: String,
    pub label: String,
    pub scoped_identifier: ScopedIdentifier,
    pub registration_state: RegistrationState,
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub change_description: String,
    #[serde(default)]
    pub explanatory_comment: String,
    #[serde(default)]
    pub creation_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_changed_date: Option<DateTime<Utc>>,
    /// Item this chain was branched from; lineage only, not ownership
    #[serde(default)]
    pub parent_branch: Option<ItemUri>,
    pub payload: P,
    #[serde(skip)]
    pub errors: ValidationErrors,
}

/// Payload-free projection used by listings, policies and audit records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSummary {
    pub uri: ItemUri,
    pub kind: String,
    pub identifier: String,
    pub label: String,
    pub version: u32,
    pub scope_id: String,
    pub owner: String,
    pub status: RegistrationStatus,
}

impl<P: Payload> ManagedItem<P> {
    /// New first version owned by the configured authority
    pub fn new(config: &MdrConfig, identifier: &str, label: &str, payload: P) -> Self {
        let authority = config.owner.clone();
        let si = ScopedIdentifier::new(identifier, 1, authority.scope.clone());
        Self {
            uri: P::KIND.uri_for(&config.base_uri, &si),
            rdf_type: P::KIND.rdf_type.to_string(),
            label: label.to_string(),
            scoped_identifier: si,
            registration_state: RegistrationState {
                authority,
                ..RegistrationState::default()
            },
            origin: String::new(),
            change_description: String::new(),
            explanatory_comment: String::new(),
            creation_date: None,
            last_changed_date: None,
            parent_branch: None,
            payload,
            errors: ValidationErrors::new(),
        }
    }

    pub fn kind() -> ItemKind {
        P::KIND
    }

    pub fn identifier(&self) -> &str {
        &self.scoped_identifier.identifier
    }

    pub fn version(&self) -> u32 {
        self.scoped_identifier.version
    }

    pub fn scope(&self) -> &Scope {
        &self.scoped_identifier.scope
    }

    pub fn status(&self) -> RegistrationStatus {
        self.registration_state.status
    }

    pub fn owner(&self) -> &RegistrationAuthority {
        &self.registration_state.authority
    }

    pub fn chain_key(&self) -> ChainKey {
        self.scoped_identifier.chain_key()
    }

    pub fn summary(&self) -> ItemSummary {
        ItemSummary {
            uri: self.uri.clone(),
            kind: P::KIND.name.to_string(),
            identifier: self.identifier().to_string(),
            label: self.label.clone(),
            version: self.version(),
            scope_id: self.scope().id.clone(),
            owner: self.owner().scope.short_name.clone(),
            status: self.status(),
        }
    }

    /// Run header and payload validation, replacing `errors`
    pub fn is_valid(&mut self) -> bool {
        let mut errors = ValidationErrors::new();
        validation::valid_identifier("identifier", self.identifier(), &mut errors);
        validation::valid_label("label", &self.label, &mut errors);
        validation::valid_short_name("scope", &self.scope().short_name, &mut errors);
        validation::valid_authority_number(
            "registration_authority",
            &self.owner().number,
            &mut errors,
        );
        validation::valid_markdown("origin", &self.origin, &mut errors);
        validation::valid_markdown("change_description", &self.change_description, &mut errors);
        validation::valid_markdown("explanatory_comment", &self.explanatory_comment, &mut errors);
        self.payload.validate(&mut errors);
        self.errors = errors;
        self.errors.is_empty()
    }

    /// Full triple set of the item; pure
    pub fn to_graph(&self) -> Vec<Triple> {
        let mut out = GraphWriter::new();
        let subject = &self.uri;
        out.node(subject, &self.rdf_type);
        out.string(subject, rdfs::LABEL, &self.label);
        out.string(subject, iso_t::ORIGIN, &self.origin);
        out.string(subject, iso_t::CHANGE_DESCRIPTION, &self.change_description);
        out.string(subject, iso_t::EXPLANATORY_COMMENT, &self.explanatory_comment);
        out.datetime(subject, iso_t::CREATION_DATE, self.creation_date.as_ref());
        out.datetime(subject, iso_t::LAST_CHANGE_DATE, self.last_changed_date.as_ref());
        if let Some(parent) = &self.parent_branch {
            out.link(subject, iso_t::BRANCHED_FROM, parent);
        }

        let si_node = subject.child("SI");
        let si = &self.scoped_identifier;
        out.link(subject, iso_i::HAS_IDENTIFIER, &si_node);
        out.node(&si_node, iso_i::SCOPED_IDENTIFIER);
        out.string(&si_node, iso_i::IDENTIFIER, &si.identifier);
        out.integer(&si_node, iso_i::VERSION, i64::from(si.version));
        out.string(&si_node, iso_i::VERSION_LABEL, &si.version_label);
        out.string(&si_node, iso_i::SCOPE_ID, &si.scope.id);
        out.string(&si_node, iso_i::SCOPE_SHORT_NAME, &si.scope.short_name);
        out.string(&si_node, iso_i::SCOPE_NAME, &si.scope.name);

        let rs_node = subject.child("RS");
        let rs = &self.registration_state;
        out.link(subject, iso_r::HAS_STATE, &rs_node);
        out.node(&rs_node, iso_r::REGISTRATION_STATE);
        out.string(&rs_node, iso_r::REGISTRATION_STATUS, rs.status.as_str());
        out.string(&rs_node, iso_r::ADMINISTRATIVE_NOTE, &rs.administrative_note);
        out.string(&rs_node, iso_r::UNRESOLVED_ISSUE, &rs.unresolved_issue);
        out.datetime(&rs_node, iso_r::EFFECTIVE_DATE, rs.effective_date.as_ref());
        out.datetime(&rs_node, iso_r::UNTIL_DATE, rs.until_date.as_ref());
        out.boolean(&rs_node, iso_r::CURRENT, rs.current);
        out.string(&rs_node, iso_r::AUTHORITY_NUMBER, &rs.authority.number);
        out.string(&rs_node, iso_r::AUTHORITY_SCHEME, &rs.authority.scheme);
        out.string(&rs_node, iso_r::AUTHORITY_SCOPE_ID, &rs.authority.scope.id);
        out.string(&rs_node, iso_r::AUTHORITY_SCOPE_SHORT_NAME, &rs.authority.scope.short_name);
        out.string(&rs_node, iso_r::AUTHORITY_SCOPE_NAME, &rs.authority.scope.name);

        self.payload.write_graph(subject, &mut out);
        out.into_triples()
    }

    /// Rebuild an item from its loaded subtree
    ///
    /// With `with_children == false` the payload is left at its default.
    pub fn from_graph(uri: &ItemUri, graph: &SubjectGraph, with_children: bool) -> Result<Self> {
        let malformed = |reason: &str| MdrError::MalformedGraph {
            subject: uri.to_string(),
            reason: reason.to_string(),
        };
        match graph.rdf_type(uri) {
            Some(t) if t.as_str() == P::KIND.rdf_type => {}
            Some(t) => return Err(malformed(&format!("unexpected rdf:type {}", t))),
            None => return Err(malformed("missing rdf:type")),
        }

        let si_node = graph
            .link(uri, iso_i::HAS_IDENTIFIER)
            .ok_or_else(|| malformed("missing scoped identifier"))?;
        let version = u32::try_from(graph.integer(&si_node, iso_i::VERSION))
            .ok()
            .filter(|v| *v > 0)
            .ok_or_else(|| malformed("version must be a positive integer"))?;
        let scoped_identifier = ScopedIdentifier {
            identifier: graph.string(&si_node, iso_i::IDENTIFIER),
            version,
            version_label: graph.string(&si_node, iso_i::VERSION_LABEL),
            scope: Scope::new(
                graph.string(&si_node, iso_i::SCOPE_ID),
                graph.string(&si_node, iso_i::SCOPE_SHORT_NAME),
                graph.string(&si_node, iso_i::SCOPE_NAME),
            ),
        };

        let rs_node = graph
            .link(uri, iso_r::HAS_STATE)
            .ok_or_else(|| malformed("missing registration state"))?;
        let status = graph
            .string(&rs_node, iso_r::REGISTRATION_STATUS)
            .parse::<RegistrationStatus>()
            .map_err(|reason| malformed(&reason))?;
        let registration_state = RegistrationState {
            status,
            authority: RegistrationAuthority {
                number: graph.string(&rs_node, iso_r::AUTHORITY_NUMBER),
                scheme: graph.string(&rs_node, iso_r::AUTHORITY_SCHEME),
                scope: Scope::new(
                    graph.string(&rs_node, iso_r::AUTHORITY_SCOPE_ID),
                    graph.string(&rs_node, iso_r::AUTHORITY_SCOPE_SHORT_NAME),
                    graph.string(&rs_node, iso_r::AUTHORITY_SCOPE_NAME),
                ),
            },
            administrative_note: graph.string(&rs_node, iso_r::ADMINISTRATIVE_NOTE),
            unresolved_issue: graph.string(&rs_node, iso_r::UNRESOLVED_ISSUE),
            effective_date: graph.datetime(&rs_node, iso_r::EFFECTIVE_DATE),
            until_date: graph.datetime(&rs_node, iso_r::UNTIL_DATE),
            current: graph.boolean(&rs_node, iso_r::CURRENT),
        };

        let payload = if with_children {
            P::read_graph(uri, graph)?
        } else {
            P::default()
        };

        Ok(Self {
            uri: uri.clone(),
            rdf_type: P::KIND.rdf_type.to_string(),
            label: graph.string(uri, rdfs::LABEL),
            scoped_identifier,
            registration_state,
            origin: graph.string(uri, iso_t::ORIGIN),
            change_description: graph.string(uri, iso_t::CHANGE_DESCRIPTION),
            explanatory_comment: graph.string(uri, iso_t::EXPLANATORY_COMMENT),
            creation_date: graph.datetime(uri, iso_t::CREATION_DATE),
            last_changed_date: graph.datetime(uri, iso_t::LAST_CHANGE_DATE),
            parent_branch: graph.link(uri, iso_t::BRANCHED_FROM),
            payload,
            errors: ValidationErrors::new(),
        })
    }

    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }
}
