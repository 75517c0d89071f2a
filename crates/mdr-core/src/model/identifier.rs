//! Scoped identifiers, item URIs and per-kind naming rules

use crate::errors::{MdrError, Result};
use crate::graph::Iri;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Governing authority under which an identifier is unique
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Scope {
    /// Stable namespace id, e.g. `NS-ACME`
    pub id: String,
    /// Short name used in URIs and local ids, e.g. `ACME`
    pub short_name: String,
    #[serde(default)]
    pub name: String,
}

impl Scope {
    pub fn new(id: impl Into<String>, short_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            short_name: short_name.into(),
            name: name.into(),
        }
    }
}

/// Identifier with everything but ASCII alphanumerics removed
///
/// Two identifiers with the same compact form name the same node.
pub fn compact_identifier(identifier: &str) -> String {
    identifier
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

/// `(scope, compact identifier)`: the key of a version chain
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChainKey {
    pub scope_id: String,
    pub identifier: String,
}

impl ChainKey {
    pub fn new(scope_id: impl Into<String>, identifier: impl Into<String>) -> Self {
        let identifier: String = identifier.into();
        Self {
            scope_id: scope_id.into(),
            identifier: compact_identifier(&identifier),
        }
    }
}

/// Identifier plus version within a scope
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScopedIdentifier {
    pub identifier: String,
    pub version: u32,
    #[serde(default)]
    pub version_label: String,
    pub scope: Scope,
}

impl ScopedIdentifier {
    pub fn new(identifier: impl Into<String>, version: u32, scope: Scope) -> Self {
        Self {
            identifier: identifier.into(),
            version,
            version_label: String::new(),
            scope,
        }
    }

    pub fn chain_key(&self) -> ChainKey {
        ChainKey::new(&self.scope.id, &self.identifier)
    }
}

/// Identity of a graph node: `namespace#id`
///
/// Serialized as the single string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemUri {
    pub namespace: String,
    pub id: String,
}

impl ItemUri {
    pub fn new(namespace: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            id: id.into(),
        }
    }

    /// Split at the last `#`
    pub fn parse(value: &str) -> Result<Self> {
        match value.rsplit_once('#') {
            Some((ns, id)) if !ns.is_empty() && !id.is_empty() => Ok(Self::new(ns, id)),
            _ => Err(MdrError::InvalidUri {
                value: value.to_string(),
            }),
        }
    }

    /// Owned child node in the same namespace
    pub fn child(&self, suffix: &str) -> ItemUri {
        ItemUri::new(&self.namespace, format!("{}_{}", self.id, suffix))
    }

    /// True when `other` is a node owned (at any depth) by this one
    pub fn owns(&self, other: &ItemUri) -> bool {
        other.namespace == self.namespace
            && other.id.len() > self.id.len() + 1
            && other.id.starts_with(&self.id)
            && other.id.as_bytes()[self.id.len()] == b'_'
    }

    pub fn to_iri(&self) -> Iri {
        Iri::new(self.to_string())
    }
}

impl fmt::Display for ItemUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.namespace, self.id)
    }
}

impl TryFrom<String> for ItemUri {
    type Error = MdrError;

    fn try_from(value: String) -> Result<Self> {
        ItemUri::parse(&value)
    }
}

impl From<ItemUri> for String {
    fn from(uri: ItemUri) -> Self {
        uri.to_string()
    }
}

/// Naming rules of one concrete managed-item kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemKind {
    /// Display name used in audit messages, e.g. `Form`
    pub name: &'static str,
    /// Prefix of local ids, e.g. `F`
    pub cid_prefix: &'static str,
    /// Path segment of instance namespaces, e.g. `MDRForms`
    pub instance_path: &'static str,
    /// Full rdf:type IRI
    pub rdf_type: &'static str,
}

impl ItemKind {
    /// `{prefix}-{scope}_{identifier without non-alphanumerics}`
    pub fn local_id(&self, scope: &Scope, identifier: &str) -> String {
        format!(
            "{}-{}_{}",
            self.cid_prefix,
            scope.short_name,
            compact_identifier(identifier)
        )
    }

    /// Namespace of one version: `{base}/{path}/{scope}/V{version}`
    pub fn namespace(&self, base_uri: &str, scope: &Scope, version: u32) -> String {
        format!(
            "{}/{}/{}/V{}",
            base_uri.trim_end_matches('/'),
            self.instance_path,
            scope.short_name,
            version
        )
    }

    pub fn uri_for(&self, base_uri: &str, si: &ScopedIdentifier) -> ItemUri {
        ItemUri::new(
            self.namespace(base_uri, &si.scope, si.version),
            self.local_id(&si.scope, &si.identifier),
        )
    }
}
