//! Operational references from a payload to other managed items

use crate::graph::vocab::bo;
use crate::graph::{GraphWriter, SubjectGraph};
use crate::model::identifier::ItemUri;
use serde::{Deserialize, Serialize};

/// Pointer from a payload node to another item (terminology concept or template)
///
/// The reference node is owned by the payload; the target is not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationalReference {
    pub target: ItemUri,
    #[serde(default = "enabled_default")]
    pub enabled: bool,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub ordinal: u32,
    #[serde(default)]
    pub local_label: String,
}

fn enabled_default() -> bool {
    true
}

impl OperationalReference {
    pub fn new(target: ItemUri, ordinal: u32) -> Self {
        Self {
            target,
            enabled: true,
            optional: false,
            ordinal,
            local_label: String::new(),
        }
    }

    /// Write the reference node `node`, linked to its target via `target_predicate`
    pub(crate) fn write_graph(
        &self,
        node: &ItemUri,
        rdf_type: &str,
        target_predicate: &str,
        out: &mut GraphWriter,
    ) {
        out.node(node, rdf_type);
        out.link(node, target_predicate, &self.target);
        out.boolean(node, bo::ENABLED, self.enabled);
        out.boolean(node, bo::OPTIONAL, self.optional);
        out.integer(node, bo::ORDINAL, i64::from(self.ordinal));
        out.string(node, bo::LOCAL_LABEL, &self.local_label);
    }

    /// `None` when the node has no target link
    pub(crate) fn read_graph(
        node: &ItemUri,
        target_predicate: &str,
        graph: &SubjectGraph,
    ) -> Option<Self> {
        let target = graph.link(node, target_predicate)?;
        Some(Self {
            target,
            enabled: graph.boolean(node, bo::ENABLED),
            optional: graph.boolean(node, bo::OPTIONAL),
            ordinal: ordinal_of(graph.integer(node, bo::ORDINAL)),
            local_label: graph.string(node, bo::LOCAL_LABEL),
        })
    }
}

/// Clamp a stored integer into an ordinal
pub(crate) fn ordinal_of(value: i64) -> u32 {
    u32::try_from(value).unwrap_or(0)
}
