use crate::errors::Result;
use crate::graph::vocab::iso25964;
use crate::graph::{GraphWriter, SubjectGraph};
use crate::model::identifier::{ItemKind, ItemUri};
use crate::model::managed_item::Payload;
use crate::rules::validation::ValidationErrors;
use serde::{Deserialize, Serialize};

/// Terminology release; only its managed-item header is modelled
///
/// Concepts live in the thesaurus namespace and are read through
/// [`crate::terminology::TerminologySource`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Thesaurus {}

impl Payload for Thesaurus {
    const KIND: ItemKind = ItemKind {
        name: "Thesaurus",
        cid_prefix: "TH",
        instance_path: "MDRThesaurus",
        rdf_type: iso25964::THESAURUS,
    };

    fn validate(&self, _errors: &mut ValidationErrors) {}

    fn write_graph(&self, _subject: &ItemUri, _out: &mut GraphWriter) {}

    fn read_graph(_subject: &ItemUri, _graph: &SubjectGraph) -> Result<Self> {
        Ok(Thesaurus {})
    }
}
