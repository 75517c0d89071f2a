//! Terminology read from the graph store
//!
//! Thesaurus headers are ordinary managed items; concepts are plain
//! subjects in the namespace of their thesaurus version.

use mdr_core::graph::vocab::{iso25964, rdfs};
use mdr_core::graph::{SubjectGraph, TriplePattern};
use mdr_core::model::{ItemUri, Thesaurus};
use mdr_core::ops::{queries, GraphStore, StoreResult};
use mdr_core::terminology::{TermConcept, TerminologySource, ThesaurusVersion};
use std::sync::Arc;

pub struct GraphTerminology {
    graph: Arc<dyn GraphStore>,
}

impl GraphTerminology {
    pub fn new(graph: Arc<dyn GraphStore>) -> Self {
        Self { graph }
    }
}

impl TerminologySource for GraphTerminology {
    fn thesauri(&self) -> StoreResult<Vec<ThesaurusVersion>> {
        let items = queries::load_all::<Thesaurus>(self.graph.as_ref(), false)?;
        Ok(items
            .into_iter()
            .map(|item| ThesaurusVersion {
                identifier: item.identifier().to_string(),
                scope_id: item.scope().id.clone(),
                version: item.version(),
                current: item.registration_state.current,
                uri: item.uri,
            })
            .collect())
    }

    fn concept(&self, uri: &ItemUri) -> StoreResult<Option<TermConcept>> {
        let triples = self
            .graph
            .query(&TriplePattern::any().with_subject(uri.to_iri()))?;
        if triples.is_empty() {
            return Ok(None);
        }
        let graph = SubjectGraph::from_triples(triples);
        Ok(Some(TermConcept {
            uri: Some(uri.clone()),
            identifier: graph.string(uri, iso25964::IDENTIFIER),
            notation: graph.string(uri, iso25964::NOTATION),
            preferred_term: graph.string(uri, iso25964::PREFERRED_TERM),
            synonym: graph.string(uri, iso25964::SYNONYM),
            definition: graph.string(uri, iso25964::DEFINITION),
            label: graph.string(uri, rdfs::LABEL),
        }))
    }
}
