//! Read paths over a [`GraphStore`]
//!
//! Every call re-reads the store; nothing is cached between calls.

use crate::errors::Result;
use crate::graph::vocab::{iso_i, iso_r, rdf};
use crate::graph::{Iri, SubjectGraph, Term, Triple, TriplePattern};
use crate::model::{ItemUri, ManagedItem, Payload};
use crate::ops::graph_store::{GraphStore, StoreResult};
use std::collections::{BTreeSet, VecDeque};

/// Roots of every node typed `rdf_type`
pub fn subjects_of_type(store: &dyn GraphStore, rdf_type: &str) -> StoreResult<Vec<ItemUri>> {
    let pattern = TriplePattern::any()
        .with_predicate(Iri::new(rdf::TYPE))
        .with_object(Iri::new(rdf_type));
    let mut uris: Vec<ItemUri> = store
        .query(&pattern)?
        .into_iter()
        .filter_map(|t| ItemUri::parse(t.subject.as_str()).ok())
        .collect();
    uris.sort();
    uris.dedup();
    Ok(uris)
}

/// Load `root` and the nodes it owns
///
/// Only links to owned children are followed, so references to other items
/// (terminology, templates, lineage) never pull foreign nodes in. Without
/// children only the identifier and registration-state nodes are loaded.
pub fn load_subtree(
    store: &dyn GraphStore,
    root: &ItemUri,
    with_children: bool,
) -> StoreResult<SubjectGraph> {
    let mut graph = SubjectGraph::default();
    let mut seen = BTreeSet::new();
    let mut queue = VecDeque::from([root.clone()]);

    while let Some(node) = queue.pop_front() {
        if !seen.insert(node.clone()) {
            continue;
        }
        let triples = store.query(&TriplePattern::any().with_subject(node.to_iri()))?;
        if with_children || &node == root {
            for t in &triples {
                let header = t.predicate.as_str() == iso_i::HAS_IDENTIFIER
                    || t.predicate.as_str() == iso_r::HAS_STATE;
                if !with_children && !header {
                    continue;
                }
                if let Some(child) = owned_child(root, t) {
                    queue.push_back(child);
                }
            }
        }
        graph.extend(triples);
    }
    Ok(graph)
}

/// Every triple whose subject is `root` or a node it owns
pub fn subtree_triples(store: &dyn GraphStore, root: &ItemUri) -> StoreResult<Vec<Triple>> {
    Ok(load_subtree(store, root, true)?.triples())
}

/// Load one item; `None` when no node exists under `uri`
pub fn load_item<P: Payload>(
    store: &dyn GraphStore,
    uri: &ItemUri,
    with_children: bool,
) -> Result<Option<ManagedItem<P>>> {
    let graph = load_subtree(store, uri, with_children)?;
    if !graph.contains(uri) {
        return Ok(None);
    }
    Ok(Some(ManagedItem::from_graph(uri, &graph, with_children)?))
}

/// Every stored item of kind `P`, in URI order
pub fn load_all<P: Payload>(
    store: &dyn GraphStore,
    with_children: bool,
) -> Result<Vec<ManagedItem<P>>> {
    let mut items = Vec::new();
    for uri in subjects_of_type(store, P::KIND.rdf_type)? {
        if let Some(item) = load_item::<P>(store, &uri, with_children)? {
            items.push(item);
        }
    }
    Ok(items)
}

fn owned_child(root: &ItemUri, triple: &Triple) -> Option<ItemUri> {
    if triple.predicate.as_str() == rdf::TYPE {
        return None;
    }
    let Term::Iri(object) = &triple.object else {
        return None;
    };
    let candidate = ItemUri::parse(object.as_str()).ok()?;
    root.owns(&candidate).then_some(candidate)
}
