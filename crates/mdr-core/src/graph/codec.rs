//! Building and reading item graphs
//!
//! [`GraphWriter`] accumulates the triples of one item without touching the
//! store. [`SubjectGraph`] indexes loaded triples by subject and reads them
//! back leniently: missing optional literals come back as empty strings,
//! zero or `false`.

use crate::graph::term::{Iri, Literal, Term, Triple};
use crate::graph::vocab::rdf;
use crate::model::ItemUri;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Accumulates triples for one item
#[derive(Debug, Default)]
pub struct GraphWriter {
    triples: Vec<Triple>,
}

impl GraphWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `subject` with its rdf:type
    pub fn node(&mut self, subject: &ItemUri, rdf_type: &str) {
        self.push(subject, rdf::TYPE, Term::Iri(Iri::new(rdf_type)));
    }

    pub fn string(&mut self, subject: &ItemUri, predicate: &str, value: &str) {
        self.push(subject, predicate, Literal::string(value).into());
    }

    pub fn integer(&mut self, subject: &ItemUri, predicate: &str, value: i64) {
        self.push(subject, predicate, Literal::integer(value).into());
    }

    pub fn boolean(&mut self, subject: &ItemUri, predicate: &str, value: bool) {
        self.push(subject, predicate, Literal::boolean(value).into());
    }

    /// Absent dates write nothing
    pub fn datetime(&mut self, subject: &ItemUri, predicate: &str, value: Option<&DateTime<Utc>>) {
        if let Some(value) = value {
            self.push(subject, predicate, Literal::datetime(value).into());
        }
    }

    pub fn link(&mut self, subject: &ItemUri, predicate: &str, object: &ItemUri) {
        self.push(subject, predicate, Term::Iri(object.to_iri()));
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn into_triples(self) -> Vec<Triple> {
        self.triples
    }

    fn push(&mut self, subject: &ItemUri, predicate: &str, object: Term) {
        self.triples
            .push(Triple::new(subject.to_iri(), Iri::new(predicate), object));
    }
}

/// Loaded triples indexed by subject
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubjectGraph {
    subjects: BTreeMap<Iri, Vec<(Iri, Term)>>,
}

impl SubjectGraph {
    pub fn from_triples(triples: impl IntoIterator<Item = Triple>) -> Self {
        let mut graph = Self::default();
        graph.extend(triples);
        graph
    }

    pub fn extend(&mut self, triples: impl IntoIterator<Item = Triple>) {
        for t in triples {
            self.subjects
                .entry(t.subject)
                .or_default()
                .push((t.predicate, t.object));
        }
    }

    pub fn contains(&self, subject: &ItemUri) -> bool {
        self.subjects.contains_key(&subject.to_iri())
    }

    pub fn subject_count(&self) -> usize {
        self.subjects.len()
    }

    pub fn rdf_type(&self, subject: &ItemUri) -> Option<&Iri> {
        self.objects(subject, rdf::TYPE).find_map(Term::as_iri)
    }

    /// First string value of `predicate`, or empty
    pub fn string(&self, subject: &ItemUri, predicate: &str) -> String {
        self.literal(subject, predicate)
            .map(|l| l.lexical.clone())
            .unwrap_or_default()
    }

    pub fn integer(&self, subject: &ItemUri, predicate: &str) -> i64 {
        self.literal(subject, predicate)
            .and_then(Literal::as_integer)
            .unwrap_or(0)
    }

    pub fn boolean(&self, subject: &ItemUri, predicate: &str) -> bool {
        self.literal(subject, predicate)
            .and_then(Literal::as_bool)
            .unwrap_or(false)
    }

    pub fn datetime(&self, subject: &ItemUri, predicate: &str) -> Option<DateTime<Utc>> {
        self.literal(subject, predicate)
            .and_then(Literal::as_datetime)
    }

    pub fn link(&self, subject: &ItemUri, predicate: &str) -> Option<ItemUri> {
        self.links(subject, predicate).into_iter().next()
    }

    /// Every IRI object of `predicate` that parses as an item URI
    pub fn links(&self, subject: &ItemUri, predicate: &str) -> Vec<ItemUri> {
        self.objects(subject, predicate)
            .filter_map(Term::as_iri)
            .filter_map(|iri| ItemUri::parse(iri.as_str()).ok())
            .collect()
    }

    /// Flatten back into triples, ordered by subject
    pub fn triples(&self) -> Vec<Triple> {
        self.subjects
            .iter()
            .flat_map(|(s, pos)| {
                pos.iter()
                    .map(move |(p, o)| Triple::new(s.clone(), p.clone(), o.clone()))
            })
            .collect()
    }

    fn literal<'a>(&'a self, subject: &ItemUri, predicate: &'a str) -> Option<&'a Literal> {
        self.objects(subject, predicate).find_map(Term::as_literal)
    }

    fn objects<'a>(
        &'a self,
        subject: &ItemUri,
        predicate: &'a str,
    ) -> impl Iterator<Item = &'a Term> + 'a {
        self.subjects
            .get(&subject.to_iri())
            .into_iter()
            .flatten()
            .filter(move |(p, _)| p.as_str() == predicate)
            .map(|(_, o)| o)
    }
}
