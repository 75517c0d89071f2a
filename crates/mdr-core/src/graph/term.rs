//! Triple terms, patterns and mutations exchanged with the graph store

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Absolute IRI
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Iri(String);

impl Iri {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// XML Schema datatypes used by literals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum XsdType {
    #[default]
    String,
    Integer,
    Boolean,
    DateTime,
}

impl XsdType {
    pub fn iri(&self) -> &'static str {
        match self {
            XsdType::String => "http://www.w3.org/2001/XMLSchema#string",
            XsdType::Integer => "http://www.w3.org/2001/XMLSchema#integer",
            XsdType::Boolean => "http://www.w3.org/2001/XMLSchema#boolean",
            XsdType::DateTime => "http://www.w3.org/2001/XMLSchema#dateTime",
        }
    }

    /// Map a datatype IRI back to its type; unknown datatypes read as strings
    pub fn from_iri(iri: &str) -> Self {
        [XsdType::Integer, XsdType::Boolean, XsdType::DateTime]
            .into_iter()
            .find(|t| t.iri() == iri)
            .unwrap_or(XsdType::String)
    }
}

/// Typed literal
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Literal {
    pub lexical: String,
    pub datatype: XsdType,
}

impl Literal {
    pub fn string(value: impl Into<String>) -> Self {
        Self {
            lexical: value.into(),
            datatype: XsdType::String,
        }
    }

    pub fn integer(value: i64) -> Self {
        Self {
            lexical: value.to_string(),
            datatype: XsdType::Integer,
        }
    }

    pub fn boolean(value: bool) -> Self {
        Self {
            lexical: value.to_string(),
            datatype: XsdType::Boolean,
        }
    }

    pub fn datetime(value: &DateTime<Utc>) -> Self {
        Self {
            lexical: value.to_rfc3339_opts(SecondsFormat::Micros, true),
            datatype: XsdType::DateTime,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        self.lexical.trim().parse().ok()
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.lexical.trim() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(self.lexical.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// Object position of a triple
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Term {
    Iri(Iri),
    Literal(Literal),
}

impl Term {
    pub fn as_iri(&self) -> Option<&Iri> {
        match self {
            Term::Iri(iri) => Some(iri),
            Term::Literal(_) => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(lit) => Some(lit),
            Term::Iri(_) => None,
        }
    }
}

impl From<Iri> for Term {
    fn from(iri: Iri) -> Self {
        Term::Iri(iri)
    }
}

impl From<Literal> for Term {
    fn from(lit: Literal) -> Self {
        Term::Literal(lit)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Triple {
    pub subject: Iri,
    pub predicate: Iri,
    pub object: Term,
}

impl Triple {
    pub fn new(subject: Iri, predicate: Iri, object: impl Into<Term>) -> Self {
        Self {
            subject,
            predicate,
            object: object.into(),
        }
    }
}

/// Query pattern; `None` positions match anything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriplePattern {
    pub subject: Option<Iri>,
    pub predicate: Option<Iri>,
    pub object: Option<Term>,
}

impl TriplePattern {
    /// Pattern matching every triple
    pub fn any() -> Self {
        Self::default()
    }

    pub fn with_subject(mut self, subject: Iri) -> Self {
        self.subject = Some(subject);
        self
    }

    pub fn with_predicate(mut self, predicate: Iri) -> Self {
        self.predicate = Some(predicate);
        self
    }

    pub fn with_object(mut self, object: impl Into<Term>) -> Self {
        self.object = Some(object.into());
        self
    }

    pub fn matches(&self, triple: &Triple) -> bool {
        self.subject.as_ref().map_or(true, |s| *s == triple.subject)
            && self.predicate.as_ref().map_or(true, |p| *p == triple.predicate)
            && self.object.as_ref().map_or(true, |o| *o == triple.object)
    }
}

/// One store update: deletions are applied before insertions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphMutation {
    pub delete: Vec<Triple>,
    pub insert: Vec<Triple>,
}

impl GraphMutation {
    pub fn insert(triples: Vec<Triple>) -> Self {
        Self {
            delete: Vec::new(),
            insert: triples,
        }
    }

    pub fn delete(triples: Vec<Triple>) -> Self {
        Self {
            delete: triples,
            insert: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.delete.is_empty() && self.insert.is_empty()
    }
}
