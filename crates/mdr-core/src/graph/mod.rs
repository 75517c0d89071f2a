//! Graph representation of managed items

pub mod codec;
pub mod ntriples;
pub mod term;
pub mod vocab;

pub use codec::{GraphWriter, SubjectGraph};
pub use term::{GraphMutation, Iri, Literal, Term, Triple, TriplePattern, XsdType};
