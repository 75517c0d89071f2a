//! N-Triples interchange format
//!
//! `write` is deterministic (triples are sorted) so exports diff cleanly.
//! `parse` reads full N-Triples through `sophia_turtle`. Language-tagged
//! literals are read as plain strings. Blank nodes are skolemized into
//! IRIs under [`GENID_BASE`], scoped to the parsed document.

use crate::errors::{MdrError, Result};
use crate::graph::term::{Iri, Literal, Term, Triple, XsdType};
use sophia_api::source::TripleSource;
use sophia_api::term::{Term as RdfTerm, TermKind};
use sophia_api::triple::Triple as RdfTriple;
use sophia_turtle::parser::nt;

/// Prefix of IRIs minted for blank nodes
pub const GENID_BASE: &str = "http://www.assero.co.uk/.well-known/genid/";

/// Serialize triples, one per line, in sorted order
pub fn write(triples: &[Triple]) -> String {
    let mut sorted: Vec<&Triple> = triples.iter().collect();
    sorted.sort();
    sorted.dedup();

    let mut out = String::with_capacity(sorted.len() * 96);
    for t in sorted {
        out.push('<');
        out.push_str(t.subject.as_str());
        out.push_str("> <");
        out.push_str(t.predicate.as_str());
        out.push_str("> ");
        match &t.object {
            Term::Iri(iri) => {
                out.push('<');
                out.push_str(iri.as_str());
                out.push('>');
            }
            Term::Literal(lit) => {
                out.push('"');
                out.push_str(&escape(&lit.lexical));
                out.push_str("\"^^<");
                out.push_str(lit.datatype.iri());
                out.push('>');
            }
        }
        out.push_str(" .\n");
    }
    out
}

/// Parse an N-Triples document
///
/// Statements never span lines, so each line is parsed on its own and
/// errors name the line they occur on.
pub fn parse(text: &str) -> Result<Vec<Triple>> {
    let genid = format!("{}{}/", GENID_BASE, uuid::Uuid::new_v4().simple());
    let mut triples = Vec::new();
    for (index, line) in text.lines().enumerate() {
        parse_line(line, &genid, &mut triples).map_err(|reason| MdrError::Serialization {
            reason: format!("line {}: {}", index + 1, reason),
        })?;
    }
    Ok(triples)
}

fn parse_line(line: &str, genid: &str, out: &mut Vec<Triple>) -> std::result::Result<(), String> {
    let mut converted = Vec::new();
    nt::parse_str(line)
        .for_each_triple(|t| converted.push(convert(&t, genid)))
        .map_err(|e| e.to_string())?;
    for triple in converted {
        out.push(triple?);
    }
    Ok(())
}

fn convert<T: RdfTriple>(t: &T, genid: &str) -> std::result::Result<Triple, String> {
    Ok(Triple::new(
        node(&t.s(), genid)?,
        node(&t.p(), genid)?,
        object(&t.o(), genid)?,
    ))
}

fn node<T: RdfTerm>(term: &T, genid: &str) -> std::result::Result<Iri, String> {
    match term.kind() {
        TermKind::Iri => term
            .iri()
            .map(|iri| Iri::new(iri.as_str()))
            .ok_or_else(|| "IRI term without IRI".to_string()),
        TermKind::BlankNode => term
            .bnode_id()
            .map(|id| Iri::new(format!("{}{}", genid, id.as_str())))
            .ok_or_else(|| "blank node without label".to_string()),
        other => Err(format!("unexpected {:?} term", other)),
    }
}

fn object<T: RdfTerm>(term: &T, genid: &str) -> std::result::Result<Term, String> {
    if term.kind() != TermKind::Literal {
        return node(term, genid).map(Term::Iri);
    }
    let lexical = term
        .lexical_form()
        .map(|lex| String::from(&*lex))
        .unwrap_or_default();
    let datatype = term
        .datatype()
        .map(|dt| XsdType::from_iri(dt.as_str()))
        .unwrap_or_default();
    Ok(Term::Literal(Literal { lexical, datatype }))
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", u32::from(c))),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const S: &str = "http://www.assero.co.uk/MDRForms/ACME/V1#F-ACME_T1";
    const LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";

    #[test]
    fn test_every_line_ends_with_period() {
        let triples = vec![
            Triple::new(Iri::new(S), Iri::new(LABEL), Literal::string("A \"quoted\"\nlabel")),
            Triple::new(
                Iri::new(S),
                Iri::new("http://www.assero.co.uk/BusinessForm#ordinal"),
                Literal::integer(3),
            ),
        ];
        let nt = write(&triples);
        assert_eq!(nt.lines().count(), 2);
        for line in nt.lines() {
            assert!(line.ends_with(" ."), "line does not end with ' .': {line}");
        }
    }

    #[test]
    fn test_written_document_parses_back() {
        let triples = vec![
            Triple::new(Iri::new(S), Iri::new(LABEL), Literal::string("tab\there \\ done\u{7}")),
            Triple::new(
                Iri::new(S),
                Iri::new("http://www.w3.org/1999/02/22-rdf-syntax-ns#type"),
                Iri::new("http://www.assero.co.uk/BusinessForm#Form"),
            ),
        ];
        let mut parsed = parse(&write(&triples)).unwrap();
        parsed.sort();
        let mut expected = triples.clone();
        expected.sort();
        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_unicode_escapes_are_decoded() {
        let doc = format!(
            "<{S}> <{LABEL}> \"Caf\\u00e9 \\U0001F600\"^^<http://www.w3.org/2001/XMLSchema#string> .\n"
        );
        let parsed = parse(&doc).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].object, Term::Literal(Literal::string("Café 😀")));
    }

    #[test]
    fn test_language_tag_reads_as_string() {
        let doc = format!("<{S}> <{LABEL}> \"Vital Signs\"@en .\n# trailing comment\n");
        let parsed = parse(&doc).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].object, Term::Literal(Literal::string("Vital Signs")));
    }

    #[test]
    fn test_blank_nodes_share_one_iri_per_label() {
        let doc = format!(
            "_:b0 <{LABEL}> \"first\" .\n<{S}> <http://x/p> _:b0 .\n<{S}> <http://x/p> _:b1 .\n"
        );
        let parsed = parse(&doc).unwrap();

        let subject = &parsed[0].subject;
        assert!(subject.as_str().starts_with(GENID_BASE));
        assert_eq!(parsed[1].object, Term::Iri(subject.clone()));
        assert_ne!(parsed[2].object, Term::Iri(subject.clone()));

        // a second document gets its own blank nodes
        let again = parse(&doc).unwrap();
        assert_ne!(&again[0].subject, subject);
    }

    #[test]
    fn test_errors_report_line_number() {
        let doc = format!("<{S}> <{LABEL}> \"ok\" .\n<{S}> <{LABEL}> \"unterminated .\n");
        let err = parse(&doc).unwrap_err();
        assert!(matches!(err, MdrError::Serialization { .. }));
        assert!(err.to_string().contains("line 2"));
    }
}
