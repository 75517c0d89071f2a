//! Graph store over the `triples` table

use super::SqliteStore;
use crate::errors::{corrupt_row, from_rusqlite};
use mdr_core::graph::{GraphMutation, Iri, Literal, Term, Triple, TriplePattern, XsdType};
use mdr_core::ops::{GraphStore, StoreResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Transaction};
use tracing::debug;

/// `(object_kind, object, datatype)` columns of a term
fn encode(term: &Term) -> (&'static str, &str, &'static str) {
    match term {
        Term::Iri(iri) => ("iri", iri.as_str(), ""),
        Term::Literal(lit) => ("literal", lit.lexical.as_str(), lit.datatype.iri()),
    }
}

fn decode(kind: &str, object: String, datatype: &str) -> StoreResult<Term> {
    match kind {
        "iri" => Ok(Term::Iri(Iri::new(object))),
        "literal" => Ok(Term::Literal(Literal {
            lexical: object,
            datatype: XsdType::from_iri(datatype),
        })),
        other => Err(corrupt_row("triples", format!("unknown object kind '{}'", other))),
    }
}

impl GraphStore for SqliteStore {
    fn query(&self, pattern: &TriplePattern) -> StoreResult<Vec<Triple>> {
        let mut sql = String::from(
            "SELECT subject, predicate, object_kind, object, datatype FROM triples WHERE 1 = 1",
        );
        let mut args: Vec<Value> = Vec::new();
        if let Some(s) = &pattern.subject {
            sql.push_str(" AND subject = ?");
            args.push(Value::Text(s.as_str().to_string()));
        }
        if let Some(p) = &pattern.predicate {
            sql.push_str(" AND predicate = ?");
            args.push(Value::Text(p.as_str().to_string()));
        }
        if let Some(o) = &pattern.object {
            let (kind, object, datatype) = encode(o);
            sql.push_str(" AND object_kind = ? AND object = ? AND datatype = ?");
            args.push(Value::Text(kind.to_string()));
            args.push(Value::Text(object.to_string()));
            args.push(Value::Text(datatype.to_string()));
        }
        sql.push_str(" ORDER BY subject, predicate, object");

        let conn = self.conn()?;
        let mut stmt = conn.prepare(&sql).map_err(from_rusqlite)?;
        let rows = stmt
            .query_map(params_from_iter(args), |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                ))
            })
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;

        rows.into_iter()
            .map(|(s, p, kind, object, datatype)| {
                Ok(Triple::new(Iri::new(s), Iri::new(p), decode(&kind, object, &datatype)?))
            })
            .collect()
    }

    fn update(&self, mutation: &GraphMutation) -> StoreResult<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction().map_err(from_rusqlite)?;
        apply(&tx, mutation)?;
        tx.commit().map_err(from_rusqlite)?;
        debug!(
            deleted = mutation.delete.len(),
            inserted = mutation.insert.len(),
            "graph mutation committed"
        );
        Ok(())
    }
}

fn apply(tx: &Transaction<'_>, mutation: &GraphMutation) -> StoreResult<()> {
    {
        let mut delete = tx
            .prepare_cached(
                "DELETE FROM triples WHERE subject = ? AND predicate = ?
                 AND object_kind = ? AND object = ? AND datatype = ?",
            )
            .map_err(from_rusqlite)?;
        for t in &mutation.delete {
            let (kind, object, datatype) = encode(&t.object);
            delete
                .execute(params![t.subject.as_str(), t.predicate.as_str(), kind, object, datatype])
                .map_err(from_rusqlite)?;
        }
    }
    let mut insert = tx
        .prepare_cached(
            "INSERT OR IGNORE INTO triples (subject, predicate, object_kind, object, datatype)
             VALUES (?, ?, ?, ?, ?)",
        )
        .map_err(from_rusqlite)?;
    for t in &mutation.insert {
        let (kind, object, datatype) = encode(&t.object);
        insert
            .execute(params![t.subject.as_str(), t.predicate.as_str(), kind, object, datatype])
            .map_err(from_rusqlite)?;
    }
    Ok(())
}
