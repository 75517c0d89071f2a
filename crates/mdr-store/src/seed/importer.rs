//! N-Triples file import
//!
//! The whole file is parsed before anything is written, then inserted as a
//! single mutation: a bad line leaves the store untouched.

#![allow(clippy::result_large_err)]

use crate::errors::{io_error, Result};
use mdr_core::graph::{ntriples, GraphMutation};
use mdr_core::ops::GraphStore;
use std::path::Path;
use tracing::debug;

/// Load `path` into `store`; returns the number of triples parsed
pub fn import_ntriples_file(store: &dyn GraphStore, path: &Path) -> Result<usize> {
    let text = std::fs::read_to_string(path).map_err(|e| io_error("import_read", e))?;
    let triples = ntriples::parse(&text).map_err(|e| {
        mdr_core::ExError::from(e)
            .with_op("import_parse")
            .with_entity_id(path.display().to_string())
    })?;
    let count = triples.len();
    store.update(&GraphMutation::insert(triples))?;
    debug!(path = %path.display(), triples = count, "n-triples imported");
    Ok(count)
}
