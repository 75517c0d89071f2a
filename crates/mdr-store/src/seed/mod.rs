//! Bulk loading of N-Triples files

mod importer;

pub use importer::import_ntriples_file;
