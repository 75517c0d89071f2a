//! N-Triples import command

use super::{require_file, CliResult, Context, GlobalArgs};
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// N-Triples file to load
    pub file: PathBuf,
}

pub fn execute(global: &GlobalArgs, args: ImportArgs) -> CliResult {
    require_file(&args.file)?;
    let ctx = Context::open(global)?;
    let count = mdr_store::import_ntriples_file(ctx.store.as_ref(), &args.file)?;
    println!("Imported {} triples from {}", count, args.file.display());
    Ok(())
}
