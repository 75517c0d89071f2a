//! Audit trail command

use super::{CliResult, Context, GlobalArgs};
use clap::Args;

#[derive(Debug, Args)]
pub struct AuditArgs {
    /// Only events for this item
    #[arg(long)]
    pub uri: Option<String>,
}

pub fn execute(global: &GlobalArgs, args: AuditArgs) -> CliResult {
    let ctx = Context::open(global)?;
    for event in ctx.store.audit_trail(args.uri.as_deref())? {
        println!(
            "{}\t{}\t{}\t{} v{}\t{}",
            event.recorded_at.to_rfc3339(),
            event.kind,
            event.user_id,
            event.identifier,
            event.version,
            event.message
        );
    }
    Ok(())
}
