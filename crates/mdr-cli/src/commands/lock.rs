//! Edit-lock commands

use super::item::locked_message;
use super::{CliResult, Context, GlobalArgs};
use clap::{Args, Subcommand};
use mdr_core::model::ItemUri;

#[derive(Debug, Args)]
pub struct LockArgs {
    #[command(subcommand)]
    pub command: LockCommand,
}

#[derive(Debug, Subcommand)]
pub enum LockCommand {
    /// Claim an item for editing, or refresh an existing claim
    Obtain { uri: String },
    /// Give up a claim held by the acting user
    Release { uri: String },
    /// Show every lock that has not timed out
    List,
}

pub fn execute(global: &GlobalArgs, args: LockArgs) -> CliResult {
    let ctx = Context::open(global)?;
    let locks = ctx.service.locks();
    let user = global.user();

    match args.command {
        LockCommand::Obtain { uri } => {
            let uri = ItemUri::parse(&uri)?;
            match locks.obtain(&uri, &user)? {
                Some(lock) => {
                    println!("{}\t{}s", lock.id, locks.remaining(&lock));
                    Ok(())
                }
                None => Err(locked_message(&uri, locks.holder(&uri)?).into()),
            }
        }
        LockCommand::Release { uri } => {
            let uri = ItemUri::parse(&uri)?;
            match locks.find_valid(&uri, &user)? {
                Some(lock) => {
                    locks.release(&lock)?;
                    println!("Released {}", uri);
                    Ok(())
                }
                None => Err(format!("No lock held by {} on {}", user.id, uri).into()),
            }
        }
        LockCommand::List => {
            for lock in locks.active_locks()? {
                println!(
                    "{}\t{}\t{}s",
                    lock.subject_uri,
                    lock.user_id,
                    locks.remaining(&lock)
                );
            }
            Ok(())
        }
    }
}
