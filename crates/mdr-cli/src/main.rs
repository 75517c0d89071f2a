//! MDR CLI
//!
//! Command-line interface for the metadata repository

use clap::{Parser, Subcommand};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "mdr")]
#[command(about = "MDR - Versioned metadata repository for forms and biomedical concepts", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: commands::GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List released items
    List(commands::item::KindArgs),
    /// List the latest version of every chain
    Unique(commands::item::KindArgs),
    /// Show one chain, newest first
    History(commands::item::HistoryArgs),
    /// Print an item as JSON
    Show(commands::item::UriArgs),
    /// Export an item as JSON or N-Triples
    Export(commands::item::ExportArgs),
    /// Create a placeholder form
    CreateForm(commands::item::CreateFormArgs),
    /// Copy an item into a new chain
    Clone(commands::item::CopyArgs),
    /// Copy an item into a new chain, recording where it came from
    Branch(commands::item::CopyArgs),
    /// Delete an item
    Destroy(commands::item::UriArgs),
    /// Edit lock operations
    Lock(commands::lock::LockArgs),
    /// Import an N-Triples file
    Import(commands::import::ImportArgs),
    /// Show the audit trail
    Audit(commands::audit::AuditArgs),
}

fn main() {
    let cli = Cli::parse();
    if cli.global.verbose {
        mdr_core::logging_facility::init(mdr_core::logging_facility::Profile::Development);
    }

    let global = cli.global;
    let result = match cli.command {
        Commands::List(args) => commands::item::execute_list(&global, args),
        Commands::Unique(args) => commands::item::execute_unique(&global, args),
        Commands::History(args) => commands::item::execute_history(&global, args),
        Commands::Show(args) => commands::item::execute_show(&global, args),
        Commands::Export(args) => commands::item::execute_export(&global, args),
        Commands::CreateForm(args) => commands::item::execute_create_form(&global, args),
        Commands::Clone(args) => commands::item::execute_copy(&global, args, false),
        Commands::Branch(args) => commands::item::execute_copy(&global, args, true),
        Commands::Destroy(args) => commands::item::execute_destroy(&global, args),
        Commands::Lock(args) => commands::lock::execute(&global, args),
        Commands::Import(args) => commands::import::execute(&global, args),
        Commands::Audit(args) => commands::audit::execute(&global, args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
