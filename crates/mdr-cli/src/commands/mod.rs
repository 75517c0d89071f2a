//! Subcommands and the repository context they share

pub mod audit;
pub mod import;
pub mod item;
pub mod lock;

use clap::{Args, ValueEnum};
use mdr_core::lock::{LockRegistry, SystemClock};
use mdr_core::model::User;
use mdr_core::MdrConfig;
use mdr_engine::{EditService, GraphTerminology, Lifecycle};
use mdr_store::SqliteStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// SQLite database holding graph, locks and audit trail
    #[arg(long, global = true, default_value = ".mdr/store.db")]
    pub db: PathBuf,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Acting user id
    #[arg(long, global = true, default_value = "mdr")]
    pub user: String,

    #[arg(long, global = true)]
    pub email: Option<String>,

    /// Development logging to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl GlobalArgs {
    pub fn user(&self) -> User {
        let email = self
            .email
            .clone()
            .unwrap_or_else(|| format!("{}@localhost", self.user));
        User::new(&self.user, email)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Kind {
    Form,
    Bc,
}

/// Open store and services for one command
pub struct Context {
    pub store: Arc<SqliteStore>,
    pub service: EditService,
}

impl Context {
    pub fn open(global: &GlobalArgs) -> Result<Self, Box<dyn std::error::Error>> {
        let config = match &global.config {
            Some(path) => MdrConfig::load(path)?,
            None => MdrConfig::default(),
        };

        if let Some(parent) = global.db.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let store = Arc::new(SqliteStore::open(&global.db)?);

        let locks = LockRegistry::new(store.clone(), Arc::new(SystemClock), config.lock_timeout());
        let terminology = Arc::new(GraphTerminology::new(store.clone()));
        let service = EditService::new(
            Lifecycle::new(store.clone(), config),
            locks,
            store.clone(),
            terminology,
        );
        Ok(Self { store, service })
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        self.service.lifecycle()
    }
}

pub fn require_file(path: &Path) -> CliResult {
    if !path.is_file() {
        return Err(format!("File not found: {}", path.display()).into());
    }
    Ok(())
}
