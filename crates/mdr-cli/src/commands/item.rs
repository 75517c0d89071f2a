//! Managed-item commands

use super::{CliResult, Context, GlobalArgs, Kind};
use clap::{Args, ValueEnum};
use mdr_core::model::{BiomedicalConcept, Form, ItemUri, ManagedItem, Payload};
use mdr_engine::{CreateOutcome, DestroyOutcome};

#[derive(Debug, Args)]
pub struct KindArgs {
    #[arg(long, value_enum, default_value = "form")]
    pub kind: Kind,
}

#[derive(Debug, Args)]
pub struct HistoryArgs {
    pub identifier: String,

    /// Scope id of the chain; defaults to the configured owner
    #[arg(long)]
    pub scope: Option<String>,

    #[arg(long, value_enum, default_value = "form")]
    pub kind: Kind,
}

#[derive(Debug, Args)]
pub struct UriArgs {
    pub uri: String,

    #[arg(long, value_enum, default_value = "form")]
    pub kind: Kind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Nt,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    pub uri: String,

    #[arg(long, value_enum, default_value = "json")]
    pub format: ExportFormat,

    #[arg(long, value_enum, default_value = "form")]
    pub kind: Kind,
}

#[derive(Debug, Args)]
pub struct CreateFormArgs {
    pub identifier: String,
    pub label: String,

    /// Text of the placeholder question
    #[arg(long, default_value = "")]
    pub free_text: String,
}

#[derive(Debug, Args)]
pub struct CopyArgs {
    /// Item to copy
    pub uri: String,
    pub identifier: String,
    pub label: String,

    #[arg(long, value_enum, default_value = "form")]
    pub kind: Kind,
}

pub fn execute_list(global: &GlobalArgs, args: KindArgs) -> CliResult {
    let ctx = Context::open(global)?;
    match args.kind {
        Kind::Form => print_items(&ctx.lifecycle().list::<Form>()?),
        Kind::Bc => print_items(&ctx.lifecycle().list::<BiomedicalConcept>()?),
    }
    Ok(())
}

pub fn execute_unique(global: &GlobalArgs, args: KindArgs) -> CliResult {
    let ctx = Context::open(global)?;
    match args.kind {
        Kind::Form => print_items(&ctx.lifecycle().unique::<Form>()?),
        Kind::Bc => print_items(&ctx.lifecycle().unique::<BiomedicalConcept>()?),
    }
    Ok(())
}

pub fn execute_history(global: &GlobalArgs, args: HistoryArgs) -> CliResult {
    let ctx = Context::open(global)?;
    let lifecycle = ctx.lifecycle();
    let scope_id = args
        .scope
        .unwrap_or_else(|| lifecycle.config().owner.scope.id.clone());
    match args.kind {
        Kind::Form => print_items(&lifecycle.history::<Form>(&args.identifier, &scope_id)?),
        Kind::Bc => print_items(&lifecycle.history::<BiomedicalConcept>(
            &args.identifier,
            &scope_id,
        )?),
    }
    Ok(())
}

pub fn execute_show(global: &GlobalArgs, args: UriArgs) -> CliResult {
    let ctx = Context::open(global)?;
    let uri = ItemUri::parse(&args.uri)?;
    let value = match args.kind {
        Kind::Form => ctx.lifecycle().export_json::<Form>(&uri)?,
        Kind::Bc => ctx.lifecycle().export_json::<BiomedicalConcept>(&uri)?,
    };
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

pub fn execute_export(global: &GlobalArgs, args: ExportArgs) -> CliResult {
    match args.format {
        ExportFormat::Json => execute_show(
            global,
            UriArgs {
                uri: args.uri,
                kind: args.kind,
            },
        ),
        ExportFormat::Nt => {
            let ctx = Context::open(global)?;
            let uri = ItemUri::parse(&args.uri)?;
            print!("{}", ctx.lifecycle().export_ntriples(&uri)?);
            Ok(())
        }
    }
}

pub fn execute_create_form(global: &GlobalArgs, args: CreateFormArgs) -> CliResult {
    let ctx = Context::open(global)?;
    let item = ManagedItem::new(
        ctx.lifecycle().config(),
        &args.identifier,
        &args.label,
        Form::placeholder(&args.free_text),
    );
    let outcome = ctx.service.create(&item.create_operation(), &global.user())?;
    report_created(outcome)
}

pub fn execute_copy(global: &GlobalArgs, args: CopyArgs, branch: bool) -> CliResult {
    let ctx = Context::open(global)?;
    let source = ItemUri::parse(&args.uri)?;
    let user = global.user();
    match (args.kind, branch) {
        (Kind::Form, false) => report_created(ctx.service.clone_item::<Form>(
            &source,
            &args.identifier,
            &args.label,
            &user,
        )?),
        (Kind::Form, true) => report_created(ctx.service.branch::<Form>(
            &source,
            &args.identifier,
            &args.label,
            &user,
        )?),
        (Kind::Bc, false) => report_created(ctx.service.clone_item::<BiomedicalConcept>(
            &source,
            &args.identifier,
            &args.label,
            &user,
        )?),
        (Kind::Bc, true) => report_created(ctx.service.branch::<BiomedicalConcept>(
            &source,
            &args.identifier,
            &args.label,
            &user,
        )?),
    }
}

pub fn execute_destroy(global: &GlobalArgs, args: UriArgs) -> CliResult {
    let ctx = Context::open(global)?;
    let uri = ItemUri::parse(&args.uri)?;
    let user = global.user();
    let outcome = match args.kind {
        Kind::Form => ctx.service.destroy::<Form>(&uri, &user)?,
        Kind::Bc => ctx.service.destroy::<BiomedicalConcept>(&uri, &user)?,
    };
    match outcome {
        DestroyOutcome::Destroyed => {
            println!("Destroyed {}", uri);
            Ok(())
        }
        DestroyOutcome::LockConflict { holder } => Err(locked_message(&uri, holder).into()),
    }
}

pub(crate) fn locked_message(uri: &ItemUri, holder: Option<mdr_core::EditLock>) -> String {
    match holder {
        Some(lock) => format!("{} is being edited by {}", uri, lock.user_email),
        None => format!("{} is locked", uri),
    }
}

fn report_created<P: Payload>(outcome: CreateOutcome<P>) -> CliResult {
    match outcome {
        CreateOutcome::Created(item) => {
            println!(
                "Created {} v{} {}",
                item.identifier(),
                item.version(),
                item.uri
            );
            Ok(())
        }
        CreateOutcome::Invalid(item) => Err(item.errors.full_messages().join("; ").into()),
        CreateOutcome::PermissionSkipped(item) => Err(format!(
            "Not permitted to create {} {}",
            P::KIND.name,
            item.identifier()
        )
        .into()),
    }
}

fn print_items<P: Payload>(items: &[ManagedItem<P>]) {
    for item in items {
        println!(
            "{}\tv{}\t{}\t{}\t{}",
            item.identifier(),
            item.version(),
            item.status(),
            item.label,
            item.uri
        );
    }
}
