//! CLI interface for servicelog.
//!
//! Each subcommand is non-interactive: arguments in, human-readable output
//! out. A command loads the store from local storage, dispatches its intent,
//! and writes back only the sections that changed.
//!
//! - `servicelog draft new|list|show|select|set|submit|delete|clear`
//! - `servicelog log list|show|edit|delete|filter|export`
//!
//! Draft and log ids take a full UUID or an unambiguous prefix.

mod draft;
mod fields;
mod format;
mod logs;

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::rc::Rc;

use clap::{Parser, Subcommand};
use uuid::Uuid;

use crate::config::Config;
use crate::storage::Storage;
use crate::store::{AppStore, Section, SystemClock};

use draft::DraftCommand;
use logs::LogCommand;

/// Servicelog: draft, record, and browse vehicle service logs.
#[derive(Debug, Parser)]
#[command(name = "servicelog", after_long_help = WORKFLOW_HELP)]
pub struct Cli {
    /// Directory holding the store files. Overrides `SERVICELOG_DATA_DIR`
    /// and the config file.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

const WORKFLOW_HELP: &str = r"Workflow: recording a service visit
  1. servicelog draft new
  2. servicelog draft set --provider ACME --order SO-1 --car VAN-07 \
       --odometer 42000 --engine-hours 2 --start 2025-01-10 \
       --description 'Replaced front brake pads'
  3. servicelog draft submit
  4. servicelog log list

Browsing:
  servicelog log filter --search brake --from 2025-01-01 --type emergency
  servicelog log export";

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Work with drafts: unsubmitted, auto-saved forms.
    Draft {
        #[command(subcommand)]
        command: DraftCommand,
    },

    /// Browse, edit, and export finalized service logs.
    Log {
        #[command(subcommand)]
        command: LogCommand,
    },
}

/// Run the CLI, returning an error message on failure.
pub fn run(config: &Config) -> Result<(), String> {
    let cli = Cli::parse();

    let root = config
        .resolve_data_dir(cli.data_dir.as_deref())
        .map_err(|e| e.to_string())?;
    let storage = Storage::new(root).map_err(|e| format!("failed to open storage: {e}"))?;
    run_with(cli.command, config, &storage)
}

/// Run one command against `storage`, saving only the sections it changed.
fn run_with(command: Command, config: &Config, storage: &Storage) -> Result<(), String> {
    let mut store = load_store(storage)?;

    let dirty = Rc::new(RefCell::new(BTreeSet::<Section>::new()));
    let sink = Rc::clone(&dirty);
    store.subscribe(move |section| {
        sink.borrow_mut().insert(section);
    });

    let result = match command {
        Command::Draft { command } => draft::run(command, config, &mut store),
        Command::Log { command } => logs::run(command, &mut store),
    };

    // Sections changed before a failed step are still saved.
    for section in dirty.borrow().iter() {
        storage
            .save_section(&store, *section)
            .map_err(|e| format!("failed to save: {e}"))?;
    }

    result
}

fn load_store(storage: &Storage) -> Result<AppStore, String> {
    let drafts = storage
        .load_drafts()
        .map_err(|e| format!("failed to load drafts: {e}"))?;
    let service_logs = storage
        .load_service_logs()
        .map_err(|e| format!("failed to load service logs: {e}"))?;
    tracing::debug!(
        drafts = drafts.items.len(),
        logs = service_logs.items.len(),
        "loaded store"
    );
    Ok(AppStore::new(drafts, service_logs, Box::new(SystemClock)))
}

/// Resolve an id reference (full UUID or unambiguous prefix) against `ids`.
fn resolve_id(
    reference: &str,
    ids: impl IntoIterator<Item = Uuid>,
    kind: &str,
) -> Result<Uuid, String> {
    let ids: Vec<Uuid> = ids.into_iter().collect();

    // Try full UUID first.
    if let Ok(id) = reference.parse::<Uuid>() {
        return if ids.contains(&id) {
            Ok(id)
        } else {
            Err(format!("{kind} not found: {id}"))
        };
    }

    let prefix = reference.to_ascii_lowercase();
    let matches: Vec<Uuid> = ids
        .into_iter()
        .filter(|id| id.to_string().starts_with(&prefix))
        .collect();

    match matches.as_slice() {
        [] => Err(format!("no {kind} matching '{reference}'")),
        [id] => Ok(*id),
        many => {
            let shown: Vec<String> = many.iter().map(|id| format::short_id(*id)).collect();
            Err(format!(
                "'{reference}' is ambiguous: matches {} {kind}s: {}",
                many.len(),
                shown.join(", ")
            ))
        }
    }
}
