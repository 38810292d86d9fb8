//! Service log commands: list, show, edit, delete, filter, export.

use std::path::PathBuf;
use std::time::Instant;

use clap::{Args, Subcommand, ValueEnum};
use uuid::Uuid;

use crate::form::{FormSession, SubmitError};
use crate::model::ServiceType;
use crate::selectors::{self, Selectors};
use crate::store::AppStore;
use crate::{dates, export};

use super::fields::{FieldArgs, TypeArg};
use super::format::{LOG_HEADER, format_criteria, format_log_count, format_log_row, short_id};
use super::resolve_id;

#[derive(Debug, Subcommand)]
pub enum LogCommand {
    /// List service logs passing the saved search and filters.
    List,

    /// Print a service log as JSON.
    Show {
        /// Log ID: full UUID or unambiguous prefix.
        log: String,
    },

    /// Edit fields of a service log. All fields are validated again.
    Edit {
        /// Log ID: full UUID or unambiguous prefix.
        log: String,

        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Delete a service log.
    Delete {
        /// Log ID: full UUID or unambiguous prefix.
        log: String,
    },

    /// Set the search text and filters used by `list` and `export`.
    ///
    /// Filters persist between commands. With no flags, prints the
    /// current filters.
    Filter(FilterArgs),

    /// Export the filtered logs as JSON.
    ///
    /// Writes `service-logs-<YYYY-MM-DD>.json`, dated in UTC, in the current directory
    /// unless `--out` is given. `--out -` writes to stdout.
    Export {
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Debug, Args)]
pub struct FilterArgs {
    /// Case-insensitive text matched against provider, order, car,
    /// description, and type. An empty string clears it.
    #[arg(long)]
    search: Option<String>,

    /// Earliest start date to show (`YYYY-MM-DD`, inclusive).
    #[arg(long)]
    from: Option<String>,

    /// Latest start date to show (`YYYY-MM-DD`, inclusive).
    #[arg(long)]
    to: Option<String>,

    /// Drop both date bounds.
    #[arg(long, conflicts_with_all = ["from", "to"])]
    any_date: bool,

    /// Only show one service type, or `any`.
    #[arg(long = "type", value_enum)]
    service_type: Option<TypeFilterArg>,

    /// Reset search and every filter.
    #[arg(long, conflicts_with_all = ["search", "from", "to", "any_date", "service_type"])]
    clear: bool,
}

/// CLI-facing type filter: a service type or no restriction.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TypeFilterArg {
    Any,
    Planned,
    Unplanned,
    Emergency,
}

impl TypeFilterArg {
    fn to_domain(self) -> Option<ServiceType> {
        match self {
            Self::Any => None,
            Self::Planned => Some(TypeArg::Planned.to_domain()),
            Self::Unplanned => Some(TypeArg::Unplanned.to_domain()),
            Self::Emergency => Some(TypeArg::Emergency.to_domain()),
        }
    }
}

pub(super) fn run(command: LogCommand, store: &mut AppStore) -> Result<(), String> {
    match command {
        LogCommand::List => cmd_list(store),
        LogCommand::Show { log } => {
            let id = resolve_log(store, &log)?;
            let log = store.service_logs().get(id).ok_or("log vanished")?;
            let json = serde_json::to_string_pretty(log)
                .map_err(|e| format!("failed to serialize log: {e}"))?;
            println!("{json}");
            Ok(())
        }
        LogCommand::Edit { log, fields } => cmd_edit(store, &log, fields),
        LogCommand::Delete { log } => {
            let id = resolve_log(store, &log)?;
            store.delete_service_log(id);
            eprintln!("Deleted log {}", short_id(id));
            Ok(())
        }
        LogCommand::Filter(args) => cmd_filter(store, args),
        LogCommand::Export { out } => cmd_export(store, out),
    }
}

fn resolve_log(store: &AppStore, reference: &str) -> Result<Uuid, String> {
    resolve_id(
        reference,
        store.service_logs().items.iter().map(|log| log.id),
        "log",
    )
}

fn cmd_list(store: &AppStore) -> Result<(), String> {
    let mut selectors = Selectors::new();
    let logs = selectors.filtered_logs(store);
    let total = selectors::log_count(store);

    println!("{}", format_log_count(logs.len(), total));
    let criteria = &store.service_logs().criteria;
    if criteria.is_active() {
        println!("Filters: {}", format_criteria(criteria));
    }

    if logs.is_empty() {
        if total == 0 {
            println!("No service logs yet. Create one from a draft.");
        } else {
            println!("No logs match your search or filters.");
        }
        return Ok(());
    }

    println!("{LOG_HEADER}");
    for log in logs {
        println!("{}", format_log_row(log));
    }
    Ok(())
}

fn cmd_edit(store: &mut AppStore, reference: &str, fields: FieldArgs) -> Result<(), String> {
    let updates = fields.into_updates();
    if updates.is_empty() {
        return Err("specify at least one field to change".to_string());
    }
    let id = resolve_log(store, reference)?;
    let log = store.service_logs().get(id).ok_or("log vanished")?.clone();

    let mut session = FormSession::edit(&log, |store, id, fields| {
        store.update_service_log(id, fields);
    });
    let now = Instant::now();
    for update in updates {
        session.set_field(update, store, now);
    }

    match session.submit(store) {
        Ok(_) => {
            eprintln!("Log {} updated", short_id(id));
            Ok(())
        }
        Err(SubmitError::Invalid(errors)) => {
            for (field, message) in errors.iter() {
                eprintln!("  {field}: {message}");
            }
            Err(format!("log not updated: {} invalid field(s)", errors.len()))
        }
        Err(e) => Err(e.to_string()),
    }
}

fn cmd_filter(store: &mut AppStore, args: FilterArgs) -> Result<(), String> {
    if args.clear {
        store.clear_filters();
    } else {
        for date in [&args.from, &args.to].into_iter().flatten() {
            dates::parse(date).map_err(|e| e.to_string())?;
        }

        if let Some(query) = args.search {
            store.set_search_query(query);
        }
        if args.any_date {
            store.set_date_range_filter(None, None);
        } else if args.from.is_some() || args.to.is_some() {
            let current = store.service_logs().criteria.date_range.clone();
            store.set_date_range_filter(args.from.or(current.from), args.to.or(current.to));
        }
        if let Some(ty) = args.service_type {
            store.set_type_filter(ty.to_domain());
        }
    }

    println!("{}", format_criteria(&store.service_logs().criteria));
    Ok(())
}

fn cmd_export(store: &AppStore, out: Option<PathBuf>) -> Result<(), String> {
    let mut selectors = Selectors::new();
    let logs = selectors.filtered_logs(store);

    match out {
        Some(path) if path.as_os_str() == "-" => {
            let json = export::to_json(logs).map_err(|e| e.to_string())?;
            println!("{json}");
        }
        out => {
            let path =
                out.unwrap_or_else(|| PathBuf::from(export::default_file_name(&store.now())));
            let count = export::write(logs, &path).map_err(|e| e.to_string())?;
            eprintln!("Exported {count} log(s) → {}", path.display());
        }
    }
    Ok(())
}
