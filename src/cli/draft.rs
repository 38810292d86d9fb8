//! Draft commands: new, list, show, select, set, submit, delete, clear.

use std::time::Instant;

use clap::Subcommand;

use crate::config::Config;
use crate::form::{FieldUpdate, FormSession, FormState, SubmitError, Submitted};
use crate::selectors::{self, Selectors};
use crate::store::AppStore;

use super::fields::FieldArgs;
use super::format::{format_draft_row, short_id};
use super::resolve_id;

#[derive(Debug, Subcommand)]
pub enum DraftCommand {
    /// Create a blank draft and make it active. Prints the draft ID.
    New,

    /// List drafts, most recently edited first. `*` marks the active draft.
    List,

    /// Print a draft as JSON. Defaults to the active draft.
    Show {
        /// Draft ID: full UUID or unambiguous prefix.
        draft: Option<String>,
    },

    /// Make a draft the active one.
    Select {
        /// Draft ID: full UUID or unambiguous prefix.
        draft: String,
    },

    /// Edit fields of the active draft. Changes are auto-saved.
    Set {
        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Validate the active draft and turn it into a service log.
    ///
    /// The draft is discarded on success. On failure each invalid field is
    /// reported and nothing changes.
    Submit,

    /// Delete a draft.
    Delete {
        /// Draft ID: full UUID or unambiguous prefix.
        draft: String,
    },

    /// Delete every draft.
    Clear,
}

pub(super) fn run(command: DraftCommand, config: &Config, store: &mut AppStore) -> Result<(), String> {
    match command {
        DraftCommand::New => cmd_new(store),
        DraftCommand::List => cmd_list(store),
        DraftCommand::Show { draft } => cmd_show(store, draft.as_deref()),
        DraftCommand::Select { draft } => {
            let id = resolve_draft(store, &draft)?;
            store.set_active_draft(id);
            eprintln!("Active draft: {}", short_id(id));
            Ok(())
        }
        DraftCommand::Set { fields } => cmd_set(config, store, fields),
        DraftCommand::Submit => cmd_submit(config, store),
        DraftCommand::Delete { draft } => {
            let id = resolve_draft(store, &draft)?;
            store.delete_draft(id);
            eprintln!("Deleted draft {}", short_id(id));
            if let Some(active) = store.drafts().active_draft_id {
                eprintln!("Active draft: {}", short_id(active));
            }
            Ok(())
        }
        DraftCommand::Clear => {
            let count = selectors::draft_count(store);
            store.clear_all_drafts();
            eprintln!("Deleted {count} draft(s)");
            Ok(())
        }
    }
}

fn resolve_draft(store: &AppStore, reference: &str) -> Result<uuid::Uuid, String> {
    resolve_id(reference, store.drafts().items.keys().copied(), "draft")
}

fn cmd_new(store: &mut AppStore) -> Result<(), String> {
    let id = store.create_draft();
    println!("{id}");
    Ok(())
}

fn cmd_list(store: &AppStore) -> Result<(), String> {
    let mut selectors = Selectors::new();
    let drafts = selectors.drafts_sorted(store);

    if drafts.is_empty() {
        println!("No drafts");
        return Ok(());
    }

    let active = store.drafts().active_draft_id;
    let now = store.now();
    for d in drafts {
        println!("{}", format_draft_row(d, active == Some(d.id), &now));
    }
    Ok(())
}

fn cmd_show(store: &AppStore, reference: Option<&str>) -> Result<(), String> {
    let draft = match reference {
        Some(r) => {
            let id = resolve_draft(store, r)?;
            &store.drafts().items[&id]
        }
        None => selectors::active_draft(store).ok_or("no active draft")?,
    };
    let json = serde_json::to_string_pretty(draft)
        .map_err(|e| format!("failed to serialize draft: {e}"))?;
    println!("{json}");
    Ok(())
}

/// Open a form session on the active draft.
fn open_session(config: &Config, store: &AppStore) -> Result<FormSession, String> {
    let mut session = FormSession::draft(config.autosave_delay());
    session.sync_active_draft(store);
    if session.state() == FormState::Disabled {
        return Err("no active draft: create one with `servicelog draft new`".to_string());
    }
    Ok(session)
}

fn cmd_set(config: &Config, store: &mut AppStore, fields: FieldArgs) -> Result<(), String> {
    let updates = fields.into_updates();
    if updates.is_empty() {
        return Err("specify at least one field to set".to_string());
    }

    let moves_end = updates
        .iter()
        .any(|u| matches!(u, FieldUpdate::StartDate(_)))
        && !updates.iter().any(|u| matches!(u, FieldUpdate::EndDate(_)));

    let mut session = open_session(config, store)?;
    let now = Instant::now();
    for update in updates {
        tracing::debug!(field = %update.field(), "set field");
        session.set_field(update, store, now);
    }
    if moves_end && let Some(values) = session.values() {
        eprintln!("End date moved to {}", values.end_date);
    }
    // The process ends here, so commit instead of waiting out the debounce.
    session.flush(store);

    if let Some(id) = session.bound_draft() {
        eprintln!("Draft {} saved", short_id(id));
    }
    Ok(())
}

fn cmd_submit(config: &Config, store: &mut AppStore) -> Result<(), String> {
    let mut session = open_session(config, store)?;

    match session.submit(store) {
        Ok(Submitted::Promoted { draft_id, log_id }) => {
            eprintln!("Draft {} submitted", short_id(draft_id));
            println!("{log_id}");
            Ok(())
        }
        Ok(Submitted::Edited { .. }) | Err(SubmitError::Disabled) => {
            Err("no active draft".to_string())
        }
        Err(SubmitError::Invalid(_)) => {
            let errors = session.errors();
            for (field, message) in errors.iter() {
                eprintln!("  {field}: {message}");
            }
            Err(format!("draft has {} invalid field(s)", errors.len()))
        }
    }
}
