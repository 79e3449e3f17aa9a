pub mod cli;
pub mod core;
pub mod store;

use crate::cli::records::RecordChanges;
use crate::cli::theme::ThemeAction;
use crate::cli::ui::{self, View};
use crate::core::config::AppConfig;
use crate::core::{RecordFields, RecordStore, TypeFilter, theme};
use anyhow::Result;
use chrono::Local;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    Add(RecordFields),
    Edit { id: u64, changes: RecordChanges },
    Delete { id: u64 },
    Clear { confirmed: bool },
    List { filter: TypeFilter, search: String },
    Summary,
    Import { path: PathBuf },
    Export { path: PathBuf },
    Theme(ThemeAction),
    Demo,
}

pub fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Expense tracker starting...");

    let config = AppConfig::load_or_default(config_path)?;
    debug!("Loaded config: {config:#?}");

    let opened = store::open_or_fallback(&config);
    if let Some(reason) = &opened.fallback_reason {
        eprintln!(
            "{} {reason}",
            ui::style_text(
                "Storage unavailable, changes will not be saved:",
                ui::StyleType::Error
            )
        );
    }
    let backend = opened.backend;

    let view = View::new(
        &config,
        theme::load(backend.as_ref()),
        Local::now().date_naive(),
    );
    let mut store = RecordStore::load(Arc::clone(&backend));

    let result = match command {
        AppCommand::Add(fields) => cli::records::add(&mut store, &fields, &view),
        AppCommand::Edit { id, changes } => cli::records::edit(&mut store, id, changes, &view),
        AppCommand::Delete { id } => cli::records::delete(&mut store, id),
        AppCommand::Clear { confirmed } => cli::records::clear(&mut store, confirmed),
        AppCommand::List { filter, search } => cli::list::run(&store, filter, &search, &view),
        AppCommand::Summary => cli::summary::run(&store, &view),
        AppCommand::Import { path } => cli::transfer::import(&mut store, &path),
        AppCommand::Export { path } => cli::transfer::export(&store, &path),
        AppCommand::Theme(action) => cli::theme::run(backend.as_ref(), action),
        AppCommand::Demo => cli::records::seed_demo(&mut store, &view),
    };

    // Only warn when the fallback notice above has not already said so.
    if opened.fallback_reason.is_none() && !store.is_durable() {
        let reason = store
            .persistence_error()
            .map(ToString::to_string)
            .unwrap_or_default();
        eprintln!(
            "{}",
            ui::style_text(&format!("Warning: {reason}"), ui::StyleType::Error)
        );
    }
    result
}
