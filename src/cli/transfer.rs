use super::ui;
use crate::core::RecordStore;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

/// Default file name offered for exports.
pub const DEFAULT_EXPORT_FILE: &str = "expense-tracker-data.json";

/// Replaces every transaction with the contents of a JSON export.
pub fn import(store: &mut RecordStore, path: &Path) -> Result<()> {
    let payload = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read import file: {}", path.display()))?;
    debug!("Importing {} bytes from {}", payload.len(), path.display());

    store
        .replace_all(&payload)
        .with_context(|| format!("Error importing {}, check the file format", path.display()))?;
    println!(
        "{} {} transactions loaded",
        ui::style_text("Data imported successfully!", ui::StyleType::Success),
        store.len()
    );
    Ok(())
}

pub fn export(store: &RecordStore, path: &Path) -> Result<()> {
    let data = store.export().context("Failed to serialize transactions")?;
    std::fs::write(path, data)
        .with_context(|| format!("Failed to write export file: {}", path.display()))?;
    println!(
        "{} {} transactions written to {}",
        ui::style_text("Data exported!", ui::StyleType::Success),
        store.len(),
        path.display()
    );
    Ok(())
}
