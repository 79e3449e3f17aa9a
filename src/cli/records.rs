use super::ui::{self, View};
use crate::core::record::{Record, RecordFields};
use crate::core::{LedgerError, RecordStore};
use anyhow::{Result, bail};

/// Fields given to `edit`; anything left out keeps its current value.
#[derive(Debug, Clone, Default)]
pub struct RecordChanges {
    pub description: Option<String>,
    pub amount: Option<String>,
    pub category: Option<String>,
    pub kind: Option<String>,
    pub date: Option<String>,
}

impl RecordChanges {
    pub fn apply_to(self, record: &Record) -> RecordFields {
        let current = RecordFields::from(record);
        RecordFields {
            description: self.description.unwrap_or(current.description),
            amount: self.amount.unwrap_or(current.amount),
            category: self.category.unwrap_or(current.category),
            kind: self.kind.unwrap_or(current.kind),
            date: self.date.unwrap_or(current.date),
        }
    }
}

fn describe(record: &Record, view: &View) -> String {
    format!(
        "{} {}{} ({}, {})",
        record.description,
        record.kind.sign(),
        view.currency(record.amount),
        ui::format_category(record.category),
        ui::format_date(record.date, view.today),
    )
}

pub fn add(store: &mut RecordStore, fields: &RecordFields, view: &View) -> Result<()> {
    let record = store.add(fields)?;
    println!(
        "{} {}",
        ui::style_text("Transaction added:", ui::StyleType::Success),
        describe(&record, view)
    );
    println!("Id: {}", record.id);
    Ok(())
}

pub fn edit(store: &mut RecordStore, id: u64, changes: RecordChanges, view: &View) -> Result<()> {
    let current = store.get(id).ok_or(LedgerError::NotFound(id))?;
    let fields = changes.apply_to(current);

    let record = store.update(id, &fields)?;
    println!(
        "{} {}",
        ui::style_text("Transaction updated:", ui::StyleType::Success),
        describe(&record, view)
    );
    Ok(())
}

pub fn delete(store: &mut RecordStore, id: u64) -> Result<()> {
    store.remove(id)?;
    println!(
        "{}",
        ui::style_text("Transaction deleted successfully!", ui::StyleType::Success)
    );
    Ok(())
}

pub fn clear(store: &mut RecordStore, confirmed: bool) -> Result<()> {
    if !confirmed {
        bail!(
            "Refusing to delete {} transactions without --yes; this action cannot be undone",
            store.len()
        );
    }
    store.clear();
    println!(
        "{}",
        ui::style_text("All transactions cleared!", ui::StyleType::Success)
    );
    Ok(())
}

pub fn seed_demo(store: &mut RecordStore, view: &View) -> Result<()> {
    if store.seed_demo(view.today) {
        println!(
            "{}",
            ui::style_text("Added demo transactions", ui::StyleType::Success)
        );
    } else {
        println!("Ledger already has transactions, demo data not added.");
    }
    Ok(())
}
