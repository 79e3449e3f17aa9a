use super::ui::{self, View};
use crate::core::filter::{self, TypeFilter};
use crate::core::record::Record;
use crate::core::RecordStore;
use anyhow::Result;
use comfy_table::Cell;

/// Renders the selected records, or an empty-state message.
pub fn render(records: &[&Record], search: &str, view: &View) -> String {
    if records.is_empty() {
        let hint = if search.is_empty() {
            "Add your first transaction to get started"
        } else {
            "Try adjusting your search"
        };
        return format!(
            "{}\n{}",
            ui::style_text("No transactions found", ui::StyleType::TotalLabel),
            ui::style_text(hint, ui::StyleType::Subtle)
        );
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        view.header_cell("Date"),
        view.header_cell("Category"),
        view.header_cell("Description"),
        view.header_cell("Amount"),
        view.header_cell("Id"),
    ]);

    for record in records {
        table.add_row(vec![
            Cell::new(ui::format_date(record.date, view.today)),
            Cell::new(ui::format_category(record.category)),
            Cell::new(&record.description),
            view.amount_cell(record),
            Cell::new(ui::style_text(&record.id.to_string(), ui::StyleType::Subtle)),
        ]);
    }

    table.to_string()
}

pub fn run(store: &RecordStore, type_filter: TypeFilter, search: &str, view: &View) -> Result<()> {
    let selected = filter::select(store.records(), type_filter, search);
    println!(
        "\n{} ({})\n",
        ui::style_text("Transactions", ui::StyleType::Title),
        type_filter
    );
    println!("{}", render(&selected, search, view));
    Ok(())
}
