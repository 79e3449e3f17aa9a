use super::ui::{self, View};
use crate::core::analytics::{self, CategoryTotal, Totals};
use crate::core::RecordStore;
use anyhow::Result;
use comfy_table::Cell;

/// Income, expenses and balance, the balance colored by sign.
pub fn render_totals(totals: &Totals, view: &View) -> String {
    let balance_style = if totals.balance >= 0.0 {
        ui::StyleType::Positive
    } else {
        ui::StyleType::Negative
    };

    format!(
        "{}  {}\n{}  {}\n{}  {}",
        ui::style_text("Income:  ", ui::StyleType::TotalLabel),
        view.currency(totals.income),
        ui::style_text("Expenses:", ui::StyleType::TotalLabel),
        view.currency(totals.expenses),
        ui::style_text("Balance: ", ui::StyleType::TotalLabel),
        ui::style_text(&view.currency(totals.balance), balance_style),
    )
}

pub fn render_ranking(ranking: &[CategoryTotal], view: &View) -> String {
    if ranking.is_empty() {
        return ui::style_text("No expense data available", ui::StyleType::Subtle);
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        view.header_cell("Category"),
        view.header_cell("Spent"),
    ]);
    for entry in ranking {
        table.add_row(vec![
            Cell::new(ui::format_category(entry.category)),
            view.money_cell(entry.total),
        ]);
    }
    table.to_string()
}

pub fn run(store: &RecordStore, view: &View) -> Result<()> {
    let totals = analytics::totals(store.records());
    let ranking = analytics::category_ranking(store.records());

    println!(
        "\n{}\n",
        ui::style_text("Summary", ui::StyleType::Title)
    );
    println!("{}", render_totals(&totals, view));
    ui::print_separator();
    println!(
        "\n{}\n",
        ui::style_text("Top expense categories", ui::StyleType::Title)
    );
    println!("{}", render_ranking(&ranking, view));
    Ok(())
}
