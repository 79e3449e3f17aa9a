use crate::core::config::AppConfig;
use crate::core::record::{Category, Record, TransactionType};
use crate::core::theme::Theme;
use chrono::{Datelike, Days, NaiveDate};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    TotalLabel,
    Positive,
    Negative,
    Error,
    Success,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::TotalLabel => style(text).bold(),
        StyleType::Positive => style(text).green().bold(),
        StyleType::Negative => style(text).red().bold(),
        StyleType::Error => style(text).red(),
        StyleType::Success => style(text).green(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Table colors for a theme.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub header: Color,
    pub income: Color,
    pub expense: Color,
}

impl From<Theme> for Palette {
    fn from(theme: Theme) -> Self {
        match theme {
            Theme::Light => Palette {
                header: Color::Blue,
                income: Color::DarkGreen,
                expense: Color::DarkRed,
            },
            Theme::Dark => Palette {
                header: Color::Cyan,
                income: Color::Green,
                expense: Color::Red,
            },
        }
    }
}

/// Everything the renderers need besides the data itself.
#[derive(Debug, Clone)]
pub struct View {
    pub currency_symbol: String,
    pub palette: Palette,
    pub today: NaiveDate,
}

impl View {
    pub fn new(config: &AppConfig, theme: Theme, today: NaiveDate) -> Self {
        Self {
            currency_symbol: config.currency_symbol.clone(),
            palette: theme.into(),
            today,
        }
    }

    pub fn currency(&self, amount: f64) -> String {
        format_currency(amount, &self.currency_symbol)
    }

    pub fn kind_color(&self, kind: TransactionType) -> Color {
        match kind {
            TransactionType::Income => self.palette.income,
            TransactionType::Expense => self.palette.expense,
        }
    }

    /// Creates a styled header cell for a table.
    pub fn header_cell(&self, text: &str) -> Cell {
        Cell::new(text)
            .fg(self.palette.header)
            .add_attribute(Attribute::Bold)
    }

    /// Signed, colored amount of a record.
    pub fn amount_cell(&self, record: &Record) -> Cell {
        Cell::new(format!(
            "{}{}",
            record.kind.sign(),
            self.currency(record.amount)
        ))
        .fg(self.kind_color(record.kind))
        .set_alignment(CellAlignment::Right)
    }

    /// Cell for a plain total, right aligned.
    pub fn money_cell(&self, amount: f64) -> Cell {
        Cell::new(self.currency(amount)).set_alignment(CellAlignment::Right)
    }
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Formats an amount as en-US currency, e.g. `$1,234.50` or `-$4.50`.
pub fn format_currency(amount: f64, symbol: &str) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    // -0.001 rounds to 0.00 and should not carry a sign
    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{symbol}{grouped}.{cents}")
}

/// Category label with its emoji, e.g. `🍔 Food`.
pub fn format_category(category: Category) -> String {
    let (name, emoji) = category.display_info();
    format!("{emoji} {name}")
}

/// Relative date label: `Today`, `Yesterday`, `Mar 5`, or `Mar 5, 2023`
/// for other years.
pub fn format_date(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        return "Today".to_string();
    }
    if today.checked_sub_days(Days::new(1)) == Some(date) {
        return "Yesterday".to_string();
    }
    if date.year() == today.year() {
        date.format("%b %-d").to_string()
    } else {
        date.format("%b %-d, %Y").to_string()
    }
}

/// Prints a separator line matching the terminal width.
pub fn print_separator() {
    let term_width = console::Term::stdout()
        .size_checked()
        .map(|(_, w)| w as usize)
        .unwrap_or(80);
    println!("\n{}", "─".repeat(term_width));
}
