//! Ledger record types and input validation.

use super::error::{LedgerError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Food,
    Transport,
    Entertainment,
    Shopping,
    Bills,
    Health,
    Salary,
    Freelance,
    Investment,
    /// Stored data with an unrecognised category is read back as `Other`.
    #[serde(other)]
    Other,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Food,
        Category::Transport,
        Category::Entertainment,
        Category::Shopping,
        Category::Bills,
        Category::Health,
        Category::Salary,
        Category::Freelance,
        Category::Investment,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "food",
            Category::Transport => "transport",
            Category::Entertainment => "entertainment",
            Category::Shopping => "shopping",
            Category::Bills => "bills",
            Category::Health => "health",
            Category::Salary => "salary",
            Category::Freelance => "freelance",
            Category::Investment => "investment",
            Category::Other => "other",
        }
    }

    /// Returns display name and emoji for the category
    pub fn display_info(&self) -> (&'static str, &'static str) {
        match self {
            Category::Food => ("Food", "🍔"),
            Category::Transport => ("Transport", "🚗"),
            Category::Entertainment => ("Entertainment", "🎬"),
            Category::Shopping => ("Shopping", "🛍️"),
            Category::Bills => ("Bills", "💡"),
            Category::Health => ("Health", "🏥"),
            Category::Salary => ("Salary", "💰"),
            Category::Freelance => ("Freelance", "💻"),
            Category::Investment => ("Investment", "📈"),
            Category::Other => ("Other", "📝"),
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| LedgerError::ValidationFailed(format!("unknown category `{s}`")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }

    pub fn sign(&self) -> &'static str {
        match self {
            TransactionType::Income => "+",
            TransactionType::Expense => "-",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            _ => Err(LedgerError::ValidationFailed(format!(
                "unknown transaction type `{s}`"
            ))),
        }
    }
}

/// A single income or expense entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: u64,
    pub description: String,
    pub amount: f64,
    pub category: Category,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub date: NaiveDate,
    #[serde(rename = "timestamp", alias = "createdAt", default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Record {
    pub fn new(id: u64, fields: ValidFields, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            description: fields.description,
            amount: fields.amount,
            category: fields.category,
            kind: fields.kind,
            date: fields.date,
            created_at,
        }
    }

    /// Replaces every mutable field, keeping `id` and `created_at`.
    pub fn apply(&mut self, fields: ValidFields) {
        self.description = fields.description;
        self.amount = fields.amount;
        self.category = fields.category;
        self.kind = fields.kind;
        self.date = fields.date;
    }
}

/// Unvalidated user input for a record, as typed at the prompt.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFields {
    pub description: String,
    pub amount: String,
    pub category: String,
    /// Empty means expense.
    pub kind: String,
    pub date: String,
}

/// Fields that passed validation and are ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidFields {
    pub description: String,
    pub amount: f64,
    pub category: Category,
    pub kind: TransactionType,
    pub date: NaiveDate,
}

impl RecordFields {
    pub fn validate(&self) -> Result<ValidFields> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err(missing("description"));
        }

        let amount = self.amount.trim();
        if amount.is_empty() {
            return Err(missing("amount"));
        }
        let amount = match amount.parse::<f64>() {
            Ok(a) if a.is_finite() && a != 0.0 => a.abs(),
            _ => {
                return Err(LedgerError::ValidationFailed(format!(
                    "amount `{amount}` is not a non-zero number"
                )));
            }
        };

        if self.category.trim().is_empty() {
            return Err(missing("category"));
        }
        let category = self.category.parse::<Category>()?;

        let kind = if self.kind.trim().is_empty() {
            TransactionType::Expense
        } else {
            self.kind.parse::<TransactionType>()?
        };

        let date = self.date.trim();
        if date.is_empty() {
            return Err(missing("date"));
        }
        let date = NaiveDate::parse_from_str(date, DATE_FORMAT).map_err(|_| {
            LedgerError::ValidationFailed(format!("date `{date}` is not in YYYY-MM-DD format"))
        })?;

        Ok(ValidFields {
            description: description.to_string(),
            amount,
            category,
            kind,
            date,
        })
    }
}

impl From<&Record> for RecordFields {
    fn from(record: &Record) -> Self {
        Self {
            description: record.description.clone(),
            amount: record.amount.to_string(),
            category: record.category.to_string(),
            kind: record.kind.to_string(),
            date: record.date.format(DATE_FORMAT).to_string(),
        }
    }
}

fn missing(field: &str) -> LedgerError {
    LedgerError::ValidationFailed(format!("{field} is required"))
}

/// Issues record ids from the creation time in milliseconds, bumped past
/// the last issued or observed id so ids stay unique under rapid inserts.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: u64,
}

impl IdGenerator {
    pub fn starting_after(records: &[Record]) -> Self {
        Self {
            last: records.iter().map(|r| r.id).max().unwrap_or(0),
        }
    }

    /// Marks `id` as taken.
    pub fn observe(&mut self, id: u64) {
        self.last = self.last.max(id);
    }

    pub fn next_id(&mut self, now: DateTime<Utc>) -> u64 {
        let millis = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        let id = millis.max(self.last.saturating_add(1));
        self.last = id;
        id
    }
}
