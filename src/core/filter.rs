use crate::core::error::LedgerError;
use crate::core::record::{Record, TransactionType};
use std::fmt::Display;
use std::str::FromStr;

/// Which transaction types a listing shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    All,
    Only(TransactionType),
}

impl TypeFilter {
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Only(kind) => record.kind == *kind,
        }
    }
}

impl Display for TypeFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeFilter::All => write!(f, "all"),
            TypeFilter::Only(kind) => write!(f, "{kind}"),
        }
    }
}

impl FromStr for TypeFilter {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(TypeFilter::All);
        }
        s.parse::<TransactionType>().map(TypeFilter::Only)
    }
}

/// Selects the records to display, keeping the ledger's newest-first order.
///
/// A non-empty `search` keeps records whose description or category name
/// contains it, ignoring case.
pub fn select<'a>(records: &'a [Record], filter: TypeFilter, search: &str) -> Vec<&'a Record> {
    let needle = search.to_lowercase();
    records
        .iter()
        .filter(|r| filter.matches(r))
        .filter(|r| {
            needle.is_empty()
                || r.description.to_lowercase().contains(&needle)
                || r.category.as_str().contains(&needle)
        })
        .collect()
}
