//! Provides functions for computing totals and rankings over ledger records.
use crate::core::record::{Category, Record, TransactionType};
use std::cmp::Ordering;

/// How many categories the expense ranking keeps.
pub const CATEGORY_RANKING_LIMIT: usize = 6;

/// Running totals over a set of records.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub income: f64,
    pub expenses: f64,
    /// `income - expenses`, may be negative.
    pub balance: f64,
}

/// Total expense amount for one category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryTotal {
    pub category: Category,
    pub total: f64,
}

pub fn totals(records: &[Record]) -> Totals {
    let sum_of = |kind: TransactionType| -> f64 {
        records
            .iter()
            .filter(|r| r.kind == kind)
            .map(|r| r.amount)
            .sum()
    };

    let income = sum_of(TransactionType::Income);
    let expenses = sum_of(TransactionType::Expense);
    Totals {
        income,
        expenses,
        balance: income - expenses,
    }
}

/// Ranks expense categories by total, highest first.
///
/// Categories are grouped in order of first appearance and the sort is
/// stable, so equal totals keep that order. Categories without a positive
/// total are left out and at most [`CATEGORY_RANKING_LIMIT`] are returned.
pub fn category_ranking(records: &[Record]) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    for record in records.iter().filter(|r| r.kind == TransactionType::Expense) {
        match totals.iter_mut().find(|t| t.category == record.category) {
            Some(entry) => entry.total += record.amount,
            None => totals.push(CategoryTotal {
                category: record.category,
                total: record.amount,
            }),
        }
    }

    totals.retain(|t| t.total > 0.0);
    totals.sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap_or(Ordering::Equal));
    totals.truncate(CATEGORY_RANKING_LIMIT);
    totals
}
