//! Statistics engine
//!
//! Derives totals and the per-category expense breakdown from a transaction
//! list. Results are recomputed from scratch on every call; nothing is cached.

use crate::models::{AggregateStats, CategoryStat, Transaction, TransactionType, PALETTE};

/// Compute aggregate statistics for a transaction list
///
/// Categories appear in the order they are first seen among expenses, and
/// each gets `color_index = position % PALETTE.len()`. Income categories are
/// ignored.
pub fn compute_stats(transactions: &[Transaction]) -> AggregateStats {
    let mut total_income = 0.0;
    let mut total_expense = 0.0;
    // (name, running sum) in first-seen order
    let mut category_sums: Vec<(&str, f64)> = Vec::new();

    for tx in transactions {
        match tx.kind {
            TransactionType::Income => total_income += tx.amount,
            TransactionType::Expense => {
                total_expense += tx.amount;
                match category_sums
                    .iter_mut()
                    .find(|(name, _)| *name == tx.category)
                {
                    Some((_, sum)) => *sum += tx.amount,
                    None => category_sums.push((tx.category.as_str(), tx.amount)),
                }
            }
        }
    }

    let category_breakdown = category_sums
        .into_iter()
        .enumerate()
        .map(|(index, (name, value))| CategoryStat {
            name: name.to_string(),
            value,
            color_index: index % PALETTE.len(),
        })
        .collect();

    AggregateStats {
        total_income,
        total_expense,
        balance: total_income - total_expense,
        category_breakdown,
    }
}
