//! Transaction command implementations

use anyhow::{bail, Context, Result};
use centavo_core::{NewTransaction, PersistenceSlot, Transaction, TransactionStore, TransactionType};
use chrono::{Local, NaiveDate};

use super::truncate;
use crate::format::{format_brl, format_date};

/// Validate user input into a transaction to record
pub fn parse_new_transaction(
    description: &str,
    amount: f64,
    kind: &str,
    category: &str,
    date: Option<&str>,
) -> Result<NewTransaction> {
    let description = description.trim();
    if description.is_empty() {
        bail!("Description is required");
    }
    let category = category.trim();
    if category.is_empty() {
        bail!("Category is required");
    }
    if !amount.is_finite() || amount < 0.0 {
        bail!("Amount must be a non-negative number, got {}", amount);
    }
    let kind: TransactionType = kind
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;
    let date = match date {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))?,
        None => Local::now().date_naive(),
    };

    Ok(NewTransaction::new(description, amount, kind, category, date))
}

pub fn cmd_add<S: PersistenceSlot>(
    store: &mut TransactionStore<S>,
    description: &str,
    amount: f64,
    kind: &str,
    category: &str,
    date: Option<&str>,
) -> Result<()> {
    let new = parse_new_transaction(description, amount, kind, category, date)?;
    let tx = store.add(new);

    println!("✅ Recorded {}:", tx.kind.label().to_lowercase());
    println!(
        "   {} │ {}{} │ {} ({})",
        format_date(tx.date),
        tx.kind.sign(),
        format_brl(tx.amount),
        truncate(&tx.description, 40),
        tx.category
    );
    println!("   id: {}", tx.id);

    Ok(())
}

pub fn cmd_delete<S: PersistenceSlot>(store: &mut TransactionStore<S>, id: &str) -> Result<()> {
    let existing = store.get(id).cloned();

    if !store.remove(id) {
        println!("No transaction with id {}.", id);
        return Ok(());
    }

    if let Some(tx) = existing {
        println!("🗑️  Deleted transaction {}:", id);
        println!(
            "   {} │ {} │ {}",
            format_date(tx.date),
            format_brl(tx.amount),
            truncate(&tx.description, 40)
        );
    }

    Ok(())
}

/// Transactions newest first; same-day entries keep insertion order
pub fn sorted_by_date_desc(transactions: &[Transaction]) -> Vec<&Transaction> {
    let mut sorted: Vec<&Transaction> = transactions.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted
}

pub fn cmd_list<S: PersistenceSlot>(store: &TransactionStore<S>, limit: usize) -> Result<()> {
    if store.is_empty() {
        println!("No transactions yet. Record one with:");
        println!("  centavo add -d Aluguel -a 1500 -t expense -c Moradia");
        return Ok(());
    }

    println!();
    println!("📝 Transactions ({} total)", store.len());
    println!("   ─────────────────────────────────────────────────────────────");

    for tx in sorted_by_date_desc(store.transactions()).into_iter().take(limit) {
        let amount_str = if tx.is_income() {
            format!("\x1b[32m+{}\x1b[0m", format_brl(tx.amount)) // Green for income
        } else {
            format!("\x1b[31m-{}\x1b[0m", format_brl(tx.amount)) // Red for expenses
        };

        println!(
            "   {} │ {:>14} │ {:<30} │ {}",
            format_date(tx.date),
            amount_str,
            truncate(&tx.description, 30),
            tx.category
        );
        println!("     id: {}", tx.id);
    }

    Ok(())
}
