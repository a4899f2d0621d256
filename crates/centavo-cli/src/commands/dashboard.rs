//! Dashboard command implementation

use anyhow::Result;
use centavo_core::{AggregateStats, PersistenceSlot, TransactionStore};
use serde_json::json;

use crate::format::format_brl;

/// Dashboard payload for `--json` output
pub fn dashboard_json(stats: &AggregateStats) -> serde_json::Value {
    json!({
        "total_income": stats.total_income,
        "total_expense": stats.total_expense,
        "balance": stats.balance,
        "percentage_spent": stats.percentage_spent(),
        "category_breakdown": stats
            .category_breakdown
            .iter()
            .map(|c| json!({
                "name": c.name,
                "value": c.value,
                "color_index": c.color_index,
                "color": c.color(),
            }))
            .collect::<Vec<_>>(),
    })
}

pub fn cmd_dashboard<S: PersistenceSlot>(store: &TransactionStore<S>, json: bool) -> Result<()> {
    let stats = store.stats();

    if json {
        println!("{}", serde_json::to_string_pretty(&dashboard_json(&stats))?);
        return Ok(());
    }

    println!();
    println!("╭─────────────────────────────────────────╮");
    println!("│          💰 Centavo Dashboard           │");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  Transactions:    {}", store.len());
    println!();
    println!("  📈 Receitas:     {}", format_brl(stats.total_income));
    println!("  📉 Despesas:     {}", format_brl(stats.total_expense));
    println!("     {:.1}% da receita gasta", stats.percentage_spent());
    if stats.balance < 0.0 {
        println!("  ⚖️  Saldo:        \x1b[31m{}\x1b[0m", format_brl(stats.balance));
    } else {
        println!("  ⚖️  Saldo:        \x1b[32m{}\x1b[0m", format_brl(stats.balance));
    }
    println!();

    if stats.category_breakdown.is_empty() {
        println!("  No expenses recorded yet.");
        return Ok(());
    }

    println!("  🏷️  Despesas por categoria");
    println!("     ─────────────────────────────────────");
    for category in &stats.category_breakdown {
        let share = if stats.total_expense > 0.0 {
            category.value / stats.total_expense * 100.0
        } else {
            0.0
        };
        println!(
            "     {} {:<16} {:>14}  {:>5.1}%",
            category.color(),
            category.name,
            format_brl(category.value),
            share
        );
    }
    println!();

    Ok(())
}
