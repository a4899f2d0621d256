//! Category suggestions

use anyhow::Result;
use centavo_core::models::DEFAULT_CATEGORIES;

pub fn cmd_categories() -> Result<()> {
    println!();
    println!("🏷️  Suggested categories");
    println!("   ─────────────────────────────");
    for category in DEFAULT_CATEGORIES {
        println!("   {}", category);
    }
    println!();
    println!("   Any other name works too: categories are free text.");

    Ok(())
}
