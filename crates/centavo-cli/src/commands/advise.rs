//! Advice command implementation

use anyhow::Result;
use centavo_core::{AIBackend, Advisor, PersistenceSlot, TransactionStore};
use tracing::info;

/// Ask the advisor about the current history and print the answer
pub async fn cmd_advise<S, B>(store: &TransactionStore<S>, advisor: &Advisor<B>) -> Result<()>
where
    S: PersistenceSlot,
    B: AIBackend,
{
    info!(
        model = advisor.backend().model(),
        transactions = store.len(),
        "Analyzing transactions"
    );

    match advisor.request_advice_exclusive(store.transactions()).await {
        Some(text) => {
            println!();
            println!("{}", text.trim_end());
            println!();
        }
        None => println!("An analysis is already in progress."),
    }

    Ok(())
}

/// Report whether the configured backend answers, without sending a prompt
///
/// Returns the reachability so callers can act on it.
pub async fn cmd_advise_check<B: AIBackend>(backend: &B) -> Result<bool> {
    println!("Model: {}", backend.model());
    println!("Host:  {}", backend.host());
    print!("Checking AI backend availability... ");

    let reachable = backend.health_check().await;
    if reachable {
        println!("✅ Connected");
    } else {
        println!("❌ Failed");
        println!();
        println!("⚠️  Could not reach {} at {}", backend.model(), backend.host());
        println!("   Check AI_BACKEND, AI_HOST and API_KEY (or the [ai] section of config.toml).");
    }

    Ok(reachable)
}
