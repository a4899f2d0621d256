//! Centavo CLI - Personal finance tracker
//!
//! Usage:
//!   centavo add -d Aluguel -a 1500 -t expense -c Moradia
//!   centavo list --limit 10
//!   centavo dashboard
//!   centavo advise

mod cli;
mod commands;
mod format;

#[cfg(test)]
mod tests;

use anyhow::Result;
use centavo_core::{AIClient, Advisor};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Add {
            description,
            amount,
            kind,
            category,
            date,
        } => {
            let mut store = commands::open_store(&config, cli.data_file.as_deref())?;
            commands::cmd_add(
                &mut store,
                &description,
                amount,
                &kind,
                &category,
                date.as_deref(),
            )
        }
        Commands::Delete { id } => {
            let mut store = commands::open_store(&config, cli.data_file.as_deref())?;
            commands::cmd_delete(&mut store, &id)
        }
        Commands::List { limit } => {
            let store = commands::open_store(&config, cli.data_file.as_deref())?;
            commands::cmd_list(&store, limit)
        }
        Commands::Dashboard { json } => {
            let store = commands::open_store(&config, cli.data_file.as_deref())?;
            commands::cmd_dashboard(&store, json)
        }
        Commands::Advise { check: true } => {
            let client = AIClient::from_config(&config.ai);
            commands::cmd_advise_check(&client).await.map(|_| ())
        }
        Commands::Advise { check: false } => {
            let store = commands::open_store(&config, cli.data_file.as_deref())?;
            let advisor = Advisor::new(AIClient::from_config(&config.ai));
            commands::cmd_advise(&store, &advisor).await
        }
        Commands::Categories => commands::cmd_categories(),
    }
}
