//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Centavo - Track income and expenses, get spending advice
#[derive(Parser)]
#[command(name = "centavo")]
#[command(about = "Personal finance tracker with AI spending advice", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Transaction file (overrides config and CENTAVO_DATA_FILE)
    #[arg(long, global = true)]
    pub data_file: Option<PathBuf>,

    /// Config file (defaults to ~/.config/centavo/config.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record a new transaction
    Add {
        /// What the money was for
        #[arg(short, long)]
        description: String,

        /// Amount (non-negative)
        #[arg(short, long)]
        amount: f64,

        /// Transaction type: income or expense (receita/despesa also accepted)
        #[arg(short = 't', long = "type", default_value = "expense")]
        kind: String,

        /// Category (see `centavo categories` for suggestions)
        #[arg(short, long)]
        category: String,

        /// Date in YYYY-MM-DD format (defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Delete a transaction by id
    Delete {
        /// Transaction id (as shown by `centavo list`)
        id: String,
    },

    /// List transactions, newest first
    List {
        /// Maximum number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show totals and spending by category
    Dashboard {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Ask the AI backend for a review of your finances
    Advise {
        /// Only check that the configured backend is reachable
        #[arg(long)]
        check: bool,
    },

    /// Show suggested categories
    Categories,
}
