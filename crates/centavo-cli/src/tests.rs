//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::path::Path;

use centavo_core::test_utils::{MockLlmServer, MockReply};
use centavo_core::{
    AIClient, Advisor, BackendKind, Config, FileSlot, MemorySlot, MockBackend, PromptLibrary,
    TransactionStore, TransactionType,
};
use clap::Parser;
use tempfile::TempDir;

use crate::cli::{Cli, Commands};
use crate::commands::{self, truncate};

fn memory_store() -> TransactionStore<MemorySlot> {
    TransactionStore::open(MemorySlot::new())
}

fn seeded_store() -> TransactionStore<MemorySlot> {
    let mut store = memory_store();
    commands::cmd_add(&mut store, "Salário", 5000.0, "income", "Salário", Some("2024-01-01")).unwrap();
    commands::cmd_add(&mut store, "Aluguel", 1500.0, "expense", "Moradia", Some("2024-01-05")).unwrap();
    commands::cmd_add(&mut store, "Mercado", 500.0, "despesa", "Alimentação", Some("2024-01-05")).unwrap();
    store
}

// ========== Add Command Tests ==========

#[test]
fn test_cmd_add_records_and_persists() {
    let mut store = memory_store();
    commands::cmd_add(&mut store, "  Aluguel ", 1500.0, "expense", " Moradia", Some("2024-01-05")).unwrap();

    assert_eq!(store.len(), 1);
    let tx = &store.transactions()[0];
    assert_eq!(tx.description, "Aluguel");
    assert_eq!(tx.category, "Moradia");
    assert_eq!(tx.kind, TransactionType::Expense);
    assert_eq!(tx.date.to_string(), "2024-01-05");
    assert_eq!(store.slot().write_count(), 1);
}

#[test]
fn test_cmd_add_defaults_to_today() {
    let mut store = memory_store();
    commands::cmd_add(&mut store, "Café", 8.0, "expense", "Alimentação", None).unwrap();
    assert_eq!(store.transactions()[0].date, chrono::Local::now().date_naive());
}

#[test]
fn test_cmd_add_rejects_missing_fields() {
    let mut store = memory_store();

    let err = commands::cmd_add(&mut store, "   ", 10.0, "expense", "Lazer", None).unwrap_err();
    assert!(err.to_string().contains("Description"));

    let err = commands::cmd_add(&mut store, "Cinema", 10.0, "expense", "", None).unwrap_err();
    assert!(err.to_string().contains("Category"));

    assert!(store.is_empty());
    assert_eq!(store.slot().write_count(), 0);
}

#[test]
fn test_cmd_add_rejects_bad_amount_type_and_date() {
    let mut store = memory_store();
    assert!(commands::cmd_add(&mut store, "X", -1.0, "expense", "Outros", None).is_err());
    assert!(commands::cmd_add(&mut store, "X", f64::NAN, "expense", "Outros", None).is_err());
    assert!(commands::cmd_add(&mut store, "X", 1.0, "transfer", "Outros", None).is_err());
    assert!(commands::cmd_add(&mut store, "X", 1.0, "expense", "Outros", Some("05/01/2024")).is_err());
    assert!(store.is_empty());
}

#[test]
fn test_cmd_add_accepts_zero_amount() {
    let mut store = memory_store();
    commands::cmd_add(&mut store, "Brinde", 0.0, "expense", "Lazer", Some("2024-03-01")).unwrap();
    assert_eq!(store.stats().category_breakdown[0].value, 0.0);
}

// ========== Delete Command Tests ==========

#[test]
fn test_cmd_delete_existing() {
    let mut store = seeded_store();
    let id = store.transactions()[1].id.clone();
    let writes = store.slot().write_count();

    commands::cmd_delete(&mut store, &id).unwrap();

    assert_eq!(store.len(), 2);
    assert!(store.get(&id).is_none());
    assert_eq!(store.slot().write_count(), writes + 1);
}

#[test]
fn test_cmd_delete_unknown_is_ok() {
    let mut store = seeded_store();
    assert!(commands::cmd_delete(&mut store, "nope").is_ok());
    assert_eq!(store.len(), 3);
}

// ========== List Command Tests ==========

#[test]
fn test_sorted_by_date_desc_is_stable() {
    let store = seeded_store();
    let sorted = commands::sorted_by_date_desc(store.transactions());
    let names: Vec<&str> = sorted.iter().map(|t| t.description.as_str()).collect();
    assert_eq!(names, vec!["Aluguel", "Mercado", "Salário"]);
}

#[test]
fn test_cmd_list() {
    assert!(commands::cmd_list(&memory_store(), 20).is_ok());
    assert!(commands::cmd_list(&seeded_store(), 1).is_ok());
}

// ========== Dashboard Command Tests ==========

#[test]
fn test_dashboard_json() {
    let stats = seeded_store().stats();
    let json = commands::dashboard_json(&stats);

    assert_eq!(json["total_income"], 5000.0);
    assert_eq!(json["total_expense"], 2000.0);
    assert_eq!(json["balance"], 3000.0);
    assert_eq!(json["percentage_spent"], 40.0);
    assert_eq!(json["category_breakdown"][0]["name"], "Moradia");
    assert_eq!(json["category_breakdown"][0]["color"], "#0088FE");
    assert_eq!(json["category_breakdown"][1]["name"], "Alimentação");
    assert_eq!(json["category_breakdown"][1]["color_index"], 1);
}

#[test]
fn test_cmd_dashboard() {
    assert!(commands::cmd_dashboard(&memory_store(), false).is_ok());
    assert!(commands::cmd_dashboard(&seeded_store(), false).is_ok());
    assert!(commands::cmd_dashboard(&seeded_store(), true).is_ok());
}

// ========== Advise Command Tests ==========

#[tokio::test]
async fn test_cmd_advise_with_mock_backend() {
    let store = seeded_store();
    let mock = MockBackend::with_response("Ótimo controle!");
    let advisor = Advisor::with_prompts(mock.clone(), PromptLibrary::embedded_only());

    commands::cmd_advise(&store, &advisor).await.unwrap();
    assert_eq!(mock.call_count(), 1);
    assert!(!advisor.is_busy());
}

#[tokio::test]
async fn test_cmd_advise_empty_store_skips_backend() {
    let mock = MockBackend::new();
    let advisor = Advisor::with_prompts(mock.clone(), PromptLibrary::embedded_only());

    commands::cmd_advise(&memory_store(), &advisor).await.unwrap();
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn test_cmd_advise_backend_failure_is_not_an_error() {
    let advisor = Advisor::with_prompts(MockBackend::failing("boom"), PromptLibrary::embedded_only());
    assert!(commands::cmd_advise(&seeded_store(), &advisor).await.is_ok());
}

#[tokio::test]
async fn test_cmd_advise_through_configured_client() {
    let server = MockLlmServer::start_with(MockReply::Text("Corte gastos com lazer.".into())).await;

    let mut config = Config::default();
    config.ai.backend = BackendKind::Gemini;
    config.ai.host = Some(server.url());
    config.ai.api_key = Some("test-key".into());

    let advisor = Advisor::with_prompts(
        AIClient::from_config(&config.ai),
        PromptLibrary::embedded_only(),
    );
    commands::cmd_advise(&seeded_store(), &advisor).await.unwrap();

    assert_eq!(server.request_count(), 1);
    assert_eq!(server.last_api_key().as_deref(), Some("test-key"));
    assert!(server.last_prompt().unwrap().contains("Aluguel (Moradia) - -1500"));
}

#[tokio::test]
async fn test_cmd_advise_check_reports_reachability() {
    let healthy = MockBackend::new();
    assert!(commands::cmd_advise_check(&healthy).await.unwrap());
    assert_eq!(healthy.call_count(), 0);

    let broken = MockBackend::failing("down");
    assert!(!commands::cmd_advise_check(&broken).await.unwrap());
}

#[tokio::test]
async fn test_cmd_advise_check_against_server_sends_no_prompt() {
    let server = MockLlmServer::start().await;

    let mut config = Config::default();
    config.ai.backend = BackendKind::Ollama;
    config.ai.host = Some(server.url());

    let client = AIClient::from_config(&config.ai);
    assert!(commands::cmd_advise_check(&client).await.unwrap());
    assert_eq!(server.request_count(), 0);
    assert!(server.last_prompt().is_none());
}

#[tokio::test]
async fn test_cmd_advise_check_gemini_without_key() {
    let server = MockLlmServer::start().await;

    let mut config = Config::default();
    config.ai.host = Some(server.url());
    config.ai.api_key = None;

    let client = AIClient::from_config(&config.ai);
    assert!(!commands::cmd_advise_check(&client).await.unwrap());
}

// ========== Store / Config Tests ==========

#[test]
fn test_open_store_prefers_cli_path() {
    let dir = TempDir::new().unwrap();
    let configured = dir.path().join("configured.json");
    let cli_path = dir.path().join("cli.json");

    let config = Config {
        data_file: Some(configured.clone()),
        ..Config::default()
    };

    let mut store = commands::open_store(&config, Some(&cli_path)).unwrap();
    commands::cmd_add(&mut store, "Uber", 25.0, "expense", "Transporte", Some("2024-02-02")).unwrap();

    assert!(cli_path.exists());
    assert!(!configured.exists());

    let reopened = commands::open_store(&config, Some(cli_path.as_path())).unwrap();
    assert_eq!(reopened.len(), 1);
}

#[test]
fn test_open_store_uses_configured_path() {
    let dir = TempDir::new().unwrap();
    let configured = dir.path().join("nested").join("data.json");
    let config = Config {
        data_file: Some(configured.clone()),
        ..Config::default()
    };

    let mut store = commands::open_store(&config, None).unwrap();
    commands::cmd_add(&mut store, "Farmácia", 40.0, "expense", "Saúde", Some("2024-02-03")).unwrap();

    assert!(configured.exists());
    let reopened = TransactionStore::open(FileSlot::new(&configured));
    assert_eq!(reopened.transactions()[0].description, "Farmácia");
}

#[test]
fn test_load_config_missing_explicit_file() {
    let result = commands::load_config(Some(Path::new("/definitely/not/here.toml")));
    assert!(result.is_err());
}

#[test]
fn test_load_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[ai]\nbackend = \"ollama\"\nmodel = \"gemma3\"\n").unwrap();

    let config = commands::load_config(Some(&path)).unwrap();
    if std::env::var("AI_MODEL").is_err() {
        assert_eq!(config.ai.model.as_deref(), Some("gemma3"));
    }
    if std::env::var("AI_BACKEND").is_err() {
        assert_eq!(config.ai.backend, BackendKind::Ollama);
    }
}

// ========== CLI Parsing Tests ==========

#[test]
fn test_parse_add() {
    let cli = Cli::try_parse_from([
        "centavo", "add", "-d", "Aluguel", "-a", "1500", "-t", "expense", "-c", "Moradia",
        "--date", "2024-01-05",
    ])
    .unwrap();

    match cli.command {
        Commands::Add {
            description,
            amount,
            kind,
            category,
            date,
        } => {
            assert_eq!(description, "Aluguel");
            assert_eq!(amount, 1500.0);
            assert_eq!(kind, "expense");
            assert_eq!(category, "Moradia");
            assert_eq!(date.as_deref(), Some("2024-01-05"));
        }
        _ => panic!("expected add"),
    }
}

#[test]
fn test_parse_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from(["centavo", "dashboard", "--json", "--data-file", "x.json", "-v"])
        .unwrap();
    assert!(cli.verbose);
    assert_eq!(cli.data_file.as_deref(), Some(Path::new("x.json")));
    assert!(matches!(cli.command, Commands::Dashboard { json: true }));
}

#[test]
fn test_parse_advise_check() {
    let cli = Cli::try_parse_from(["centavo", "advise", "--check"]).unwrap();
    assert!(matches!(cli.command, Commands::Advise { check: true }));

    let cli = Cli::try_parse_from(["centavo", "advise"]).unwrap();
    assert!(matches!(cli.command, Commands::Advise { check: false }));
}

#[test]
fn test_parse_add_requires_category() {
    assert!(Cli::try_parse_from(["centavo", "add", "-d", "X", "-a", "1"]).is_err());
}

// ========== Helper Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("a very long description", 10), "a very ...");
    assert_eq!(truncate("Alimentação e bebidas", 12), "Alimentaç...");
}

#[test]
fn test_cmd_categories() {
    assert!(commands::cmd_categories().is_ok());
}
