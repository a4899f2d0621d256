//! Integration tests for centavo-core
//!
//! These tests exercise the full add → persist → reopen → stats → advice
//! workflow through the public API.

use centavo_core::{
    advisor::{EMPTY_HISTORY_MESSAGE, SERVICE_ERROR_MESSAGE},
    test_utils::{MockLlmServer, MockReply},
    AIBackend, Advisor, FileSlot, MockBackend, NewTransaction, OllamaBackend, PersistenceSlot,
    PromptLibrary, TransactionStore, TransactionType,
};
use chrono::NaiveDate;
use tempfile::TempDir;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid date")
}

fn seed(store: &mut TransactionStore<FileSlot>) {
    store.add(NewTransaction::new(
        "Salário",
        5000.0,
        TransactionType::Income,
        "Salário",
        date("2024-01-01"),
    ));
    store.add(NewTransaction::new(
        "Aluguel",
        1500.0,
        TransactionType::Expense,
        "Moradia",
        date("2024-01-05"),
    ));
    store.add(NewTransaction::new(
        "Mercado",
        500.0,
        TransactionType::Expense,
        "Alimentação",
        date("2024-01-10"),
    ));
}

// =============================================================================
// Store Integration Tests
// =============================================================================

#[test]
fn test_dashboard_workflow_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data").join("transactions.json");

    {
        let mut store = TransactionStore::open(FileSlot::new(&path));
        seed(&mut store);
    }

    let store = TransactionStore::open(FileSlot::new(&path));
    assert_eq!(store.len(), 3);

    let stats = store.stats();
    assert_eq!(stats.total_income, 5000.0);
    assert_eq!(stats.total_expense, 2000.0);
    assert_eq!(stats.balance, 3000.0);
    assert_eq!(stats.percentage_spent(), 40.0);

    let names: Vec<&str> = stats
        .category_breakdown
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(names, vec!["Moradia", "Alimentação"]);
    assert_eq!(stats.category_breakdown[0].color_index, 0);
    assert_eq!(stats.category_breakdown[1].color_index, 1);
}

#[test]
fn test_remove_persists_across_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("transactions.json");

    let mut store = TransactionStore::open(FileSlot::new(&path));
    seed(&mut store);
    let rent_id = store.transactions()[1].id.clone();

    assert!(store.remove(&rent_id));
    assert!(!store.remove("does-not-exist"));

    let reopened = TransactionStore::open(FileSlot::new(&path));
    assert_eq!(reopened.len(), 2);
    assert!(reopened.get(&rent_id).is_none());
    assert_eq!(reopened.stats().total_expense, 500.0);
}

#[test]
fn test_corrupt_file_loads_empty_and_is_overwritten() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("transactions.json");
    std::fs::write(&path, "definitely not json").unwrap();

    let mut store = TransactionStore::open(FileSlot::new(&path));
    assert!(store.is_empty());

    store.add(NewTransaction::new(
        "Café",
        12.5,
        TransactionType::Expense,
        "Alimentação",
        date("2024-02-01"),
    ));

    let raw = FileSlot::new(&path).read().unwrap().unwrap();
    assert!(raw.starts_with('['));
    assert!(raw.contains(r#""type":"EXPENSE""#));
    assert!(raw.contains(r#""date":"2024-02-01""#));
}

// =============================================================================
// Advice Integration Tests
// =============================================================================

#[tokio::test]
async fn test_advice_from_persisted_history() {
    let dir = TempDir::new().unwrap();
    let mut store = TransactionStore::open(FileSlot::new(dir.path().join("t.json")));
    seed(&mut store);

    let mock = MockBackend::with_response("Reserve 10% do salário.");
    let advisor = Advisor::with_prompts(mock.clone(), PromptLibrary::embedded_only());

    let text = advisor.request_advice(store.transactions()).await;
    assert_eq!(text, "Reserve 10% do salário.");

    let prompt = mock.last_prompt().unwrap();
    assert!(prompt.contains("2024-01-01: Salário (Salário) - +5000"));
    assert!(prompt.contains("2024-01-05: Aluguel (Moradia) - -1500"));
    assert!(prompt.contains("2024-01-10: Mercado (Alimentação) - -500"));
}

#[tokio::test]
async fn test_advice_for_empty_store_skips_backend() {
    let dir = TempDir::new().unwrap();
    let store = TransactionStore::open(FileSlot::new(dir.path().join("t.json")));
    let mock = MockBackend::new();
    let advisor = Advisor::with_prompts(mock.clone(), PromptLibrary::embedded_only());

    assert_eq!(
        advisor.request_advice(store.transactions()).await,
        EMPTY_HISTORY_MESSAGE
    );
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn test_advice_over_http_backend() {
    let server = MockLlmServer::start_with(MockReply::Text("Gaste menos com delivery.".into())).await;
    let backend = OllamaBackend::new(&server.url(), "llama3.2");
    assert!(backend.health_check().await);

    let dir = TempDir::new().unwrap();
    let mut store = TransactionStore::open(FileSlot::new(dir.path().join("t.json")));
    seed(&mut store);

    let advisor = Advisor::with_prompts(backend, PromptLibrary::embedded_only());
    let text = advisor.request_advice(store.transactions()).await;

    assert_eq!(text, "Gaste menos com delivery.");
    assert_eq!(server.request_count(), 1);
    assert!(server.last_prompt().unwrap().contains("Mercado"));
}

#[tokio::test]
async fn test_advice_http_failure_returns_apology() {
    let server = MockLlmServer::start_with(MockReply::Status(500)).await;
    let backend = OllamaBackend::new(&server.url(), "llama3.2");

    let dir = TempDir::new().unwrap();
    let mut store = TransactionStore::open(FileSlot::new(dir.path().join("t.json")));
    seed(&mut store);

    let advisor = Advisor::with_prompts(backend, PromptLibrary::embedded_only());
    assert_eq!(
        advisor.request_advice(store.transactions()).await,
        SERVICE_ERROR_MESSAGE
    );
}
