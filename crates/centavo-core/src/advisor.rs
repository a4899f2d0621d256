//! Advice request builder
//!
//! Turns the transaction history into a compact prompt, asks the configured
//! text-generation backend for a single completion and returns its text.
//! Advice is best-effort: every failure collapses into a fixed message and
//! nothing is propagated to the caller.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{debug, error, info};

use crate::ai::AIBackend;
use crate::error::{Error, Result};
use crate::models::Transaction;
use crate::prompts::{PromptId, PromptLibrary};

/// Returned without calling the backend when there is no history
pub const EMPTY_HISTORY_MESSAGE: &str =
    "Adicione algumas transações para receber uma análise financeira personalizada.";

/// Returned when the backend answers with no text
pub const NO_ANALYSIS_MESSAGE: &str = "Não foi possível gerar uma análise no momento.";

/// Returned for any backend failure
pub const SERVICE_ERROR_MESSAGE: &str =
    "Desculpe, encontrei um erro ao tentar analisar seus dados. Verifique sua chave API.";

/// One summary line: `<date>: <description> (<category>) - <sign><amount>`
pub fn summary_line(tx: &Transaction) -> String {
    format!(
        "{}: {} ({}) - {}{}",
        tx.date,
        tx.description,
        tx.category,
        tx.kind.sign(),
        tx.amount
    )
}

/// Summary of the whole history, one line per transaction in collection order
pub fn build_summary(transactions: &[Transaction]) -> String {
    transactions
        .iter()
        .map(summary_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Proof that the holder owns the advisor's single in-flight slot
///
/// Dropping the ticket (including dropping a cancelled future that owns it)
/// frees the slot.
#[derive(Debug)]
pub struct AdviceTicket {
    in_flight: Arc<AtomicBool>,
}

impl Drop for AdviceTicket {
    fn drop(&mut self) {
        self.in_flight.store(false, Ordering::SeqCst);
    }
}

/// Builds advice prompts and sends them to a text-generation backend
pub struct Advisor<B: AIBackend> {
    backend: B,
    prompts: Mutex<PromptLibrary>,
    in_flight: Arc<AtomicBool>,
}

impl<B: AIBackend> Advisor<B> {
    /// Create an advisor using the default prompt library
    pub fn new(backend: B) -> Self {
        Self::with_prompts(backend, PromptLibrary::new())
    }

    /// Create an advisor with a specific prompt library
    pub fn with_prompts(backend: B, prompts: PromptLibrary) -> Self {
        Self {
            backend,
            prompts: Mutex::new(prompts),
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Claim the in-flight slot, or `None` if a request is already running
    pub fn try_begin(&self) -> Option<AdviceTicket> {
        self.in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| AdviceTicket {
                in_flight: Arc::clone(&self.in_flight),
            })
    }

    /// Whether a guarded request is currently running
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Like `request_advice`, but refuses to start while another guarded
    /// request is in flight
    pub async fn request_advice_exclusive(&self, transactions: &[Transaction]) -> Option<String> {
        let Some(_ticket) = self.try_begin() else {
            info!("Advice request already in progress, rejecting new request");
            return None;
        };
        Some(self.request_advice(transactions).await)
    }

    /// Ask the backend for a financial review of `transactions`
    ///
    /// Works on the given snapshot; the returned text is either the
    /// backend's answer or one of the fixed fallback messages.
    pub async fn request_advice(&self, transactions: &[Transaction]) -> String {
        if transactions.is_empty() {
            return EMPTY_HISTORY_MESSAGE.to_string();
        }

        let prompt = match self.build_prompt(transactions) {
            Ok(prompt) => prompt,
            Err(e) => {
                error!("Failed to build advice prompt: {}", e);
                return SERVICE_ERROR_MESSAGE.to_string();
            }
        };

        debug!(
            model = self.backend.model(),
            host = self.backend.host(),
            transactions = transactions.len(),
            "Requesting financial advice"
        );

        match self.backend.generate(&prompt).await {
            Ok(text) if text.is_empty() => NO_ANALYSIS_MESSAGE.to_string(),
            Ok(text) => text,
            Err(e) => {
                error!(
                    model = self.backend.model(),
                    host = self.backend.host(),
                    "Error calling AI backend: {}",
                    e
                );
                SERVICE_ERROR_MESSAGE.to_string()
            }
        }
    }

    /// Render the full prompt for `transactions`
    pub fn build_prompt(&self, transactions: &[Transaction]) -> Result<String> {
        let summary = build_summary(transactions);
        let mut prompts = self
            .prompts
            .lock()
            .map_err(|_| Error::Prompt("Failed to acquire prompt library lock".into()))?;
        let template = prompts.get(PromptId::FinancialAdvice)?;
        debug!(
            prompt = %template.metadata.id,
            version = template.metadata.version,
            is_override = template.is_override,
            "Rendering advice prompt"
        );

        let mut vars = HashMap::new();
        vars.insert("summary", summary.as_str());
        Ok(template.render(&vars))
    }
}
