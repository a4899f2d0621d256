//! Domain models for Centavo

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Category suggestions offered when recording a transaction.
///
/// Categories are free text; this list only seeds the CLI help and the
/// `categories` command.
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "Alimentação",
    "Moradia",
    "Transporte",
    "Lazer",
    "Saúde",
    "Salário",
    "Investimentos",
    "Outros",
];

/// Whether money came in or went out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "INCOME",
            Self::Expense => "EXPENSE",
        }
    }

    /// Sign used when the amount is rendered as a movement
    pub fn sign(&self) -> char {
        match self {
            Self::Income => '+',
            Self::Expense => '-',
        }
    }

    /// Display label in the app's locale
    pub fn label(&self) -> &'static str {
        match self {
            Self::Income => "Receita",
            Self::Expense => "Despesa",
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" | "receita" => Ok(Self::Income),
            "expense" | "despesa" => Ok(Self::Expense),
            _ => Err(format!("Unknown transaction type: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A recorded money movement
///
/// Immutable once created. The serialized field order is part of the
/// persisted format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub description: String,
    /// Non-negative magnitude; direction comes from `kind`
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category: String,
    pub date: NaiveDate,
}

impl Transaction {
    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }
}

/// A transaction as entered by the user (before an id is assigned)
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub description: String,
    pub amount: f64,
    pub kind: TransactionType,
    pub category: String,
    pub date: NaiveDate,
}

impl NewTransaction {
    pub fn new(
        description: impl Into<String>,
        amount: f64,
        kind: TransactionType,
        category: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            description: description.into(),
            amount,
            kind,
            category: category.into(),
            date,
        }
    }

    /// Attach an id, producing the stored record
    pub fn with_id(self, id: impl Into<String>) -> Transaction {
        Transaction {
            id: id.into(),
            description: self.description,
            amount: self.amount,
            kind: self.kind,
            category: self.category,
            date: self.date,
        }
    }
}

/// Ordered chart palette for the category breakdown
pub const PALETTE: [&str; 7] = [
    "#0088FE", "#00C49F", "#FFBB28", "#FF8042", "#8884d8", "#82ca9d", "#ffc658",
];

/// Spending in one expense category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStat {
    pub name: String,
    pub value: f64,
    pub color_index: usize,
}

impl CategoryStat {
    /// Hex color for this slice
    pub fn color(&self) -> &'static str {
        PALETTE[self.color_index % PALETTE.len()]
    }
}

/// Totals and per-category breakdown for a transaction set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    pub total_income: f64,
    pub total_expense: f64,
    pub balance: f64,
    pub category_breakdown: Vec<CategoryStat>,
}

impl AggregateStats {
    /// Share of income already spent, in percent with one decimal
    ///
    /// Zero when there is no income.
    pub fn percentage_spent(&self) -> f64 {
        if self.total_income > 0.0 {
            round1(self.total_expense / self.total_income * 100.0)
        } else {
            0.0
        }
    }
}

/// Round to one decimal place, halves away from zero
///
/// Rounds the scaled binary value, so an input whose nearest double sits just
/// below a half (0.15 is stored as 0.1499...) still rounds up once scaled:
/// `round1(0.15) == 0.2`. Decimal-string rounding would give 0.1 there.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
