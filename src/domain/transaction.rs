use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::{Cents, category_icon, parse_amount};

pub type TransactionId = Uuid;

/// A single income or expense record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    /// Monotonically increasing insertion counter, assigned by the ledger
    pub sequence: i64,
    pub title: String,
    /// Amount in cents (never negative)
    pub amount_cents: Cents,
    /// Calendar day of the transaction; time of day is not tracked
    pub date: NaiveDate,
    /// Free-form category label
    pub category: String,
    /// true = inflow, false = outflow
    pub is_income: bool,
    /// When the transaction was first recorded
    pub recorded_at: DateTime<Utc>,
    /// When the transaction was last edited
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    pub fn icon(&self) -> &'static str {
        category_icon(&self.category)
    }

    /// Copy the editable fields back into a draft, e.g. to pre-fill an edit form.
    pub fn to_draft(&self) -> TransactionDraft {
        TransactionDraft {
            title: self.title.clone(),
            amount: super::format_cents(self.amount_cents),
            date: self.date,
            category: self.category.clone(),
            is_income: self.is_income,
        }
    }
}

/// User-supplied fields for adding or editing a transaction.
/// The amount is kept as entered and parsed during validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDraft {
    pub title: String,
    pub amount: String,
    pub date: NaiveDate,
    pub category: String,
    pub is_income: bool,
}

/// A draft whose fields passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedDraft {
    pub title: String,
    pub amount_cents: Cents,
    pub date: NaiveDate,
    pub category: String,
    pub is_income: bool,
}

impl TransactionDraft {
    pub fn new(
        title: impl Into<String>,
        amount: impl Into<String>,
        date: NaiveDate,
        category: impl Into<String>,
        is_income: bool,
    ) -> Self {
        Self {
            title: title.into(),
            amount: amount.into(),
            date,
            category: category.into(),
            is_income,
        }
    }

    pub fn validate(&self) -> Result<ValidatedDraft, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        let amount_cents = parse_amount(&self.amount)?;

        Ok(ValidatedDraft {
            title: title.to_string(),
            amount_cents,
            date: self.date,
            category: self.category.trim().to_string(),
            is_income: self.is_income,
        })
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Title must not be empty")]
    EmptyTitle,

    #[error("Invalid amount: {0:?}")]
    InvalidAmount(String),

    #[error("Amount must not be negative: {0:?}")]
    NegativeAmount(String),
}
