use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::{Cents, Transaction, TransactionDraft, TransactionId, ValidationError};

/// Day label format used as the grouping key. Locale independent, so two
/// transactions on the same calendar day always share a key.
pub const DAY_LABEL_FORMAT: &str = "%Y-%m-%d";

pub fn day_label(date: NaiveDate) -> String {
    date.format(DAY_LABEL_FORMAT).to_string()
}

pub fn parse_day_label(label: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(label, DAY_LABEL_FORMAT).ok()
}

/// Transactions sharing one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayGroup {
    pub label: String,
    pub transactions: Vec<Transaction>,
}

impl DayGroup {
    pub fn date(&self) -> Option<NaiveDate> {
        parse_day_label(&self.label)
    }

    /// Display heading, e.g. "May 1, 2025". Falls back to the raw label.
    pub fn heading(&self) -> String {
        match self.date() {
            Some(date) => date.format("%b %-d, %Y").to_string(),
            None => self.label.clone(),
        }
    }

    /// Income minus expense for the day.
    pub fn net_cents(&self) -> Cents {
        total_income(&self.transactions) - total_expense(&self.transactions)
    }
}

/// Aggregate totals over a set of transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub income: Cents,
    pub expense: Cents,
    pub balance: Cents,
}

impl Totals {
    pub fn compute(transactions: &[Transaction]) -> Self {
        let income = total_income(transactions);
        let expense = total_expense(transactions);
        Self {
            income,
            expense,
            balance: income - expense,
        }
    }
}

/// Sum of amounts over income transactions.
/// Saturates at `Cents::MAX` instead of overflowing.
pub fn total_income(transactions: &[Transaction]) -> Cents {
    transactions
        .iter()
        .filter(|t| t.is_income)
        .map(|t| t.amount_cents)
        .fold(0, Cents::saturating_add)
}

/// Sum of amounts over expense transactions.
/// Saturates at `Cents::MAX` instead of overflowing.
pub fn total_expense(transactions: &[Transaction]) -> Cents {
    transactions
        .iter()
        .filter(|t| !t.is_income)
        .map(|t| t.amount_cents)
        .fold(0, Cents::saturating_add)
}

/// Bucket transactions by day label, most recent day first.
/// Order inside a group follows the input order.
pub fn group_by_date(transactions: &[Transaction]) -> Vec<DayGroup> {
    let mut groups: Vec<DayGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for transaction in transactions {
        let label = day_label(transaction.date);
        match index.get(&label) {
            Some(&i) => groups[i].transactions.push(transaction.clone()),
            None => {
                index.insert(label.clone(), groups.len());
                groups.push(DayGroup {
                    label,
                    transactions: vec![transaction.clone()],
                });
            }
        }
    }

    order_day_groups(&mut groups);
    groups
}

/// Sort groups by descending date. Groups whose label does not parse go last,
/// keeping their relative order.
pub fn order_day_groups(groups: &mut [DayGroup]) {
    // sort_by is stable
    groups.sort_by(|a, b| match (a.date(), b.date()) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Transaction not found: {0}")]
    NotFound(TransactionId),
}

/// The authoritative set of transactions, kept in insertion order.
///
/// Every mutation either fully succeeds or leaves the set untouched.
/// Deleting an unknown id is an error rather than a no-op.
#[derive(Debug, Clone)]
pub struct Ledger {
    transactions: Vec<Transaction>,
    next_sequence: i64,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            transactions: Vec::new(),
            next_sequence: 1,
        }
    }

    /// Rebuild a ledger from previously stored transactions.
    pub fn from_transactions(mut transactions: Vec<Transaction>) -> Self {
        transactions.sort_by_key(|t| t.sequence);
        let next_sequence = transactions.last().map(|t| t.sequence + 1).unwrap_or(1);
        Self {
            transactions,
            next_sequence,
        }
    }

    pub fn add(&mut self, draft: &TransactionDraft) -> Result<Transaction, LedgerError> {
        let transaction = self.prepare_add(draft)?;
        self.insert(transaction.clone());
        Ok(transaction)
    }

    /// Replace every editable field of an existing transaction.
    pub fn update(
        &mut self,
        id: TransactionId,
        draft: &TransactionDraft,
    ) -> Result<Transaction, LedgerError> {
        let transaction = self.prepare_update(id, draft)?;
        let replaced = self.replace(transaction.clone());
        debug_assert!(replaced, "prepared update for unknown id {}", id);
        Ok(transaction)
    }

    pub fn delete(&mut self, id: TransactionId) -> Result<Transaction, LedgerError> {
        let position = self.position(id).ok_or(LedgerError::NotFound(id))?;
        Ok(self.transactions.remove(position))
    }

    pub fn get(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    pub fn contains(&self, id: TransactionId) -> bool {
        self.position(id).is_some()
    }

    pub fn list(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn total_income(&self) -> Cents {
        total_income(&self.transactions)
    }

    pub fn total_expense(&self) -> Cents {
        total_expense(&self.transactions)
    }

    pub fn total_balance(&self) -> Cents {
        self.total_income() - self.total_expense()
    }

    pub fn summary(&self) -> Totals {
        Totals::compute(&self.transactions)
    }

    pub fn grouped_by_date(&self) -> Vec<DayGroup> {
        group_by_date(&self.transactions)
    }

    /// Build a validated new transaction without inserting it.
    pub(crate) fn prepare_add(
        &self,
        draft: &TransactionDraft,
    ) -> Result<Transaction, ValidationError> {
        let valid = draft.validate()?;
        let mut id = Uuid::new_v4();
        while self.contains(id) {
            id = Uuid::new_v4();
        }
        let now = Utc::now();

        Ok(Transaction {
            id,
            sequence: self.next_sequence,
            title: valid.title,
            amount_cents: valid.amount_cents,
            date: valid.date,
            category: valid.category,
            is_income: valid.is_income,
            recorded_at: now,
            updated_at: now,
        })
    }

    /// Build the edited version of a transaction without storing it.
    pub(crate) fn prepare_update(
        &self,
        id: TransactionId,
        draft: &TransactionDraft,
    ) -> Result<Transaction, LedgerError> {
        let existing = self.get(id).ok_or(LedgerError::NotFound(id))?;
        let valid = draft.validate()?;

        Ok(Transaction {
            id,
            sequence: existing.sequence,
            title: valid.title,
            amount_cents: valid.amount_cents,
            date: valid.date,
            category: valid.category,
            is_income: valid.is_income,
            recorded_at: existing.recorded_at,
            updated_at: Utc::now(),
        })
    }

    /// Commit a transaction produced by `prepare_add`.
    pub(crate) fn insert(&mut self, transaction: Transaction) {
        self.next_sequence = self.next_sequence.max(transaction.sequence + 1);
        self.transactions.push(transaction);
    }

    /// Commit a transaction produced by `prepare_update`. Position is kept.
    /// Returns false, leaving the ledger untouched, if the id is not present.
    #[must_use]
    pub(crate) fn replace(&mut self, transaction: Transaction) -> bool {
        match self.position(transaction.id) {
            Some(position) => {
                self.transactions[position] = transaction;
                true
            }
            None => false,
        }
    }

    fn position(&self, id: TransactionId) -> Option<usize> {
        self.transactions.iter().position(|t| t.id == id)
    }
}
