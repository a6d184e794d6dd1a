use anyhow::anyhow;
use tokio::sync::broadcast;

use crate::domain::{
    Cents, DayGroup, Ledger, Totals, Transaction, TransactionDraft, TransactionId,
};
use crate::storage::Repository;

use super::AppError;

/// Buffered change events per subscriber before the oldest are dropped.
const EVENT_CAPACITY: usize = 64;

/// Emitted after a mutation has been persisted and committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerEvent {
    Added(Transaction),
    Updated {
        before: Transaction,
        after: Transaction,
    },
    Deleted(Transaction),
}

/// Application service providing high-level operations for the ledger.
/// This is the primary interface for any client (CLI, TUI, etc.).
///
/// Mutations are written to the repository first and committed to memory only
/// once the write succeeded, so reads always reflect what the next load will see.
pub struct LedgerService {
    repo: Repository,
    ledger: Ledger,
    events: broadcast::Sender<LedgerEvent>,
}

impl LedgerService {
    /// Load the stored transaction set through the given repository.
    pub async fn open(repo: Repository) -> Result<Self, AppError> {
        let transactions = repo.list_transactions().await?;
        let ledger = Ledger::from_transactions(transactions);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        tracing::debug!(count = ledger.len(), "ledger loaded");
        Ok(Self {
            repo,
            ledger,
            events,
        })
    }

    /// Open the database at the given path, creating and migrating it if needed.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        Self::open(repo).await
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        Self::open(repo).await
    }

    /// Receive an event after every successful mutation.
    pub fn subscribe(&self) -> broadcast::Receiver<LedgerEvent> {
        self.events.subscribe()
    }

    // ========================
    // Mutations
    // ========================

    /// Record a new transaction.
    pub async fn add(&mut self, draft: &TransactionDraft) -> Result<Transaction, AppError> {
        let transaction = self.ledger.prepare_add(draft)?;
        self.repo.save_transaction(&transaction).await?;
        self.ledger.insert(transaction.clone());

        self.notify(LedgerEvent::Added(transaction.clone()));
        Ok(transaction)
    }

    /// Replace all editable fields of a transaction.
    pub async fn update(
        &mut self,
        id: TransactionId,
        draft: &TransactionDraft,
    ) -> Result<Transaction, AppError> {
        let before = self
            .ledger
            .get(id)
            .cloned()
            .ok_or(AppError::TransactionNotFound(id))?;
        let after = self.ledger.prepare_update(id, draft)?;

        if !self.repo.update_transaction(&after).await? {
            return Err(AppError::Database(anyhow!(
                "Transaction {} is missing from the database",
                id
            )));
        }
        if !self.ledger.replace(after.clone()) {
            return Err(AppError::TransactionNotFound(id));
        }

        self.notify(LedgerEvent::Updated {
            before,
            after: after.clone(),
        });
        Ok(after)
    }

    /// Delete a transaction. Deleting an unknown id fails with `TransactionNotFound`.
    pub async fn delete(&mut self, id: TransactionId) -> Result<Transaction, AppError> {
        if !self.ledger.contains(id) {
            return Err(AppError::TransactionNotFound(id));
        }

        if !self.repo.delete_transaction(id).await? {
            tracing::warn!(%id, "transaction was already absent from the database");
        }
        let removed = self.ledger.delete(id)?;

        self.notify(LedgerEvent::Deleted(removed.clone()));
        Ok(removed)
    }

    // ========================
    // Queries
    // ========================

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn list(&self) -> &[Transaction] {
        self.ledger.list()
    }

    /// Get a transaction by ID.
    pub fn get(&self, id: TransactionId) -> Result<&Transaction, AppError> {
        self.ledger
            .get(id)
            .ok_or(AppError::TransactionNotFound(id))
    }

    pub fn total_income(&self) -> Cents {
        self.ledger.total_income()
    }

    pub fn total_expense(&self) -> Cents {
        self.ledger.total_expense()
    }

    pub fn total_balance(&self) -> Cents {
        self.ledger.total_balance()
    }

    pub fn summary(&self) -> Totals {
        self.ledger.summary()
    }

    pub fn grouped_by_date(&self) -> Vec<DayGroup> {
        self.ledger.grouped_by_date()
    }

    fn notify(&self, event: LedgerEvent) {
        // Sending only fails when nobody is subscribed
        let _ = self.events.send(event);
    }
}
