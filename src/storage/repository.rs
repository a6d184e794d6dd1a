use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::domain::{DAY_LABEL_FORMAT, Transaction, TransactionId, day_label};

use super::MIGRATION_001_INITIAL;

const TRANSACTION_COLUMNS: &str =
    "id, sequence, title, amount_cents, date, category, is_income, recorded_at, updated_at";

/// Repository for persisting and loading transactions, one row per transaction keyed by id.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given URL.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        tracing::debug!(database_url, "connected to database");
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize a database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    /// Insert a new transaction.
    pub async fn save_transaction(&self, transaction: &Transaction) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO transactions (id, sequence, title, amount_cents, date, category, is_income, recorded_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(transaction.id.to_string())
        .bind(transaction.sequence)
        .bind(&transaction.title)
        .bind(transaction.amount_cents)
        .bind(day_label(transaction.date))
        .bind(&transaction.category)
        .bind(transaction.is_income)
        .bind(transaction.recorded_at.to_rfc3339())
        .bind(transaction.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to save transaction")?;

        tracing::debug!(
            id = %transaction.id,
            sequence = transaction.sequence,
            "saved transaction"
        );
        Ok(())
    }

    /// Overwrite the stored fields of an existing transaction.
    /// Returns false if no row has that id.
    pub async fn update_transaction(&self, transaction: &Transaction) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE transactions
            SET title = ?, amount_cents = ?, date = ?, category = ?, is_income = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&transaction.title)
        .bind(transaction.amount_cents)
        .bind(day_label(transaction.date))
        .bind(&transaction.category)
        .bind(transaction.is_income)
        .bind(transaction.updated_at.to_rfc3339())
        .bind(transaction.id.to_string())
        .execute(&self.pool)
        .await
        .context("Failed to update transaction")?;

        tracing::debug!(
            id = %transaction.id,
            rows = result.rows_affected(),
            "updated transaction"
        );
        Ok(result.rows_affected() > 0)
    }

    /// Delete a transaction. Returns false if no row has that id.
    pub async fn delete_transaction(&self, id: TransactionId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .context("Failed to delete transaction")?;

        tracing::debug!(%id, rows = result.rows_affected(), "deleted transaction");
        Ok(result.rows_affected() > 0)
    }

    /// Get a transaction by ID.
    pub async fn get_transaction(&self, id: TransactionId) -> Result<Option<Transaction>> {
        let query = format!("SELECT {} FROM transactions WHERE id = ?", TRANSACTION_COLUMNS);
        let row = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch transaction")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_transaction(&row)?)),
            None => Ok(None),
        }
    }

    /// List all transactions in insertion order.
    pub async fn list_transactions(&self) -> Result<Vec<Transaction>> {
        let query = format!(
            "SELECT {} FROM transactions ORDER BY sequence",
            TRANSACTION_COLUMNS
        );
        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list transactions")?;

        tracing::debug!(count = rows.len(), "loaded transactions");
        rows.iter().map(Self::row_to_transaction).collect()
    }

    /// Count stored transactions.
    pub async fn count_transactions(&self) -> Result<i64> {
        let count: i64 = sqlx::query("SELECT COUNT(*) as count FROM transactions")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count transactions")?
            .get("count");
        Ok(count)
    }

    fn row_to_transaction(row: &sqlx::sqlite::SqliteRow) -> Result<Transaction> {
        let id_str: String = row.get("id");
        let date_str: String = row.get("date");
        let recorded_at_str: String = row.get("recorded_at");
        let updated_at_str: String = row.get("updated_at");

        Ok(Transaction {
            id: Uuid::parse_str(&id_str).context("Invalid transaction ID")?,
            sequence: row.get("sequence"),
            title: row.get("title"),
            amount_cents: row.get("amount_cents"),
            date: NaiveDate::parse_from_str(&date_str, DAY_LABEL_FORMAT)
                .with_context(|| format!("Invalid transaction date: {}", date_str))?,
            category: row.get("category"),
            is_income: row.get::<i32, _>("is_income") != 0,
            recorded_at: DateTime::parse_from_rfc3339(&recorded_at_str)
                .context("Invalid recorded_at timestamp")?
                .with_timezone(&Utc),
            updated_at: DateTime::parse_from_rfc3339(&updated_at_str)
                .context("Invalid updated_at timestamp")?
                .with_timezone(&Utc),
        })
    }
}
