// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::NaiveDate;
use tally::application::LedgerService;
use tally::domain::TransactionDraft;
use tempfile::TempDir;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let service = LedgerService::init(&db_path(&temp_dir)).await?;
    Ok((service, temp_dir))
}

/// Path of the database file inside a test directory
pub fn db_path(temp_dir: &TempDir) -> String {
    temp_dir.path().join("test.db").to_str().unwrap().to_string()
}

/// Helper to parse a date string into a calendar date
pub fn parse_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

/// Shorthand for building a draft
pub fn draft(
    title: &str,
    amount: &str,
    date: &str,
    category: &str,
    is_income: bool,
) -> TransactionDraft {
    TransactionDraft::new(title, amount, parse_date(date), category, is_income)
}
