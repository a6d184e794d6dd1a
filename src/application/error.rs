use thiserror::Error;

use crate::domain::{LedgerError, TransactionId, ValidationError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Transaction not found: {0}")]
    TransactionNotFound(TransactionId),

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Validation(err) => AppError::Validation(err),
            LedgerError::NotFound(id) => AppError::TransactionNotFound(id),
        }
    }
}
