use thiserror::Error;
use uuid::Uuid;

/// Error type that captures validation, lookup, and persistence failures.
#[derive(Debug, Error)]
pub enum BudgetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Transaction not found: {0}")]
    TransactionNotFound(Uuid),
    #[error("Paycheck not found: {0}")]
    PaycheckNotFound(Uuid),
    #[error("Persistence error: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, BudgetError>;
