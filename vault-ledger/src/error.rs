//! Errors raised by the data store, the ledger and SMS sync.
//!
//! - [`StoreError`]: anything the backing store reports, remote or local.
//! - [`LedgerError`]: spend/refund failures, including rejected amounts.
//! - [`ProfileError`]: registration and settings updates.
//! - [`SyncError`]: fetching bank transactions from an SMS source.

use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;
use vault_core::ValidationError;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{table} row \"{id}\" not found")]
    NotFound { table: &'static str, id: String },
    #[error("insufficient balance: {available:.2} available, {requested:.2} requested")]
    InsufficientBalance { available: f64, requested: f64 },
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("store returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("decode {what}: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("snapshot {}: {source}", .path.display())]
    Snapshot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("amount must be greater than zero, got {0}")]
    InvalidAmount(f64),
    #[error("not enough balance in this wallet: {available:.2} available, {requested:.2} requested")]
    InsufficientBalance { available: f64, requested: f64 },
    #[error("wallet \"{0}\" not found")]
    WalletNotFound(String),
    #[error("transaction \"{0}\" not found")]
    TransactionNotFound(String),
    #[error(transparent)]
    Persist(StoreError),
}

impl From<StoreError> for LedgerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InsufficientBalance { available, requested } => {
                LedgerError::InsufficientBalance { available, requested }
            }
            StoreError::NotFound { table: "wallets", id } => LedgerError::WalletNotFound(id),
            StoreError::NotFound { table: "transactions", id } => {
                LedgerError::TransactionNotFound(id)
            }
            other => LedgerError::Persist(other),
        }
    }
}

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("user \"{0}\" not found")]
    UserNotFound(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("no SMS API key configured")]
    MissingApiKey,
    #[error("SMS API request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("SMS API returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("read inbox {}: {source}", .path.display())]
    Inbox {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_map_to_ledger_errors() {
        let e: LedgerError = StoreError::NotFound { table: "wallets", id: "w1".into() }.into();
        assert!(matches!(e, LedgerError::WalletNotFound(id) if id == "w1"));

        let e: LedgerError = StoreError::NotFound { table: "transactions", id: "t1".into() }.into();
        assert!(matches!(e, LedgerError::TransactionNotFound(id) if id == "t1"));

        let e: LedgerError =
            StoreError::InsufficientBalance { available: 5.0, requested: 10.0 }.into();
        assert_eq!(
            e.to_string(),
            "not enough balance in this wallet: 5.00 available, 10.00 requested"
        );

        let e: LedgerError = StoreError::NotFound { table: "users", id: "u1".into() }.into();
        assert!(matches!(e, LedgerError::Persist(_)));
    }
}
