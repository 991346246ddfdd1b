//! Data access for the four tables the app uses.
//!
//! Everything goes through the [`Store`] trait so callers receive the store
//! explicitly instead of reaching for a global client. Spending from a
//! wallet is a single store operation ([`Store::commit_spend`]) so the
//! transaction row and the wallet's `spent_amount` can never drift apart.

pub mod memory;
pub mod rest;

use async_trait::async_trait;
use vault_core::{
    BankTransaction, NewBankTransaction, NewTransaction, NewWallet, Transaction, User, Wallet,
};

use crate::error::StoreError;

pub use memory::MemoryStore;
pub use rest::{RestConfig, RestStore};

/// Table names, shared by both implementations and by error reporting.
pub mod tables {
    pub const USERS: &str = "users";
    pub const WALLETS: &str = "wallets";
    pub const TRANSACTIONS: &str = "transactions";
    pub const BANK_TRANSACTIONS: &str = "bank_transactions";
}

#[async_trait]
pub trait Store: Send + Sync {
    async fn get_user(&self, user_id: &str) -> Result<Option<User>, StoreError>;

    /// Insert or replace the row with the same id.
    async fn upsert_user(&self, user: &User) -> Result<User, StoreError>;

    async fn list_wallets(&self, user_id: &str) -> Result<Vec<Wallet>, StoreError>;

    async fn get_wallet(&self, wallet_id: &str) -> Result<Option<Wallet>, StoreError>;

    /// Insert or replace wallets keyed by `(user_id, category)`.
    async fn upsert_wallets(&self, wallets: &[NewWallet]) -> Result<Vec<Wallet>, StoreError>;

    /// Newest first.
    async fn list_transactions(&self, user_id: &str) -> Result<Vec<Transaction>, StoreError>;

    async fn get_transaction(&self, transaction_id: &str)
    -> Result<Option<Transaction>, StoreError>;

    /// Atomically: check `amount <= allocated - spent` against the current
    /// wallet row, insert the transaction and add `amount` to `spent_amount`.
    ///
    /// Fails with [`StoreError::InsufficientBalance`] and changes nothing when
    /// the wallet cannot cover the amount.
    async fn commit_spend(&self, tx: &NewTransaction) -> Result<(Transaction, Wallet), StoreError>;

    /// Atomically: delete the transaction and subtract its amount from the
    /// owning wallet's `spent_amount`, never going below zero.
    async fn revert_spend(&self, transaction_id: &str)
    -> Result<(Transaction, Wallet), StoreError>;

    /// Newest first by transaction date.
    async fn list_bank_transactions(
        &self,
        user_id: &str,
    ) -> Result<Vec<BankTransaction>, StoreError>;

    async fn insert_bank_transactions(
        &self,
        rows: &[NewBankTransaction],
    ) -> Result<Vec<BankTransaction>, StoreError>;
}
