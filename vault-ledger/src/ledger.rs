//! Spending from wallets and undoing it.

use chrono::NaiveDate;
use tracing::info;
use vault_core::{NewTransaction, Transaction, Wallet, default_wallets, sort_wallets};

use crate::error::{LedgerError, StoreError};
use crate::store::Store;

/// Record a manual transaction against a wallet and add it to the wallet's
/// spent amount.
///
/// The available balance is checked up front for a quick answer, then again
/// inside [`Store::commit_spend`] against the row as it is at write time.
pub async fn add_transaction<S: Store + ?Sized>(
    store: &S,
    wallet_id: &str,
    amount: f64,
    date: NaiveDate,
    notes: &str,
) -> Result<Transaction, LedgerError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(LedgerError::InvalidAmount(amount));
    }

    let wallet = store
        .get_wallet(wallet_id)
        .await?
        .ok_or_else(|| LedgerError::WalletNotFound(wallet_id.to_string()))?;
    if !wallet.can_spend(amount) {
        return Err(LedgerError::InsufficientBalance {
            available: wallet.available(),
            requested: amount,
        });
    }

    let new = NewTransaction {
        user_id: wallet.user_id.clone(),
        wallet_id: wallet.id.clone(),
        category: wallet.category.clone(),
        amount,
        date,
        notes: notes.trim().to_string(),
    };
    let (tx, wallet) = store.commit_spend(&new).await?;
    info!(
        transaction = %tx.id,
        wallet = %wallet.category,
        amount,
        spent = wallet.spent_amount,
        "transaction added"
    );
    Ok(tx)
}

/// Remove a transaction and give its amount back to the wallet.
pub async fn delete_transaction<S: Store + ?Sized>(
    store: &S,
    transaction_id: &str,
) -> Result<Transaction, LedgerError> {
    let (tx, wallet) = store.revert_spend(transaction_id).await?;
    info!(
        transaction = %tx.id,
        wallet = %wallet.category,
        amount = tx.amount,
        spent = wallet.spent_amount,
        "transaction deleted"
    );
    Ok(tx)
}

/// Wallets in display order together with the user's transactions.
#[derive(Debug, Clone, Default)]
pub struct WalletOverview {
    pub wallets: Vec<Wallet>,
    pub transactions: Vec<Transaction>,
}

impl WalletOverview {
    pub fn transactions_for<'a>(
        &'a self,
        wallet_id: &'a str,
    ) -> impl Iterator<Item = &'a Transaction> + 'a {
        self.transactions.iter().filter(move |t| t.wallet_id == wallet_id)
    }
}

pub async fn wallet_overview<S: Store + ?Sized>(
    store: &S,
    user_id: &str,
) -> Result<WalletOverview, StoreError> {
    let (mut wallets, transactions) =
        tokio::try_join!(store.list_wallets(user_id), store.list_transactions(user_id))?;
    sort_wallets(&mut wallets);
    Ok(WalletOverview { wallets, transactions })
}

/// Create zeroed Savings/Wants/Needs wallets if the user has no wallets yet.
/// Returns the user's wallets in display order either way.
pub async fn ensure_default_wallets<S: Store + ?Sized>(
    store: &S,
    user_id: &str,
) -> Result<Vec<Wallet>, StoreError> {
    let mut wallets = store.list_wallets(user_id).await?;
    if wallets.is_empty() {
        wallets = store.upsert_wallets(&default_wallets(user_id)).await?;
        info!(user = user_id, count = wallets.len(), "default wallets created");
    }
    sort_wallets(&mut wallets);
    Ok(wallets)
}

#[cfg(test)]
mod tests {
    use vault_core::NewWallet;

    use super::*;
    use crate::store::MemoryStore;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[tokio::test]
    async fn test_rejects_non_positive_amounts() {
        let store = MemoryStore::new();
        for amount in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let err = add_transaction(&store, "w", amount, day(), "").await.unwrap_err();
            assert!(matches!(err, LedgerError::InvalidAmount(_)), "{amount}");
        }
    }

    #[tokio::test]
    async fn test_unknown_wallet() {
        let store = MemoryStore::new();
        let err = add_transaction(&store, "nope", 10.0, day(), "").await.unwrap_err();
        assert!(matches!(err, LedgerError::WalletNotFound(id) if id == "nope"));
    }

    #[tokio::test]
    async fn test_add_copies_wallet_fields_and_trims_notes() {
        let store = MemoryStore::new();
        let mut w = NewWallet::empty("u1", "Wants");
        w.allocated_amount = 500.0;
        let w = store.upsert_wallets(&[w]).await.unwrap().remove(0);

        let tx = add_transaction(&store, &w.id, 120.0, day(), "  movie  ").await.unwrap();
        assert_eq!(tx.category, "Wants");
        assert_eq!(tx.user_id, "u1");
        assert_eq!(tx.notes, "movie");

        let overview = wallet_overview(&store, "u1").await.unwrap();
        assert_eq!(overview.wallets[0].spent_amount, 120.0);
        assert_eq!(overview.transactions_for(&w.id).count(), 1);
    }

    #[tokio::test]
    async fn test_default_wallets_only_once() {
        let store = MemoryStore::new();
        let first = ensure_default_wallets(&store, "u1").await.unwrap();
        let names: Vec<_> = first.iter().map(|w| w.category.as_str()).collect();
        assert_eq!(names, ["Savings", "Wants", "Needs"]);

        let again = ensure_default_wallets(&store, "u1").await.unwrap();
        assert_eq!(again, first);
    }
}
