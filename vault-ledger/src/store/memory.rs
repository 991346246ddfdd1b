//! In-process store, optionally persisted to a JSON snapshot file.
//!
//! All tables live behind one lock. Writes clone the tables, apply the change,
//! persist the snapshot and only then swap the new tables in, so a failed
//! write (validation or disk) leaves both memory and disk untouched.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;
use vault_core::{
    BankTransaction, NewBankTransaction, NewTransaction, NewWallet, Transaction, User, Wallet,
};

use super::{Store, tables};
use crate::error::StoreError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Tables {
    #[serde(default)]
    users: Vec<User>,
    #[serde(default)]
    wallets: Vec<Wallet>,
    #[serde(default)]
    transactions: Vec<Transaction>,
    #[serde(default)]
    bank_transactions: Vec<BankTransaction>,
}

pub struct MemoryStore {
    tables: Mutex<Tables>,
    snapshot: Option<PathBuf>,
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

impl MemoryStore {
    /// Empty store that lives only as long as the process.
    pub fn new() -> Self {
        Self { tables: Mutex::new(Tables::default()), snapshot: None }
    }

    /// Load `path` if it exists; every later write rewrites it.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let tables = match std::fs::read_to_string(&path) {
            Ok(s) => serde_json::from_str(&s)
                .map_err(|source| StoreError::Decode { what: "snapshot", source })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Tables::default(),
            Err(source) => return Err(StoreError::Snapshot { path, source }),
        };
        Ok(Self { tables: Mutex::new(tables), snapshot: Some(path) })
    }

    async fn read<T>(&self, f: impl FnOnce(&Tables) -> T) -> T {
        let guard = self.tables.lock().await;
        f(&guard)
    }

    async fn write<T>(
        &self,
        f: impl FnOnce(&mut Tables) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut guard = self.tables.lock().await;
        let mut draft = guard.clone();
        let out = f(&mut draft)?;
        self.persist(&draft).await?;
        *guard = draft;
        Ok(out)
    }

    async fn persist(&self, tables: &Tables) -> Result<(), StoreError> {
        let Some(path) = &self.snapshot else {
            return Ok(());
        };
        let json = serde_json::to_string_pretty(tables)
            .map_err(|source| StoreError::Decode { what: "snapshot", source })?;
        let snapshot_err = |source| StoreError::Snapshot { path: path.clone(), source };

        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await.map_err(snapshot_err)?;
        }
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await.map_err(snapshot_err)?;
        tokio::fs::rename(&tmp, path).await.map_err(snapshot_err)?;
        debug!(path = %path.display(), "snapshot written");
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get_user(&self, user_id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.read(|t| t.users.iter().find(|u| u.id == user_id).cloned()).await)
    }

    async fn upsert_user(&self, user: &User) -> Result<User, StoreError> {
        self.write(|t| {
            match t.users.iter_mut().find(|u| u.id == user.id) {
                Some(existing) => *existing = user.clone(),
                None => t.users.push(user.clone()),
            }
            Ok(user.clone())
        })
        .await
    }

    async fn list_wallets(&self, user_id: &str) -> Result<Vec<Wallet>, StoreError> {
        Ok(self
            .read(|t| t.wallets.iter().filter(|w| w.user_id == user_id).cloned().collect())
            .await)
    }

    async fn get_wallet(&self, wallet_id: &str) -> Result<Option<Wallet>, StoreError> {
        Ok(self.read(|t| t.wallets.iter().find(|w| w.id == wallet_id).cloned()).await)
    }

    async fn upsert_wallets(&self, wallets: &[NewWallet]) -> Result<Vec<Wallet>, StoreError> {
        self.write(|t| {
            let mut out = Vec::with_capacity(wallets.len());
            for new in wallets {
                let existing = t
                    .wallets
                    .iter_mut()
                    .find(|w| w.user_id == new.user_id && w.category == new.category);
                let row = match existing {
                    Some(w) => {
                        *w = new.clone().into_wallet(w.id.clone());
                        w.clone()
                    }
                    None => {
                        let w = new.clone().into_wallet(new_id());
                        t.wallets.push(w.clone());
                        w
                    }
                };
                out.push(row);
            }
            Ok(out)
        })
        .await
    }

    async fn list_transactions(&self, user_id: &str) -> Result<Vec<Transaction>, StoreError> {
        let mut rows: Vec<Transaction> = self
            .read(|t| t.transactions.iter().rev().filter(|x| x.user_id == user_id).cloned().collect())
            .await;
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(rows)
    }

    async fn get_transaction(
        &self,
        transaction_id: &str,
    ) -> Result<Option<Transaction>, StoreError> {
        Ok(self
            .read(|t| t.transactions.iter().find(|x| x.id == transaction_id).cloned())
            .await)
    }

    async fn commit_spend(&self, tx: &NewTransaction) -> Result<(Transaction, Wallet), StoreError> {
        self.write(|t| {
            let wallet = t.wallets.iter_mut().find(|w| w.id == tx.wallet_id).ok_or_else(|| {
                StoreError::NotFound { table: tables::WALLETS, id: tx.wallet_id.clone() }
            })?;
            if !wallet.can_spend(tx.amount) {
                return Err(StoreError::InsufficientBalance {
                    available: wallet.available(),
                    requested: tx.amount,
                });
            }
            wallet.spent_amount += tx.amount;
            let wallet = wallet.clone();

            let row = tx.clone().into_transaction(new_id());
            t.transactions.push(row.clone());
            Ok((row, wallet))
        })
        .await
    }

    async fn revert_spend(
        &self,
        transaction_id: &str,
    ) -> Result<(Transaction, Wallet), StoreError> {
        self.write(|t| {
            let pos = t.transactions.iter().position(|x| x.id == transaction_id).ok_or_else(
                || StoreError::NotFound {
                    table: tables::TRANSACTIONS,
                    id: transaction_id.to_string(),
                },
            )?;
            let row = t.transactions.remove(pos);

            let wallet = t.wallets.iter_mut().find(|w| w.id == row.wallet_id).ok_or_else(|| {
                StoreError::NotFound { table: tables::WALLETS, id: row.wallet_id.clone() }
            })?;
            wallet.spent_amount = (wallet.spent_amount - row.amount).max(0.0);
            let wallet = wallet.clone();
            Ok((row, wallet))
        })
        .await
    }

    async fn list_bank_transactions(
        &self,
        user_id: &str,
    ) -> Result<Vec<BankTransaction>, StoreError> {
        let mut rows: Vec<BankTransaction> = self
            .read(|t| {
                t.bank_transactions.iter().rev().filter(|b| b.user_id == user_id).cloned().collect()
            })
            .await;
        rows.sort_by(|a, b| b.transaction_date.cmp(&a.transaction_date));
        Ok(rows)
    }

    async fn insert_bank_transactions(
        &self,
        rows: &[NewBankTransaction],
    ) -> Result<Vec<BankTransaction>, StoreError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let now = Utc::now();
        self.write(|t| {
            let inserted: Vec<BankTransaction> = rows
                .iter()
                .map(|r| r.clone().into_bank_transaction(new_id(), now))
                .collect();
            t.bank_transactions.extend(inserted.iter().cloned());
            Ok(inserted)
        })
        .await
    }
}
