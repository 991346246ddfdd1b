//! Manual transactions recorded against a wallet.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    pub wallet_id: String,
    /// Copied from the wallet when the transaction is created
    #[serde(default)]
    pub category: String,
    pub amount: f64,
    pub date: NaiveDate,
    #[serde(default)]
    pub notes: String,
}

/// Insert payload for the `transactions` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewTransaction {
    pub user_id: String,
    pub wallet_id: String,
    pub category: String,
    pub amount: f64,
    pub date: NaiveDate,
    pub notes: String,
}

impl NewTransaction {
    pub fn into_transaction(self, id: impl Into<String>) -> Transaction {
        Transaction {
            id: id.into(),
            user_id: self.user_id,
            wallet_id: self.wallet_id,
            category: self.category,
            amount: self.amount,
            date: self.date,
            notes: self.notes,
        }
    }
}
