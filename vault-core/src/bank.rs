//! Bank transactions captured from SMS notifications.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Credit,
    Debit,
}

impl TransactionType {
    /// Map the verb used in bank SMS ("credited"/"debited") to a type.
    pub fn from_verb(verb: &str) -> Option<Self> {
        match verb.to_lowercase().as_str() {
            "credited" | "credit" => Some(TransactionType::Credit),
            "debited" | "debit" => Some(TransactionType::Debit),
            _ => None,
        }
    }

    /// Positive for credits, negative for debits.
    pub fn signed(&self, amount: f64) -> f64 {
        match self {
            TransactionType::Credit => amount,
            TransactionType::Debit => -amount,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionType::Credit => f.write_str("credit"),
            TransactionType::Debit => f.write_str("debit"),
        }
    }
}

/// A row of the `bank_transactions` table. Never updated once written.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BankTransaction {
    pub id: String,
    pub user_id: String,
    pub bank_name: String,
    pub account_number: String,
    pub transaction_type: TransactionType,
    pub amount: f64,
    /// Balance after the transaction, when the SMS carries it
    #[serde(default)]
    pub balance: Option<f64>,
    pub transaction_date: NaiveDate,
    #[serde(default)]
    pub reference_number: Option<String>,
    #[serde(default)]
    pub description: String,
    /// Raw message text; used to skip messages that were already imported
    pub sms_text: String,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for the `bank_transactions` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewBankTransaction {
    pub user_id: String,
    pub bank_name: String,
    pub account_number: String,
    pub transaction_type: TransactionType,
    pub amount: f64,
    pub balance: Option<f64>,
    pub transaction_date: NaiveDate,
    pub reference_number: Option<String>,
    pub description: String,
    pub sms_text: String,
}

impl NewBankTransaction {
    pub fn into_bank_transaction(
        self,
        id: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> BankTransaction {
        BankTransaction {
            id: id.into(),
            user_id: self.user_id,
            bank_name: self.bank_name,
            account_number: self.account_number,
            transaction_type: self.transaction_type,
            amount: self.amount,
            balance: self.balance,
            transaction_date: self.transaction_date,
            reference_number: self.reference_number,
            description: self.description,
            sms_text: self.sms_text,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_verb() {
        assert_eq!(TransactionType::from_verb("Credited"), Some(TransactionType::Credit));
        assert_eq!(TransactionType::from_verb("DEBITED"), Some(TransactionType::Debit));
        assert_eq!(TransactionType::from_verb("reversed"), None);
    }

    #[test]
    fn test_signed_amounts() {
        assert_eq!(TransactionType::Credit.signed(10.0), 10.0);
        assert_eq!(TransactionType::Debit.signed(10.0), -10.0);
    }

    #[test]
    fn test_row_uses_lowercase_type() {
        let row = r#"{"id":"b1","user_id":"u1","bank_name":"HDFC Bank","account_number":"XX1234",
            "transaction_type":"credit","amount":5000.0,"balance":null,
            "transaction_date":"2023-12-15","reference_number":null,"description":"",
            "sms_text":"Rs.5000.00 credited","created_at":"2023-12-15T10:00:00Z"}"#;
        let tx: BankTransaction = serde_json::from_str(row).unwrap();
        assert_eq!(tx.transaction_type, TransactionType::Credit);
        assert_eq!(tx.transaction_date, NaiveDate::from_ymd_opt(2023, 12, 15).unwrap());
        assert_eq!(tx.balance, None);
    }
}
