use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use vault_core::{NewBankTransaction, TransactionType};

/// Structured result of matching one bank SMS (bank-agnostic).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedSms {
    pub bank: String,
    /// Masked account identifier as printed in the SMS (e.g. XX1234)
    pub account: String,
    pub transaction_type: TransactionType,
    pub amount: f64,
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    /// UPI counter-party, for formats that carry one
    pub vpa: Option<String>,
    pub reference_number: Option<String>,
    /// Account balance after the transaction, when printed
    pub balance: Option<f64>,
    /// The raw message this was parsed from
    pub sms_text: String,
}

impl ParsedSms {
    /// Short human description, e.g. "UPI to q164592387@ybl".
    pub fn description(&self) -> String {
        match &self.vpa {
            Some(vpa) => match self.transaction_type {
                TransactionType::Debit => format!("UPI to {vpa}"),
                TransactionType::Credit => format!("UPI from {vpa}"),
            },
            None => String::new(),
        }
    }

    pub fn into_new_bank_transaction(self, user_id: &str) -> NewBankTransaction {
        let description = self.description();
        NewBankTransaction {
            user_id: user_id.to_string(),
            bank_name: self.bank,
            account_number: self.account,
            transaction_type: self.transaction_type,
            amount: self.amount,
            balance: self.balance,
            transaction_date: self.date,
            reference_number: self.reference_number,
            description,
            sms_text: self.sms_text,
        }
    }
}
