//! Combined activity feed of manual and SMS-derived transactions.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;

use crate::{BankTransaction, Transaction};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ActivitySource {
    Manual,
    Bank,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActivityFilter {
    #[default]
    All,
    Manual,
    Bank,
}

impl ActivityFilter {
    pub fn accepts(&self, source: ActivitySource) -> bool {
        match self {
            ActivityFilter::All => true,
            ActivityFilter::Manual => source == ActivitySource::Manual,
            ActivityFilter::Bank => source == ActivitySource::Bank,
        }
    }

    /// Hint shown when the filtered feed is empty.
    pub fn empty_hint(&self) -> &'static str {
        match self {
            ActivityFilter::All => "Start by adding manual transactions or syncing bank SMS.",
            ActivityFilter::Manual => "Add your first manual transaction with `vault tx add`.",
            ActivityFilter::Bank => "Sync your bank SMS to see automatic transactions.",
        }
    }
}

impl FromStr for ActivityFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(ActivityFilter::All),
            "manual" => Ok(ActivityFilter::Manual),
            "bank" => Ok(ActivityFilter::Bank),
            other => Err(format!("unknown filter '{other}' (expected all, manual or bank)")),
        }
    }
}

/// One row of the feed, flattened for display and CSV export.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ActivityItem {
    pub id: String,
    pub source: ActivitySource,
    pub date: NaiveDate,
    /// Wallet category for manual entries, bank name for SMS entries
    pub label: String,
    /// Positive = money in, negative = money out
    pub amount: f64,
    pub details: String,
}

impl From<&Transaction> for ActivityItem {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: tx.id.clone(),
            source: ActivitySource::Manual,
            date: tx.date,
            label: tx.category.clone(),
            amount: -tx.amount,
            details: tx.notes.clone(),
        }
    }
}

impl From<&BankTransaction> for ActivityItem {
    fn from(tx: &BankTransaction) -> Self {
        let mut details = format!("A/c {}", tx.account_number);
        if let Some(reference) = &tx.reference_number {
            details.push_str(&format!(" | Ref {reference}"));
        }
        if !tx.description.is_empty() {
            details.push_str(&format!(" | {}", tx.description));
        }
        Self {
            id: tx.id.clone(),
            source: ActivitySource::Bank,
            date: tx.transaction_date,
            label: tx.bank_name.clone(),
            amount: tx.transaction_type.signed(tx.amount),
            details,
        }
    }
}

/// Merge both sources, apply the filter, newest first.
pub fn merge_activity(
    manual: &[Transaction],
    bank: &[BankTransaction],
    filter: ActivityFilter,
) -> Vec<ActivityItem> {
    let mut items: Vec<ActivityItem> = manual
        .iter()
        .map(ActivityItem::from)
        .chain(bank.iter().map(ActivityItem::from))
        .filter(|item| filter.accepts(item.source))
        .collect();

    // stable: equal dates keep manual-before-bank insertion order
    items.sort_by(|a, b| b.date.cmp(&a.date));
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TransactionType;
    use chrono::{TimeZone, Utc};

    fn manual(id: &str, day: u32) -> Transaction {
        Transaction {
            id: id.to_string(),
            user_id: "u1".to_string(),
            wallet_id: "w1".to_string(),
            category: "Needs".to_string(),
            amount: 100.0,
            date: NaiveDate::from_ymd_opt(2025, 6, day).unwrap(),
            notes: "groceries".to_string(),
        }
    }

    fn bank(id: &str, day: u32) -> BankTransaction {
        BankTransaction {
            id: id.to_string(),
            user_id: "u1".to_string(),
            bank_name: "Saraswat Bank".to_string(),
            account_number: "XX2037".to_string(),
            transaction_type: TransactionType::Debit,
            amount: 32.0,
            balance: Some(465.88),
            transaction_date: NaiveDate::from_ymd_opt(2025, 6, day).unwrap(),
            reference_number: Some("106817245599".to_string()),
            description: "UPI to q164592387@ybl".to_string(),
            sms_text: format!("sms-{id}"),
            created_at: Utc.with_ymd_and_hms(2025, 6, day, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_merge_sorts_newest_first() {
        let items = merge_activity(
            &[manual("m1", 10), manual("m2", 21)],
            &[bank("b1", 15)],
            ActivityFilter::All,
        );
        let ids: Vec<_> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["m2", "b1", "m1"]);
        assert_eq!(items[0].amount, -100.0);
        assert_eq!(items[1].amount, -32.0);
        assert!(items[1].details.contains("Ref 106817245599"));
    }

    #[test]
    fn test_filters() {
        let m = [manual("m1", 10)];
        let b = [bank("b1", 15)];
        assert_eq!(merge_activity(&m, &b, ActivityFilter::Manual).len(), 1);
        assert_eq!(merge_activity(&m, &b, ActivityFilter::Bank)[0].id, "b1");
        assert!(merge_activity(&[], &[], ActivityFilter::All).is_empty());
    }

    #[test]
    fn test_parse_filter() {
        assert_eq!("BANK".parse::<ActivityFilter>().unwrap(), ActivityFilter::Bank);
        assert!("sms".parse::<ActivityFilter>().is_err());
    }
}
