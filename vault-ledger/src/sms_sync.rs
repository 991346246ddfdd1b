//! Pull bank SMS from a source and store the ones not seen before.

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};
use vault_core::{NewBankTransaction, TransactionType};
use vault_ingest::parsers::parse_amount;
use vault_ingest::{SmsText, dedup_against, parse_batch};

use crate::error::SyncError;
use crate::store::Store;

/// Messages used when no real inbox is available.
pub const SAMPLE_INBOX: [&str; 3] = [
    "Rs.5000.00 credited to A/c XX1234 on 15/12/2023. UPI Ref: 123456789",
    "Rs.1000.00 debited from A/c XX5678 on 16/12/2023. Available Bal: Rs.25000.00",
    "Rs.2500.00 credited to A/c XX9012 on 17/12/2023. UPI Ref: 987654321",
];

#[async_trait]
pub trait SmsSource: Send + Sync {
    fn name(&self) -> &str;

    /// Bank transactions ready to insert for `user_id`. May include messages
    /// that are already stored; [`sync_bank_sms`] filters those.
    async fn fetch(&self, user_id: &str) -> Result<Vec<NewBankTransaction>, SyncError>;
}

/// A fixed list of raw messages parsed locally.
#[derive(Debug, Clone)]
pub struct SimulatedInbox {
    messages: Vec<String>,
}

impl SimulatedInbox {
    pub fn new<I, S>(messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { messages: messages.into_iter().map(Into::into).collect() }
    }

    pub fn sample() -> Self {
        Self::new(SAMPLE_INBOX)
    }

    /// One message per non-empty line.
    pub fn from_file(path: &Path) -> Result<Self, SyncError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| SyncError::Inbox { path: path.to_path_buf(), source })?;
        Ok(Self::new(text.lines().map(str::trim).filter(|l| !l.is_empty())))
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}

#[async_trait]
impl SmsSource for SimulatedInbox {
    fn name(&self) -> &str {
        "simulated"
    }

    async fn fetch(&self, user_id: &str) -> Result<Vec<NewBankTransaction>, SyncError> {
        let parsed = parse_batch(&self.messages);
        debug!(messages = self.messages.len(), matched = parsed.len(), "inbox parsed");
        Ok(parsed.into_iter().map(|p| p.into_new_bank_transaction(user_id)).collect())
    }
}

/// HTTP service that reads and parses the inbox server-side.
pub struct RemoteSmsApi {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SyncRequest<'a> {
    api_key: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct RemoteSyncResponse {
    #[serde(default)]
    pub user: Value,
    #[serde(default)]
    pub transactions: Vec<RemoteTransaction>,
    #[serde(default)]
    pub metadata: Value,
}

/// A transaction as the SMS service reports it. Loosely typed: amounts may be
/// numbers or strings and dates come in several layouts.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteTransaction {
    #[serde(default)]
    pub bank_name: String,
    #[serde(default)]
    pub account_number: String,
    pub transaction_type: String,
    pub amount: Value,
    #[serde(default)]
    pub balance: Value,
    pub transaction_date: String,
    #[serde(default)]
    pub reference_number: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub sms_text: String,
}

fn number(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_amount(s),
        _ => None,
    }
}

/// ISO date, RFC 3339 timestamp, or day-first `dd/mm/yyyy` / `dd-mm-yyyy`.
pub fn parse_remote_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.date_naive());
    }
    ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"]
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
}

impl RemoteTransaction {
    /// `None` when the type, amount or date cannot be read.
    pub fn into_new_bank_transaction(self, user_id: &str) -> Option<NewBankTransaction> {
        let transaction_type = TransactionType::from_verb(&self.transaction_type)?;
        let amount = number(&self.amount)?;
        let transaction_date = parse_remote_date(&self.transaction_date)?;
        let reference_number = self.reference_number.filter(|r| !r.trim().is_empty());

        // Without the raw text, fall back to a key built from the fields so
        // repeated syncs still dedup.
        let sms_text = if self.sms_text.trim().is_empty() {
            format!(
                "{}|{}|{}|{}|{}|{}",
                self.bank_name,
                self.account_number,
                transaction_type,
                amount,
                transaction_date,
                reference_number.as_deref().unwrap_or_default()
            )
        } else {
            self.sms_text
        };

        Some(NewBankTransaction {
            user_id: user_id.to_string(),
            bank_name: self.bank_name,
            account_number: self.account_number,
            transaction_type,
            amount,
            balance: number(&self.balance),
            transaction_date,
            reference_number,
            description: self.description,
            sms_text,
        })
    }
}

impl RemoteSmsApi {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self { client: Client::new(), base_url: base_url.into(), api_key }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/transactions", self.base_url.trim_end_matches('/'))
    }

    pub fn decode(body: &str) -> Result<RemoteSyncResponse, serde_json::Error> {
        serde_json::from_str(body)
    }
}

#[async_trait]
impl SmsSource for RemoteSmsApi {
    fn name(&self) -> &str {
        "remote"
    }

    async fn fetch(&self, user_id: &str) -> Result<Vec<NewBankTransaction>, SyncError> {
        let api_key = self.api_key.as_deref().ok_or(SyncError::MissingApiKey)?;
        let url = self.endpoint();
        debug!(%url, "fetching transactions");

        let resp = self.client.post(&url).json(&SyncRequest { api_key }).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(%status, "SMS API request failed");
            return Err(SyncError::Status { status, body });
        }
        let payload: RemoteSyncResponse = resp.json().await?;

        let total = payload.transactions.len();
        let rows: Vec<_> = payload
            .transactions
            .into_iter()
            .filter_map(|t| t.into_new_bank_transaction(user_id))
            .collect();
        if rows.len() < total {
            warn!(skipped = total - rows.len(), "unreadable transactions from SMS API");
        }
        Ok(rows)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub fetched: usize,
    pub inserted: usize,
    pub duplicates: usize,
}

/// Fetch from `source`, drop messages already stored for the user (or
/// repeated within the batch) and insert the rest.
pub async fn sync_bank_sms<S, Src>(
    store: &S,
    source: &Src,
    user_id: &str,
) -> Result<SyncReport, SyncError>
where
    S: Store + ?Sized,
    Src: SmsSource + ?Sized,
{
    let (fetched, existing) =
        tokio::join!(source.fetch(user_id), store.list_bank_transactions(user_id));
    let fetched = fetched?;
    let existing = existing?;

    let count = fetched.len();
    let (fresh, duplicates) =
        dedup_against(fetched, existing.iter().map(|b| b.sms_text()));
    let inserted = store.insert_bank_transactions(&fresh).await?.len();

    let report = SyncReport { fetched: count, inserted, duplicates };
    info!(source = source.name(), fetched = count, inserted, duplicates, "sms sync finished");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_dates() {
        let d = NaiveDate::from_ymd_opt(2023, 12, 15).unwrap();
        for s in ["2023-12-15", "15/12/2023", "15-12-2023", "2023-12-15T10:30:00Z"] {
            assert_eq!(parse_remote_date(s), Some(d), "{s}");
        }
        assert_eq!(parse_remote_date("yesterday"), None);
    }

    #[test]
    fn test_remote_payload_decodes() {
        let body = r#"{
            "user": {"id": "abc"},
            "transactions": [
                {"bank_name": "HDFC Bank", "account_number": "XX1234", "transaction_type": "credit",
                 "amount": 5000, "balance": null, "transaction_date": "15/12/2023",
                 "reference_number": "", "description": "", "sms_text": "Rs.5000.00 credited"},
                {"bank_name": "Axis Bank", "account_number": "XX4321", "transaction_type": "debited",
                 "amount": "1,250.50", "transaction_date": "2023-12-16"},
                {"transaction_type": "refund", "amount": 1, "transaction_date": "2023-12-16"}
            ],
            "metadata": {"count": 3}
        }"#;
        let resp = RemoteSmsApi::decode(body).unwrap();
        let rows: Vec<_> = resp
            .transactions
            .into_iter()
            .filter_map(|t| t.into_new_bank_transaction("u1"))
            .collect();
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].amount, 5000.0);
        assert_eq!(rows[0].reference_number, None);
        assert_eq!(rows[0].sms_text, "Rs.5000.00 credited");

        assert_eq!(rows[1].transaction_type, TransactionType::Debit);
        assert_eq!(rows[1].amount, 1250.5);
        assert_eq!(rows[1].sms_text, "Axis Bank|XX4321|debit|1250.5|2023-12-16|");
    }

    #[test]
    fn test_endpoint_and_request_body() {
        let api = RemoteSmsApi::new("https://sms.example.com/", Some("k".into()));
        assert_eq!(api.endpoint(), "https://sms.example.com/transactions");
        let body = serde_json::to_string(&SyncRequest { api_key: "k" }).unwrap();
        assert_eq!(body, r#"{"apiKey":"k"}"#);
    }

    #[tokio::test]
    async fn test_remote_without_key() {
        let api = RemoteSmsApi::new("http://127.0.0.1:9", None);
        assert!(matches!(api.fetch("u1").await, Err(SyncError::MissingApiKey)));
    }

    #[tokio::test]
    async fn test_sample_inbox_parses_every_message() {
        let rows = SimulatedInbox::sample().fetch("u1").await.unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.user_id == "u1"));
        assert_eq!(rows[1].bank_name, "State Bank of India");
    }
}
