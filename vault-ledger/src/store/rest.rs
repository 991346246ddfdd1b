//! PostgREST-backed store (`{url}/rest/v1/...`).
//!
//! Row filters use the `column=eq.value` form, writes ask for the stored rows
//! back with `Prefer: return=representation`, and wallet spends go through
//! the `commit_wallet_spend` / `revert_wallet_spend` functions defined in
//! `sql/wallet_spend.sql` so the balance check and both writes share one
//! database transaction.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use vault_core::{
    BankTransaction, NewBankTransaction, NewTransaction, NewWallet, Transaction, User, Wallet,
};

use super::{Store, tables};
use crate::error::StoreError;

const RETURN_ROWS: &str = "return=representation";
const UPSERT_ROWS: &str = "return=representation,resolution=merge-duplicates";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RestConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`
    pub url: String,
    pub anon_key: String,
    /// Signed-in user's token; requests fall back to the anon key without it
    #[serde(default)]
    pub access_token: Option<String>,
}

impl RestConfig {
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/rest/v1/{}", self.url.trim_end_matches('/'), path)
    }

    pub fn headers(&self) -> Result<HeaderMap, StoreError> {
        let token = self.access_token.as_deref().unwrap_or(&self.anon_key);
        let mut headers = HeaderMap::new();
        headers.insert("apikey", header_value(&self.anon_key)?);
        headers.insert(AUTHORIZATION, header_value(&format!("Bearer {token}"))?);
        Ok(headers)
    }
}

fn header_value(s: &str) -> Result<HeaderValue, StoreError> {
    HeaderValue::from_str(s).map_err(|_| StoreError::Status {
        status: StatusCode::UNAUTHORIZED,
        body: "credentials contain characters not allowed in a header".to_string(),
    })
}

/// `column=eq.value` filter pair for `.query(...)`.
fn eq(column: &'static str, value: &str) -> (&'static str, String) {
    (column, format!("eq.{value}"))
}

#[derive(Debug, Serialize)]
struct SpendArgs<'a> {
    p_user_id: &'a str,
    p_wallet_id: &'a str,
    p_category: &'a str,
    p_amount: f64,
    p_date: chrono::NaiveDate,
    p_notes: &'a str,
}

impl<'a> From<&'a NewTransaction> for SpendArgs<'a> {
    fn from(tx: &'a NewTransaction) -> Self {
        Self {
            p_user_id: &tx.user_id,
            p_wallet_id: &tx.wallet_id,
            p_category: &tx.category,
            p_amount: tx.amount,
            p_date: tx.date,
            p_notes: &tx.notes,
        }
    }
}

#[derive(Debug, Serialize)]
struct RevertArgs<'a> {
    p_transaction_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct SpendOutcome {
    transaction: Transaction,
    wallet: Wallet,
}

/// Error body PostgREST returns for a failed request or a raised exception.
#[derive(Debug, Default, Deserialize)]
struct PgError {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    details: Option<String>,
    #[serde(default)]
    hint: Option<String>,
}

/// Map an error response to a [`StoreError`].
///
/// The spend functions raise `insufficient_balance` with
/// `available=<n>;requested=<n>` in the details, and `not_found` with the
/// table name in the hint and the row id in the details.
pub fn decode_error(status: StatusCode, body: &str) -> StoreError {
    let pg: PgError = serde_json::from_str(body).unwrap_or_default();
    match pg.message.as_deref() {
        Some("insufficient_balance") => {
            let details = pg.details.as_deref().unwrap_or_default();
            if let (Some(available), Some(requested)) =
                (detail_number(details, "available"), detail_number(details, "requested"))
            {
                return StoreError::InsufficientBalance { available, requested };
            }
        }
        Some("not_found") => {
            let table = match pg.hint.as_deref() {
                Some(tables::WALLETS) => Some(tables::WALLETS),
                Some(tables::TRANSACTIONS) => Some(tables::TRANSACTIONS),
                Some(tables::USERS) => Some(tables::USERS),
                _ => None,
            };
            if let Some(table) = table {
                return StoreError::NotFound { table, id: pg.details.unwrap_or_default() };
            }
        }
        _ => {}
    }
    StoreError::Status { status, body: body.to_string() }
}

fn detail_number(details: &str, key: &str) -> Option<f64> {
    details
        .split(';')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| k.trim() == key)
        .and_then(|(_, v)| v.trim().parse().ok())
}

pub struct RestStore {
    client: Client,
    config: RestConfig,
}

impl RestStore {
    pub fn new(config: RestConfig) -> Self {
        Self { client: Client::new(), config }
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, StoreError> {
        let url = self.config.endpoint(path);
        debug!(%method, %url, "store request");
        Ok(self.client.request(method, url).headers(self.config.headers()?))
    }

    async fn send<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
        what: &'static str,
    ) -> Result<T, StoreError> {
        let resp = req.send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            warn!(%status, what, "store request failed");
            return Err(decode_error(status, &body));
        }
        serde_json::from_str(&body).map_err(|source| StoreError::Decode { what, source })
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &'static str,
        filters: &[(&'static str, String)],
    ) -> Result<Vec<T>, StoreError> {
        let req = self.request(Method::GET, table)?.query(&[("select", "*")]).query(filters);
        self.send(req, table).await
    }
}

fn single<T>(rows: Vec<T>, table: &'static str, id: &str) -> Result<T, StoreError> {
    rows.into_iter().next().ok_or_else(|| StoreError::NotFound { table, id: id.to_string() })
}

#[async_trait]
impl Store for RestStore {
    async fn get_user(&self, user_id: &str) -> Result<Option<User>, StoreError> {
        let rows: Vec<User> = self.select(tables::USERS, &[eq("id", user_id)]).await?;
        Ok(rows.into_iter().next())
    }

    async fn upsert_user(&self, user: &User) -> Result<User, StoreError> {
        let req = self
            .request(Method::POST, tables::USERS)?
            .query(&[("on_conflict", "id")])
            .header("Prefer", UPSERT_ROWS)
            .json(&[user]);
        single(self.send(req, tables::USERS).await?, tables::USERS, &user.id)
    }

    async fn list_wallets(&self, user_id: &str) -> Result<Vec<Wallet>, StoreError> {
        self.select(tables::WALLETS, &[eq("user_id", user_id)]).await
    }

    async fn get_wallet(&self, wallet_id: &str) -> Result<Option<Wallet>, StoreError> {
        let rows: Vec<Wallet> = self.select(tables::WALLETS, &[eq("id", wallet_id)]).await?;
        Ok(rows.into_iter().next())
    }

    async fn upsert_wallets(&self, wallets: &[NewWallet]) -> Result<Vec<Wallet>, StoreError> {
        if wallets.is_empty() {
            return Ok(Vec::new());
        }
        let req = self
            .request(Method::POST, tables::WALLETS)?
            .query(&[("on_conflict", "user_id,category")])
            .header("Prefer", UPSERT_ROWS)
            .json(wallets);
        self.send(req, tables::WALLETS).await
    }

    async fn list_transactions(&self, user_id: &str) -> Result<Vec<Transaction>, StoreError> {
        let filters = [eq("user_id", user_id), ("order", "date.desc".to_string())];
        self.select(tables::TRANSACTIONS, &filters).await
    }

    async fn get_transaction(
        &self,
        transaction_id: &str,
    ) -> Result<Option<Transaction>, StoreError> {
        let rows: Vec<Transaction> =
            self.select(tables::TRANSACTIONS, &[eq("id", transaction_id)]).await?;
        Ok(rows.into_iter().next())
    }

    async fn commit_spend(&self, tx: &NewTransaction) -> Result<(Transaction, Wallet), StoreError> {
        let req = self
            .request(Method::POST, "rpc/commit_wallet_spend")?
            .json(&SpendArgs::from(tx));
        let out: SpendOutcome = self.send(req, "commit_wallet_spend").await?;
        Ok((out.transaction, out.wallet))
    }

    async fn revert_spend(
        &self,
        transaction_id: &str,
    ) -> Result<(Transaction, Wallet), StoreError> {
        let req = self
            .request(Method::POST, "rpc/revert_wallet_spend")?
            .json(&RevertArgs { p_transaction_id: transaction_id });
        let out: SpendOutcome = self.send(req, "revert_wallet_spend").await?;
        Ok((out.transaction, out.wallet))
    }

    async fn list_bank_transactions(
        &self,
        user_id: &str,
    ) -> Result<Vec<BankTransaction>, StoreError> {
        let filters = [eq("user_id", user_id), ("order", "transaction_date.desc".to_string())];
        self.select(tables::BANK_TRANSACTIONS, &filters).await
    }

    async fn insert_bank_transactions(
        &self,
        rows: &[NewBankTransaction],
    ) -> Result<Vec<BankTransaction>, StoreError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let req = self
            .request(Method::POST, tables::BANK_TRANSACTIONS)?
            .header("Prefer", RETURN_ROWS)
            .json(rows);
        self.send(req, tables::BANK_TRANSACTIONS).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> RestConfig {
        RestConfig {
            url: "https://db.example.com/".into(),
            anon_key: "anon".into(),
            access_token: None,
        }
    }

    #[test]
    fn test_endpoint_and_headers() {
        let mut c = config();
        assert_eq!(c.endpoint("wallets"), "https://db.example.com/rest/v1/wallets");

        let h = c.headers().unwrap();
        assert_eq!(h["apikey"], "anon");
        assert_eq!(h[AUTHORIZATION], "Bearer anon");

        c.access_token = Some("user-jwt".into());
        assert_eq!(c.headers().unwrap()[AUTHORIZATION], "Bearer user-jwt");
    }

    #[test]
    fn test_eq_filter() {
        assert_eq!(eq("user_id", "u1"), ("user_id", "eq.u1".to_string()));
    }

    #[test]
    fn test_decode_insufficient_balance() {
        let body = r#"{"code":"P0001","message":"insufficient_balance","details":"available=120.5;requested=300","hint":"wallets"}"#;
        match decode_error(StatusCode::BAD_REQUEST, body) {
            StoreError::InsufficientBalance { available, requested } => {
                assert_eq!(available, 120.5);
                assert_eq!(requested, 300.0);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_decode_not_found() {
        let body = r#"{"code":"P0002","message":"not_found","details":"tx-9","hint":"transactions"}"#;
        let err = decode_error(StatusCode::BAD_REQUEST, body);
        assert!(matches!(err, StoreError::NotFound { table: "transactions", ref id } if id == "tx-9"));
    }

    #[test]
    fn test_decode_other_errors_keep_body() {
        let err = decode_error(StatusCode::UNAUTHORIZED, "JWT expired");
        assert!(matches!(err, StoreError::Status { status, ref body }
            if status == StatusCode::UNAUTHORIZED && body == "JWT expired"));
    }

    #[test]
    fn test_spend_outcome_decodes() {
        let body = r#"{
            "transaction": {"id":"t1","user_id":"u1","wallet_id":"w1","category":"Needs","amount":250,"date":"2024-03-01","notes":"groceries"},
            "wallet": {"id":"w1","user_id":"u1","category":"Needs","allocated_percent":50,"allocated_amount":25000,"spent_amount":250}
        }"#;
        let out: SpendOutcome = serde_json::from_str(body).unwrap();
        assert_eq!(out.transaction.amount, 250.0);
        assert_eq!(out.wallet.available(), 24750.0);
    }
}
