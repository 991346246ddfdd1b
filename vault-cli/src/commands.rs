use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use std::fs::File;
use std::path::Path;
use tracing::debug;
use vault_core::time::today_in;
use vault_core::{
    ActivityFilter, Currency, DashboardSummary, User, Wallet, active_suggestions,
    all_suggestions, merge_activity,
};
use vault_ingest::parse_sms;
use vault_ledger::{
    SimulatedInbox, Store, add_transaction, delete_transaction, ensure_default_wallets,
    load_settings, set_currency, set_salary_day, sync_bank_sms, toggle_theme, wallet_overview,
};

use crate::config::Config;
use crate::report;
use crate::state::{Session, require_session, write_session};

/// A signed-in session with its store opened.
pub struct App {
    pub cfg: Config,
    pub session: Session,
    pub store: Box<dyn Store>,
}

/// Match a wallet by id, or by category ignoring case.
pub fn find_wallet<'a>(wallets: &'a [Wallet], key: &str) -> Option<&'a Wallet> {
    let key = key.trim();
    wallets
        .iter()
        .find(|w| w.id == key)
        .or_else(|| wallets.iter().find(|w| w.category.eq_ignore_ascii_case(key)))
}

impl App {
    pub fn open(cfg: &Config) -> Result<Self> {
        let session = require_session()?;
        let store = cfg.open_store(Some(&session))?;
        Ok(Self { cfg: cfg.clone(), session, store })
    }

    fn user_id(&self) -> &str {
        &self.session.user_id
    }

    fn today(&self) -> Result<NaiveDate> {
        today_in(&self.cfg.general.timezone)
    }

    async fn user(&self) -> Result<User> {
        match self.store.get_user(self.user_id()).await? {
            Some(user) => Ok(user),
            None => bail!("No profile for {}. Run: vault auth login", self.user_id()),
        }
    }

    async fn currency(&self) -> Result<Currency> {
        Ok(self.user().await?.currency)
    }

    async fn wallets(&self) -> Result<Vec<Wallet>> {
        Ok(wallet_overview(&*self.store, self.user_id()).await?.wallets)
    }

    pub async fn dashboard(&self) -> Result<()> {
        let user = self.user().await?;
        if !user.is_registered() {
            println!("No income recorded yet. Run: vault setup");
            return Ok(());
        }
        let wallets = self.wallets().await?;
        let summary = DashboardSummary::compute(&user, &wallets, self.today()?);
        print!("{}", report::dashboard(&user.name, &summary, &wallets, user.currency));
        Ok(())
    }

    pub async fn wallets_list(&self) -> Result<()> {
        let currency = self.currency().await?;
        print!("{}", report::wallets_table(&self.wallets().await?, currency));
        Ok(())
    }

    pub async fn wallets_init(&self) -> Result<()> {
        let currency = self.currency().await?;
        let wallets = ensure_default_wallets(&*self.store, self.user_id()).await?;
        print!("{}", report::wallets_table(&wallets, currency));
        Ok(())
    }

    pub async fn tx_add(
        &self,
        wallet: &str,
        amount: f64,
        date: Option<NaiveDate>,
        notes: &str,
    ) -> Result<()> {
        let currency = self.currency().await?;
        let wallets = self.wallets().await?;
        let Some(target) = find_wallet(&wallets, wallet) else {
            bail!("No wallet named '{wallet}'. See: vault wallets list");
        };
        let date = match date {
            Some(d) => d,
            None => self.today()?,
        };

        let tx = add_transaction(&*self.store, &target.id, amount, date, notes).await?;
        println!(
            "Added {} to {} on {} [{}]",
            currency.format(tx.amount),
            tx.category,
            tx.date,
            tx.id
        );
        Ok(())
    }

    pub async fn tx_delete(&self, id: &str) -> Result<()> {
        match self.store.get_transaction(id).await? {
            Some(tx) if tx.user_id == self.user_id() => {}
            _ => bail!("No transaction with id {id}"),
        }
        let tx = delete_transaction(&*self.store, id).await?;
        let currency = self.currency().await?;
        println!("Deleted {} from {}", currency.format(tx.amount), tx.category);
        Ok(())
    }

    pub async fn tx_list(&self, wallet: Option<&str>) -> Result<()> {
        let currency = self.currency().await?;
        let overview = wallet_overview(&*self.store, self.user_id()).await?;
        let txs = match wallet {
            Some(key) => {
                let Some(w) = find_wallet(&overview.wallets, key) else {
                    bail!("No wallet named '{key}'. See: vault wallets list");
                };
                overview.transactions_for(&w.id).cloned().collect()
            }
            None => overview.transactions.clone(),
        };
        print!("{}", report::transactions_table(&txs, currency));
        Ok(())
    }

    pub async fn sms_sync(&self, file: Option<&Path>) -> Result<()> {
        let summary = match file {
            Some(path) => {
                let inbox = SimulatedInbox::from_file(path)?;
                debug!(path = %path.display(), messages = inbox.messages().len(), "inbox file");
                sync_bank_sms(&*self.store, &inbox, self.user_id()).await?
            }
            None => {
                let source = self.cfg.sms_source(&self.session)?;
                sync_bank_sms(&*self.store, &*source, self.user_id()).await?
            }
        };
        println!(
            "Fetched {}, imported {}, skipped {} already imported",
            summary.fetched, summary.inserted, summary.duplicates
        );
        Ok(())
    }

    pub async fn activity(&self, filter: ActivityFilter, csv: Option<&Path>) -> Result<()> {
        let currency = self.currency().await?;
        let (manual, bank) = tokio::try_join!(
            self.store.list_transactions(self.user_id()),
            self.store.list_bank_transactions(self.user_id())
        )?;
        let items = merge_activity(&manual, &bank, filter);

        if let Some(path) = csv {
            let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
            report::write_activity_csv(&items, file)?;
            println!("Wrote {} rows to {}", items.len(), path.display());
            return Ok(());
        }
        if items.is_empty() {
            println!("No transactions found. {}", filter.empty_hint());
            return Ok(());
        }
        print!("{}", report::activity_table(&items, currency));
        Ok(())
    }

    pub async fn settings_show(&self) -> Result<()> {
        let s = load_settings(&*self.store, self.user_id()).await?;
        println!("currency:   {}", s.currency.label());
        match s.salary_day {
            Some(day) => println!("salary day: {day}"),
            None => println!("salary day: not set"),
        }
        println!("theme:      {}", s.theme);
        Ok(())
    }

    pub async fn settings_currency(&self, currency: Currency) -> Result<()> {
        let s = set_currency(&*self.store, self.user_id(), currency).await?;
        println!("Currency set to {}", s.currency.label());
        Ok(())
    }

    pub async fn settings_salary_day(&self, day: u32) -> Result<()> {
        set_salary_day(&*self.store, self.user_id(), day).await?;
        println!("Salary day set to {day}");
        Ok(())
    }

    pub async fn settings_theme(&self) -> Result<()> {
        let s = toggle_theme(&*self.store, self.user_id()).await?;
        println!("Theme set to {}", s.theme);
        Ok(())
    }
}

pub fn sms_parse(text: &str, json: bool) -> Result<()> {
    match parse_sms(text) {
        Some(parsed) if json => println!("{}", serde_json::to_string_pretty(&parsed)?),
        Some(parsed) => print!("{}", report::parsed_sms(&parsed)),
        None => println!("Not a recognised bank SMS"),
    }
    Ok(())
}

/// Dismissals are kept in the session, per signed-in user.
pub fn suggestions(dismiss: &[String], reset: bool) -> Result<()> {
    let mut session = require_session()?;

    if reset || !dismiss.is_empty() {
        if reset {
            session.dismissed_suggestions.clear();
        }
        for id in dismiss {
            if !all_suggestions().iter().any(|s| s.id == id.as_str()) {
                bail!("Unknown suggestion id '{id}'");
            }
            if !session.dismissed_suggestions.contains(id) {
                session.dismissed_suggestions.push(id.clone());
            }
        }
        write_session(&session)?;
    }

    let active = active_suggestions(&session.dismissed_suggestions);
    if active.is_empty() {
        println!("No suggestions right now. Reset with: vault suggestions --reset");
    }
    for s in active {
        println!("{}", report::suggestion_card(s));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wallet(id: &str, category: &str) -> Wallet {
        Wallet {
            id: id.into(),
            user_id: "u1".into(),
            category: category.into(),
            allocated_percent: 0.0,
            allocated_amount: 0.0,
            spent_amount: 0.0,
        }
    }

    #[test]
    fn test_find_wallet_by_id_or_category() {
        let ws = vec![wallet("w1", "Needs"), wallet("w2", "Travel")];
        assert_eq!(find_wallet(&ws, "w2").map(|w| w.category.as_str()), Some("Travel"));
        assert_eq!(find_wallet(&ws, "needs").map(|w| w.id.as_str()), Some("w1"));
        assert_eq!(find_wallet(&ws, " NEEDS ").map(|w| w.id.as_str()), Some("w1"));
        assert!(find_wallet(&ws, "Wants").is_none());
    }
}
