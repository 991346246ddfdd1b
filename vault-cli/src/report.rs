//! Plain-text views printed by the commands.

use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::io;
use vault_core::{
    ActivityItem, Currency, DashboardSummary, Suggestion, Transaction, UsageLevel, Wallet,
    check_wallets,
};
use vault_ingest::ParsedSms;

fn usage_marker(level: UsageLevel) -> &'static str {
    match level {
        UsageLevel::Healthy => "",
        UsageLevel::Warning => "  !",
        UsageLevel::Critical => "  !!",
    }
}

pub fn wallets_table(wallets: &[Wallet], currency: Currency) -> String {
    let mut out = String::new();
    if wallets.is_empty() {
        out.push_str("No wallets yet. Run: vault setup (or vault wallets init)\n");
        return out;
    }
    for w in wallets {
        let _ = writeln!(
            out,
            "{:<12} {:>4.0}%  spent {:>14} of {:>14}  available {:>14}  ({:.0}% used){}",
            w.category,
            w.allocated_percent,
            currency.format(w.spent_amount),
            currency.format(w.allocated_amount),
            currency.format(w.available()),
            w.usage_percent(),
            usage_marker(w.usage_level()),
        );
    }
    for issue in check_wallets(wallets) {
        let _ = writeln!(out, "warning: {issue}");
    }
    out
}

pub fn dashboard(
    name: &str,
    summary: &DashboardSummary,
    wallets: &[Wallet],
    currency: Currency,
) -> String {
    let mut out = String::new();
    let greeting = if name.trim().is_empty() { "there" } else { name.trim() };
    let _ = writeln!(out, "Hi {greeting}\n");
    let _ = writeln!(out, "Income      {}", currency.format(summary.income));
    let _ = writeln!(out, "Spent       {}", currency.format(summary.total_spent));
    let _ = writeln!(
        out,
        "Remaining   {} ({:.1}%)",
        currency.format(summary.remaining),
        summary.remaining_percent
    );
    match summary.days_until_deposit {
        Some(1) => out.push_str("Next salary in 1 day\n"),
        Some(days) => {
            let _ = writeln!(out, "Next salary in {days} days");
        }
        None => out.push_str("Salary day not set (vault settings salary-day <1-31>)\n"),
    }
    out.push('\n');
    out.push_str(&wallets_table(wallets, currency));
    out
}

pub fn transactions_table(txs: &[Transaction], currency: Currency) -> String {
    let mut out = String::new();
    if txs.is_empty() {
        out.push_str("No transactions yet. Add one with: vault tx add\n");
    }
    for t in txs {
        let _ = writeln!(
            out,
            "{}  {:<12} {:>14}  {}  [{}]",
            t.date,
            t.category,
            currency.format(t.amount),
            t.notes,
            t.id
        );
    }
    out
}

pub fn activity_table(items: &[ActivityItem], currency: Currency) -> String {
    let mut out = String::new();
    for item in items {
        let source = match item.source {
            vault_core::ActivitySource::Manual => "manual",
            vault_core::ActivitySource::Bank => "bank",
        };
        let _ = writeln!(
            out,
            "{}  {:<6} {:<20} {:>14}  {}",
            item.date,
            source,
            item.label,
            currency.format(item.amount),
            item.details
        );
    }
    out
}

/// Write the feed as CSV (header row included).
pub fn write_activity_csv<W: io::Write>(items: &[ActivityItem], w: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(w);
    for item in items {
        writer.serialize(item).context("write activity row")?;
    }
    writer.flush().context("flush activity csv")?;
    Ok(())
}

pub fn suggestion_card(s: &Suggestion) -> String {
    format!(
        "[{}] {} ({} impact)\n    {}\n    why: {}\n",
        s.id,
        s.title,
        s.impact.label(),
        s.description,
        s.reason
    )
}

pub fn parsed_sms(p: &ParsedSms) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "bank:      {}", p.bank);
    let _ = writeln!(out, "account:   {}", p.account);
    let _ = writeln!(out, "type:      {}", p.transaction_type);
    let _ = writeln!(out, "amount:    {:.2}", p.amount);
    match p.time {
        Some(t) => {
            let _ = writeln!(out, "date:      {} {}", p.date, t);
        }
        None => {
            let _ = writeln!(out, "date:      {}", p.date);
        }
    }
    if let Some(vpa) = &p.vpa {
        let _ = writeln!(out, "vpa:       {vpa}");
    }
    if let Some(r) = &p.reference_number {
        let _ = writeln!(out, "reference: {r}");
    }
    if let Some(b) = p.balance {
        let _ = writeln!(out, "balance:   {b:.2}");
    }
    out
}
