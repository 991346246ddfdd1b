//! Axis Bank SMS parser
//!
//! Format (INR prefix, dashed day-first date):
//!   INR 500.00 debited from A/c no. XX4321 on 12-06-2025 at ATM

use anyhow::Result;
use regex::{Captures, Regex};
use vault_core::TransactionType;

use super::{AMOUNT, BankPattern, parse_amount, parse_date};
use crate::types::ParsedSms;

pub const BANK: &str = "Axis Bank";

pub fn pattern() -> Result<BankPattern> {
    let re = Regex::new(&format!(
        r"(?i)INR\s*(?P<amt>{AMOUNT})\s+(?P<verb>credited|debited)\s+(?:to|from)\s+A/c\s+no\.\s*(?P<acct>\w+)\s+on\s+(?P<date>\d{{1,2}}-\d{{1,2}}-\d{{4}})"
    ))?;
    Ok(BankPattern::new(BANK, re, extract))
}

fn extract(caps: &Captures<'_>, text: &str) -> Option<ParsedSms> {
    Some(ParsedSms {
        bank: BANK.to_string(),
        account: caps["acct"].to_string(),
        transaction_type: TransactionType::from_verb(&caps["verb"])?,
        amount: parse_amount(&caps["amt"])?,
        date: parse_date(&caps["date"], &["%d-%m-%Y"])?,
        time: None,
        vpa: None,
        reference_number: None,
        balance: None,
        sms_text: text.to_string(),
    })
}
