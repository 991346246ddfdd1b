//! HDFC Bank SMS parser
//!
//! Format:
//!   Rs.5000.00 credited to A/c XX1234 on 15/12/2023. UPI Ref: 123456789

use anyhow::Result;
use regex::{Captures, Regex};
use vault_core::TransactionType;

use super::{AMOUNT, BankPattern, parse_amount, parse_date};
use crate::types::ParsedSms;

pub const BANK: &str = "HDFC Bank";

pub fn pattern() -> Result<BankPattern> {
    let re = Regex::new(&format!(
        r"(?i)Rs\.\s?(?P<amt>{AMOUNT})\s+(?P<verb>credited|debited)\s+to\s+A/c\s+(?P<acct>\w+)\s+on\s+(?P<date>\d{{1,2}}/\d{{1,2}}/\d{{4}})"
    ))?;
    Ok(BankPattern::new(BANK, re, extract))
}

fn extract(caps: &Captures<'_>, text: &str) -> Option<ParsedSms> {
    extract_rs_account(BANK, caps, text)
}

/// Shared by the "Rs.<amt> <verb> to|from A/c <acct> on dd/mm/yyyy" formats.
pub(crate) fn extract_rs_account(
    bank: &str,
    caps: &Captures<'_>,
    text: &str,
) -> Option<ParsedSms> {
    Some(ParsedSms {
        bank: bank.to_string(),
        account: caps["acct"].to_string(),
        transaction_type: TransactionType::from_verb(&caps["verb"])?,
        amount: parse_amount(&caps["amt"])?,
        date: parse_date(&caps["date"], &["%d/%m/%Y"])?,
        time: None,
        vpa: None,
        reference_number: None,
        balance: None,
        sms_text: text.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_hdfc_credit() {
        let p = pattern().unwrap();
        let sms = "Rs.5000.00 credited to A/c XX1234 on 15/12/2023. UPI Ref: 123456789";
        let parsed = p.parse(sms).unwrap();
        assert_eq!(parsed.bank, "HDFC Bank");
        assert_eq!(parsed.amount, 5000.00);
        assert_eq!(parsed.transaction_type, TransactionType::Credit);
        assert_eq!(parsed.account, "XX1234");
        assert_eq!(parsed.date, NaiveDate::from_ymd_opt(2023, 12, 15).unwrap());
        assert_eq!(parsed.sms_text, sms);
    }

    #[test]
    fn test_hdfc_grouped_amount_and_case() {
        let p = pattern().unwrap();
        let parsed = p
            .parse("RS.1,25,000.50 DEBITED TO A/C XX9012 ON 1/4/2024")
            .unwrap();
        assert_eq!(parsed.amount, 125000.50);
        assert_eq!(parsed.transaction_type, TransactionType::Debit);
        assert_eq!(parsed.date, NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());
    }

    #[test]
    fn test_hdfc_impossible_date() {
        let p = pattern().unwrap();
        assert!(p.is_match("Rs.10.00 credited to A/c XX1 on 31/02/2024"));
        assert_eq!(p.parse("Rs.10.00 credited to A/c XX1 on 31/02/2024"), None);
    }
}
