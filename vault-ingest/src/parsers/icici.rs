//! ICICI Bank SMS parser
//!
//! Format (month as a short name, two- or four-digit year):
//!   ICICI Bank Acct XX123 debited for Rs 1,000.00 on 05-Jan-24; AMAZON credited.

use anyhow::Result;
use regex::{Captures, Regex};
use vault_core::TransactionType;

use super::{AMOUNT, BankPattern, parse_amount, parse_date};
use crate::types::ParsedSms;

pub const BANK: &str = "ICICI Bank";

pub fn pattern() -> Result<BankPattern> {
    let re = Regex::new(&format!(
        r"(?i)ICICI\s+Bank\s+Acc?t\s+(?P<acct>\w+)\s+(?P<verb>credited|debited)\s+(?:for|with)\s+(?:Rs\.?|INR)\s*(?P<amt>{AMOUNT})\s+on\s+(?P<date>\d{{1,2}}-[A-Za-z]{{3}}-\d{{2,4}})"
    ))?;
    Ok(BankPattern::new(BANK, re, extract))
}

fn extract(caps: &Captures<'_>, text: &str) -> Option<ParsedSms> {
    let date = &caps["date"];
    // %y would happily read "2024" as year 20, so pick by length
    let format = if date.rsplit('-').next().map(str::len) == Some(4) {
        "%d-%b-%Y"
    } else {
        "%d-%b-%y"
    };

    Some(ParsedSms {
        bank: BANK.to_string(),
        account: caps["acct"].to_string(),
        transaction_type: TransactionType::from_verb(&caps["verb"])?,
        amount: parse_amount(&caps["amt"])?,
        date: parse_date(date, &[format])?,
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
    fn test_icici_debit_short_year() {
        let p = pattern().unwrap();
        let parsed = p
            .parse("ICICI Bank Acct XX123 debited for Rs 1,000.00 on 05-Jan-24; AMAZON credited.")
            .unwrap();
        assert_eq!(parsed.account, "XX123");
        assert_eq!(parsed.amount, 1000.0);
        assert_eq!(parsed.transaction_type, TransactionType::Debit);
        assert_eq!(parsed.date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
    }

    #[test]
    fn test_icici_credit_inr_long_year() {
        let p = pattern().unwrap();
        let parsed = p
            .parse("ICICI Bank Acct XX777 credited with INR 12,500.00 on 28-Feb-2025 by NEFT.")
            .unwrap();
        assert_eq!(parsed.amount, 12500.0);
        assert_eq!(parsed.transaction_type, TransactionType::Credit);
        assert_eq!(parsed.date, NaiveDate::from_ymd_opt(2025, 2, 28).unwrap());
    }
}
