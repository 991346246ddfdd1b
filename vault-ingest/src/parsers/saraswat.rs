//! Saraswat Bank UPI SMS parser
//!
//! The richest format: carries the counter-party VPA, the UPI reference and
//! the balance after the transaction.
//!
//!   Your a/c no. XX2037 is debited for Rs.32.00 on 21-06-2025 13:27:26 and
//!   credited to vpa q164592387@ybl (UPI Ref no 106817245599) Your Current
//!   Balance is INR 465.88

use anyhow::Result;
use chrono::NaiveTime;
use regex::{Captures, Regex};
use vault_core::TransactionType;

use super::{AMOUNT, BankPattern, parse_amount, parse_date};
use crate::types::ParsedSms;

pub const BANK: &str = "Saraswat Bank";

pub fn pattern() -> Result<BankPattern> {
    let re = Regex::new(&format!(
        concat!(
            r"(?i)Your\s+a/c\s+no\.\s*(?P<acct>\w+)\s+is\s+(?P<verb>debited|credited)\s+",
            r"for\s+Rs\.\s?(?P<amt>{amount})\s+",
            r"on\s+(?P<date>\d{{1,2}}-\d{{1,2}}-\d{{4}})(?:\s+(?P<time>\d{{1,2}}:\d{{2}}:\d{{2}}))?\s+",
            r"and\s+(?:credited|debited)\s+(?:to|from|by)\s+vpa\s+(?P<vpa>\S+?)\s*",
            r"\(UPI\s+Ref\s+no\.?\s*(?P<rref>\d+)\)\s*",
            r"Your\s+Current\s+Balance\s+is\s+(?:INR|Rs\.)\s*(?P<bal>-?{amount})"
        ),
        amount = AMOUNT
    ))?;
    Ok(BankPattern::new(BANK, re, extract))
}

fn extract(caps: &Captures<'_>, text: &str) -> Option<ParsedSms> {
    let time = match caps.name("time") {
        Some(t) => Some(NaiveTime::parse_from_str(t.as_str(), "%H:%M:%S").ok()?),
        None => None,
    };
    Some(ParsedSms {
        bank: BANK.to_string(),
        account: caps["acct"].to_string(),
        transaction_type: TransactionType::from_verb(&caps["verb"])?,
        amount: parse_amount(&caps["amt"])?,
        date: parse_date(&caps["date"], &["%d-%m-%Y"])?,
        time,
        vpa: Some(caps["vpa"].to_string()),
        reference_number: Some(caps["rref"].to_string()),
        balance: Some(parse_amount(&caps["bal"])?),
        sms_text: text.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const SMS: &str = "Your a/c no. XX2037 is debited for Rs.32.00 on 21-06-2025 13:27:26 and credited to vpa q164592387@ybl (UPI Ref no 106817245599) Your Current Balance is INR 465.88";

    #[test]
    fn test_saraswat_upi_debit() {
        let p = pattern().unwrap();
        let parsed = p.parse(SMS).unwrap();
        assert_eq!(parsed.bank, "Saraswat Bank");
        assert_eq!(parsed.account, "XX2037");
        assert_eq!(parsed.amount, 32.00);
        assert_eq!(parsed.transaction_type, TransactionType::Debit);
        assert_eq!(parsed.vpa.as_deref(), Some("q164592387@ybl"));
        assert_eq!(parsed.reference_number.as_deref(), Some("106817245599"));
        assert_eq!(parsed.balance, Some(465.88));
        assert_eq!(parsed.date, NaiveDate::from_ymd_opt(2025, 6, 21).unwrap());
        assert_eq!(parsed.time, NaiveTime::from_hms_opt(13, 27, 26));
    }

    #[test]
    fn test_saraswat_without_time_and_grouped_balance() {
        let p = pattern().unwrap();
        let sms = "Your a/c no. XX2037 is credited for Rs.1,500.00 on 02-07-2025 and debited from vpa boss@okaxis (UPI Ref no 5551) Your Current Balance is INR 1,965.88";
        let parsed = p.parse(sms).unwrap();
        assert_eq!(parsed.transaction_type, TransactionType::Credit);
        assert_eq!(parsed.amount, 1500.0);
        assert_eq!(parsed.time, None);
        assert_eq!(parsed.balance, Some(1965.88));
        assert_eq!(parsed.description(), "UPI from boss@okaxis");
    }
}
