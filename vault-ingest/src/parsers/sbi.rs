//! State Bank of India SMS parser
//!
//! Same shape as HDFC but the account is introduced with "from":
//!   Rs.1000.00 debited from A/c XX5678 on 16/12/2023. Available Bal: Rs.25000.00

use anyhow::Result;
use regex::{Captures, Regex};

use super::hdfc::extract_rs_account;
use super::{AMOUNT, BankPattern};
use crate::types::ParsedSms;

pub const BANK: &str = "State Bank of India";

pub fn pattern() -> Result<BankPattern> {
    let re = Regex::new(&format!(
        r"(?i)Rs\.\s?(?P<amt>{AMOUNT})\s+(?P<verb>credited|debited)\s+from\s+A/c\s+(?P<acct>\w+)\s+on\s+(?P<date>\d{{1,2}}/\d{{1,2}}/\d{{4}})"
    ))?;
    Ok(BankPattern::new(BANK, re, extract))
}

fn extract(caps: &Captures<'_>, text: &str) -> Option<ParsedSms> {
    extract_rs_account(BANK, caps, text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use vault_core::TransactionType;

    #[test]
    fn test_sbi_debit() {
        let p = pattern().unwrap();
        let parsed = p
            .parse("Rs.1000.00 debited from A/c XX5678 on 16/12/2023. Available Bal: Rs.25000.00")
            .unwrap();
        assert_eq!(parsed.bank, "State Bank of India");
        assert_eq!(parsed.amount, 1000.0);
        assert_eq!(parsed.transaction_type, TransactionType::Debit);
        assert_eq!(parsed.account, "XX5678");
        assert_eq!(parsed.date, NaiveDate::from_ymd_opt(2023, 12, 16).unwrap());
        // the trailing available balance is not part of this format
        assert_eq!(parsed.balance, None);
    }

    #[test]
    fn test_sbi_does_not_take_hdfc_wording() {
        let p = pattern().unwrap();
        assert!(!p.is_match("Rs.5000.00 credited to A/c XX1234 on 15/12/2023"));
    }
}
