//! Skip messages that were already imported.
//!
//! The raw SMS text is the identity of a bank transaction: two messages with
//! the same text are the same event.

use std::collections::HashSet;

use vault_core::{BankTransaction, NewBankTransaction};

use crate::types::ParsedSms;

/// Anything carrying the raw SMS it came from.
pub trait SmsText {
    fn sms_text(&self) -> &str;
}

impl SmsText for ParsedSms {
    fn sms_text(&self) -> &str {
        &self.sms_text
    }
}

impl SmsText for NewBankTransaction {
    fn sms_text(&self) -> &str {
        &self.sms_text
    }
}

impl SmsText for BankTransaction {
    fn sms_text(&self) -> &str {
        &self.sms_text
    }
}

/// Drop items whose text is in `existing`, and repeats within the batch.
/// Returns `(fresh, duplicate_count)`.
pub fn dedup_against<'a, T, I>(items: Vec<T>, existing: I) -> (Vec<T>, usize)
where
    T: SmsText,
    I: IntoIterator<Item = &'a str>,
{
    let before = items.len();
    let keep: Vec<bool> = {
        let mut seen: HashSet<&str> = existing.into_iter().collect();
        items.iter().map(|item| seen.insert(item.sms_text())).collect()
    };

    let fresh: Vec<T> = items
        .into_iter()
        .zip(keep)
        .filter_map(|(item, k)| k.then_some(item))
        .collect();
    let dupes = before - fresh.len();
    (fresh, dupes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_batch;

    const A: &str = "Rs.5000.00 credited to A/c XX1234 on 15/12/2023. UPI Ref: 123456789";
    const B: &str = "Rs.2500.00 credited to A/c XX9012 on 17/12/2023. UPI Ref: 987654321";

    #[test]
    fn test_existing_and_repeated_are_dropped() {
        let parsed = parse_batch([A, B, B]);
        let (fresh, dupes) = dedup_against(parsed, [A]);
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].sms_text, B);
        assert_eq!(dupes, 2);
    }

    #[test]
    fn test_nothing_stored_yet() {
        let (fresh, dupes) = dedup_against(parse_batch([A, B]), std::iter::empty());
        assert_eq!(fresh.len(), 2);
        assert_eq!(dupes, 0);
    }

    #[test]
    fn test_records_dedup_the_same_way() {
        let records: Vec<_> = parse_batch([A, A])
            .into_iter()
            .map(|p| p.into_new_bank_transaction("u1"))
            .collect();
        let (fresh, dupes) = dedup_against(records, std::iter::empty());
        assert_eq!((fresh.len(), dupes), (1, 1));
    }
}
