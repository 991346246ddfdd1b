//! vault-ingest: bank SMS pattern matching and import deduplication.

pub mod dedup;
pub mod parsers;
pub mod types;

pub use dedup::{SmsText, dedup_against};
pub use parsers::{SmsMatcher, parse_batch, parse_sms};
pub use types::ParsedSms;
