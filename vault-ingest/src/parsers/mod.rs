//! Bank SMS parsers.
//!
//! Each bank module exposes a regex and an extractor over its captures. The
//! matcher tries them in a fixed order and the first pattern that matches
//! wins; there is no scoring between candidates.

pub mod axis;
pub mod hdfc;
pub mod icici;
pub mod saraswat;
pub mod sbi;

use std::sync::LazyLock;

use anyhow::Result;
use chrono::NaiveDate;
use regex::{Captures, Regex};
use tracing::{debug, error};

use crate::types::ParsedSms;

/// Amount with optional comma grouping and up to two decimals: 1,25,000.50
pub(crate) const AMOUNT: &str = r"\d+(?:,\d+)*(?:\.\d{1,2})?";

type Extractor = fn(&Captures<'_>, &str) -> Option<ParsedSms>;

/// One bank format: name, compiled pattern and the function reading its groups.
pub struct BankPattern {
    pub bank: &'static str,
    regex: Regex,
    extract: Extractor,
}

impl BankPattern {
    pub fn new(bank: &'static str, regex: Regex, extract: Extractor) -> Self {
        Self { bank, regex, extract }
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// `None` if the text does not match, or matched with unusable groups
    /// (e.g. a date like 31/02/2024).
    pub fn parse(&self, text: &str) -> Option<ParsedSms> {
        let caps = self.regex.captures(text)?;
        (self.extract)(&caps, text)
    }
}

/// Ordered list of bank formats.
pub struct SmsMatcher {
    patterns: Vec<BankPattern>,
}

impl SmsMatcher {
    /// Built-in formats, in match order.
    pub fn new() -> Result<Self> {
        Ok(Self {
            patterns: vec![
                hdfc::pattern()?,
                sbi::pattern()?,
                icici::pattern()?,
                axis::pattern()?,
                saraswat::pattern()?,
            ],
        })
    }

    pub fn banks(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.patterns.iter().map(|p| p.bank)
    }

    /// First matching pattern wins. A pattern that matches but fails to
    /// extract ends the search too.
    pub fn parse(&self, text: &str) -> Option<ParsedSms> {
        let pattern = self.patterns.iter().find(|p| p.is_match(text))?;
        let parsed = pattern.parse(text);
        if let Some(p) = &parsed {
            debug!(bank = pattern.bank, amount = p.amount, "matched bank SMS");
        }
        parsed
    }
}

static DEFAULT_MATCHER: LazyLock<Result<SmsMatcher>> = LazyLock::new(SmsMatcher::new);

/// The built-in matcher, shared across calls.
pub fn default_matcher() -> Result<&'static SmsMatcher> {
    DEFAULT_MATCHER.as_ref().map_err(|e| anyhow::anyhow!("built-in SMS patterns: {e:#}"))
}

/// Parse one SMS with the built-in formats. `None` means "not a bank SMS".
pub fn parse_sms(text: &str) -> Option<ParsedSms> {
    match default_matcher() {
        Ok(m) => m.parse(text),
        Err(e) => {
            error!("{e:#}");
            None
        }
    }
}

/// Parse many messages, keeping only the ones that match.
pub fn parse_batch<I, S>(texts: I) -> Vec<ParsedSms>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    texts
        .into_iter()
        .filter_map(|t| parse_sms(t.as_ref()))
        .collect()
}

/// "1,25,000.50" -> 125000.50
pub fn parse_amount(s: &str) -> Option<f64> {
    s.trim().replace(',', "").parse().ok()
}

/// Parse a day-first date using one of the given chrono formats.
pub(crate) fn parse_date(s: &str, formats: &[&str]) -> Option<NaiveDate> {
    formats
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(s.trim(), f).ok())
}
