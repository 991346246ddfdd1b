//! Supported currencies and amount formatting.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Currency {
    #[default]
    #[serde(rename = "USD")]
    Usd,
    #[serde(rename = "EUR")]
    Eur,
    #[serde(rename = "GBP")]
    Gbp,
    #[serde(rename = "INR")]
    Inr,
    #[serde(rename = "JPY")]
    Jpy,
}

impl Currency {
    pub const ALL: [Currency; 5] = [
        Currency::Usd,
        Currency::Eur,
        Currency::Gbp,
        Currency::Inr,
        Currency::Jpy,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Inr => "INR",
            Currency::Jpy => "JPY",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Eur => "€",
            Currency::Gbp => "£",
            Currency::Inr => "₹",
            Currency::Jpy => "¥",
        }
    }

    /// Human label used by the registration prompt.
    pub fn label(&self) -> &'static str {
        match self {
            Currency::Usd => "US Dollar ($)",
            Currency::Eur => "Euro (€)",
            Currency::Gbp => "British Pound (£)",
            Currency::Inr => "Indian Rupee (₹)",
            Currency::Jpy => "Japanese Yen (¥)",
        }
    }

    /// Format an amount with the currency symbol.
    ///
    /// INR uses Indian digit grouping (`1,25,000.50`), JPY has no minor unit,
    /// everything else groups by thousands.
    pub fn format(&self, amount: f64) -> String {
        let sign = if amount < 0.0 { "-" } else { "" };
        let abs = amount.abs();
        let body = match self {
            Currency::Jpy => group_thousands(&format!("{:.0}", abs)),
            Currency::Inr => {
                let s = format!("{:.2}", abs);
                let (int, frac) = s.split_once('.').unwrap_or((s.as_str(), "00"));
                format!("{}.{}", group_indian(int), frac)
            }
            _ => {
                let s = format!("{:.2}", abs);
                let (int, frac) = s.split_once('.').unwrap_or((s.as_str(), "00"));
                format!("{}.{}", group_thousands(int), frac)
            }
        };
        format!("{sign}{}{body}", self.symbol())
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();
        Currency::ALL
            .into_iter()
            .find(|c| c.code() == code)
            .ok_or_else(|| ValidationError::Currency(s.trim().to_string()))
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// Last three digits, then groups of two: 12,34,567
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut out = String::new();
    for (i, ch) in head.chars().enumerate() {
        if i > 0 && (head.len() - i) % 2 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.push(',');
    out.push_str(tail);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_codes() {
        assert_eq!("inr".parse::<Currency>().unwrap(), Currency::Inr);
        assert_eq!(" EUR ".parse::<Currency>().unwrap(), Currency::Eur);
        assert!("BTC".parse::<Currency>().is_err());
    }

    #[test]
    fn test_format_indian_grouping() {
        assert_eq!(Currency::Inr.format(125000.5), "₹1,25,000.50");
        assert_eq!(Currency::Inr.format(465.88), "₹465.88");
        assert_eq!(Currency::Inr.format(12345678.0), "₹1,23,45,678.00");
    }

    #[test]
    fn test_format_other_currencies() {
        assert_eq!(Currency::Usd.format(1234567.891), "$1,234,567.89");
        assert_eq!(Currency::Jpy.format(5000.0), "¥5,000");
        assert_eq!(Currency::Gbp.format(-20.0), "-£20.00");
    }

    #[test]
    fn test_serde_uses_codes() {
        let json = serde_json::to_string(&Currency::Inr).unwrap();
        assert_eq!(json, "\"INR\"");
    }
}
