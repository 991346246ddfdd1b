//! Wallets: per-category budget buckets with an allocated and a spent amount.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Categories shown first, in this order. Everything else sorts alphabetically after.
pub const PINNED_CATEGORIES: [&str; 3] = ["Savings", "Wants", "Needs"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Wallet {
    pub id: String,
    pub user_id: String,
    pub category: String,
    #[serde(default)]
    pub allocated_percent: f64,
    #[serde(default)]
    pub allocated_amount: f64,
    #[serde(default)]
    pub spent_amount: f64,
}

/// Insert payload for the `wallets` table (id assigned by the store).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewWallet {
    pub user_id: String,
    pub category: String,
    pub allocated_percent: f64,
    pub allocated_amount: f64,
    pub spent_amount: f64,
}

/// Money amount in whole cents. Balance checks compare these, not raw `f64`.
pub fn to_cents(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

/// How much of a wallet has been used, bucketed for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageLevel {
    Healthy,
    Warning,
    Critical,
}

impl Wallet {
    /// `allocated_amount - spent_amount`
    pub fn available(&self) -> f64 {
        self.allocated_amount - self.spent_amount
    }

    /// True when `amount` fits in the balance, to the cent.
    pub fn can_spend(&self, amount: f64) -> bool {
        to_cents(amount) <= to_cents(self.available())
    }

    /// Percent of the allocation already spent (0 when nothing is allocated).
    pub fn usage_percent(&self) -> f64 {
        if self.allocated_amount > 0.0 {
            self.spent_amount / self.allocated_amount * 100.0
        } else {
            0.0
        }
    }

    pub fn usage_level(&self) -> UsageLevel {
        let used = self.usage_percent();
        if used >= 90.0 {
            UsageLevel::Critical
        } else if used >= 60.0 {
            UsageLevel::Warning
        } else {
            UsageLevel::Healthy
        }
    }
}

impl NewWallet {
    pub fn empty(user_id: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            category: category.into(),
            allocated_percent: 0.0,
            allocated_amount: 0.0,
            spent_amount: 0.0,
        }
    }

    pub fn into_wallet(self, id: impl Into<String>) -> Wallet {
        Wallet {
            id: id.into(),
            user_id: self.user_id,
            category: self.category,
            allocated_percent: self.allocated_percent,
            allocated_amount: self.allocated_amount,
            spent_amount: self.spent_amount,
        }
    }
}

/// Zeroed Savings/Wants/Needs wallets for a user who has none yet.
pub fn default_wallets(user_id: &str) -> Vec<NewWallet> {
    PINNED_CATEGORIES
        .iter()
        .map(|category| NewWallet::empty(user_id, *category))
        .collect()
}

/// Position of a category among the pinned ones, if pinned.
pub fn category_rank(category: &str) -> Option<usize> {
    PINNED_CATEGORIES.iter().position(|c| *c == category)
}

fn compare_categories(a: &str, b: &str) -> Ordering {
    match (category_rank(a), category_rank(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b)),
    }
}

/// Sort wallets in display order: Savings, Wants, Needs, then alphabetical.
pub fn sort_wallets(wallets: &mut [Wallet]) {
    wallets.sort_by(|a, b| compare_categories(&a.category, &b.category));
}

/// A broken budget invariant. These are reported, never enforced on write.
#[derive(Debug, Clone, PartialEq)]
pub enum WalletIssue {
    Overspent { category: String, spent: f64, allocated: f64 },
    NegativeSpent { category: String, spent: f64 },
    PercentTotal { total: f64 },
}

impl std::fmt::Display for WalletIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WalletIssue::Overspent { category, spent, allocated } => {
                write!(f, "{category}: spent {spent:.2} exceeds allocation {allocated:.2}")
            }
            WalletIssue::NegativeSpent { category, spent } => {
                write!(f, "{category}: spent amount is negative ({spent:.2})")
            }
            WalletIssue::PercentTotal { total } => {
                write!(f, "allocated percentages add up to {total:.0}%, expected 100%")
            }
        }
    }
}

/// Check `0 <= spent <= allocated` per wallet and that percents add up to 100.
///
/// An empty wallet list, or one where nothing has been allocated yet, is not
/// flagged for the percent total.
pub fn check_wallets(wallets: &[Wallet]) -> Vec<WalletIssue> {
    let mut issues = Vec::new();

    for w in wallets {
        if w.spent_amount < 0.0 {
            issues.push(WalletIssue::NegativeSpent {
                category: w.category.clone(),
                spent: w.spent_amount,
            });
        } else if to_cents(w.spent_amount) > to_cents(w.allocated_amount) {
            issues.push(WalletIssue::Overspent {
                category: w.category.clone(),
                spent: w.spent_amount,
                allocated: w.allocated_amount,
            });
        }
    }

    let total: f64 = wallets.iter().map(|w| w.allocated_percent).sum();
    if total > 0.0 && (total - 100.0).abs() > 0.01 {
        issues.push(WalletIssue::PercentTotal { total });
    }

    issues
}
