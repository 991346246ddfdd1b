//! Dashboard figures: remaining income and the countdown to the next salary.

use chrono::{Datelike, NaiveDate};

use crate::{User, Wallet};

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub income: f64,
    pub total_spent: f64,
    pub remaining: f64,
    /// Share of income not yet spent, 0 when no income is set
    pub remaining_percent: f64,
    pub days_until_deposit: Option<u32>,
}

impl DashboardSummary {
    pub fn compute(user: &User, wallets: &[Wallet], today: NaiveDate) -> Self {
        let income = user.income;
        let total_spent: f64 = wallets.iter().map(|w| w.spent_amount).sum();
        let remaining = income - total_spent;
        let remaining_percent = if income != 0.0 {
            100.0 * remaining / income
        } else {
            0.0
        };

        Self {
            income,
            total_spent,
            remaining,
            remaining_percent,
            days_until_deposit: user
                .salary_day
                .and_then(|day| days_until_next_deposit(day, today)),
        }
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(31)
}

/// Days until the next salary deposit.
///
/// Before the salary day this is the plain difference; on or after it, the
/// rest of the current month plus the salary day. Returns `None` for a day
/// outside 1..=31.
pub fn days_until_next_deposit(salary_day: u32, today: NaiveDate) -> Option<u32> {
    if !(1..=31).contains(&salary_day) {
        return None;
    }
    let current = today.day();
    if current < salary_day {
        Some(salary_day - current)
    } else {
        Some(days_in_month(today.year(), today.month()) - current + salary_day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_deposit_later_this_month() {
        assert_eq!(days_until_next_deposit(25, date(2025, 6, 10)), Some(15));
    }

    #[test]
    fn test_deposit_rolls_into_next_month() {
        // June has 30 days: 30 - 20 + 5
        assert_eq!(days_until_next_deposit(5, date(2025, 6, 20)), Some(15));
        // On the salary day itself the countdown restarts
        assert_eq!(days_until_next_deposit(10, date(2024, 2, 10)), Some(29 - 10 + 10));
        assert_eq!(days_until_next_deposit(1, date(2025, 12, 31)), Some(1));
    }

    #[test]
    fn test_invalid_salary_day() {
        assert_eq!(days_until_next_deposit(0, date(2025, 6, 10)), None);
    }

    #[test]
    fn test_summary_totals() {
        let mut user = User::new("u1", "Asha", "asha@example.com");
        user.income = 50000.0;
        user.salary_day = Some(1);

        let wallets = vec![
            Wallet {
                id: "w1".into(),
                user_id: "u1".into(),
                category: "Needs".into(),
                allocated_percent: 50.0,
                allocated_amount: 25000.0,
                spent_amount: 10000.0,
            },
            Wallet {
                id: "w2".into(),
                user_id: "u1".into(),
                category: "Wants".into(),
                allocated_percent: 30.0,
                allocated_amount: 15000.0,
                spent_amount: 2500.0,
            },
        ];

        let s = DashboardSummary::compute(&user, &wallets, date(2025, 6, 15));
        assert_eq!(s.total_spent, 12500.0);
        assert_eq!(s.remaining, 37500.0);
        assert_eq!(s.remaining_percent, 75.0);
        assert_eq!(s.days_until_deposit, Some(16));
    }

    #[test]
    fn test_summary_without_income() {
        let user = User::new("u1", "", "");
        let s = DashboardSummary::compute(&user, &[], date(2025, 6, 15));
        assert_eq!(s.remaining_percent, 0.0);
        assert_eq!(s.days_until_deposit, None);
    }
}
