//! Income split across Needs/Wants/Savings and the registration form that captures it.

use serde::{Deserialize, Serialize};

use crate::user::validate_salary_day;
use crate::{Currency, NewWallet, ValidationError};

/// Percent of income given to each default wallet.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BudgetSplit {
    pub needs: u32,
    pub wants: u32,
    pub savings: u32,
}

impl Default for BudgetSplit {
    /// The 50/30/20 rule.
    fn default() -> Self {
        Self {
            needs: 50,
            wants: 30,
            savings: 20,
        }
    }
}

impl BudgetSplit {
    pub fn new(needs: u32, wants: u32, savings: u32) -> Self {
        Self { needs, wants, savings }
    }

    /// Sum of the three percents, saturating at `u32::MAX`.
    pub fn total(&self) -> u32 {
        self.needs.saturating_add(self.wants).saturating_add(self.savings)
    }

    pub fn is_balanced(&self) -> bool {
        self.total() == 100
    }

    /// The split itself if it adds up to 100%.
    pub fn balanced(self) -> Result<Self, ValidationError> {
        if self.is_balanced() { Ok(self) } else { Err(ValidationError::Split(self.total())) }
    }

    /// (category, percent) pairs in the order wallets are written.
    pub fn categories(&self) -> [(&'static str, u32); 3] {
        [
            ("Needs", self.needs),
            ("Wants", self.wants),
            ("Savings", self.savings),
        ]
    }
}

/// `round(income * percent / 100)`
pub fn allocated_amount(income: f64, percent: u32) -> f64 {
    (income * percent as f64 / 100.0).round()
}

/// Build one wallet per split category with spent reset to zero.
pub fn allocate(user_id: &str, income: f64, split: &BudgetSplit) -> Vec<NewWallet> {
    split
        .categories()
        .into_iter()
        .map(|(category, percent)| NewWallet {
            user_id: user_id.to_string(),
            category: category.to_string(),
            allocated_percent: percent as f64,
            allocated_amount: allocated_amount(income, percent),
            spent_amount: 0.0,
        })
        .collect()
}

/// Answers collected during onboarding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegistrationForm {
    pub income: Option<f64>,
    pub salary_day: Option<u32>,
    pub country: String,
    pub currency: Currency,
    pub split: BudgetSplit,
}

impl Default for RegistrationForm {
    fn default() -> Self {
        Self {
            income: None,
            salary_day: None,
            country: String::new(),
            currency: Currency::Usd,
            split: BudgetSplit::default(),
        }
    }
}

/// A form that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidRegistration {
    pub income: f64,
    pub salary_day: u32,
    pub country: String,
    pub currency: Currency,
    pub split: BudgetSplit,
}

impl RegistrationForm {
    /// Income, salary day and country are required, and the split must add
    /// up to 100%.
    pub fn validate(&self) -> Result<ValidRegistration, ValidationError> {
        let income = self.income.ok_or(ValidationError::Required("income"))?;
        if !income.is_finite() || income <= 0.0 {
            return Err(ValidationError::Income(income));
        }
        let salary_day = self.salary_day.ok_or(ValidationError::Required("salary day"))?;
        let salary_day = validate_salary_day(salary_day)?;
        let country = self.country.trim();
        if country.is_empty() {
            return Err(ValidationError::Required("country"));
        }
        let split = self.split.balanced()?;

        Ok(ValidRegistration {
            income,
            salary_day,
            country: country.to_string(),
            currency: self.currency,
            split,
        })
    }
}
