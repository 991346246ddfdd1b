//! User profile as stored in the `users` table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Currency, ValidationError};

/// Display theme preference.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => f.write_str("light"),
            Theme::Dark => f.write_str("dark"),
        }
    }
}

impl FromStr for Theme {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(ValidationError::Theme(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    /// Monthly income after tax
    #[serde(default)]
    pub income: f64,
    /// Day of month the salary lands (1..=31)
    #[serde(rename = "salary_date", default)]
    pub salary_day: Option<u32>,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default)]
    pub theme: Theme,
}

impl User {
    /// A bare profile for a freshly signed-in identity.
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            income: 0.0,
            salary_day: None,
            country: String::new(),
            currency: Currency::default(),
            theme: Theme::default(),
        }
    }

    /// Registration is complete once an income has been recorded.
    pub fn is_registered(&self) -> bool {
        self.income > 0.0
    }
}

/// Validate a salary day-of-month.
pub fn validate_salary_day(day: u32) -> Result<u32, ValidationError> {
    if (1..=31).contains(&day) {
        Ok(day)
    } else {
        Err(ValidationError::SalaryDay(day))
    }
}
