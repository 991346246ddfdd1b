//! Validation errors for user-entered data (registration, settings, forms).

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("income must be a positive amount, got {0}")]
    Income(f64),
    #[error("salary day must be between 1 and 31, got {0}")]
    SalaryDay(u32),
    #[error("budget split must add up to 100%, got {0}%")]
    Split(u32),
    #[error("unsupported currency: {0}")]
    Currency(String),
    #[error("unknown theme: {0}")]
    Theme(String),
}
