//! vault-core: domain types and pure budget logic for Financial Vault

pub mod activity;
pub mod bank;
pub mod budget;
pub mod currency;
pub mod dashboard;
pub mod error;
pub mod suggestions;
pub mod time;
pub mod transaction;
pub mod user;
pub mod wallet;

pub use activity::{ActivityFilter, ActivityItem, ActivitySource, merge_activity};
pub use bank::{BankTransaction, NewBankTransaction, TransactionType};
pub use budget::{BudgetSplit, RegistrationForm, ValidRegistration, allocate};
pub use currency::Currency;
pub use dashboard::{DashboardSummary, days_until_next_deposit};
pub use error::ValidationError;
pub use suggestions::{Impact, Suggestion, SuggestionKind, active_suggestions, all_suggestions};
pub use transaction::{NewTransaction, Transaction};
pub use user::{Theme, User, validate_salary_day};
pub use wallet::{
    NewWallet, UsageLevel, Wallet, WalletIssue, category_rank, check_wallets, default_wallets,
    sort_wallets, to_cents,
};
