//! vault-ledger: persistence, wallet spending, registration, settings and SMS sync.

pub mod error;
pub mod ledger;
pub mod registration;
pub mod settings;
pub mod sms_sync;
pub mod store;

pub use error::{LedgerError, ProfileError, StoreError, SyncError};
pub use ledger::{
    WalletOverview, add_transaction, delete_transaction, ensure_default_wallets, wallet_overview,
};
pub use registration::{Identity, complete_registration, ensure_profile};
pub use settings::{Settings, load_settings, set_currency, set_salary_day, toggle_theme};
pub use sms_sync::{RemoteSmsApi, SimulatedInbox, SmsSource, SyncReport, sync_bank_sms};
pub use store::{MemoryStore, RestConfig, RestStore, Store};
