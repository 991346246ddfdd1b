use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use vault_core::{ActivityFilter, Currency};

use crate::commands::App;

mod auth;
mod commands;
mod config;
mod report;
mod setup;
mod state;

#[derive(Parser, Debug)]
#[command(
    name = "vault",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("VAULT_BUILD_SHA"), ")"),
    about = "Financial Vault: budget wallets and bank SMS import"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive registration: income, salary day, currency and budget split
    Setup,

    /// Income, spending, remaining balance and days until the next salary
    Dashboard,

    /// Budget wallets
    Wallets {
        #[command(subcommand)]
        command: WalletsCommand,
    },

    /// Manual transactions
    Tx {
        #[command(subcommand)]
        command: TxCommand,
    },

    /// Bank SMS parsing and import
    Sms {
        #[command(subcommand)]
        command: SmsCommand,
    },

    /// Manual and bank transactions in one feed, newest first
    Activity {
        /// all, manual or bank
        #[arg(long, default_value = "all")]
        filter: ActivityFilter,

        /// Write the feed to a CSV file instead of printing it
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Budgeting suggestions
    Suggestions {
        /// Hide suggestions by id (e.g. s1 s3)
        #[arg(long, num_args = 1..)]
        dismiss: Vec<String>,

        /// Show dismissed suggestions again
        #[arg(long)]
        reset: bool,
    },

    /// Currency, salary day and theme
    Settings {
        #[command(subcommand)]
        command: SettingsCommand,
    },

    /// Sign-in identity and the SMS API key
    Auth {
        #[command(subcommand)]
        command: AuthCommand,
    },

    /// ~/.vault/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum WalletsCommand {
    /// Wallets in display order with usage
    List,
    /// Create zeroed Savings/Wants/Needs wallets if there are none
    Init,
}

#[derive(Subcommand, Debug)]
enum TxCommand {
    /// Spend from a wallet
    Add {
        /// Wallet category (e.g. Needs) or id
        #[arg(long)]
        wallet: String,

        #[arg(long)]
        amount: f64,

        /// YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,

        #[arg(long, default_value = "")]
        notes: String,
    },

    /// Delete a transaction and return its amount to the wallet
    Delete { id: String },

    /// List transactions, newest first
    List {
        /// Only this wallet (category or id)
        #[arg(long)]
        wallet: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum SmsCommand {
    /// Parse one message and print the extracted fields
    Parse {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// Print the fields as JSON
        #[arg(long)]
        json: bool,
    },

    /// Import bank transactions from the configured source
    Sync {
        /// Read messages from a file (one per line) instead
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
enum SettingsCommand {
    Show,
    /// Set the display currency (USD, EUR, GBP, INR, JPY)
    Currency { code: Currency },
    /// Set the day of month the salary arrives (1-31)
    SalaryDay { day: u32 },
    /// Switch between dark and light
    Theme,
}

#[derive(Subcommand, Debug)]
enum AuthCommand {
    /// Save the signed-in identity to ~/.vault/session.json
    Login {
        #[arg(long)]
        user_id: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// Access token for the REST store
        #[arg(long)]
        token: Option<String>,
    },
    /// Save the SMS API key (prompts when omitted)
    ApiKey { key: Option<String> },
    ClearApiKey,
    Logout,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config.toml if none exists
    Init,
    Show,
}

/// `VAULT_LOG` wins over the config's `log_level`. Logs go to stderr.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_env("VAULT_LOG").unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let cfg = config::load_config();
    init_tracing(cfg.as_ref().map(|c| c.general.log_level.as_str()).unwrap_or("warn"));
    let cfg = cfg?;

    match cli.command {
        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => config::show_config()?,
        },

        Command::Auth { command } => match command {
            AuthCommand::Login { user_id, name, email, token } => {
                auth::login(&cfg, auth::LoginArgs { user_id, name, email, token }).await?;
            }
            AuthCommand::ApiKey { key } => auth::save_api_key(key)?,
            AuthCommand::ClearApiKey => auth::clear_api_key()?,
            AuthCommand::Logout => auth::logout()?,
        },

        Command::Setup => {
            let app = App::open(&cfg)?;
            setup::run_setup(&*app.store, &app.session).await?;
        }

        Command::Dashboard => App::open(&cfg)?.dashboard().await?,

        Command::Wallets { command } => {
            let app = App::open(&cfg)?;
            match command {
                WalletsCommand::List => app.wallets_list().await?,
                WalletsCommand::Init => app.wallets_init().await?,
            }
        }

        Command::Tx { command } => {
            let app = App::open(&cfg)?;
            match command {
                TxCommand::Add { wallet, amount, date, notes } => {
                    app.tx_add(&wallet, amount, date, &notes).await?
                }
                TxCommand::Delete { id } => app.tx_delete(&id).await?,
                TxCommand::List { wallet } => app.tx_list(wallet.as_deref()).await?,
            }
        }

        Command::Sms { command } => match command {
            SmsCommand::Parse { text, json } => commands::sms_parse(&text.join(" "), json)?,
            SmsCommand::Sync { file } => App::open(&cfg)?.sms_sync(file.as_deref()).await?,
        },

        Command::Activity { filter, csv } => {
            App::open(&cfg)?.activity(filter, csv.as_deref()).await?
        }

        Command::Suggestions { dismiss, reset } => commands::suggestions(&dismiss, reset)?,

        Command::Settings { command } => {
            let app = App::open(&cfg)?;
            match command {
                SettingsCommand::Show => app.settings_show().await?,
                SettingsCommand::Currency { code } => app.settings_currency(code).await?,
                SettingsCommand::SalaryDay { day } => app.settings_salary_day(day).await?,
                SettingsCommand::Theme => app.settings_theme().await?,
            }
        }
    }

    Ok(())
}
