use anyhow::{Context, Result, bail};
use std::io::{self, Write};
use vault_core::{BudgetSplit, Currency, RegistrationForm};
use vault_ledger::{Store, complete_registration};

use crate::report;
use crate::state::Session;

pub fn prompt(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush().ok();
    let mut s = String::new();
    io::stdin().read_line(&mut s).context("read stdin")?;
    Ok(s.trim().to_string())
}

fn prompt_default(label: &str, default: &str) -> Result<String> {
    let answer = prompt(&format!("{label} [{default}]"))?;
    Ok(if answer.is_empty() { default.to_string() } else { answer })
}

/// "50/30/20" -> needs 50, wants 30, savings 20
pub fn parse_split(s: &str) -> Result<BudgetSplit> {
    let parts: Vec<&str> = s.split('/').map(str::trim).collect();
    let [needs, wants, savings] = parts.as_slice() else {
        bail!("expected needs/wants/savings, e.g. 50/30/20");
    };
    let pct = |p: &str| -> Result<u32> {
        let n: u32 = p.parse().with_context(|| format!("'{p}' is not a whole percent"))?;
        if n > 100 {
            bail!("{n}% is more than 100%");
        }
        Ok(n)
    };
    Ok(BudgetSplit::new(pct(*needs)?, pct(*wants)?, pct(*savings)?))
}

/// Ask the registration questions. Empty answers for required fields are
/// left empty so validation reports them.
pub fn ask_registration() -> Result<RegistrationForm> {
    let income = prompt("Monthly income after tax")?;
    let income = if income.is_empty() {
        None
    } else {
        Some(
            income
                .replace(',', "")
                .parse::<f64>()
                .with_context(|| format!("'{income}' is not a number"))?,
        )
    };

    let salary_day = prompt("Day of month your salary arrives (1-31)")?;
    let salary_day = if salary_day.is_empty() {
        None
    } else {
        Some(salary_day.parse::<u32>().with_context(|| format!("'{salary_day}' is not a day"))?)
    };

    let country = prompt("Country")?;

    println!(
        "Currencies: {}",
        Currency::ALL.iter().map(|c| c.label()).collect::<Vec<_>>().join(", ")
    );
    let currency: Currency = prompt_default("Currency code", "USD")?.parse()?;

    let split = loop {
        let split = parse_split(&prompt_default("Needs/Wants/Savings split", "50/30/20")?)?;
        match split.balanced() {
            Ok(split) => break split,
            Err(e) => println!("{e}"),
        }
    };

    Ok(RegistrationForm { income, salary_day, country, currency, split })
}

pub async fn run_setup(store: &dyn Store, session: &Session) -> Result<()> {
    println!("Financial Vault setup\n");
    let form = ask_registration()?;
    let (user, wallets) = complete_registration(store, &session.identity(), &form)
        .await
        .context("save registration")?;

    println!("\nBudget created for {}:", user.currency.format(user.income));
    print!("{}", report::wallets_table(&wallets, user.currency));

    println!("\nNext recommended steps:");
    println!("- vault dashboard");
    println!("- vault tx add --wallet Needs --amount 250 --notes groceries");
    println!("- vault sms sync");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_split() {
        assert_eq!(parse_split("50/30/20").unwrap(), BudgetSplit::default());
        assert_eq!(parse_split(" 60 / 25 / 15 ").unwrap(), BudgetSplit::new(60, 25, 15));
        assert!(parse_split("50/50").is_err());
        assert!(parse_split("a/b/c").is_err());
        assert!(parse_split("4294967295/1/0").is_err());
        assert!(parse_split("101/0/0").is_err());
    }
}
