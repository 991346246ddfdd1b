//! First-run profile creation and the income/budget registration step.

use serde::{Deserialize, Serialize};
use tracing::info;
use vault_core::{RegistrationForm, User, Wallet, allocate, sort_wallets};

use crate::error::ProfileError;
use crate::store::Store;

/// Who is signed in, as reported by the session.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// Load the user's row, creating a bare one from the identity if missing.
pub async fn ensure_profile<S: Store + ?Sized>(
    store: &S,
    identity: &Identity,
) -> Result<User, ProfileError> {
    if let Some(user) = store.get_user(&identity.id).await? {
        return Ok(user);
    }
    let user = User::new(&identity.id, &identity.name, &identity.email);
    let user = store.upsert_user(&user).await?;
    info!(user = %user.id, "profile created");
    Ok(user)
}

/// Validate the form, store income and salary day on the user, and write one
/// wallet per split category with a fresh allocation and nothing spent.
pub async fn complete_registration<S: Store + ?Sized>(
    store: &S,
    identity: &Identity,
    form: &RegistrationForm,
) -> Result<(User, Vec<Wallet>), ProfileError> {
    let valid = form.validate()?;

    let mut user = match store.get_user(&identity.id).await? {
        Some(user) => user,
        None => User::new(&identity.id, &identity.name, &identity.email),
    };
    if user.name.is_empty() {
        user.name = identity.name.clone();
    }
    if user.email.is_empty() {
        user.email = identity.email.clone();
    }
    user.income = valid.income;
    user.salary_day = Some(valid.salary_day);
    user.country = valid.country;
    user.currency = valid.currency;

    let user = store.upsert_user(&user).await?;
    let mut wallets = store.upsert_wallets(&allocate(&user.id, user.income, &valid.split)).await?;
    sort_wallets(&mut wallets);

    info!(user = %user.id, income = user.income, wallets = wallets.len(), "registration complete");
    Ok((user, wallets))
}

#[cfg(test)]
mod tests {
    use vault_core::{BudgetSplit, Currency, ValidationError};

    use super::*;
    use crate::store::MemoryStore;

    fn identity() -> Identity {
        Identity { id: "u1".into(), name: "Asha".into(), email: "asha@example.com".into() }
    }

    #[tokio::test]
    async fn test_ensure_profile_creates_once() {
        let store = MemoryStore::new();
        let user = ensure_profile(&store, &identity()).await.unwrap();
        assert_eq!(user.email, "asha@example.com");
        assert!(!user.is_registered());

        let mut registered = user.clone();
        registered.income = 1000.0;
        store.upsert_user(&registered).await.unwrap();
        assert!(ensure_profile(&store, &identity()).await.unwrap().is_registered());
    }

    #[tokio::test]
    async fn test_invalid_form_writes_nothing() {
        let store = MemoryStore::new();
        let form = RegistrationForm { income: Some(50000.0), salary_day: Some(32), ..Default::default() };
        let err = complete_registration(&store, &identity(), &form).await.unwrap_err();
        assert!(matches!(err, ProfileError::Invalid(ValidationError::SalaryDay(32))));
        assert!(store.get_user("u1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_custom_split() {
        let store = MemoryStore::new();
        let form = RegistrationForm {
            income: Some(1000.0),
            salary_day: Some(1),
            country: "India".into(),
            currency: Currency::Inr,
            split: BudgetSplit::new(60, 25, 15),
        };
        let (user, wallets) = complete_registration(&store, &identity(), &form).await.unwrap();
        assert_eq!(user.currency, Currency::Inr);
        let amounts: Vec<_> =
            wallets.iter().map(|w| (w.category.as_str(), w.allocated_amount)).collect();
        assert_eq!(amounts, [("Savings", 150.0), ("Wants", 250.0), ("Needs", 600.0)]);
    }
}
