//! User preferences kept on the `users` row.

use tracing::info;
use vault_core::{Currency, Theme, User, validate_salary_day};

use crate::error::ProfileError;
use crate::store::Store;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub currency: Currency,
    pub salary_day: Option<u32>,
    pub theme: Theme,
}

impl From<&User> for Settings {
    fn from(user: &User) -> Self {
        Self { currency: user.currency, salary_day: user.salary_day, theme: user.theme }
    }
}

async fn update_user<S, F>(store: &S, user_id: &str, f: F) -> Result<User, ProfileError>
where
    S: Store + ?Sized,
    F: FnOnce(&mut User),
{
    let mut user = store
        .get_user(user_id)
        .await?
        .ok_or_else(|| ProfileError::UserNotFound(user_id.to_string()))?;
    f(&mut user);
    Ok(store.upsert_user(&user).await?)
}

pub async fn load_settings<S: Store + ?Sized>(
    store: &S,
    user_id: &str,
) -> Result<Settings, ProfileError> {
    let user = store
        .get_user(user_id)
        .await?
        .ok_or_else(|| ProfileError::UserNotFound(user_id.to_string()))?;
    Ok(Settings::from(&user))
}

pub async fn set_currency<S: Store + ?Sized>(
    store: &S,
    user_id: &str,
    currency: Currency,
) -> Result<Settings, ProfileError> {
    let user = update_user(store, user_id, |u| u.currency = currency).await?;
    info!(user = user_id, %currency, "currency updated");
    Ok(Settings::from(&user))
}

pub async fn set_salary_day<S: Store + ?Sized>(
    store: &S,
    user_id: &str,
    day: u32,
) -> Result<Settings, ProfileError> {
    let day = validate_salary_day(day)?;
    let user = update_user(store, user_id, |u| u.salary_day = Some(day)).await?;
    info!(user = user_id, day, "salary day updated");
    Ok(Settings::from(&user))
}

/// Dark becomes light and light becomes dark.
pub async fn toggle_theme<S: Store + ?Sized>(
    store: &S,
    user_id: &str,
) -> Result<Settings, ProfileError> {
    let user = update_user(store, user_id, |u| u.theme = u.theme.toggled()).await?;
    info!(user = user_id, theme = %user.theme, "theme updated");
    Ok(Settings::from(&user))
}
