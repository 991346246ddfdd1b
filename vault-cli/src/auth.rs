use anyhow::{Result, bail};
use vault_ledger::ensure_profile;

use crate::config::Config;
use crate::setup::prompt;
use crate::state::{Session, clear_session, read_session, require_session, write_session};

#[derive(Debug, Default)]
pub struct LoginArgs {
    pub user_id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub token: Option<String>,
}

/// Record who is signed in. The identity comes from the auth provider; here
/// it is entered or passed on the command line. Signing in again as the same
/// user keeps the saved token and SMS API key.
pub fn build_session(previous: Option<Session>, args: LoginArgs) -> Result<Session> {
    let mut session = previous.unwrap_or_default();
    let user_id = match args.user_id {
        Some(id) => id,
        None => prompt("User id")?,
    };
    if user_id.trim().is_empty() {
        bail!("a user id is required");
    }
    if user_id.trim() != session.user_id {
        session = Session::default();
    }
    session.user_id = user_id.trim().to_string();
    session.name = match args.name {
        Some(n) => n,
        None => prompt("Name (optional)")?,
    };
    session.email = match args.email {
        Some(e) => e,
        None => prompt("Email (optional)")?,
    };
    if args.token.is_some() {
        session.access_token = args.token;
    }
    Ok(session)
}

/// Save the session and make sure the user has a profile row.
pub async fn login(cfg: &Config, args: LoginArgs) -> Result<()> {
    let session = build_session(read_session()?, args)?;
    let store = cfg.open_store(Some(&session))?;
    let user = ensure_profile(&*store, &session.identity()).await?;
    write_session(&session)?;
    println!("Signed in as {}", session.user_id);
    if !user.is_registered() {
        println!("Next: vault setup");
    }
    Ok(())
}

pub fn save_api_key(key: Option<String>) -> Result<()> {
    let mut session = require_session()?;
    let key = match key {
        Some(k) => k,
        None => prompt("Paste SMS API key")?,
    };
    if key.trim().is_empty() {
        bail!("empty API key");
    }
    session.sms_api_key = Some(key.trim().to_string());
    write_session(&session)?;
    println!("Saved SMS API key to session.json");
    Ok(())
}

pub fn clear_api_key() -> Result<()> {
    let mut session = require_session()?;
    if session.sms_api_key.take().is_none() {
        println!("No SMS API key saved");
        return Ok(());
    }
    write_session(&session)?;
    println!("Removed SMS API key");
    Ok(())
}

pub fn logout() -> Result<()> {
    if clear_session()? {
        println!("Signed out");
    } else {
        println!("Not signed in");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(id: &str) -> LoginArgs {
        LoginArgs {
            user_id: Some(id.into()),
            name: Some("Asha".into()),
            email: Some("a@example.com".into()),
            token: None,
        }
    }

    #[test]
    fn test_relogin_keeps_api_key_and_token() {
        let previous = Session {
            user_id: "u1".into(),
            access_token: Some("jwt".into()),
            sms_api_key: Some("key".into()),
            dismissed_suggestions: vec!["s1".into()],
            ..Default::default()
        };
        let s = build_session(Some(previous), args("u1")).unwrap();
        assert_eq!(s.access_token.as_deref(), Some("jwt"));
        assert_eq!(s.sms_api_key.as_deref(), Some("key"));
        assert_eq!(s.dismissed_suggestions, ["s1"]);
        assert_eq!(s.email, "a@example.com");
    }

    #[test]
    fn test_switching_user_starts_fresh() {
        let previous = Session {
            user_id: "u1".into(),
            sms_api_key: Some("key".into()),
            dismissed_suggestions: vec!["s1".into()],
            ..Default::default()
        };
        let s = build_session(Some(previous), args("u2")).unwrap();
        assert_eq!(s.user_id, "u2");
        assert!(s.dismissed_suggestions.is_empty());
        assert_eq!(s.sms_api_key, None);
    }

    #[test]
    fn test_blank_user_id() {
        assert!(build_session(None, args("  ")).is_err());
    }
}
