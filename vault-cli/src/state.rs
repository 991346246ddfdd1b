use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use vault_ledger::Identity;

/// `$VAULT_HOME`, or `~/.vault`.
pub fn vault_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("VAULT_HOME") {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".vault"))
}

pub fn ensure_vault_home() -> Result<PathBuf> {
    let dir = vault_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

/// Who is signed in on this machine, plus local-only secrets.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Session {
    pub user_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    /// Bearer token for the REST store; the anon key is used without one
    #[serde(default)]
    pub access_token: Option<String>,
    /// Key for the remote SMS API
    #[serde(default)]
    pub sms_api_key: Option<String>,
    #[serde(default)]
    pub dismissed_suggestions: Vec<String>,
}

impl Session {
    pub fn identity(&self) -> Identity {
        Identity { id: self.user_id.clone(), name: self.name.clone(), email: self.email.clone() }
    }
}

pub fn session_path() -> Result<PathBuf> {
    Ok(ensure_vault_home()?.join("session.json"))
}

pub fn read_session_from(path: &Path) -> Result<Option<Session>> {
    if !path.exists() {
        return Ok(None);
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let session: Session =
        serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))?;
    Ok(Some(session))
}

pub fn write_session_to(path: &Path, session: &Session) -> Result<()> {
    let json = serde_json::to_string_pretty(session)?;
    fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn read_session() -> Result<Option<Session>> {
    read_session_from(&session_path()?)
}

pub fn write_session(session: &Session) -> Result<()> {
    write_session_to(&session_path()?, session)
}

/// The current session, or a pointer to `vault auth login`.
pub fn require_session() -> Result<Session> {
    match read_session()? {
        Some(s) if !s.user_id.is_empty() => Ok(s),
        _ => bail!("Not signed in. Run: vault auth login"),
    }
}

pub fn clear_session() -> Result<bool> {
    let p = session_path()?;
    if !p.exists() {
        return Ok(false);
    }
    fs::remove_file(&p).with_context(|| format!("remove {}", p.display()))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_round_trip_and_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        assert_eq!(read_session_from(&path).unwrap(), None);

        let session = Session {
            user_id: "u1".into(),
            email: "a@example.com".into(),
            sms_api_key: Some("key".into()),
            ..Default::default()
        };
        write_session_to(&path, &session).unwrap();
        assert_eq!(read_session_from(&path).unwrap(), Some(session));
    }

    #[test]
    fn test_older_session_files_still_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, r#"{"user_id":"u1"}"#).unwrap();
        let s = read_session_from(&path).unwrap().unwrap();
        assert!(s.dismissed_suggestions.is_empty());
        assert_eq!(s.identity().id, "u1");
    }
}
