use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use vault_ledger::{
    MemoryStore, RemoteSmsApi, RestConfig, RestStore, SimulatedInbox, SmsSource, Store,
};

use crate::state::{Session, ensure_vault_home};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub store: StoreSection,
    #[serde(default)]
    pub sms: SmsSection,
    #[serde(default)]
    pub general: GeneralSection,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// JSON snapshot on this machine
    #[default]
    Local,
    /// PostgREST tables
    Rest,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct StoreSection {
    #[serde(default)]
    pub backend: Backend,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub anon_key: String,
    /// For backend = "local" (default: ~/.vault/vault.json)
    #[serde(default)]
    pub snapshot: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SmsSourceKind {
    #[default]
    Simulated,
    Remote,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SmsSection {
    #[serde(default)]
    pub source: SmsSourceKind,
    #[serde(default)]
    pub api_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneralSection {
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralSection {
    fn default() -> Self {
        Self { timezone: default_timezone(), log_level: default_log_level() }
    }
}

fn default_timezone() -> String {
    "Asia/Kolkata".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_vault_home()?.join("config.toml"))
}

pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

pub fn show_config() -> Result<()> {
    let p = config_path()?;
    let cfg = load_config()?;
    let origin = if p.exists() { "" } else { " (not written yet; defaults)" };
    println!("# {}{}", p.display(), origin);
    print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
    Ok(())
}

impl Config {
    pub fn snapshot_path(&self) -> Result<PathBuf> {
        match &self.store.snapshot {
            Some(p) => Ok(p.clone()),
            None => Ok(ensure_vault_home()?.join("vault.json")),
        }
    }

    /// Build the configured store. The REST backend authenticates with the
    /// session's access token when there is one.
    pub fn open_store(&self, session: Option<&Session>) -> Result<Box<dyn Store>> {
        match self.store.backend {
            Backend::Local => {
                let path = self.snapshot_path()?;
                let store = MemoryStore::open(&path)
                    .with_context(|| format!("open snapshot {}", path.display()))?;
                Ok(Box::new(store))
            }
            Backend::Rest => {
                if self.store.url.trim().is_empty() || self.store.anon_key.trim().is_empty() {
                    bail!("store.url and store.anon_key must be set for backend = \"rest\"");
                }
                Ok(Box::new(RestStore::new(RestConfig {
                    url: self.store.url.clone(),
                    anon_key: self.store.anon_key.clone(),
                    access_token: session.and_then(|s| s.access_token.clone()),
                })))
            }
        }
    }

    pub fn sms_source(&self, session: &Session) -> Result<Box<dyn SmsSource>> {
        match self.sms.source {
            SmsSourceKind::Simulated => Ok(Box::new(SimulatedInbox::sample())),
            SmsSourceKind::Remote => {
                if self.sms.api_url.trim().is_empty() {
                    bail!("sms.api_url must be set for source = \"remote\"");
                }
                Ok(Box::new(RemoteSmsApi::new(
                    self.sms.api_url.clone(),
                    session.sms_api_key.clone(),
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(cfg.store.backend, Backend::Local);
        assert_eq!(cfg.sms.source, SmsSourceKind::Simulated);
        assert_eq!(cfg.general.timezone, "Asia/Kolkata");
        assert_eq!(cfg.general.log_level, "warn");
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[store]\nbackend = \"rest\"\nurl = \"https://db.example.com\"\nanon_key = \"anon\"\n\n[sms]\nsource = \"remote\"\n",
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.store.backend, Backend::Rest);
        assert_eq!(cfg.sms.source, SmsSourceKind::Remote);
        assert_eq!(cfg.general, GeneralSection::default());
        assert!(cfg.open_store(None).is_ok());
        assert!(cfg.sms_source(&Session::default()).is_err());
    }

    #[test]
    fn test_bad_backend_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[store]\nbackend = \"sqlite\"\n").unwrap();
        assert!(load_config_from(&path).is_err());
    }

    #[test]
    fn test_default_config_serializes() {
        let s = toml::to_string_pretty(&Config::default()).unwrap();
        let back: Config = toml::from_str(&s).unwrap();
        assert_eq!(back, Config::default());
    }
}
