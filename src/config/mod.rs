//
//  basecamp-cli
//  config/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration Module
//!
//! This module manages the CLI configuration: general settings plus named
//! profiles, stored as TOML in a platform-specific directory.
//!
//! ## Configuration File Location
//!
//! - **Linux**: `~/.config/bcx/config.toml`
//! - **macOS**: `~/Library/Application Support/bcx/config.toml`
//! - **Windows**: `C:\Users\<User>\AppData\Roaming\bcx\config.toml`
//!
//! The `BCX_CONFIG` environment variable points at a different file.
//!
//! ## Example Configuration File
//!
//! ```toml
//! [core]
//! default_profile = "work"
//! timeout = 30
//!
//! [profiles.work]
//! api_version = "bc3"
//! account_id = "999999999"
//! auth = "bearer"
//!
//! [profiles.legacy]
//! api_version = "classic"
//! account_id = "123456"
//! auth = "none"
//! decode = "raw"
//! ```
//!
//! Secrets are never written here; they live in the system keyring.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use basecamp_cli::config::Config;
//!
//! let mut config = Config::load()?;
//! config.set("default_profile", "work")?;
//! config.set("profiles.work.account_id", "999999999")?;
//! config.save()?;
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Submodules
//!
//! - [`file`]: Low-level configuration file I/O
//! - [`profile`]: Per-profile settings and their translation to client settings

mod file;
mod profile;

pub use file::*;
pub use profile::*;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Environment variable that overrides the configuration file path.
pub const CONFIG_PATH_ENV: &str = "BCX_CONFIG";

/// Profile used when neither a flag nor `core.default_profile` names one.
pub const DEFAULT_PROFILE: &str = "default";

/// Root of the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub core: CoreConfig,

    #[serde(default)]
    pub profiles: BTreeMap<String, ProfileConfig>,
}

/// The `[core]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_profile: Option<String>,

    /// Transport timeout in seconds; unset waits indefinitely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl CoreConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }
}

impl Config {
    /// Loads the configuration from the default location.
    ///
    /// A missing file yields the default configuration.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        match read_config_file(path)? {
            Some(content) => toml::from_str(&content)
                .with_context(|| format!("Invalid configuration in {}", path.display())),
            None => Ok(Self::default()),
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        write_config_file(path, &content)
    }

    /// Path of the configuration file, honouring `BCX_CONFIG`.
    pub fn config_path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
            return Ok(PathBuf::from(path));
        }
        let dirs = ProjectDirs::from("", "", crate::APP_NAME)
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Name of the profile to use: `requested`, then `core.default_profile`,
    /// then [`DEFAULT_PROFILE`].
    pub fn profile_name(&self, requested: Option<&str>) -> String {
        requested
            .or(self.core.default_profile.as_deref())
            .unwrap_or(DEFAULT_PROFILE)
            .to_string()
    }

    /// The named profile, or an all-defaults profile if it is not configured.
    pub fn profile(&self, name: &str) -> ProfileConfig {
        self.profiles.get(name).cloned().unwrap_or_default()
    }

    pub fn profile_mut(&mut self, name: &str) -> &mut ProfileConfig {
        self.profiles.entry(name.to_string()).or_default()
    }

    /// Reads a setting.
    ///
    /// Keys are `default_profile`, `timeout`, or `profiles.<name>.<key>`
    /// with `<key>` one of [`PROFILE_KEYS`].
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "default_profile" => self.core.default_profile.clone(),
            "timeout" => self.core.timeout.map(|t| t.to_string()),
            _ => {
                let (name, field) = split_profile_key(key)?;
                self.profiles.get(name)?.get(field)
            }
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "default_profile" => self.core.default_profile = Some(value.trim().to_string()),
            "timeout" => {
                let secs = value
                    .trim()
                    .parse::<u64>()
                    .with_context(|| format!("Invalid timeout '{}': expected seconds", value))?;
                self.core.timeout = Some(secs);
            }
            _ => match split_profile_key(key) {
                Some((name, field)) => self.profile_mut(name).set(field, value)?,
                None => bail!("Unknown configuration key '{}'", key),
            },
        }
        Ok(())
    }

    /// Removes a setting. Removing the last setting of a profile keeps the
    /// (empty) profile.
    pub fn unset(&mut self, key: &str) -> Result<()> {
        match key {
            "default_profile" => self.core.default_profile = None,
            "timeout" => self.core.timeout = None,
            _ => match split_profile_key(key) {
                Some((name, field)) => match self.profiles.get_mut(name) {
                    Some(profile) => profile.unset(field)?,
                    None => bail!("No profile named '{}'", name),
                },
                None => bail!("Unknown configuration key '{}'", key),
            },
        }
        Ok(())
    }

    /// Every configured setting as `(key, value)` pairs.
    pub fn entries(&self) -> Vec<(String, String)> {
        let mut entries = Vec::new();
        for key in ["default_profile", "timeout"] {
            if let Some(value) = self.get(key) {
                entries.push((key.to_string(), value));
            }
        }
        for (name, profile) in &self.profiles {
            for (field, value) in profile.entries() {
                entries.push((format!("profiles.{}.{}", name, field), value));
            }
        }
        entries
    }
}

/// Splits `profiles.<name>.<field>`; profile names may contain dots.
fn split_profile_key(key: &str) -> Option<(&str, &str)> {
    let rest = key.strip_prefix("profiles.")?;
    let (name, field) = rest.rsplit_once('.')?;
    if name.is_empty() || !PROFILE_KEYS.contains(&field) {
        return None;
    }
    Some((name, field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiVersion;
    use crate::auth::AuthKind;

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.set("default_profile", "work").unwrap();
        config.set("timeout", "30").unwrap();
        config.set("profiles.work.account_id", "999").unwrap();
        config.set("profiles.work.auth", "api_key").unwrap();
        config.set("profiles.work.email", "me@example.com").unwrap();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.core.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(loaded.profile("work").auth, AuthKind::ApiKey);
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_parse_hand_written_file() {
        let config: Config = toml::from_str(
            r#"
            [core]
            default_profile = "legacy"

            [profiles.legacy]
            api_version = "classic"
            account_id = "123"
            auth = "none"
            decode = "raw"
            "#,
        )
        .unwrap();

        let profile = config.profile(&config.profile_name(None));
        assert_eq!(profile.api_version, ApiVersion::Classic);
        assert_eq!(profile.auth, AuthKind::None);
        assert_eq!(config.get("profiles.legacy.decode").as_deref(), Some("raw"));
    }

    #[test]
    fn test_invalid_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[core\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("config.toml"));
    }

    #[test]
    fn test_profile_name_precedence() {
        let mut config = Config::default();
        assert_eq!(config.profile_name(None), DEFAULT_PROFILE);

        config.core.default_profile = Some("work".to_string());
        assert_eq!(config.profile_name(None), "work");
        assert_eq!(config.profile_name(Some("home")), "home");
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let mut config = Config::default();
        assert!(config.set("editor", "vim").is_err());
        assert!(config.set("profiles.work.colour", "blue").is_err());
        assert!(config.set("timeout", "soon").is_err());
        assert!(config.unset("profiles.missing.email").is_err());
        assert!(config.get("profiles.work").is_none());
    }

    #[test]
    fn test_dotted_profile_names_and_entries() {
        let mut config = Config::default();
        config.set("profiles.acme.eu.account_id", "77").unwrap();

        assert_eq!(config.get("profiles.acme.eu.account_id").as_deref(), Some("77"));
        assert!(config
            .entries()
            .contains(&("profiles.acme.eu.account_id".to_string(), "77".to_string())));

        config.unset("profiles.acme.eu.account_id").unwrap();
        assert!(config.get("profiles.acme.eu.account_id").is_none());
    }
}
