//
//  basecamp-cli
//  auth/keyring.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Secure Secret Storage Module
//!
//! Tokens and API keys are kept in the system's native keyring rather than in
//! the configuration file:
//!
//! - **macOS**: Keychain Services
//! - **Linux**: Secret Service API (GNOME Keyring, KWallet)
//! - **Windows**: Windows Credential Manager
//!
//! ## Storage Model
//!
//! - **Service**: Application identifier (`basecamp-cli`)
//! - **Username/Key**: The profile name
//! - **Password/Value**: The bearer token or API key
//!
//! Non-secret settings (auth kind, email, account id) stay in the profile.
//!
//! ## Example
//!
//! ```rust,no_run
//! use basecamp_cli::auth::KeyringStore;
//!
//! fn manage_secrets() -> anyhow::Result<()> {
//!     let store = KeyringStore::new();
//!
//!     store.store("work", "oauth_token_here")?;
//!
//!     if let Some(_token) = store.get("work")? {
//!         println!("Found stored secret");
//!     }
//!
//!     store.delete("work")?;
//!     Ok(())
//! }
//! ```

use anyhow::{Context, Result};
use keyring::Entry;

const SERVICE_NAME: &str = "basecamp-cli";

/// Keyring-backed secret store, one entry per profile.
pub struct KeyringStore {
    service: String,
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyringStore {
    pub fn new() -> Self {
        Self {
            service: SERVICE_NAME.to_string(),
        }
    }

    pub fn store(&self, profile: &str, secret: &str) -> Result<()> {
        let entry = Entry::new(&self.service, profile)?;
        entry
            .set_password(secret)
            .with_context(|| format!("Failed to store secret for profile '{}'", profile))?;
        tracing::debug!("Stored secret for profile {}", profile);
        Ok(())
    }

    pub fn get(&self, profile: &str) -> Result<Option<String>> {
        let entry = Entry::new(&self.service, profile)?;
        match entry.get_password() {
            Ok(secret) => Ok(Some(secret)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn delete(&self, profile: &str) -> Result<()> {
        let entry = Entry::new(&self.service, profile)?;
        match entry.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()), // Already deleted
            Err(e) => Err(e.into()),
        }
    }
}
