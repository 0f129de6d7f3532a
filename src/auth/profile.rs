//
//  basecamp-cli
//  auth/profile.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Profile Credential Resolution
//!
//! A profile in the configuration file records *how* to authenticate (auth
//! kind, email, account id); the secret itself lives in the keyring. This
//! module combines the two, letting flags and environment variables take
//! precedence:
//!
//! 1. `--token` / `BCX_TOKEN` selects bearer authentication
//! 2. `--api-key` / `BCX_API_KEY` selects API-key authentication
//! 3. otherwise the profile's auth kind, with the secret from the keyring
//!
//! The keyring is only consulted when neither override is present.

use anyhow::{bail, Result};
use thiserror::Error;

use super::{AuthCredential, AuthKind, Credentials};
use crate::config::ProfileConfig;

/// A profile expects a stored secret but the keyring has none.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MissingSecret {
    #[error("Not authenticated for profile '{0}'. Run 'bcx auth login' first.")]
    Token(String),

    #[error("No API key stored for profile '{0}'. Run 'bcx auth login --api-key' first.")]
    ApiKey(String),
}

/// Secrets and identifiers supplied by flags or environment variables.
#[derive(Debug, Clone, Default)]
pub struct SecretOverrides {
    pub token: Option<String>,
    pub api_key: Option<String>,
    pub email: Option<String>,
    pub account_id: Option<String>,
}

/// Builds the credentials for `name`, reading the stored secret lazily.
///
/// # Errors
///
/// Fails when the profile needs a secret and none is stored, or when API-key
/// authentication has no email configured.
pub fn resolve_credentials<F>(
    name: &str,
    profile: &ProfileConfig,
    overrides: &SecretOverrides,
    stored_secret: F,
) -> Result<Credentials>
where
    F: FnOnce() -> Result<Option<String>>,
{
    let email = overrides.email.clone().or_else(|| profile.email.clone());

    let secret = if let Some(token) = &overrides.token {
        AuthCredential::bearer(token.clone())
    } else if let Some(key) = &overrides.api_key {
        match email {
            Some(email) => AuthCredential::api_key(key.clone(), email),
            None => bail!("API key authentication requires an email (--email or BCX_EMAIL)"),
        }
    } else {
        match profile.auth {
            AuthKind::None => {
                tracing::warn!("Profile '{}' has no credentials; requests will be anonymous", name);
                AuthCredential::None
            }
            AuthKind::Bearer => match stored_secret()? {
                Some(token) => AuthCredential::bearer(token),
                None => return Err(MissingSecret::Token(name.to_string()).into()),
            },
            AuthKind::ApiKey => {
                let Some(email) = email else {
                    bail!("Profile '{}' uses API key authentication but has no email", name);
                };
                match stored_secret()? {
                    Some(key) => AuthCredential::api_key(key, email),
                    None => return Err(MissingSecret::ApiKey(name.to_string()).into()),
                }
            }
        }
    };

    let mut credentials = Credentials::new(secret);
    if let Some(account_id) = overrides
        .account_id
        .clone()
        .or_else(|| profile.account_id.clone())
    {
        credentials = credentials.with_account(account_id);
    }
    Ok(credentials)
}
