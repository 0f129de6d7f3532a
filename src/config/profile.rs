//
//  basecamp-cli
//  config/profile.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Profiles
//!
//! A profile names one Basecamp account and how to reach it. Everything
//! except the secret is stored here; see [`crate::auth::resolve_credentials`]
//! for how the secret is attached.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::api::{ApiError, ApiVersion, ClientConfig, DecodePolicy, RouteStyle};
use crate::auth::AuthKind;

/// Keys accepted by [`ProfileConfig::get`] and [`ProfileConfig::set`].
pub const PROFILE_KEYS: &[&str] = &[
    "api_version",
    "account_id",
    "auth",
    "email",
    "route_suffix",
    "decode",
    "base_uri",
];

/// One `[profiles.<name>]` table.
///
/// The optional overrides replace what [`ApiVersion`] would otherwise choose.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileConfig {
    #[serde(default)]
    pub api_version: ApiVersion,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,

    #[serde(default)]
    pub auth: AuthKind,

    /// Sent as `X-Auth-Email` with API-key authentication.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Empty string disables the suffix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_suffix: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decode: Option<DecodePolicy>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_uri: Option<String>,
}

impl ProfileConfig {
    /// Builds the client settings for this profile.
    ///
    /// `account_id` is the effective account, which may come from an
    /// environment override rather than the profile itself.
    ///
    /// # Errors
    ///
    /// [`ApiError::MissingAccount`] if the version needs an account id, no
    /// `base_uri` override is set and `account_id` is `None`.
    pub fn client_config(&self, account_id: Option<&str>) -> Result<ClientConfig, ApiError> {
        let mut config = match &self.base_uri {
            Some(base_uri) => ClientConfig::new(base_uri.clone())
                .with_route_style(self.api_version.route_style())
                .with_decode(self.api_version.decode_policy()),
            None => ClientConfig::for_version(self.api_version, account_id)?,
        };
        if let Some(suffix) = &self.route_suffix {
            config = config.with_route_style(RouteStyle::from_suffix(suffix));
        }
        if let Some(decode) = self.decode {
            config = config.with_decode(decode);
        }
        Ok(config)
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "api_version" => Some(self.api_version.to_string()),
            "account_id" => self.account_id.clone(),
            "auth" => Some(self.auth.to_string()),
            "email" => self.email.clone(),
            "route_suffix" => self.route_suffix.clone(),
            "decode" => self.decode.map(|d| d.to_string()),
            "base_uri" => self.base_uri.clone(),
            _ => None,
        }
    }

    /// Sets `key` to `value`, validating enumerated values.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api_version" => self.api_version = value.parse()?,
            "account_id" => self.account_id = Some(value.trim().to_string()),
            "auth" => self.auth = value.parse()?,
            "email" => self.email = Some(value.trim().to_string()),
            "route_suffix" => self.route_suffix = Some(value.trim().to_string()),
            "decode" => self.decode = Some(value.parse()?),
            "base_uri" => {
                url::Url::parse(value)
                    .map_err(|e| anyhow::anyhow!("Invalid base URI '{}': {}", value, e))?;
                self.base_uri = Some(value.trim_end_matches('/').to_string());
            }
            _ => bail!("Unknown profile key '{}'", key),
        }
        Ok(())
    }

    /// Resets `key` to its default.
    pub fn unset(&mut self, key: &str) -> Result<()> {
        match key {
            "api_version" => self.api_version = ApiVersion::default(),
            "account_id" => self.account_id = None,
            "auth" => self.auth = AuthKind::default(),
            "email" => self.email = None,
            "route_suffix" => self.route_suffix = None,
            "decode" => self.decode = None,
            "base_uri" => self.base_uri = None,
            _ => bail!("Unknown profile key '{}'", key),
        }
        Ok(())
    }

    /// Non-default settings as `(key, value)` pairs, in [`PROFILE_KEYS`] order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        PROFILE_KEYS
            .iter()
            .filter_map(|key| self.get(key).map(|value| (*key, value)))
            .collect()
    }
}
