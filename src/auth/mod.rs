//
//  basecamp-cli
//  auth/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Authentication Module
//!
//! This module turns stored credentials into the header set that identifies
//! the caller to the API.
//!
//! ## Supported Authentication Methods
//!
//! - **Bearer token**: OAuth access token sent as `Authorization: Bearer ...`.
//!   Used by the Basecamp 2 and Basecamp 3 APIs.
//! - **API key**: key + account email sent as `X-Auth-Key` / `X-Auth-Email`.
//! - **None**: no identifying headers. Requests are still sent and the API is
//!   expected to reject them with a 401, which surfaces as an ordinary failure.
//!
//! ## Module Structure
//!
//! - [`keyring`]: Secure secret storage using the system keyring
//! - [`profile`]: Resolving a profile's credentials from flags, environment and keyring
//! - [`token`]: Reading and validating secrets typed or piped by the user
//!
//! ## Example
//!
//! ```rust
//! use basecamp_cli::auth::{AuthCredential, Credentials};
//!
//! let credentials = Credentials::new(AuthCredential::bearer("your_access_token"))
//!     .with_account("999999999");
//!
//! let headers = credentials.auth_headers();
//! assert_eq!(headers.get("Authorization"), Some("Bearer your_access_token"));
//! assert_eq!(headers.get("Content-Type"), Some("application/json"));
//! ```

mod keyring;
mod profile;
mod token;

pub use self::keyring::*;
pub use self::profile::*;
pub use self::token::*;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::api::{Headers, CONTENT_TYPE, JSON_CONTENT_TYPE};

/// The secret part of a set of credentials.
///
/// # Variants
///
/// - `Bearer`: OAuth access token.
/// - `ApiKey`: API key paired with the account email.
/// - `None`: anonymous; produces no headers.
///
/// `Debug` output masks secrets so credentials can appear in traces.
#[derive(Clone, PartialEq, Eq, Default)]
pub enum AuthCredential {
    /// OAuth 2.0 bearer token.
    Bearer {
        /// The access token.
        token: String,
    },
    /// API key authentication.
    ApiKey {
        /// The API key.
        key: String,
        /// Email address of the account owning the key.
        email: String,
    },
    /// No credentials configured.
    #[default]
    None,
}

impl AuthCredential {
    /// Creates a bearer-token credential.
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }

    /// Creates an API-key credential.
    pub fn api_key(key: impl Into<String>, email: impl Into<String>) -> Self {
        Self::ApiKey {
            key: key.into(),
            email: email.into(),
        }
    }

    /// Produces the headers identifying the caller.
    ///
    /// | Variant | Headers |
    /// |---------|---------|
    /// | `Bearer` | `Authorization`, `Content-Type: application/json` |
    /// | `ApiKey` | `Content-Type: application/json`, `X-Auth-Email`, `X-Auth-Key` |
    /// | `None` | none |
    ///
    /// # Example
    ///
    /// ```rust
    /// use basecamp_cli::auth::AuthCredential;
    ///
    /// let headers = AuthCredential::api_key("k3y", "me@example.com").auth_headers();
    /// let names: Vec<&str> = headers.iter().map(|(name, _)| name).collect();
    /// assert_eq!(names, ["Content-Type", "X-Auth-Email", "X-Auth-Key"]);
    ///
    /// assert!(AuthCredential::None.auth_headers().is_empty());
    /// ```
    pub fn auth_headers(&self) -> Headers {
        let mut headers = Headers::new();
        match self {
            Self::Bearer { token } => {
                headers.insert("Authorization", format!("Bearer {}", token));
                headers.insert(CONTENT_TYPE, JSON_CONTENT_TYPE);
            }
            Self::ApiKey { key, email } => {
                headers.insert(CONTENT_TYPE, JSON_CONTENT_TYPE);
                headers.insert("X-Auth-Email", email.as_str());
                headers.insert("X-Auth-Key", key.as_str());
            }
            Self::None => {}
        }
        headers
    }

    pub fn kind(&self) -> AuthKind {
        match self {
            Self::Bearer { .. } => AuthKind::Bearer,
            Self::ApiKey { .. } => AuthKind::ApiKey,
            Self::None => AuthKind::None,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Returns the value that gets stored in the keyring, if any.
    pub fn secret(&self) -> Option<&str> {
        match self {
            Self::Bearer { token } => Some(token.as_str()),
            Self::ApiKey { key, .. } => Some(key.as_str()),
            Self::None => None,
        }
    }

    /// Human-readable summary with the secret masked.
    ///
    /// ```rust
    /// use basecamp_cli::auth::AuthCredential;
    ///
    /// assert_eq!(AuthCredential::bearer("abcdef123456").masked(), "bearer abcd********");
    /// assert_eq!(AuthCredential::None.masked(), "none");
    /// ```
    pub fn masked(&self) -> String {
        match self {
            Self::Bearer { token } => format!("bearer {}", mask(token)),
            Self::ApiKey { key, email } => format!("api_key {} ({})", mask(key), email),
            Self::None => "none".to_string(),
        }
    }
}

impl fmt::Debug for AuthCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bearer { token } => f
                .debug_struct("Bearer")
                .field("token", &mask(token))
                .finish(),
            Self::ApiKey { key, email } => f
                .debug_struct("ApiKey")
                .field("key", &mask(key))
                .field("email", email)
                .finish(),
            Self::None => f.write_str("None"),
        }
    }
}

fn mask(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    if secret.chars().count() <= 8 {
        "********".to_string()
    } else {
        format!("{}********", visible)
    }
}

/// The authentication scheme, without the secret.
///
/// Stored in configuration profiles; the secret itself lives in the keyring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthKind {
    #[default]
    Bearer,
    ApiKey,
    None,
}

impl AuthKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bearer => "bearer",
            Self::ApiKey => "api_key",
            Self::None => "none",
        }
    }
}

impl fmt::Display for AuthKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "bearer" | "token" => Ok(Self::Bearer),
            "api_key" | "key" => Ok(Self::ApiKey),
            "none" => Ok(Self::None),
            other => anyhow::bail!("Unknown auth kind '{}' (expected bearer, api_key or none)", other),
        }
    }
}

/// Everything a client needs to identify itself.
///
/// Owned by a single client instance and immutable after construction, so
/// differently-credentialed clients can coexist in one process.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Credentials {
    account_id: Option<String>,
    secret: AuthCredential,
}

impl Credentials {
    pub fn new(secret: AuthCredential) -> Self {
        Self {
            account_id: None,
            secret,
        }
    }

    /// Anonymous credentials.
    pub fn anonymous() -> Self {
        Self::new(AuthCredential::None)
    }

    /// Sets the account id used to derive account-scoped base URIs.
    pub fn with_account(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    pub fn account_id(&self) -> Option<&str> {
        self.account_id.as_deref()
    }

    pub fn secret(&self) -> &AuthCredential {
        &self.secret
    }

    /// Headers for the next request; see [`AuthCredential::auth_headers`].
    pub fn auth_headers(&self) -> Headers {
        if self.secret.is_anonymous() {
            tracing::debug!("No credentials configured; sending unauthenticated request");
        }
        self.secret.auth_headers()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_headers() {
        let headers = AuthCredential::bearer("abc").auth_headers();
        let pairs: Vec<(&str, &str)> = headers.iter().collect();
        assert_eq!(
            pairs,
            vec![
                ("Authorization", "Bearer abc"),
                ("Content-Type", "application/json"),
            ]
        );
    }

    #[test]
    fn test_api_key_headers() {
        let headers = AuthCredential::api_key("k", "me@example.com").auth_headers();
        let pairs: Vec<(&str, &str)> = headers.iter().collect();
        assert_eq!(
            pairs,
            vec![
                ("Content-Type", "application/json"),
                ("X-Auth-Email", "me@example.com"),
                ("X-Auth-Key", "k"),
            ]
        );
    }

    #[test]
    fn test_none_headers_are_empty() {
        assert!(AuthCredential::None.auth_headers().is_empty());
        assert!(Credentials::anonymous().auth_headers().is_empty());
    }

    #[test]
    fn test_debug_masks_secret() {
        let debug = format!("{:?}", AuthCredential::bearer("super-secret-token"));
        assert!(!debug.contains("super-secret-token"));
        assert!(debug.contains("supe********"));

        let short = format!("{:?}", AuthCredential::api_key("short", "me@example.com"));
        assert!(!short.contains("short\""));
        assert!(short.contains("me@example.com"));
    }

    #[test]
    fn test_auth_kind_parse() {
        assert_eq!("bearer".parse::<AuthKind>().unwrap(), AuthKind::Bearer);
        assert_eq!("api-key".parse::<AuthKind>().unwrap(), AuthKind::ApiKey);
        assert_eq!("NONE".parse::<AuthKind>().unwrap(), AuthKind::None);
        assert!("basic".parse::<AuthKind>().is_err());
    }

    #[test]
    fn test_credentials_are_instance_owned() {
        let first = Credentials::new(AuthCredential::bearer("one")).with_account("1");
        let second = Credentials::new(AuthCredential::bearer("two")).with_account("2");

        assert_eq!(first.auth_headers().get("Authorization"), Some("Bearer one"));
        assert_eq!(second.auth_headers().get("Authorization"), Some("Bearer two"));
        assert_eq!(first.account_id(), Some("1"));
    }
}
