//
//  basecamp-cli
//  cli/auth.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Authentication commands for the Basecamp CLI.
//!
//! Secrets are stored in the system keyring under the profile name; the
//! profile in the configuration file records the API version, account and
//! authentication kind.

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use console::style;
use dialoguer::Input;
use serde_json::{json, Value};

use crate::api::{ApiClient, ApiResult, ApiVersion, ClientConfig, LAUNCHPAD_URI};
use crate::auth::{
    prompt_secret, read_secret_from_stdin, resolve_credentials, validate_token, AuthCredential,
    AuthKind, Credentials, KeyringStore,
};
use crate::config::Config;

use super::GlobalOptions;

/// Manage stored credentials.
#[derive(Args, Debug)]
pub struct AuthCommand {
    #[command(subcommand)]
    pub command: AuthSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthSubcommand {
    /// Store credentials for a profile
    Login(LoginArgs),

    /// Remove stored credentials for a profile
    Logout(LogoutArgs),

    /// Check the credentials of a profile
    Status(StatusArgs),
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// API version of the profile (classic, bc3, keyed)
    #[arg(long)]
    pub api_version: Option<ApiVersion>,

    /// Account id (chosen from the authorization response if omitted)
    #[arg(long)]
    pub account_id: Option<String>,

    /// Read the secret from standard input
    #[arg(long)]
    pub with_token: bool,

    /// Authenticate with an API key and email instead of a bearer token
    #[arg(long)]
    pub api_key: bool,

    /// Email sent with the API key
    #[arg(long, requires = "api_key")]
    pub email: Option<String>,

    /// Store the token without checking it against the authorization endpoint
    #[arg(long)]
    pub skip_verify: bool,
}

#[derive(Args, Debug)]
pub struct LogoutArgs {
    /// Also remove the profile from the configuration file
    #[arg(long)]
    pub forget: bool,
}

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Show the secret (masked)
    #[arg(long, short = 't')]
    pub show_token: bool,
}

impl AuthCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            AuthSubcommand::Login(args) => login(args, global).await,
            AuthSubcommand::Logout(args) => logout(args, global),
            AuthSubcommand::Status(args) => status(args, global).await,
        }
    }
}

/// Stores a secret for the active profile and records the profile settings.
async fn login(args: &LoginArgs, global: &GlobalOptions) -> Result<()> {
    let mut config = Config::load()?;
    let name = config.profile_name(global.profile.as_deref());
    let profile = config.profile(&name);
    let version = args.api_version.unwrap_or(profile.api_version);

    let secret = if args.with_token {
        read_secret_from_stdin()?
    } else if args.api_key {
        prompt_secret("API key")?
    } else {
        prompt_secret("Access token")?
    };
    if !validate_token(&secret) {
        bail!("Invalid token format");
    }

    let mut account_id = args
        .account_id
        .clone()
        .or_else(|| global.account_id.clone())
        .or(profile.account_id.clone());

    let (kind, email) = if args.api_key {
        let email = match args.email.clone().or_else(|| global.email.clone()).or(profile.email.clone()) {
            Some(email) => email,
            None => Input::<String>::new().with_prompt("Email").interact_text()?,
        };
        (AuthKind::ApiKey, Some(email))
    } else {
        if !args.skip_verify {
            println!("Validating token...");
            let identity = authorize(AuthCredential::bearer(secret.clone())).await?;
            let body = match identity {
                ApiResult::Success { body, .. } => body.into_value(),
                ApiResult::Failure { status, .. } => {
                    bail!("Token was rejected (status {})", status)
                }
            };
            if let Some(who) = identity_name(&body) {
                println!("Authenticated as {}", style(who).bold());
            }
            if account_id.is_none() {
                account_id = select_account(&body, version);
                if let Some(id) = &account_id {
                    println!("Using account {}", id);
                }
            }
        }
        (AuthKind::Bearer, profile.email.clone())
    };

    KeyringStore::new().store(&name, &secret)?;

    let entry = config.profile_mut(&name);
    entry.api_version = version;
    entry.auth = kind;
    entry.email = email;
    entry.account_id = account_id;
    if config.core.default_profile.is_none() {
        config.core.default_profile = Some(name.clone());
    }
    config.save()?;

    println!("{} Logged in with profile '{}'", style("✓").green(), name);
    Ok(())
}

fn logout(args: &LogoutArgs, global: &GlobalOptions) -> Result<()> {
    let mut config = Config::load()?;
    let name = config.profile_name(global.profile.as_deref());

    KeyringStore::new().delete(&name)?;

    if args.forget {
        config.profiles.remove(&name);
        if config.core.default_profile.as_deref() == Some(name.as_str()) {
            config.core.default_profile = None;
        }
        config.save()?;
    }

    println!("Logged out of profile '{}'", name);
    Ok(())
}

/// Shows the active profile and checks its credentials against launchpad.
async fn status(args: &StatusArgs, global: &GlobalOptions) -> Result<()> {
    let config = Config::load()?;
    let name = config.profile_name(global.profile.as_deref());
    let profile = config.profile(&name);

    let credentials = resolve_credentials(&name, &profile, &global.overrides(), || {
        KeyringStore::new().get(&name)
    })?;

    let result = match credentials.secret() {
        AuthCredential::Bearer { .. } => Some(authorize(credentials.secret().clone()).await?),
        _ => None,
    };
    let active = result.as_ref().map(ApiResult::is_success);
    let identity = result
        .filter(ApiResult::is_success)
        .and_then(|r| identity_name(&r.body().clone().into_value()));

    if global.json {
        let mut report = json!({
            "profile": name,
            "api_version": profile.api_version,
            "account_id": credentials.account_id(),
            "auth": credentials.secret().kind(),
            "active": active,
            "identity": identity,
        });
        if args.show_token {
            report["token"] = Value::String(credentials.secret().masked());
        }
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", style(&name).bold());
    println!("  API version: {}", profile.api_version);
    if let Some(account_id) = credentials.account_id() {
        println!("  Account: {}", account_id);
    }
    println!("  Auth: {}", credentials.secret().kind());
    if let Some(who) = identity {
        println!("  Logged in as: {}", who);
    }
    match active {
        Some(true) => println!("  Status: {}", style("Active").green()),
        Some(false) => println!("  Status: {}", style("Invalid/Expired").red()),
        None => println!("  Status: not checked"),
    }
    if args.show_token {
        println!("  Token: {}", credentials.secret().masked());
    }
    Ok(())
}

async fn authorize(secret: AuthCredential) -> Result<ApiResult> {
    let mut client = ApiClient::new(Credentials::new(secret), ClientConfig::new(LAUNCHPAD_URI))?;
    Ok(client.check_authorization().await?)
}

/// Display name from an authorization response.
fn identity_name(body: &Value) -> Option<String> {
    let identity = body.get("identity")?;
    let email = identity.get("email_address").and_then(Value::as_str);
    let first = identity.get("first_name").and_then(Value::as_str);
    let last = identity.get("last_name").and_then(Value::as_str);

    match (first, last, email) {
        (Some(first), Some(last), Some(email)) => Some(format!("{} {} <{}>", first, last, email)),
        (_, _, Some(email)) => Some(email.to_string()),
        (Some(first), _, None) => Some(first.to_string()),
        _ => None,
    }
}

/// First account in an authorization response that serves `version`.
fn select_account(body: &Value, version: ApiVersion) -> Option<String> {
    let product = match version {
        ApiVersion::Classic => "bcx",
        ApiVersion::Bc3 | ApiVersion::Keyed => "bc3",
    };
    body.get("accounts")?
        .as_array()?
        .iter()
        .find(|account| account.get("product").and_then(Value::as_str) == Some(product))
        .and_then(|account| account.get("id"))
        .map(|id| match id {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authorization() -> Value {
        json!({
            "identity": {
                "id": 9,
                "first_name": "Ada",
                "last_name": "Lovelace",
                "email_address": "ada@example.com"
            },
            "accounts": [
                {"product": "bcx", "id": 111, "name": "Old HQ"},
                {"product": "bc3", "id": 999, "name": "HQ"}
            ]
        })
    }

    #[test]
    fn test_identity_name() {
        assert_eq!(
            identity_name(&authorization()).as_deref(),
            Some("Ada Lovelace <ada@example.com>")
        );
        assert_eq!(
            identity_name(&json!({"identity": {"email_address": "x@example.com"}})).as_deref(),
            Some("x@example.com")
        );
        assert!(identity_name(&json!({})).is_none());
    }

    #[test]
    fn test_select_account_by_product() {
        assert_eq!(select_account(&authorization(), ApiVersion::Bc3).as_deref(), Some("999"));
        assert_eq!(select_account(&authorization(), ApiVersion::Classic).as_deref(), Some("111"));
        assert!(select_account(&json!({"accounts": []}), ApiVersion::Bc3).is_none());
    }
}
