//
//  basecamp-cli
//  cli/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! CLI command definitions using clap derive macros

mod api;
mod auth;
mod completion;
mod config;

pub use api::ApiCommand;
pub use auth::AuthCommand;
pub use completion::CompletionCommand;
pub use config::ConfigCommand;

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::api::{ApiClient, TracingObserver};
use crate::auth::{resolve_credentials, KeyringStore, SecretOverrides};
use crate::config::Config;

/// Work with the Basecamp APIs from the command line
#[derive(Parser, Debug)]
#[command(
    name = "bcx",
    version,
    about = "Work with the Basecamp APIs from the command line",
    long_about = "bcx is an authenticated client for the Basecamp 2, 3 and 4 APIs.\n\n\
                  It sends requests with the credentials of a named profile and prints the decoded response.",
    propagate_version = true,
    after_help = "Use 'bcx <command> --help' for more information about a command."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOptions,
}

/// Options accepted by every command.
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Profile to use (defaults to core.default_profile)
    #[arg(long, short = 'P', global = true, env = "BCX_PROFILE")]
    pub profile: Option<String>,

    /// Output JSON where a command supports it
    #[arg(long, global = true)]
    pub json: bool,

    /// Bearer token, bypassing the keyring
    #[arg(long, global = true, env = "BCX_TOKEN", hide = true, hide_env_values = true)]
    pub token: Option<String>,

    /// API key, bypassing the keyring (requires an email)
    #[arg(long, global = true, env = "BCX_API_KEY", hide = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Email sent with API-key authentication
    #[arg(long, global = true, env = "BCX_EMAIL", hide = true)]
    pub email: Option<String>,

    /// Account id, overriding the profile
    #[arg(long, global = true, env = "BCX_ACCOUNT_ID", hide = true)]
    pub account_id: Option<String>,

    /// Base URI, overriding the profile and API version
    #[arg(long, global = true, env = "BCX_BASE_URI", hide = true)]
    pub base_uri: Option<String>,
}

impl GlobalOptions {
    pub fn overrides(&self) -> SecretOverrides {
        SecretOverrides {
            token: self.token.clone(),
            api_key: self.api_key.clone(),
            email: self.email.clone(),
            account_id: self.account_id.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage stored credentials
    #[command(visible_alias = "login")]
    Auth(AuthCommand),

    /// Make an authenticated API request
    Api(ApiCommand),

    /// Manage configuration
    Config(ConfigCommand),

    /// Generate shell completion scripts
    Completion(CompletionCommand),

    /// Show version information
    Version,
}

/// Builds a client for the active profile.
///
/// Flags and environment variables take precedence over the profile; the
/// keyring is read only when no secret was supplied that way.
pub(crate) fn build_client(global: &GlobalOptions, config: &Config) -> Result<ApiClient> {
    let name = config.profile_name(global.profile.as_deref());
    let mut profile = config.profile(&name);
    if let Some(base_uri) = &global.base_uri {
        profile.base_uri = Some(base_uri.trim_end_matches('/').to_string());
    }

    let credentials = resolve_credentials(&name, &profile, &global.overrides(), || {
        KeyringStore::new().get(&name)
    })?;
    let client_config = profile
        .client_config(credentials.account_id())?
        .with_timeout(config.core.timeout());

    tracing::debug!(
        "Using profile '{}' ({}) at {}",
        name,
        profile.api_version,
        client_config.base_uri
    );

    Ok(ApiClient::new(credentials, client_config)?.with_observer(Arc::new(TracingObserver)))
}
