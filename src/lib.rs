//
//  basecamp-cli
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Basecamp CLI Library
//!
//! An authenticated REST client core for the Basecamp APIs, and the `bcx`
//! command-line tool built on it.
//!
//! ## Overview
//!
//! One call is `route + parameters + method`. The client joins the route to
//! its base URI, injects authentication headers, encodes parameters (query
//! string for GET, JSON or raw body otherwise), sends the request and returns
//! a tagged [`api::ApiResult`]: success for statuses in `[200, 300)`,
//! failure for everything else.
//!
//! ## Features
//!
//! - **Multiple API generations**: Basecamp 2 and Basecamp 3/4 presets, plus
//!   an unscoped API-key variant
//! - **Per-instance credentials**: bearer tokens or API keys, never global
//! - **Stateless calls**: each request is built fresh, so nothing leaks
//!   between calls and one client can serve concurrent calls
//! - **Scoped base URI overrides** that are always undone
//! - **Secure storage**: secrets in the system keyring, settings in TOML
//!
//! ## Module Structure
//!
//! - [`cli`]: Command-line interface definitions using clap
//! - [`api`]: Request building, execution and the client
//! - [`auth`]: Credentials, keyring storage and profile resolution
//! - [`config`]: Configuration file management
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use basecamp_cli::api::{ApiClient, ApiVersion};
//! use basecamp_cli::auth::{AuthCredential, Credentials};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), basecamp_cli::api::ApiError> {
//! let client = ApiClient::for_version(
//!     ApiVersion::Bc3,
//!     Credentials::new(AuthCredential::bearer("your-token")).with_account("999999999"),
//! )?;
//!
//! let projects = client
//!     .get_with("projects", &json!({"status": "archived"}))
//!     .await?
//!     .into_result()?;
//! println!("{}", projects);
//! # Ok(())
//! # }
//! ```

/// Command-line interface definitions.
pub mod cli;

/// The REST client core.
pub mod api;

/// Authentication and credential storage.
pub mod auth;

/// Configuration file management.
pub mod config;

pub use api::{ApiClient, ApiResult, ApiVersion};

pub use cli::Cli;

pub use config::Config;

/// Binary name, also used for the configuration directory.
pub const APP_NAME: &str = "bcx";

/// Crate version from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Process exit codes.
pub mod exit_codes {
    /// The command completed.
    pub const SUCCESS: i32 = 0;

    /// Any failure not covered below.
    pub const ERROR: i32 = 1;

    /// Invalid arguments or configuration.
    pub const USAGE: i32 = 2;

    /// The server answered 401 or 403, or no credentials were available.
    pub const AUTH_ERROR: i32 = 4;

    /// The server answered 404.
    pub const NOT_FOUND: i32 = 8;
}
