//
//  basecamp-cli
//  auth/token.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Secret Input Module
//!
//! Helpers for accepting a bearer token or API key from the user, either
//! piped on standard input or typed at a masked prompt.
//!
//! ## Example
//!
//! ```rust,no_run
//! use basecamp_cli::auth::{read_secret_from_stdin, validate_token};
//!
//! fn read() -> anyhow::Result<String> {
//!     let token = read_secret_from_stdin()?;
//!     if !validate_token(&token) {
//!         anyhow::bail!("Invalid token format");
//!     }
//!     Ok(token)
//! }
//! ```

use anyhow::{Context, Result};
use dialoguer::Password;

/// Reads a single line from standard input, trimmed.
///
/// Only the first line is read; this supports
/// `echo "$TOKEN" | bcx auth login --with-token`.
pub fn read_secret_from_stdin() -> Result<String> {
    use std::io::{self, BufRead};

    let stdin = io::stdin();
    let mut line = String::new();
    stdin
        .lock()
        .read_line(&mut line)
        .context("Failed to read secret from stdin")?;

    Ok(line.trim().to_string())
}

/// Prompts for a secret with terminal echo disabled.
pub fn prompt_secret(prompt: &str) -> Result<String> {
    let secret = Password::new()
        .with_prompt(prompt)
        .interact()
        .context("Failed to read secret")?;
    Ok(secret.trim().to_string())
}

/// Checks the format of a token or key.
///
/// Does NOT check the secret against the API; only that it is non-empty and
/// free of whitespace.
///
/// ```rust
/// use basecamp_cli::auth::validate_token;
///
/// assert!(validate_token("BAhbB0kiAbB7ImNsaWVudF9pZCI6"));
/// assert!(!validate_token(""));
/// assert!(!validate_token("has space"));
/// assert!(!validate_token("has\nnewline"));
/// ```
pub fn validate_token(token: &str) -> bool {
    !token.is_empty() && !token.chars().any(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_token() {
        assert!(validate_token("abc123"));
        assert!(validate_token("NjM0NTY3ODkwMTIzNDU2Nzg5MA=="));
        assert!(!validate_token(""));
        assert!(!validate_token("has\ttab"));
    }
}
