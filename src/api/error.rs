//
//  basecamp-cli
//  api/error.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Error Types for the Request Pipeline
//!
//! The pipeline distinguishes two families of failure:
//!
//! - [`TransportError`] - the request never produced an HTTP response
//!   (DNS, refused connection, TLS, socket timeout). These are surfaced to the
//!   caller untouched through [`ApiError::Transport`].
//! - HTTP-level failures - any status outside `200..300`. These are *not*
//!   errors: the fetcher returns them as [`ApiResult::Failure`] values. Callers
//!   that prefer `?` can convert with [`ApiResult::into_result`], which yields
//!   [`ApiError::Status`].
//!
//! # Example
//!
//! ```rust
//! use basecamp_cli::api::{ApiError, TransportError};
//!
//! fn describe(err: &ApiError) -> &'static str {
//!     match err {
//!         ApiError::Transport(_) => "network",
//!         ApiError::Status { .. } => "http",
//!         _ => "local",
//!     }
//! }
//!
//! let err = ApiError::from(TransportError::Unavailable("connection refused".into()));
//! assert_eq!(describe(&err), "network");
//! ```
//!
//! [`ApiResult::Failure`]: super::ApiResult::Failure
//! [`ApiResult::into_result`]: super::ApiResult::into_result

use std::time::Duration;

use thiserror::Error;

use super::fetch::ResponseBody;

/// A failure below the HTTP layer.
///
/// Produced by a [`Transport`](super::Transport) implementation when no
/// status code could be obtained.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The reqwest client failed to send the request or read the response.
    ///
    /// Covers connection failures, timeouts, DNS resolution errors,
    /// and other transport-layer issues.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A non-reqwest transport could not deliver the request.
    #[error("Transport unavailable: {0}")]
    Unavailable(String),
}

/// Unified error type for the request pipeline.
///
/// | Variant | Raised by | Recoverable locally |
/// |---------|-----------|---------------------|
/// | `Transport` | transport collaborator | no, propagated as-is |
/// | `TimedOut` | [`ApiClient::run_with_deadline`](super::ApiClient::run_with_deadline) | no |
/// | `Encode` | request builder | no |
/// | `InvalidUrl` | request builder | no |
/// | `UnsupportedMethod` | method parsing | no |
/// | `MissingAccount` | client construction | no |
/// | `Status` | [`ApiResult::into_result`](super::ApiResult::into_result) | caller decides |
#[derive(Error, Debug)]
pub enum ApiError {
    /// The transport could not complete the exchange.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The caller-supplied deadline elapsed before the transport returned.
    #[error("Request timed out after {0:?}")]
    TimedOut(Duration),

    /// The request parameters could not be serialized as JSON.
    #[error("Could not encode request body: {0}")]
    Encode(#[from] serde_json::Error),

    /// Base URI and route did not combine into a valid absolute URL.
    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),

    /// Only GET, POST, PUT and DELETE are supported.
    #[error("Unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// The selected API version scopes its base URI by account, but none was given.
    #[error("API version '{0}' requires an account id")]
    MissingAccount(String),

    /// The server answered with a status outside the success range.
    #[error("{message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Formatted message, e.g. `Status: 404`.
        message: String,
        /// Decoded (or raw) response body for diagnostics.
        body: ResponseBody,
    },
}

impl ApiError {
    /// Returns the HTTP status code for [`ApiError::Status`] errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
