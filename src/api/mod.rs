//
//  basecamp-cli
//  api/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # API Client Layer
//!
//! This module provides the authenticated REST client for the Basecamp APIs.
//!
//! ## Supported API Versions
//!
//! - **Classic**: Basecamp 2 at `basecamp.com/{account}/api/v1`
//! - **Bc3**: Basecamp 3/4 at `3.basecampapi.com/{account}`
//! - **Keyed**: unscoped `3.basecampapi.com` with API-key headers
//!
//! ## Architecture
//!
//! A call flows through four stages:
//!
//! - [`request`]: turns route, parameters and method into a [`RequestDescriptor`]
//! - [`transport`]: sends the descriptor and returns the raw response
//! - [`fetch`]: classifies the status and decodes the body into an [`ApiResult`]
//! - [`client`]: owns credentials and settings and drives the other three
//!
//! ## Usage
//!
//! ```rust,no_run
//! use basecamp_cli::api::{ApiClient, ApiVersion, Method};
//! use basecamp_cli::auth::{AuthCredential, Credentials};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), basecamp_cli::api::ApiError> {
//! let credentials = Credentials::new(AuthCredential::bearer("your-token"))
//!     .with_account("999999999");
//! let client = ApiClient::for_version(ApiVersion::Bc3, credentials)?;
//!
//! let result = client
//!     .run("buckets/1/todolists/2/todos", &json!({"content": "Ship it"}), Method::Post)
//!     .await?;
//! println!("{} {}", result.status(), result.body());
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! HTTP error statuses are returned as [`ApiResult::Failure`], not as errors.
//! [`ApiError`] covers what prevents a response from being obtained:
//!
//! - `Transport`: DNS, connection, TLS or I/O failure
//! - `TimedOut`: the per-call deadline elapsed
//! - `Encode`: the parameters could not be serialized
//! - `InvalidUrl`: the base URI and route do not form a URL
//! - `MissingAccount`: an account-scoped version without an account id

/// Client orchestration, API version presets and base URI overrides.
pub mod client;

/// Error types for building and sending requests.
pub mod error;

/// Status classification, body decoding and the response observer hook.
pub mod fetch;

/// Route joining, parameter encoding and request descriptors.
pub mod request;

/// The I/O boundary and its reqwest implementation.
pub mod transport;

pub use client::{
    ApiClient, ApiVersion, BaseUriOverride, ClientConfig, ScopedFuture, AUTHORIZATION_ROUTE,
    LAUNCHPAD_URI,
};
pub use error::{ApiError, TransportError};
pub use fetch::{
    classify, ApiResult, DecodePolicy, Fetcher, ResponseBody, ResponseObserver, StatusClass,
    TracingObserver,
};
pub use request::{
    Headers, Method, RequestBuilder, RequestDescriptor, RouteStyle, CONTENT_TYPE,
    FORM_CONTENT_TYPE, JSON_CONTENT_TYPE,
};
pub use transport::{ReqwestTransport, Transport, TransportResponse};
