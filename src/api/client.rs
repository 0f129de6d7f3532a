//
//  basecamp-cli
//  api/client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # API Client
//!
//! This module provides the client that ties the request pipeline together:
//! it owns credentials, the base URI and the per-client route and decode
//! settings, and exposes [`ApiClient::run`] which builds a descriptor,
//! executes it and returns the tagged result.
//!
//! ## Features
//!
//! - Presets for the supported API versions ([`ApiVersion`])
//! - Authentication header injection from instance-owned [`Credentials`]
//! - Call-local request descriptors, so one client can serve overlapping calls
//! - Optional per-call deadlines
//! - Scoped base URI overrides that are always undone

use std::fmt;
use std::future::Future;
use std::ops::Deref;
use std::pin::Pin;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ApiError;
use super::fetch::{ApiResult, DecodePolicy, Fetcher, ResponseObserver};
use super::request::{Method, RequestBuilder, RequestDescriptor, RouteStyle};
use super::transport::{ReqwestTransport, Transport};
use crate::auth::Credentials;

/// Host that answers the authorization check for every API version.
pub const LAUNCHPAD_URI: &str = "https://launchpad.37signals.com";

/// Route of the authorization check on [`LAUNCHPAD_URI`].
pub const AUTHORIZATION_ROUTE: &str = "authorization.json";

/// Future returned by the closure passed to [`ApiClient::with_temporary_base_uri`].
pub type ScopedFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The API generations this client can talk to.
///
/// # Variants
///
/// | Variant | Base URI | Route suffix | Default decode policy |
/// |---------|----------|--------------|-----------------------|
/// | `Classic` | `https://basecamp.com/{account}/api/v1` | `.json` | null |
/// | `Bc3` | `https://3.basecampapi.com/{account}` | `.json` | raw |
/// | `Keyed` | `https://3.basecampapi.com` | none | null |
///
/// # Example
///
/// ```rust
/// use basecamp_cli::api::ApiVersion;
///
/// let version: ApiVersion = "bc3".parse()?;
/// assert_eq!(
///     version.base_uri(Some("999"))?,
///     "https://3.basecampapi.com/999"
/// );
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiVersion {
    /// Basecamp 2 API, account-scoped under `basecamp.com`.
    Classic,
    /// Basecamp 3/4 API, account-scoped under `3.basecampapi.com`.
    #[default]
    Bc3,
    /// Unscoped endpoint addressed with API-key headers.
    Keyed,
}

impl ApiVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::Bc3 => "bc3",
            Self::Keyed => "keyed",
        }
    }

    /// Returns whether the base URI is scoped by account id.
    pub fn requires_account(&self) -> bool {
        !matches!(self, Self::Keyed)
    }

    /// Derives the base URI for `account_id`.
    ///
    /// # Errors
    ///
    /// [`ApiError::MissingAccount`] if the version is account-scoped and no
    /// (non-blank) account id is given.
    pub fn base_uri(&self, account_id: Option<&str>) -> Result<String, ApiError> {
        let account = account_id.map(str::trim).filter(|a| !a.is_empty());
        match (self, account) {
            (Self::Classic, Some(account)) => Ok(format!("https://basecamp.com/{}/api/v1", account)),
            (Self::Bc3, Some(account)) => Ok(format!("https://3.basecampapi.com/{}", account)),
            (Self::Keyed, _) => Ok("https://3.basecampapi.com".to_string()),
            (_, None) => Err(ApiError::MissingAccount(self.as_str().to_string())),
        }
    }

    pub fn route_style(&self) -> RouteStyle {
        match self {
            Self::Classic | Self::Bc3 => RouteStyle::with_suffix(".json"),
            Self::Keyed => RouteStyle::plain(),
        }
    }

    pub fn decode_policy(&self) -> DecodePolicy {
        match self {
            Self::Bc3 => DecodePolicy::RawTextFallback,
            Self::Classic | Self::Keyed => DecodePolicy::NullOnError,
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiVersion {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "classic" | "bcx" | "v1" | "2" => Ok(Self::Classic),
            "bc3" | "3" | "4" => Ok(Self::Bc3),
            "keyed" => Ok(Self::Keyed),
            other => anyhow::bail!("Unknown API version '{}' (expected classic, bc3 or keyed)", other),
        }
    }
}

/// Construction-time settings of an [`ApiClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Prefix for every route.
    pub base_uri: String,
    /// Slash and suffix handling for routes.
    pub route_style: RouteStyle,
    /// Treatment of non-JSON response bodies.
    pub decode: DecodePolicy,
    /// Transport-level timeout; `None` waits for the server indefinitely.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    /// Plain routes, raw text fallback, no timeout.
    pub fn new(base_uri: impl Into<String>) -> Self {
        Self {
            base_uri: base_uri.into(),
            route_style: RouteStyle::plain(),
            decode: DecodePolicy::default(),
            timeout: None,
        }
    }

    /// Preset for `version`; see [`ApiVersion`].
    pub fn for_version(version: ApiVersion, account_id: Option<&str>) -> Result<Self, ApiError> {
        Ok(Self {
            base_uri: version.base_uri(account_id)?,
            route_style: version.route_style(),
            decode: version.decode_policy(),
            timeout: None,
        })
    }

    pub fn with_route_style(mut self, route_style: RouteStyle) -> Self {
        self.route_style = route_style;
        self
    }

    pub fn with_decode(mut self, decode: DecodePolicy) -> Self {
        self.decode = decode;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// The authenticated API client.
///
/// Every call builds a fresh, immutable [`RequestDescriptor`] that is passed
/// by value to the fetcher and dropped when the call returns. The client
/// itself keeps no per-call state, so:
///
/// - sequential calls never see headers, parameters or body of an earlier call
/// - `run` takes `&self` and overlapping calls on one client are safe
///
/// The base URI is the only mutable setting, and changing it requires
/// `&mut self` (see [`override_base_uri`](Self::override_base_uri)).
///
/// # Creating a Client
///
/// ```rust,no_run
/// use basecamp_cli::api::{ApiClient, ApiVersion, Method};
/// use basecamp_cli::auth::{AuthCredential, Credentials};
/// use serde_json::json;
///
/// # async fn example() -> Result<(), basecamp_cli::api::ApiError> {
/// let credentials = Credentials::new(AuthCredential::bearer("your-token"))
///     .with_account("999999999");
/// let client = ApiClient::for_version(ApiVersion::Bc3, credentials)?;
///
/// let result = client.run("projects", &json!({"status": "archived"}), Method::Get).await?;
/// if result.is_success() {
///     println!("{}", result.body());
/// }
/// # Ok(())
/// # }
/// ```
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    credentials: Credentials,
    base_uri: String,
    route_style: RouteStyle,
    fetcher: Fetcher,
}

impl ApiClient {
    /// Creates a client that talks HTTP through reqwest.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client could not be created.
    pub fn new(credentials: Credentials, config: ClientConfig) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::with_timeout(config.timeout)?;
        Ok(Self::with_transport(credentials, config, Arc::new(transport)))
    }

    /// Creates a client on top of an arbitrary transport.
    ///
    /// This is how tests inject scripted or failing transports.
    pub fn with_transport(
        credentials: Credentials,
        config: ClientConfig,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            transport,
            credentials,
            base_uri: config.base_uri,
            route_style: config.route_style,
            fetcher: Fetcher::new(config.decode),
        }
    }

    /// Creates a client for one of the [`ApiVersion`] presets.
    ///
    /// The base URI is derived from the credentials' account id.
    ///
    /// # Errors
    ///
    /// - [`ApiError::MissingAccount`] if the version is account-scoped and the
    ///   credentials carry no account id
    /// - [`ApiError::Transport`] if the HTTP client could not be created
    pub fn for_version(version: ApiVersion, credentials: Credentials) -> Result<Self, ApiError> {
        let config = ClientConfig::for_version(version, credentials.account_id())?;
        Self::new(credentials, config)
    }

    /// Installs a diagnostic hook that sees every raw response.
    pub fn with_observer(mut self, observer: Arc<dyn ResponseObserver>) -> Self {
        self.fetcher = self.fetcher.with_observer(observer);
        self
    }

    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    pub fn route_style(&self) -> &RouteStyle {
        &self.route_style
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn decode_policy(&self) -> DecodePolicy {
        self.fetcher.decode_policy()
    }

    /// Builds the descriptor `run` would send, without sending it.
    pub fn build(
        &self,
        route: &str,
        params: &Value,
        method: Method,
    ) -> Result<RequestDescriptor, ApiError> {
        RequestBuilder::new(&self.base_uri, &self.route_style, &self.credentials)
            .build(route, params, method)
    }

    /// Builds and executes one request.
    ///
    /// # Parameters
    ///
    /// * `route` - Path below the base URI, with or without a leading slash
    /// * `params` - Query parameters for GET, body for everything else;
    ///   `Value::Null` for none
    /// * `method` - The HTTP method
    ///
    /// # Returns
    ///
    /// `Ok(ApiResult::Success)` for statuses in `[200, 300)`,
    /// `Ok(ApiResult::Failure)` for any other status.
    ///
    /// # Errors
    ///
    /// Returns an error if the request could not be built or the transport
    /// failed. HTTP error statuses are not errors.
    pub async fn run(
        &self,
        route: &str,
        params: &Value,
        method: Method,
    ) -> Result<ApiResult, ApiError> {
        let request = self.build(route, params, method)?;
        self.fetcher.execute(self.transport.as_ref(), request).await
    }

    /// Like [`run`](Self::run), but gives up once `deadline` has elapsed.
    ///
    /// # Errors
    ///
    /// [`ApiError::TimedOut`] if the transport has not answered in time.
    pub async fn run_with_deadline(
        &self,
        route: &str,
        params: &Value,
        method: Method,
        deadline: Duration,
    ) -> Result<ApiResult, ApiError> {
        match tokio::time::timeout(deadline, self.run(route, params, method)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::debug!("{} {} exceeded deadline of {:?}", method, route, deadline);
                Err(ApiError::TimedOut(deadline))
            }
        }
    }

    /// GET `route` without parameters.
    pub async fn get(&self, route: &str) -> Result<ApiResult, ApiError> {
        self.run(route, &Value::Null, Method::Get).await
    }

    /// GET `route` with query parameters.
    pub async fn get_with(&self, route: &str, params: &Value) -> Result<ApiResult, ApiError> {
        self.run(route, params, Method::Get).await
    }

    pub async fn post(&self, route: &str, params: &Value) -> Result<ApiResult, ApiError> {
        self.run(route, params, Method::Post).await
    }

    pub async fn put(&self, route: &str, params: &Value) -> Result<ApiResult, ApiError> {
        self.run(route, params, Method::Put).await
    }

    pub async fn delete(&self, route: &str) -> Result<ApiResult, ApiError> {
        self.run(route, &Value::Null, Method::Delete).await
    }

    /// Points the client at `uri` until the returned guard is dropped.
    ///
    /// The guard dereferences to the client, and restores the original base
    /// URI when it goes out of scope on any path: normal return, early `?`
    /// return, or unwinding.
    ///
    /// ```rust,no_run
    /// use basecamp_cli::api::{ApiClient, ClientConfig};
    /// use basecamp_cli::auth::Credentials;
    ///
    /// # async fn example() -> Result<(), basecamp_cli::api::ApiError> {
    /// let mut client = ApiClient::new(
    ///     Credentials::anonymous(),
    ///     ClientConfig::new("https://3.basecampapi.com/999"),
    /// )?;
    ///
    /// {
    ///     let scoped = client.override_base_uri("https://launchpad.37signals.com");
    ///     scoped.get("authorization.json").await?;
    /// }
    /// assert_eq!(client.base_uri(), "https://3.basecampapi.com/999");
    /// # Ok(())
    /// # }
    /// ```
    pub fn override_base_uri(&mut self, uri: impl Into<String>) -> BaseUriOverride<'_> {
        let original = std::mem::replace(&mut self.base_uri, uri.into());
        tracing::debug!("Base URI temporarily set to {}", self.base_uri);
        BaseUriOverride {
            client: self,
            original,
        }
    }

    /// Runs `f` against this client with the base URI set to `uri`.
    ///
    /// The original base URI is restored before this returns, whatever `f`
    /// produced.
    ///
    /// ```rust,no_run
    /// use basecamp_cli::api::{ApiClient, ClientConfig};
    /// use basecamp_cli::auth::Credentials;
    ///
    /// # async fn example() -> Result<(), basecamp_cli::api::ApiError> {
    /// let mut client = ApiClient::new(
    ///     Credentials::anonymous(),
    ///     ClientConfig::new("https://3.basecampapi.com/999"),
    /// )?;
    ///
    /// let result = client
    ///     .with_temporary_base_uri("https://launchpad.37signals.com", |client| {
    ///         Box::pin(client.get("authorization.json"))
    ///     })
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn with_temporary_base_uri<T, F>(&mut self, uri: impl Into<String>, f: F) -> T
    where
        F: for<'c> FnOnce(&'c ApiClient) -> ScopedFuture<'c, T>,
    {
        let guard = self.override_base_uri(uri);
        let output = f(&*guard).await;
        drop(guard);
        output
    }

    /// Checks the credentials against the launchpad authorization endpoint.
    ///
    /// A success body carries the identity and the accounts the credentials
    /// can reach.
    pub async fn check_authorization(&mut self) -> Result<ApiResult, ApiError> {
        self.with_temporary_base_uri(LAUNCHPAD_URI, |client| {
            Box::pin(client.get(AUTHORIZATION_ROUTE))
        })
        .await
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_uri", &self.base_uri)
            .field("route_style", &self.route_style)
            .field("credentials", &self.credentials)
            .field("fetcher", &self.fetcher)
            .finish()
    }
}

/// Guard returned by [`ApiClient::override_base_uri`].
pub struct BaseUriOverride<'a> {
    client: &'a mut ApiClient,
    original: String,
}

impl Deref for BaseUriOverride<'_> {
    type Target = ApiClient;

    fn deref(&self) -> &ApiClient {
        &*self.client
    }
}

impl Drop for BaseUriOverride<'_> {
    fn drop(&mut self) {
        self.client.base_uri = std::mem::take(&mut self.original);
        tracing::debug!("Base URI restored to {}", self.client.base_uri);
    }
}
