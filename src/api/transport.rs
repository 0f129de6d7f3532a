//
//  basecamp-cli
//  api/transport.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Transport Layer
//!
//! The only I/O boundary of the client. A [`Transport`] takes a finished
//! [`RequestDescriptor`] and returns the status code, headers and raw body
//! bytes, or a [`TransportError`] when no response was obtained.
//!
//! [`ReqwestTransport`] is the production implementation. Tests substitute
//! their own implementations to script responses or inject faults.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::error::TransportError;
use super::request::{Headers, Method, RequestDescriptor};

/// Raw response as produced by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers; a repeated name keeps every value.
    pub headers: Headers,
    /// Undecoded body bytes.
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Headers::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// Sends a request and returns the raw response.
///
/// Implementations perform a single attempt: no retries and no redirects
/// beyond what the underlying HTTP stack does natively.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &RequestDescriptor) -> Result<TransportResponse, TransportError>;
}

/// [`Transport`] backed by a shared `reqwest::Client`.
///
/// # Example
///
/// ```rust,no_run
/// use std::time::Duration;
/// use basecamp_cli::api::ReqwestTransport;
///
/// // Blocks until the server answers
/// let transport = ReqwestTransport::new()?;
///
/// // Gives up after 30 seconds
/// let bounded = ReqwestTransport::with_timeout(Some(Duration::from_secs(30)))?;
/// # Ok::<(), basecamp_cli::api::TransportError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    /// Creates a transport without a timeout.
    pub fn new() -> Result<Self, TransportError> {
        Self::with_timeout(None)
    }

    /// Creates a transport whose requests fail after `timeout`.
    pub fn with_timeout(timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut builder = Client::builder().user_agent(format!("bcx/{}", crate::VERSION));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
        })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &RequestDescriptor) -> Result<TransportResponse, TransportError> {
        let method = match request.method() {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.http.request(method, request.url());
        for (name, value) in request.headers().iter() {
            builder = builder.header(name, value);
        }
        if let Some(body) = request.body() {
            builder = builder.body(body.to_string());
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let mut headers = Headers::new();
        for (name, value) in response.headers() {
            headers.append(
                name.as_str(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            );
        }
        let body = response.bytes().await?.to_vec();

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}
