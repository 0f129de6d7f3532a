//
//  basecamp-cli
//  api/fetch.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Request Execution
//!
//! The [`Fetcher`] sends one [`RequestDescriptor`] through a [`Transport`],
//! classifies the status code and decodes the body into an [`ApiResult`].
//!
//! ## Success Policy
//!
//! A response is a success iff `200 <= status < 300`. Anything else becomes
//! [`ApiResult::Failure`]; HTTP failures are data, never errors. Only
//! transport failures are returned as `Err`.
//!
//! ## Decoding
//!
//! | Body | [`DecodePolicy::RawTextFallback`] | [`DecodePolicy::NullOnError`] |
//! |------|-----------------------------------|-------------------------------|
//! | valid JSON | `Json(value)` | `Json(value)` |
//! | invalid JSON | `Text(raw)` | `Empty` |
//! | empty | `Empty` | `Empty` |

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ApiError;
use super::request::RequestDescriptor;
use super::transport::{Transport, TransportResponse};

/// Outcome class of an HTTP status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Success,
    Failure,
}

/// Classifies `status` using the half-open success range `[200, 300)`.
///
/// ```rust
/// use basecamp_cli::api::{classify, StatusClass};
///
/// assert_eq!(classify(200), StatusClass::Success);
/// assert_eq!(classify(299), StatusClass::Success);
/// assert_eq!(classify(300), StatusClass::Failure);
/// ```
pub fn classify(status: u16) -> StatusClass {
    if (200..300).contains(&status) {
        StatusClass::Success
    } else {
        StatusClass::Failure
    }
}

/// What to do with a response body that is not valid JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DecodePolicy {
    /// Keep the raw text as the payload.
    #[default]
    #[serde(rename = "raw")]
    RawTextFallback,
    /// Treat the payload as absent.
    #[serde(rename = "null")]
    NullOnError,
}

impl DecodePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RawTextFallback => "raw",
            Self::NullOnError => "null",
        }
    }

    /// Decodes a response body according to this policy.
    ///
    /// Bytes that are not valid UTF-8 are decoded lossily first.
    pub fn decode(&self, bytes: &[u8]) -> ResponseBody {
        let text = String::from_utf8_lossy(bytes);
        if text.trim().is_empty() {
            return ResponseBody::Empty;
        }

        match serde_json::from_str::<Value>(&text) {
            Ok(value) => ResponseBody::Json(value),
            Err(e) => {
                tracing::debug!("Response body is not JSON ({}), applying {} policy", e, self);
                match self {
                    Self::RawTextFallback => ResponseBody::Text(text.into_owned()),
                    Self::NullOnError => ResponseBody::Empty,
                }
            }
        }
    }
}

impl fmt::Display for DecodePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DecodePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "raw" | "text" => Ok(Self::RawTextFallback),
            "null" | "empty" => Ok(Self::NullOnError),
            other => anyhow::bail!("Unknown decode policy '{}' (expected raw or null)", other),
        }
    }
}

/// A decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// The body parsed as JSON.
    Json(Value),
    /// The body was not JSON and the raw text was kept.
    Text(String),
    /// No body, or an undecodable body under [`DecodePolicy::NullOnError`].
    Empty,
}

impl ResponseBody {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Converts into a JSON value: text becomes a string, empty becomes `null`.
    pub fn into_value(self) -> Value {
        match self {
            Self::Json(value) => value,
            Self::Text(text) => Value::String(text),
            Self::Empty => Value::Null,
        }
    }
}

impl fmt::Display for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(value) => write!(f, "{}", value),
            Self::Text(text) => f.write_str(text),
            Self::Empty => Ok(()),
        }
    }
}

/// Tagged result of one API call.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResult {
    /// Status in `[200, 300)`.
    Success { status: u16, body: ResponseBody },
    /// Any other status.
    Failure {
        status: u16,
        message: String,
        body: ResponseBody,
    },
}

impl ApiResult {
    /// Builds the result for `status` and an already-decoded body.
    pub fn from_status(status: u16, body: ResponseBody) -> Self {
        match classify(status) {
            StatusClass::Success => Self::Success { status, body },
            StatusClass::Failure => Self::Failure {
                status,
                message: format!("Status: {}", status),
                body,
            },
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            Self::Success { status, .. } | Self::Failure { status, .. } => *status,
        }
    }

    pub fn body(&self) -> &ResponseBody {
        match self {
            Self::Success { body, .. } | Self::Failure { body, .. } => body,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Extracts the API's own error message from a failure body.
    ///
    /// Recognizes `{"error": "..."}`, `{"error": {"message": "..."}}`,
    /// `{"errors": [{"message": "..."}]}`, `{"errors": ["..."]}` and
    /// `{"message": "..."}`.
    ///
    /// ```rust
    /// use basecamp_cli::api::{ApiResult, ResponseBody};
    /// use serde_json::json;
    ///
    /// let result = ApiResult::from_status(404, ResponseBody::Json(json!({"error": "not found"})));
    /// assert_eq!(result.api_message().as_deref(), Some("not found"));
    /// ```
    pub fn api_message(&self) -> Option<String> {
        let Self::Failure { body, .. } = self else {
            return None;
        };
        let json = body.as_json()?;

        if let Some(message) = json.get("error").and_then(|e| e.as_str()) {
            return Some(message.to_string());
        }

        if let Some(message) = json
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
        {
            return Some(message.to_string());
        }

        if let Some(first) = json
            .get("errors")
            .and_then(|e| e.as_array())
            .and_then(|arr| arr.first())
        {
            if let Some(message) = first.as_str() {
                return Some(message.to_string());
            }
            if let Some(message) = first.get("message").and_then(|m| m.as_str()) {
                return Some(message.to_string());
            }
        }

        json.get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string)
    }

    /// Converts into a `Result`, turning a failure into [`ApiError::Status`].
    pub fn into_result(self) -> Result<ResponseBody, ApiError> {
        match self {
            Self::Success { body, .. } => Ok(body),
            Self::Failure {
                status,
                message,
                body,
            } => Err(ApiError::Status {
                status,
                message,
                body,
            }),
        }
    }
}

/// Diagnostic hook invoked with every raw response before it is decoded.
///
/// Install one with [`ApiClient::with_observer`](super::ApiClient::with_observer)
/// to capture traffic; nothing is captured by default.
pub trait ResponseObserver: Send + Sync {
    fn observe(&self, request: &RequestDescriptor, response: &TransportResponse);
}

/// Observer that logs each exchange at `trace` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ResponseObserver for TracingObserver {
    fn observe(&self, request: &RequestDescriptor, response: &TransportResponse) {
        tracing::trace!(
            method = %request.method(),
            url = %request.url(),
            status = response.status,
            body = %String::from_utf8_lossy(&response.body),
            "raw response"
        );
    }
}

/// Executes request descriptors.
#[derive(Clone, Default)]
pub struct Fetcher {
    decode: DecodePolicy,
    observer: Option<Arc<dyn ResponseObserver>>,
}

impl Fetcher {
    pub fn new(decode: DecodePolicy) -> Self {
        Self {
            decode,
            observer: None,
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn ResponseObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn decode_policy(&self) -> DecodePolicy {
        self.decode
    }

    /// Sends `request` and classifies the response.
    ///
    /// The descriptor is consumed; nothing of it outlives the call.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] when the transport fails. HTTP error
    /// statuses are returned as `Ok(ApiResult::Failure { .. })`.
    pub async fn execute(
        &self,
        transport: &dyn Transport,
        request: RequestDescriptor,
    ) -> Result<ApiResult, ApiError> {
        tracing::debug!("{} {}", request.method(), request.url());

        let response = transport.send(&request).await?;

        if let Some(observer) = &self.observer {
            observer.observe(&request, &response);
        }

        let body = self.decode.decode(&response.body);
        let result = ApiResult::from_status(response.status, body);

        if result.is_success() {
            tracing::debug!("{} {} -> {}", request.method(), request.url(), response.status);
        } else {
            tracing::debug!(
                "{} {} -> {} (failure)",
                request.method(),
                request.url(),
                response.status
            );
        }

        Ok(result)
    }
}

impl fmt::Debug for Fetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fetcher")
            .field("decode", &self.decode)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Method, RequestBuilder, RouteStyle, TransportError};
    use crate::auth::{AuthCredential, Credentials};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    struct FixedTransport {
        status: u16,
        body: &'static str,
    }

    #[async_trait]
    impl Transport for FixedTransport {
        async fn send(&self, _request: &RequestDescriptor) -> Result<TransportResponse, TransportError> {
            Ok(TransportResponse::new(self.status, self.body))
        }
    }

    struct FailingTransport;

    #[async_trait]
    impl Transport for FailingTransport {
        async fn send(&self, _request: &RequestDescriptor) -> Result<TransportResponse, TransportError> {
            Err(TransportError::Unavailable("connection refused".to_string()))
        }
    }

    #[derive(Default)]
    struct RecordingObserver {
        seen: Mutex<Vec<(String, u16)>>,
    }

    impl ResponseObserver for RecordingObserver {
        fn observe(&self, request: &RequestDescriptor, response: &TransportResponse) {
            self.seen
                .lock()
                .unwrap()
                .push((request.url().to_string(), response.status));
        }
    }

    fn descriptor() -> RequestDescriptor {
        let credentials = Credentials::new(AuthCredential::bearer("t"));
        let style = RouteStyle::plain();
        RequestBuilder::new("https://example.test", &style, &credentials)
            .build("user", &Value::Null, Method::Get)
            .unwrap()
    }

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(classify(199), StatusClass::Failure);
        assert_eq!(classify(200), StatusClass::Success);
        assert_eq!(classify(204), StatusClass::Success);
        assert_eq!(classify(299), StatusClass::Success);
        assert_eq!(classify(300), StatusClass::Failure);
        assert_eq!(classify(404), StatusClass::Failure);
        assert_eq!(classify(0), StatusClass::Failure);
    }

    #[test]
    fn test_decode_json() {
        for policy in [DecodePolicy::RawTextFallback, DecodePolicy::NullOnError] {
            assert_eq!(policy.decode(br#"{"id":42}"#), ResponseBody::Json(json!({"id": 42})));
            assert_eq!(policy.decode(b"[1,2]"), ResponseBody::Json(json!([1, 2])));
            assert_eq!(policy.decode(b""), ResponseBody::Empty);
            assert_eq!(policy.decode(b"  \n"), ResponseBody::Empty);
        }
    }

    #[test]
    fn test_decode_invalid_json() {
        assert_eq!(
            DecodePolicy::RawTextFallback.decode(b"not json"),
            ResponseBody::Text("not json".to_string())
        );
        assert_eq!(DecodePolicy::NullOnError.decode(b"not json"), ResponseBody::Empty);
    }

    #[test]
    fn test_decode_policy_parse() {
        assert_eq!("raw".parse::<DecodePolicy>().unwrap(), DecodePolicy::RawTextFallback);
        assert_eq!("NULL".parse::<DecodePolicy>().unwrap(), DecodePolicy::NullOnError);
        assert!("json".parse::<DecodePolicy>().is_err());
    }

    #[test]
    fn test_failure_message_and_api_message() {
        let result = ApiResult::from_status(422, ResponseBody::Json(json!({"errors": [{"message": "Name can't be blank"}]})));
        assert!(!result.is_success());
        assert_eq!(result.status(), 422);
        assert_eq!(result.api_message().as_deref(), Some("Name can't be blank"));

        match result {
            ApiResult::Failure { message, .. } => assert_eq!(message, "Status: 422"),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_api_message_variants() {
        let cases = [
            (json!({"error": {"message": "nested"}}), "nested"),
            (json!({"errors": ["plain"]}), "plain"),
            (json!({"message": "top"}), "top"),
        ];
        for (body, expected) in cases {
            let result = ApiResult::from_status(400, ResponseBody::Json(body));
            assert_eq!(result.api_message().as_deref(), Some(expected));
        }
        assert_eq!(ApiResult::from_status(200, ResponseBody::Empty).api_message(), None);
    }

    #[test]
    fn test_into_result() {
        let ok = ApiResult::from_status(201, ResponseBody::Json(json!({"id": 1})));
        assert_eq!(ok.into_result().unwrap(), ResponseBody::Json(json!({"id": 1})));

        let err = ApiResult::from_status(500, ResponseBody::Text("boom".to_string()))
            .into_result()
            .unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.to_string(), "Status: 500");
    }

    #[tokio::test]
    async fn test_execute_success() {
        let transport = FixedTransport { status: 200, body: r#"{"id":42}"# };
        let result = Fetcher::default().execute(&transport, descriptor()).await.unwrap();
        assert_eq!(
            result,
            ApiResult::Success {
                status: 200,
                body: ResponseBody::Json(json!({"id": 42}))
            }
        );
    }

    #[tokio::test]
    async fn test_execute_http_failure_is_not_an_error() {
        let transport = FixedTransport { status: 503, body: "Service Unavailable" };
        let result = Fetcher::new(DecodePolicy::RawTextFallback)
            .execute(&transport, descriptor())
            .await
            .unwrap();
        assert_eq!(result.status(), 503);
        assert_eq!(result.body(), &ResponseBody::Text("Service Unavailable".to_string()));
    }

    #[tokio::test]
    async fn test_execute_transport_error_propagates() {
        let err = Fetcher::default()
            .execute(&FailingTransport, descriptor())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::Transport(TransportError::Unavailable(ref msg)) if msg == "connection refused"
        ));
    }

    #[tokio::test]
    async fn test_observer_sees_raw_response() {
        let observer = Arc::new(RecordingObserver::default());
        let fetcher = Fetcher::default().with_observer(observer.clone());
        let transport = FixedTransport { status: 401, body: "" };

        fetcher.execute(&transport, descriptor()).await.unwrap();

        let seen = observer.seen.lock().unwrap();
        assert_eq!(seen.as_slice(), &[("https://example.test/user".to_string(), 401)]);
    }
}
