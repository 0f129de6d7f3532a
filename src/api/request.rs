//
//  basecamp-cli
//  api/request.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Request Building
//!
//! Turns a route, a parameter payload and an HTTP method into an immutable
//! [`RequestDescriptor`]. Building performs no I/O.
//!
//! ## Encoding Rules
//!
//! | Method | Content-Type | Parameters become |
//! |--------|--------------|-------------------|
//! | GET | any | query string, falsy values dropped |
//! | POST/PUT/DELETE | `application/json` | JSON body |
//! | POST/PUT/DELETE | anything else | raw body (strings verbatim, maps form-encoded) |

use std::fmt;
use std::str::FromStr;

use serde_json::Value;
use url::form_urlencoded;
use url::Url;

use super::error::ApiError;
use crate::auth::Credentials;

/// Header carrying the request body media type.
pub const CONTENT_TYPE: &str = "Content-Type";

/// Media type that switches non-GET bodies to JSON encoding.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Media type added to form-encoded bodies when none is set.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// HTTP methods understood by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    /// Returns the uppercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    pub fn is_get(&self) -> bool {
        matches!(self, Self::Get)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            _ => Err(ApiError::UnsupportedMethod(s.to_string())),
        }
    }
}

/// Ordered header list.
///
/// Names compare case-insensitively. Inserting a name that is already
/// present replaces the value in place, keeping the original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers(Vec<(String, String)>);

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(&name)) {
            Some(slot) => slot.1 = value,
            None => self.0.push((name, value)),
        }
    }

    /// Adds a value without replacing earlier ones of the same name.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// All values of `name`, in the order they were added.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for Headers {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut headers = Self::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}

/// How routes are appended to the base URI.
///
/// Some API versions address resources as `projects/42.json`, others as
/// `projects/42`. The style is fixed per client so call sites can pass the
/// bare route either way without doubling the suffix.
///
/// ```rust
/// use basecamp_cli::api::RouteStyle;
///
/// let style = RouteStyle::with_suffix(".json");
/// assert_eq!(
///     style.join("https://3.basecampapi.com/999/", "/projects/42"),
///     "https://3.basecampapi.com/999/projects/42.json"
/// );
/// assert_eq!(
///     style.join("https://3.basecampapi.com/999", "projects/42.json"),
///     "https://3.basecampapi.com/999/projects/42.json"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteStyle {
    suffix: Option<String>,
}

impl RouteStyle {
    /// Routes are used as given.
    pub fn plain() -> Self {
        Self { suffix: None }
    }

    /// Routes get `suffix` appended unless they already end with it.
    pub fn with_suffix(suffix: impl Into<String>) -> Self {
        Self::from_suffix(&suffix.into())
    }

    /// Like [`with_suffix`](Self::with_suffix), but an empty string means no suffix.
    pub fn from_suffix(suffix: &str) -> Self {
        if suffix.is_empty() {
            Self::plain()
        } else {
            Self {
                suffix: Some(suffix.to_string()),
            }
        }
    }

    pub fn suffix(&self) -> Option<&str> {
        self.suffix.as_deref()
    }

    /// Joins `base` and `route` with exactly one `/`.
    ///
    /// The suffix is applied to the path part of the route, before any
    /// `?query` or `#fragment`. An empty route addresses the base URI itself.
    pub fn join(&self, base: &str, route: &str) -> String {
        let base = base.trim_end_matches('/');
        let route = route.trim_start_matches('/');

        let (route, fragment) = match route.split_once('#') {
            Some((route, fragment)) => (route, Some(fragment)),
            None => (route, None),
        };
        let (path, query) = match route.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (route, None),
        };

        let mut path = path.to_string();
        if !path.is_empty() {
            if let Some(suffix) = self.suffix.as_deref() {
                let trimmed = path.trim_end_matches('/').len();
                path.truncate(trimmed);
                if !path.ends_with(suffix) {
                    path.push_str(suffix);
                }
            }
        }

        let mut url = format!("{}/{}", base, path);
        if let Some(query) = query {
            url.push('?');
            url.push_str(query);
        }
        if let Some(fragment) = fragment {
            url.push('#');
            url.push_str(fragment);
        }
        url
    }
}

/// One fully specified outbound request.
///
/// Built fresh for every call and never mutated afterward; the fields are
/// only reachable through accessors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    method: Method,
    url: String,
    headers: Headers,
    body: Option<String>,
}

impl RequestDescriptor {
    pub fn method(&self) -> Method {
        self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }
}

/// Builds [`RequestDescriptor`]s for one client's base URI and credentials.
///
/// # Example
///
/// ```rust
/// use basecamp_cli::api::{Method, RequestBuilder, RouteStyle};
/// use basecamp_cli::auth::{AuthCredential, Credentials};
/// use serde_json::json;
///
/// let credentials = Credentials::new(AuthCredential::bearer("secret"));
/// let style = RouteStyle::with_suffix(".json");
/// let builder = RequestBuilder::new("https://3.basecampapi.com/999", &style, &credentials);
///
/// let request = builder
///     .build("projects", &json!({"status": "archived", "page": ""}), Method::Get)
///     .unwrap();
/// assert_eq!(
///     request.url(),
///     "https://3.basecampapi.com/999/projects.json?status=archived"
/// );
/// assert!(request.body().is_none());
/// ```
pub struct RequestBuilder<'a> {
    base_uri: &'a str,
    style: &'a RouteStyle,
    credentials: &'a Credentials,
}

impl<'a> RequestBuilder<'a> {
    pub fn new(base_uri: &'a str, style: &'a RouteStyle, credentials: &'a Credentials) -> Self {
        Self {
            base_uri,
            style,
            credentials,
        }
    }

    /// Builds the descriptor for `method route` with `params`.
    ///
    /// # Errors
    ///
    /// - [`ApiError::InvalidUrl`] if base URI and route do not form an absolute URL
    /// - [`ApiError::Encode`] if a JSON body cannot be serialized
    pub fn build(
        &self,
        route: &str,
        params: &Value,
        method: Method,
    ) -> Result<RequestDescriptor, ApiError> {
        let mut headers = self.credentials.auth_headers();

        let joined = self.style.join(self.base_uri, route);
        let mut url =
            Url::parse(&joined).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", joined, e)))?;

        let body = if method.is_get() {
            let pairs = query_pairs(params);
            if !pairs.is_empty() {
                url.query_pairs_mut().extend_pairs(pairs);
            }
            None
        } else if is_json(&headers) {
            json_body(params)?
        } else {
            let body = raw_body(params);
            if body.is_some() && !params.is_string() && !headers.contains(CONTENT_TYPE) {
                headers.insert(CONTENT_TYPE, FORM_CONTENT_TYPE);
            }
            body
        };

        Ok(RequestDescriptor {
            method,
            url: url.into(),
            headers,
            body,
        })
    }
}

fn is_json(headers: &Headers) -> bool {
    headers
        .get(CONTENT_TYPE)
        .map(|ct| {
            ct.split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .eq_ignore_ascii_case(JSON_CONTENT_TYPE)
        })
        .unwrap_or(false)
}

/// Falsy values are dropped from GET parameters.
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

fn query_pairs(params: &Value) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    match params {
        Value::Null => {}
        Value::Object(map) => {
            for (key, value) in map.iter().filter(|(_, v)| !is_falsy(v)) {
                flatten(key.clone(), value, &mut pairs);
            }
        }
        Value::Array(items) => {
            for (index, value) in items.iter().enumerate().filter(|(_, v)| !is_falsy(v)) {
                flatten(index.to_string(), value, &mut pairs);
            }
        }
        Value::String(query) => {
            pairs.extend(
                form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
                    .filter(|(_, v)| !v.is_empty() && v != "0")
                    .map(|(k, v)| (k.into_owned(), v.into_owned())),
            );
        }
        other => tracing::warn!("Ignoring scalar GET parameters: {}", other),
    }
    pairs
}

/// Expands nested values into `key[]=v` / `key[sub]=v` pairs.
fn flatten(key: String, value: &Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Array(items) => {
            for item in items {
                flatten(format!("{}[]", key), item, out);
            }
        }
        Value::Object(map) => {
            for (sub, item) in map {
                flatten(format!("{}[{}]", key, sub), item, out);
            }
        }
        Value::String(s) => out.push((key, s.clone())),
        Value::Null => out.push((key, String::new())),
        other => out.push((key, other.to_string())),
    }
}

fn json_body(params: &Value) -> Result<Option<String>, ApiError> {
    if params.is_null() {
        return Ok(None);
    }
    Ok(Some(serde_json::to_string(params)?))
}

fn raw_body(params: &Value) -> Option<String> {
    match params {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => {
            let mut pairs = Vec::new();
            for (key, value) in map {
                flatten(key.clone(), value, &mut pairs);
            }
            Some(form_encode(&pairs))
        }
        Value::Array(items) => {
            let mut pairs = Vec::new();
            for (index, value) in items.iter().enumerate() {
                flatten(index.to_string(), value, &mut pairs);
            }
            Some(form_encode(&pairs))
        }
        other => Some(other.to_string()),
    }
}

fn form_encode(pairs: &[(String, String)]) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}
