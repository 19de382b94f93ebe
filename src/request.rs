//! Request descriptors
//!
//! A `RequestDescriptor` is the URL plus the options a controller hands to its
//! transport. It is captured once when the controller is built and never changes.

use std::time::Duration;

use reqwest::Method;
use serde_json::Value;

/// Options passed through to the transport alongside the URL
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    /// HTTP method; `None` means GET
    pub method: Option<Method>,
    /// Extra request headers, sent in order
    pub headers: Vec<(String, String)>,
    /// Query string pairs appended to the URL
    pub query: Vec<(String, String)>,
    /// JSON request body
    pub body: Option<Value>,
    /// Per-request timeout, overriding the transport default
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// A URL plus the options used to request it
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    url: String,
    options: RequestOptions,
}

impl RequestDescriptor {
    /// Creates a GET descriptor with default options
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_options(url, RequestOptions::default())
    }

    pub fn with_options(url: impl Into<String>, options: RequestOptions) -> Self {
        Self {
            url: url.into(),
            options,
        }
    }

    /// The URL exactly as given; also the cache key
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The effective method, GET when none was set
    pub fn method(&self) -> Method {
        self.options.method.clone().unwrap_or(Method::GET)
    }

    pub fn options(&self) -> &RequestOptions {
        &self.options
    }

    /// Whether responses to this request may be read from or written to the cache
    ///
    /// Only the canonical `GET` method qualifies. Extension methods, including
    /// a lower-case `get` token, never touch the cache.
    pub fn is_cacheable(&self) -> bool {
        self.method() == Method::GET
    }
}
