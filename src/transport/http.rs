//! HTTP transport built on reqwest
//!
//! Sends a `RequestDescriptor` over HTTP and decodes the JSON response body.
//! Non-success statuses are reported as errors, carrying the response body.

use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use reqwest::header::USER_AGENT;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use super::Transport;
use crate::request::RequestDescriptor;

/// Errors that can occur when performing an HTTP request
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP request failed before a response was received
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Request failed with status {status}")]
    Status { status: StatusCode, body: String },

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Configuration for the HTTP transport
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Prefix for relative request URLs such as `/users`
    pub base_url: Option<String>,
    /// Timeout applied when a request does not set its own
    pub timeout: Option<Duration>,
    /// Value of the `User-Agent` header sent with every request, unless the
    /// request sets its own
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: None,
            user_agent: concat!("fetchstate/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Transport that performs requests over HTTP
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    config: HttpConfig,
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpTransport {
    /// Create a new HttpTransport with default settings
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            config: HttpConfig::default(),
        }
    }

    /// Create a new HttpTransport from a configuration
    ///
    /// # Returns
    /// * `Err(TransportError::Request)` if the HTTP client cannot be built
    pub fn with_config(config: HttpConfig) -> Result<Self, TransportError> {
        let client = Client::builder().build()?;
        Ok(Self { client, config })
    }

    /// Create a new HttpTransport with a custom HTTP client
    ///
    /// The configured user agent still replaces the client's own default.
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            config: HttpConfig::default(),
        }
    }

    /// Set the `User-Agent` header value
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Set the prefix used for relative URLs
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = Some(base_url.into());
        self
    }

    /// Resolves a request URL against the configured base URL
    fn resolve_url(&self, url: &str) -> String {
        match &self.config.base_url {
            Some(base) if !url.contains("://") => {
                format!(
                    "{}/{}",
                    base.trim_end_matches('/'),
                    url.trim_start_matches('/')
                )
            }
            _ => url.to_string(),
        }
    }

    /// Perform the request described by `request` and decode the JSON body
    ///
    /// # Returns
    /// * `Ok(T)` - The decoded payload; an empty body decodes as JSON `null`
    /// * `Err(TransportError)` - If the request, status check, or decoding fails
    pub async fn execute<T: DeserializeOwned + Send>(
        &self,
        request: &RequestDescriptor,
    ) -> Result<T, TransportError> {
        let url = self.resolve_url(request.url());
        let method = request.method();
        let options = request.options();

        let mut builder = self.client.request(method.clone(), &url);
        if !options.query.is_empty() {
            builder = builder.query(&options.query);
        }
        let has_user_agent = options
            .headers
            .iter()
            .any(|(name, _)| name.eq_ignore_ascii_case(USER_AGENT.as_str()));
        if !has_user_agent {
            builder = builder.header(USER_AGENT, self.config.user_agent.as_str());
        }
        for (name, value) in &options.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &options.body {
            builder = builder.json(body);
        }
        if let Some(timeout) = options.timeout.or(self.config.timeout) {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;
        debug!(%method, %url, %status, bytes = text.len(), "response received");

        if !status.is_success() {
            return Err(TransportError::Status { status, body: text });
        }

        let body = if text.trim().is_empty() { "null" } else { text.as_str() };
        Ok(serde_json::from_str(body)?)
    }
}

impl<T> Transport<T> for HttpTransport
where
    T: DeserializeOwned + Send + 'static,
{
    type Error = TransportError;

    fn send<'a>(&'a self, request: &'a RequestDescriptor) -> BoxFuture<'a, Result<T, TransportError>> {
        self.execute(request).boxed()
    }
}
