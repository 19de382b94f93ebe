//! Command-line interface parsing for fetchstate
//!
//! This module handles parsing of CLI arguments using clap and turns them into
//! a validated `StartupConfig`: the request descriptor plus transport settings.

use std::time::Duration;

use clap::Parser;
use reqwest::Method;
use serde_json::Value;
use thiserror::Error;

use crate::request::{RequestDescriptor, RequestOptions};
use crate::transport::HttpConfig;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The method name is not a valid HTTP token
    #[error("Invalid method: '{0}'")]
    InvalidMethod(String),

    /// A header was not given as `Name: value`
    #[error("Invalid header: '{0}'. Expected 'Name: value'")]
    InvalidHeader(String),

    /// A query parameter was not given as `key=value`
    #[error("Invalid query parameter: '{0}'. Expected 'key=value'")]
    InvalidQuery(String),

    /// The request body is not valid JSON
    #[error("Invalid JSON body: {0}")]
    InvalidBody(#[from] serde_json::Error),
}

/// fetchstate - request a URL and watch its loading, error and data state
#[derive(Parser, Debug)]
#[command(name = "fetchstate")]
#[command(about = "Request a URL and watch its loading, error and data state")]
#[command(version)]
pub struct Cli {
    /// URL to request; relative URLs are joined onto --base-url
    pub url: String,

    /// HTTP method (case-insensitive)
    #[arg(short = 'X', long, default_value = "GET", value_name = "METHOD")]
    pub method: String,

    /// Request header, repeatable
    ///
    /// Example: -H 'Accept: application/json'
    #[arg(short = 'H', long = "header", value_name = "NAME: VALUE")]
    pub headers: Vec<String>,

    /// Query parameter, repeatable
    #[arg(short = 'q', long = "query", value_name = "KEY=VALUE")]
    pub query: Vec<String>,

    /// JSON request body
    #[arg(short = 'd', long = "data", value_name = "JSON")]
    pub data: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Prefix for relative URLs
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Print the result once instead of opening the interactive view
    #[arg(long)]
    pub plain: bool,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone)]
pub struct StartupConfig {
    /// The request to perform
    pub descriptor: RequestDescriptor,
    /// Settings for the HTTP transport
    pub http: HttpConfig,
    /// Whether to print once and exit
    pub plain: bool,
}

/// Parses a method name, normalising it to upper case
pub fn parse_method_arg(s: &str) -> Result<Method, CliError> {
    Method::from_bytes(s.to_ascii_uppercase().as_bytes())
        .map_err(|_| CliError::InvalidMethod(s.to_string()))
}

/// Parses a `Name: value` header argument
pub fn parse_header_arg(s: &str) -> Result<(String, String), CliError> {
    match s.split_once(':') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(CliError::InvalidHeader(s.to_string())),
    }
}

/// Parses a `key=value` query argument
pub fn parse_query_arg(s: &str) -> Result<(String, String), CliError> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(CliError::InvalidQuery(s.to_string())),
    }
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with the request descriptor and transport settings
    /// * `Err(CliError)` if a method, header, query parameter or body is invalid
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let mut options = RequestOptions::new().method(parse_method_arg(&cli.method)?);

        for header in &cli.headers {
            let (name, value) = parse_header_arg(header)?;
            options = options.header(name, value);
        }
        for pair in &cli.query {
            let (key, value) = parse_query_arg(pair)?;
            options = options.query(key, value);
        }
        if let Some(data) = &cli.data {
            options = options.body(serde_json::from_str::<Value>(data)?);
        }

        let http = HttpConfig {
            base_url: cli.base_url.clone(),
            timeout: cli.timeout.map(Duration::from_secs),
            ..HttpConfig::default()
        };

        Ok(StartupConfig {
            descriptor: RequestDescriptor::with_options(cli.url.clone(), options),
            http,
            plain: cli.plain,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_method_arg_is_case_insensitive() {
        assert_eq!(parse_method_arg("get").unwrap(), Method::GET);
        assert_eq!(parse_method_arg("Post").unwrap(), Method::POST);
        assert_eq!(parse_method_arg("DELETE").unwrap(), Method::DELETE);
    }

    #[test]
    fn test_parse_method_arg_invalid() {
        let err = parse_method_arg("GE T").unwrap_err();
        assert!(err.to_string().contains("Invalid method"));
    }

    #[test]
    fn test_parse_header_arg() {
        assert_eq!(
            parse_header_arg("Accept: application/json").unwrap(),
            ("Accept".to_string(), "application/json".to_string())
        );
        assert_eq!(
            parse_header_arg("X-Empty:").unwrap(),
            ("X-Empty".to_string(), String::new())
        );
        assert!(parse_header_arg("no-colon").is_err());
        assert!(parse_header_arg(": value").is_err());
    }

    #[test]
    fn test_parse_query_arg() {
        assert_eq!(
            parse_query_arg("page=2").unwrap(),
            ("page".to_string(), "2".to_string())
        );
        assert_eq!(
            parse_query_arg("filter=a=b").unwrap(),
            ("filter".to_string(), "a=b".to_string())
        );
        assert!(parse_query_arg("=2").is_err());
        assert!(parse_query_arg("page").is_err());
    }

    #[test]
    fn test_cli_parse_url_only() {
        let cli = Cli::parse_from(["fetchstate", "/users"]);
        assert_eq!(cli.url, "/users");
        assert_eq!(cli.method, "GET");
        assert!(cli.headers.is_empty());
        assert!(!cli.plain);
    }

    #[test]
    fn test_startup_config_defaults_to_cacheable_get() {
        let cli = Cli::parse_from(["fetchstate", "/users"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert!(config.descriptor.is_cacheable());
        assert!(config.http.base_url.is_none());
        assert!(config.http.timeout.is_none());
    }

    #[test]
    fn test_startup_config_full_request() {
        let cli = Cli::parse_from([
            "fetchstate",
            "/orders",
            "-X",
            "post",
            "-H",
            "X-Trace: 1",
            "-q",
            "dry_run=true",
            "-d",
            r#"{"item":"tea"}"#,
            "--timeout",
            "5",
            "--base-url",
            "http://localhost:3000",
            "--plain",
        ]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        let options = config.descriptor.options();

        assert_eq!(config.descriptor.method(), Method::POST);
        assert!(!config.descriptor.is_cacheable());
        assert_eq!(options.headers, vec![("X-Trace".to_string(), "1".to_string())]);
        assert_eq!(options.query, vec![("dry_run".to_string(), "true".to_string())]);
        assert_eq!(options.body, Some(json!({"item": "tea"})));
        assert_eq!(config.http.timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.http.base_url.as_deref(), Some("http://localhost:3000"));
        assert!(config.plain);
    }

    #[test]
    fn test_startup_config_invalid_body() {
        let cli = Cli::parse_from(["fetchstate", "/orders", "-d", "{oops"]);
        let err = StartupConfig::from_cli(&cli).unwrap_err();
        assert!(matches!(err, CliError::InvalidBody(_)));
    }

    #[test]
    fn test_startup_config_invalid_header() {
        let cli = Cli::parse_from(["fetchstate", "/users", "-H", "broken"]);
        assert!(matches!(
            StartupConfig::from_cli(&cli),
            Err(CliError::InvalidHeader(_))
        ));
    }
}
