//! Client configuration

use std::str::FromStr;

use reqwest::Method;

use crate::error::{ClientError, ClientResult};
use crate::gateway::RestGateway;
use crate::http::NetworkHttpClient;

/// HTTP verb used by the reorder endpoints.
///
/// Older backend routes accept `POST`, newer ones `PATCH`; both take the
/// same full-order body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReorderMethod {
    #[default]
    Post,
    Patch,
}

impl ReorderMethod {
    pub fn as_method(&self) -> Method {
        match self {
            Self::Post => Method::POST,
            Self::Patch => Method::PATCH,
        }
    }
}

impl FromStr for ReorderMethod {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "post" => Ok(Self::Post),
            "patch" => Ok(Self::Patch),
            other => Err(ClientError::Config(format!(
                "unsupported reorder method: {other}"
            ))),
        }
    }
}

/// Client configuration for connecting to the LMS API
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL (e.g., "https://lms.example.com/api")
    pub base_url: String,

    /// Bearer token for authentication
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Verb used for reorder requests
    pub reorder_method: ReorderMethod,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: 30,
            reorder_method: ReorderMethod::default(),
        }
    }

    /// Load configuration from environment variables
    ///
    /// - `LMS_API_URL` (required)
    /// - `LMS_API_TOKEN`
    /// - `LMS_HTTP_TIMEOUT` (seconds)
    /// - `LMS_REORDER_METHOD` (`post` | `patch`)
    pub fn from_env() -> ClientResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (environment, settings file, ...)
    pub fn from_lookup<F>(lookup: F) -> ClientResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("LMS_API_URL")
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ClientError::Config("LMS_API_URL must be set".into()))?;

        let mut config = Self::new(base_url.trim());

        if let Some(token) = lookup("LMS_API_TOKEN").filter(|s| !s.is_empty()) {
            config = config.with_token(token);
        }
        if let Some(timeout) = lookup("LMS_HTTP_TIMEOUT") {
            let seconds = timeout.trim().parse::<u64>().map_err(|_| {
                ClientError::Config(format!("LMS_HTTP_TIMEOUT is not a number: {timeout}"))
            })?;
            config = config.with_timeout(seconds);
        }
        if let Some(method) = lookup("LMS_REORDER_METHOD") {
            config = config.with_reorder_method(method.parse()?);
        }
        Ok(config)
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the reorder verb
    pub fn with_reorder_method(mut self, method: ReorderMethod) -> Self {
        self.reorder_method = method;
        self
    }

    /// Create an HTTP client from this configuration
    pub fn build_http_client(&self) -> ClientResult<NetworkHttpClient> {
        NetworkHttpClient::new(self)
    }

    /// Create a REST sync gateway from this configuration
    pub fn build_gateway(&self) -> ClientResult<RestGateway> {
        Ok(RestGateway::new(self.build_http_client()?, self.reorder_method))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:8080/api")
    }
}
