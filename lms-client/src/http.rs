// lms-client/src/http.rs
// HTTP transport - network calls to the LMS REST API

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::error::ApiResponse;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Header carrying the client-generated request id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Transport used by the REST gateway
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// GET `path` and decode the JSON body
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T>;

    /// Send a JSON body and check only the status; the response body is
    /// not part of the contract.
    async fn send_json<B: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        request_id: Option<&str>,
    ) -> ClientResult<()>;

    fn token(&self) -> Option<&str>;
}

/// Network HTTP client
#[derive(Debug, Clone)]
pub struct NetworkHttpClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl NetworkHttpClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    /// Replace the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let req = self.client.request(method, self.url(path));
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Turn a non-2xx response into a `ClientError`, preferring the
    /// structured envelope when the body carries one.
    async fn error_from(response: reqwest::Response) -> ClientError {
        let status = response.status();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => return ClientError::Http(e),
        };
        if let Ok(envelope) = serde_json::from_str::<ApiResponse<serde_json::Value>>(&text) {
            return ClientError::Api {
                status: status.as_u16(),
                code: envelope.error_code(),
                message: envelope.message,
            };
        }
        match status {
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized(text),
            StatusCode::FORBIDDEN => ClientError::Forbidden(text),
            StatusCode::NOT_FOUND => ClientError::NotFound(text),
            StatusCode::BAD_REQUEST => ClientError::Validation(text),
            _ => ClientError::Status {
                status: status.as_u16(),
                message: text,
            },
        }
    }
}

#[async_trait]
impl HttpClient for NetworkHttpClient {
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.request(Method::GET, path).send().await?;
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn send_json<B: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        request_id: Option<&str>,
    ) -> ClientResult<()> {
        let mut req = self.request(method, path).json(body);
        if let Some(id) = request_id {
            req = req.header(REQUEST_ID_HEADER, id);
        }
        let response = req.send().await?;
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Ok(())
    }

    fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}
