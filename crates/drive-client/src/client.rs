//! Connected drive HTTP client implementation

use std::time::Duration;

use async_trait::async_trait;
use drive_core::{SessionClient, SessionError};
use reqwest::{Client, StatusCode};
use tracing::{debug, instrument};
use url::Url;

use crate::error::{status_error, transport_error, url_error, ErrorResponse, Result};

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Default connection timeout
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP session against a connected drive backend
///
/// Sends every request with the configured default headers (e.g. a bearer
/// token) and returns the parsed JSON body.
#[derive(Debug, Clone)]
pub struct DriveClient {
    client: Client,
    base_url: Url,
    server_url: String,
}

impl DriveClient {
    /// Create a new client without authentication
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the backend (e.g., "http://localhost:8080")
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_config(base_url, DEFAULT_TIMEOUT, DEFAULT_CONNECT_TIMEOUT)
    }

    /// Create a new client with custom timeouts
    pub fn with_config(
        base_url: &str,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(transport_error)?;

        Self::from_parts(client, base_url)
    }

    /// Create a new client that sends a bearer token with every request.
    ///
    /// The token is set as a default `Authorization: Bearer <token>` header.
    pub fn with_bearer_token(base_url: &str, token: &str) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        let header_value = reqwest::header::HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| SessionError::Unauthorized(format!("Invalid auth token: {}", e)))?;
        headers.insert(reqwest::header::AUTHORIZATION, header_value);

        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .default_headers(headers)
            .build()
            .map_err(transport_error)?;

        Self::from_parts(client, base_url)
    }

    fn from_parts(client: Client, base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(url_error)?;
        let server_url = base_url.as_str().trim_end_matches('/').to_string();

        Ok(Self {
            client,
            base_url,
            server_url,
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Get a reference to the underlying HTTP client.
    pub fn http_client(&self) -> &Client {
        &self.client
    }

    /// Resolve an absolute URL or a path relative to the base URL
    fn resolve(&self, url: &str) -> Result<Url> {
        match Url::parse(url) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                self.base_url.join(url).map_err(url_error)
            }
            Err(e) => Err(url_error(e)),
        }
    }

    /// GET a resource and parse its JSON body
    #[instrument(skip(self))]
    pub async fn get_json(&self, url: &str) -> Result<serde_json::Value> {
        let url = self.resolve(url)?;
        debug!("Requesting {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(transport_error)?;
        self.handle_response(response).await
    }

    /// Handle a response, parsing JSON or extracting the error
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| SessionError::Parse(e.to_string()))
        } else {
            Err(self.extract_error(response, status).await)
        }
    }

    async fn extract_error(
        &self,
        response: reqwest::Response,
        status: StatusCode,
    ) -> SessionError {
        // Try to parse error response body
        let message = match response.json::<ErrorResponse>().await {
            Ok(err) => err.error,
            Err(_) => format!("HTTP {}", status),
        };

        status_error(status, message)
    }
}

#[async_trait]
impl SessionClient for DriveClient {
    fn server_url(&self) -> &str {
        &self.server_url
    }

    async fn request(&self, url: &str) -> Result<serde_json::Value> {
        self.get_json(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = DriveClient::new("http://localhost:8080");
        assert!(client.is_ok());
    }

    #[test]
    fn test_invalid_url() {
        let client = DriveClient::new("not a url");
        assert!(matches!(client, Err(SessionError::InvalidUrl(_))));
    }

    #[test]
    fn test_server_url_has_no_trailing_slash() {
        let client = DriveClient::new("http://localhost:8080/").unwrap();
        assert_eq!(client.server_url(), "http://localhost:8080");
    }

    #[test]
    fn test_resolve_relative_and_absolute() {
        let client = DriveClient::new("http://localhost:8080").unwrap();
        assert_eq!(
            client.resolve("/api/vehicle/dynamic/v1/ABC").unwrap().as_str(),
            "http://localhost:8080/api/vehicle/dynamic/v1/ABC"
        );
        assert_eq!(
            client.resolve("https://other.test/status").unwrap().as_str(),
            "https://other.test/status"
        );
    }

    #[test]
    fn test_invalid_token() {
        let client = DriveClient::with_bearer_token("http://localhost:8080", "bad\ntoken");
        assert!(matches!(client, Err(SessionError::Unauthorized(_))));
    }
}
