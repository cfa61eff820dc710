//! HTTP client for fetching the crew roster from the SpaceX API.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::ApiError;

/// Base URL for the SpaceX v4 API.
const API_BASE_URL: &str = "https://api.spacexdata.com/v4";

/// HTTP request timeout in seconds.
/// 30s allows for slow responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Port for fetching the raw serialized roster.
///
/// One operation: fetch everything or fail. The payload is returned
/// unparsed; validation belongs to the repository layer.
#[async_trait]
pub trait CrewApi: Send + Sync {
    async fn fetch_all(&self) -> Result<String, ApiError>;
}

/// API client for the SpaceX crew endpoint.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct SpaceXClient {
    client: Client,
    base_url: String,
}

impl SpaceXClient {
    /// Create a new API client against the public SpaceX API.
    pub fn new() -> Result<Self, ApiError> {
        Self::with_base_url(API_BASE_URL)
    }

    /// Create a client against a different base URL (configuration and
    /// tests).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }
}

#[async_trait]
impl CrewApi for SpaceXClient {
    async fn fetch_all(&self) -> Result<String, ApiError> {
        let url = format!("{}/crew", self.base_url);

        let response = self.client.get(&url).send().await?;
        let response = Self::check_response(response).await?;

        let body = response.text().await?;
        debug!(bytes = body.len(), "Crew roster response received");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_base_url_overrides_default() {
        let client = SpaceXClient::with_base_url("http://localhost:9999").expect("client builds");
        assert_eq!(client.base_url, "http://localhost:9999");
    }

    #[tokio::test]
    async fn test_fetch_all_reports_transport_failure() {
        // Nothing listens on this port; the request must surface as a
        // transport error, not a panic or an empty payload.
        let client = SpaceXClient::with_base_url("http://127.0.0.1:1").expect("client builds");
        let err = client.fetch_all().await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }
}
