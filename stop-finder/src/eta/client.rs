//! KMB stop ETA HTTP client.
//!
//! One request per stop; requests for different stops are independent.
//! A semaphore caps how many run at once.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::debug;

use crate::directory::DEFAULT_BASE_URL;
use crate::domain::StopId;

use super::error::EtaError;

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Source of raw per-stop arrival payloads.
pub trait EtaTransport: Send + Sync {
    fn fetch_eta(&self, stop: &StopId) -> impl Future<Output = Result<String, EtaError>> + Send;
}

/// Configuration for the ETA client.
#[derive(Debug, Clone)]
pub struct EtaClientConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl EtaClientConfig {
    /// Create a config pointing at the production API.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for EtaClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Client for the `stop-eta` endpoint.
#[derive(Debug, Clone)]
pub struct EtaClient {
    http: reqwest::Client,
    base_url: reqwest::Url,
    semaphore: Arc<Semaphore>,
}

impl EtaClient {
    /// Create a new ETA client with the given configuration.
    pub fn new(config: EtaClientConfig) -> Result<Self, EtaError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        let base_url = reqwest::Url::parse(&config.base_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or(EtaError::InvalidUrl {
                url: config.base_url.clone(),
            })?;

        Ok(Self {
            http,
            base_url,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    /// URL of the arrivals endpoint for a stop. The id is percent-encoded
    /// as a single path segment.
    pub fn eta_url(&self, stop: &StopId) -> Result<reqwest::Url, EtaError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| EtaError::InvalidUrl {
                url: self.base_url.to_string(),
            })?
            .pop_if_empty()
            .push("stop-eta")
            .push(stop.as_str());
        Ok(url)
    }

    /// Fetch the raw arrivals payload for a stop.
    pub async fn fetch_raw(&self, stop: &StopId) -> Result<String, EtaError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| EtaError::ApiError {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let url = self.eta_url(stop)?;
        debug!(%url, "fetching stop ETA");

        let response = self.http.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EtaError::ApiError {
                status: status.as_u16(),
                message: body.chars().take(500).collect(),
            });
        }

        Ok(response.text().await?)
    }
}

impl EtaTransport for EtaClient {
    async fn fetch_eta(&self, stop: &StopId) -> Result<String, EtaError> {
        self.fetch_raw(stop).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, http::StatusCode};

    #[test]
    fn config_defaults() {
        let config = EtaClientConfig::new();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.max_concurrent, DEFAULT_MAX_CONCURRENT);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn config_builders() {
        let config = EtaClientConfig::new()
            .with_base_url("http://localhost:9000")
            .with_max_concurrent(2)
            .with_timeout(3);
        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.max_concurrent, 2);
        assert_eq!(config.timeout_secs, 3);
    }

    #[test]
    fn eta_url_includes_stop() {
        let client = EtaClient::new(EtaClientConfig::new()).unwrap();
        let stop = StopId::parse("18492910339410B1").unwrap();
        assert_eq!(
            client.eta_url(&stop).unwrap().as_str(),
            "https://data.etabus.gov.hk/v1/transport/kmb/stop-eta/18492910339410B1"
        );
    }

    #[test]
    fn eta_url_encodes_stop_id() {
        let client = EtaClient::new(
            EtaClientConfig::new().with_base_url("http://localhost:9000/api/"),
        )
        .unwrap();

        let url = client.eta_url(&StopId::parse("AB 12/x").unwrap()).unwrap();
        assert_eq!(url.as_str(), "http://localhost:9000/api/stop-eta/AB%2012%2Fx");

        let url = client.eta_url(&StopId::parse("AB.12").unwrap()).unwrap();
        assert_eq!(url.path(), "/api/stop-eta/AB.12");
    }

    #[test]
    fn unusable_base_url_rejected() {
        let err = EtaClient::new(EtaClientConfig::new().with_base_url("not a url")).unwrap_err();
        assert!(matches!(err, EtaError::InvalidUrl { .. }));

        let err = EtaClient::new(EtaClientConfig::new().with_base_url("mailto:x@y")).unwrap_err();
        assert!(matches!(err, EtaError::InvalidUrl { .. }));
    }

    /// Serve every path with `status` and `body` on an ephemeral port.
    async fn serve(status: StatusCode, body: String) -> String {
        let app = Router::new().fallback(move || {
            let body = body.clone();
            async move { (status, body) }
        });
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn error_status_is_api_error() {
        let base = serve(StatusCode::SERVICE_UNAVAILABLE, "x".repeat(600)).await;
        let client = EtaClient::new(EtaClientConfig::new().with_base_url(base)).unwrap();

        let err = client
            .fetch_raw(&StopId::parse("S1").unwrap())
            .await
            .unwrap_err();

        match err {
            EtaError::ApiError { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message.len(), 500);
            }
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn success_returns_body() {
        let base = serve(StatusCode::OK, r#"{"data": []}"#.to_string()).await;
        let client = EtaClient::new(EtaClientConfig::new().with_base_url(base)).unwrap();

        let body = client
            .fetch_eta(&StopId::parse("S1").unwrap())
            .await
            .unwrap();
        assert_eq!(body, r#"{"data": []}"#);
    }
}
