//! KMB stop list API client.

use serde::Deserialize;
use tracing::debug;

use super::cache::DirectoryTransport;
use super::error::DirectoryError;

/// Default base URL for the KMB open data API.
pub const DEFAULT_BASE_URL: &str = "https://data.etabus.gov.hk/v1/transport/kmb";

/// Wrapper for the stop list response.
#[derive(Debug, Deserialize)]
pub struct StopListResponse {
    pub data: Vec<StopDto>,
}

/// A stop as the feed publishes it.
#[derive(Debug, Clone, Deserialize)]
pub struct StopDto {
    pub stop: String,
    pub name_en: String,
    pub name_tc: Option<String>,
    pub name_sc: Option<String>,
    pub lat: RawCoordinate,
    #[serde(rename = "long")]
    pub lon: RawCoordinate,
}

/// A coordinate as published. The live feed sends decimal strings, but
/// plain numbers are accepted too.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawCoordinate {
    Number(f64),
    Text(String),
}

impl RawCoordinate {
    /// Parse to degrees, or `None` if the text is not a number.
    pub fn to_degrees(&self) -> Option<f64> {
        match self {
            RawCoordinate::Number(n) => Some(*n),
            RawCoordinate::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Configuration for the stop list client.
#[derive(Debug, Clone)]
pub struct DirectoryClientConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl DirectoryClientConfig {
    /// Create a config pointing at the production API.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for DirectoryClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Client for the KMB stop list endpoint.
#[derive(Debug, Clone)]
pub struct DirectoryClient {
    http: reqwest::Client,
    base_url: String,
}

impl DirectoryClient {
    /// Create a new stop list client.
    pub fn new(config: DirectoryClientConfig) -> Result<Self, DirectoryError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the raw stop list payload.
    ///
    /// The body is returned undecoded so the caller can cache it verbatim.
    pub async fn fetch_raw(&self) -> Result<String, DirectoryError> {
        let url = format!("{}/stop", self.base_url);
        debug!(%url, "fetching stop directory");

        let response = self.http.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DirectoryError::Api {
                status: status.as_u16(),
                message: body.chars().take(500).collect(),
            });
        }

        Ok(response.text().await?)
    }
}

impl DirectoryTransport for DirectoryClient {
    async fn fetch_directory(&self) -> Result<String, DirectoryError> {
        self.fetch_raw().await
    }
}
