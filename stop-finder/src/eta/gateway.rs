//! Per-stop arrival lookups with timeout and cancellation.

use std::time::Duration;

use tracing::debug;

use crate::domain::StopId;
use crate::request::RequestToken;

use super::client::EtaTransport;
use super::convert::{RouteArrivals, group_arrivals};
use super::error::EtaError;
use super::types::StopEtaResponse;

/// Default bound on a single stop's ETA lookup.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Fetches and groups live arrivals for one stop at a time.
pub struct EtaGateway<T> {
    transport: T,
    timeout: Duration,
}

impl<T: EtaTransport> EtaGateway<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the lookup timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Upcoming arrivals at `stop`, grouped by route and direction.
    ///
    /// An empty list means the feed had no estimates for this stop.
    pub async fn stop_arrivals(
        &self,
        stop: &StopId,
        token: &RequestToken,
    ) -> Result<Vec<RouteArrivals>, EtaError> {
        let body = tokio::select! {
            biased;
            _ = token.cancelled() => return Err(EtaError::Superseded),
            result = tokio::time::timeout(self.timeout, self.transport.fetch_eta(stop)) => {
                result.map_err(|_| EtaError::Timeout)??
            }
        };

        let response: StopEtaResponse =
            serde_json::from_str(&body).map_err(|e| EtaError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(500).collect()),
            })?;

        if token.is_cancelled() {
            return Err(EtaError::Superseded);
        }

        let groups = group_arrivals(&response.data);
        debug!(stop = %stop, routes = groups.len(), "stop arrivals loaded");
        Ok(groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eta::Direction;
    use crate::request::RequestTracker;

    const SAMPLE: &str = r#"{
        "type": "StopETA",
        "version": "1.0",
        "generated_timestamp": "2024-03-15T10:00:00+08:00",
        "data": [
            {"co": "KMB", "route": "1A", "dir": "O", "service_type": 1, "seq": 3,
             "dest_en": "STAR FERRY", "eta_seq": 1,
             "eta": "2024-03-15T10:05:00+08:00", "rmk_en": ""},
            {"co": "KMB", "route": "1A", "dir": "O", "service_type": 1, "seq": 3,
             "dest_en": "STAR FERRY", "eta_seq": 2,
             "eta": "2024-03-15T10:17:00+08:00", "rmk_en": ""},
            {"co": "KMB", "route": "2", "dir": "I", "service_type": 1, "seq": 9,
             "dest_en": "CHEUNG SHA WAN", "eta_seq": 1, "eta": null,
             "rmk_en": "Final Bus Departed"}
        ]
    }"#;

    /// Mock transport serving a fixed body after an optional delay.
    struct MockTransport {
        body: Result<&'static str, u16>,
        delay: Duration,
    }

    impl EtaTransport for MockTransport {
        async fn fetch_eta(&self, _stop: &StopId) -> Result<String, EtaError> {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            match self.body {
                Ok(body) => Ok(body.to_string()),
                Err(status) => Err(EtaError::ApiError {
                    status,
                    message: String::new(),
                }),
            }
        }
    }

    fn gateway(body: Result<&'static str, u16>) -> EtaGateway<MockTransport> {
        EtaGateway::new(MockTransport {
            body,
            delay: Duration::ZERO,
        })
    }

    fn stop() -> StopId {
        StopId::parse("18492910339410B1").unwrap()
    }

    #[tokio::test]
    async fn groups_sample() {
        let groups = gateway(Ok(SAMPLE))
            .stop_arrivals(&stop(), &RequestToken::detached())
            .await
            .unwrap();

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].route, "1A");
        assert_eq!(groups[0].direction, Direction::Outbound);
        assert_eq!(groups[0].arrivals.len(), 2);
    }

    #[tokio::test]
    async fn api_error_propagates() {
        let err = gateway(Err(500))
            .stop_arrivals(&stop(), &RequestToken::detached())
            .await
            .unwrap_err();

        assert!(matches!(err, EtaError::ApiError { status: 500, .. }));
    }

    #[tokio::test]
    async fn bad_json_is_error() {
        let err = gateway(Ok("{\"data\": 3}"))
            .stop_arrivals(&stop(), &RequestToken::detached())
            .await
            .unwrap_err();

        assert!(matches!(err, EtaError::Json { .. }));
    }

    #[tokio::test]
    async fn slow_lookup_times_out() {
        let gateway = EtaGateway::new(MockTransport {
            body: Ok(SAMPLE),
            delay: Duration::from_millis(500),
        })
        .with_timeout(Duration::from_millis(10));

        let err = gateway
            .stop_arrivals(&stop(), &RequestToken::detached())
            .await
            .unwrap_err();

        assert!(matches!(err, EtaError::Timeout));
    }

    #[tokio::test]
    async fn superseded_lookup() {
        let tracker = RequestTracker::new();
        let token = tracker.begin();
        tracker.begin();

        let err = gateway(Ok(SAMPLE))
            .stop_arrivals(&stop(), &token)
            .await
            .unwrap_err();

        assert!(matches!(err, EtaError::Superseded));
    }
}
