//! Application state for the web layer.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::directory::{DirectoryClient, MokaSessionStore};
use crate::eta::{EtaClient, EtaGateway};
use crate::finder::NearbyStopFinder;
use crate::request::{RequestToken, RequestTracker};

/// Finder wired to the live directory API.
pub type LiveFinder = NearbyStopFinder<DirectoryClient, MokaSessionStore>;

/// How long an idle client's request tracker is kept.
const TRACKER_IDLE: Duration = Duration::from_secs(30 * 60);

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Nearby stop search over the cached directory
    pub finder: Arc<LiveFinder>,

    /// Per-stop arrival lookups
    pub eta: Arc<EtaGateway<EtaClient>>,

    /// Request trackers, keyed by the client-supplied session id
    trackers: MokaCache<String, Arc<RequestTracker>>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(finder: LiveFinder, eta: EtaGateway<EtaClient>) -> Self {
        Self {
            finder: Arc::new(finder),
            eta: Arc::new(eta),
            trackers: MokaCache::builder()
                .time_to_idle(TRACKER_IDLE)
                .max_capacity(10_000)
                .build(),
        }
    }

    /// Start a request on behalf of a client.
    ///
    /// Requests carrying the same session id supersede one another. Without
    /// a session id the request stands alone.
    pub async fn begin_request(&self, session: Option<&str>) -> RequestToken {
        match session.filter(|s| !s.is_empty()) {
            Some(session) => self
                .trackers
                .get_with(session.to_string(), async { Arc::new(RequestTracker::new()) })
                .await
                .begin(),
            None => RequestToken::detached(),
        }
    }
}
