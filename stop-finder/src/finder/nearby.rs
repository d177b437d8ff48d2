//! Nearby stop search.
//!
//! Given a position and a radius, load the session's stop directory, keep
//! every stop within the radius, and order them nearest first. Stops at
//! equal distance keep their directory order.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::directory::{DirectoryTransport, SessionStore, StopDirectoryCache};
use crate::distance::distance;
use crate::domain::{Position, RankedStop, StopDirectory};
use crate::geolocation::PositionProvider;
use crate::request::RequestToken;

use super::config::FinderConfig;
use super::error::FinderError;

/// Check that a radius is a positive, finite number of meters.
pub fn validate_radius(radius_meters: f64) -> Result<f64, FinderError> {
    if radius_meters.is_finite() && radius_meters > 0.0 {
        Ok(radius_meters)
    } else {
        Err(FinderError::InvalidRadius(radius_meters))
    }
}

/// Rank the stops of a directory by distance from `position`.
///
/// Only stops within `radius_meters` (inclusive) are kept. The sort is
/// stable, so equidistant stops stay in directory order.
pub fn rank_stops(
    directory: &StopDirectory,
    position: Position,
    radius_meters: f64,
) -> Vec<RankedStop> {
    let mut ranked: Vec<RankedStop> = directory
        .iter()
        .filter_map(|stop| {
            let distance_meters = distance(position, stop.position());
            (distance_meters <= radius_meters).then(|| RankedStop {
                stop: stop.clone(),
                distance_meters,
            })
        })
        .collect();

    ranked.sort_by(|a, b| a.distance_meters.total_cmp(&b.distance_meters));
    ranked
}

/// Finds stops near a position using the session's directory cache.
pub struct NearbyStopFinder<T, S> {
    cache: Arc<StopDirectoryCache<T, S>>,
    config: FinderConfig,
}

impl<T: DirectoryTransport, S: SessionStore> NearbyStopFinder<T, S> {
    pub fn new(cache: Arc<StopDirectoryCache<T, S>>, config: FinderConfig) -> Self {
        Self { cache, config }
    }

    /// The directory cache this finder reads from.
    pub fn cache(&self) -> &Arc<StopDirectoryCache<T, S>> {
        &self.cache
    }

    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// Find stops within `radius_meters` of `position`, nearest first.
    ///
    /// The radius is validated before the directory is touched. An empty
    /// result is not an error. If `token` is cancelled before the search
    /// completes, returns [`FinderError::Superseded`].
    pub async fn find_nearby(
        &self,
        position: Position,
        radius_meters: f64,
        token: &RequestToken,
    ) -> Result<Vec<RankedStop>, FinderError> {
        let radius_meters = validate_radius(radius_meters)?;
        let directory = self.directory(token).await?;

        let mut ranked = rank_stops(&directory, position, radius_meters);
        let found = ranked.len();
        if let Some(max) = self.config.max_results {
            ranked.truncate(max);
        }

        // The directory may have resolved just as a newer request began.
        if token.is_cancelled() {
            return Err(FinderError::Superseded);
        }

        info!(
            lat = position.lat,
            lon = position.lon,
            radius_meters,
            found,
            returned = ranked.len(),
            "nearby stop search complete"
        );

        Ok(ranked)
    }

    /// Load the session's stop directory, giving up after
    /// `directory_timeout` or once `token` is cancelled.
    pub async fn directory(&self, token: &RequestToken) -> Result<Arc<StopDirectory>, FinderError> {
        let directory = bounded(
            token,
            "stop directory",
            self.config.directory_timeout,
            self.cache.get_directory(),
        )
        .await??;
        Ok(directory)
    }

    /// Acquire the current position from `provider`, then search around it.
    ///
    /// The radius is validated before the provider is asked for a fix.
    pub async fn locate_and_find<P: PositionProvider>(
        &self,
        provider: &P,
        radius_meters: f64,
        token: &RequestToken,
    ) -> Result<Vec<RankedStop>, FinderError> {
        let radius_meters = validate_radius(radius_meters)?;

        let position = bounded(
            token,
            "position",
            self.config.position_timeout,
            provider.current_position(),
        )
        .await??;
        debug!(lat = position.lat, lon = position.lon, "position acquired");

        self.find_nearby(position, radius_meters, token).await
    }
}

/// Await `fut`, giving up on cancellation or after `after`.
async fn bounded<F: Future>(
    token: &RequestToken,
    operation: &'static str,
    after: Duration,
    fut: F,
) -> Result<F::Output, FinderError> {
    tokio::select! {
        biased;
        _ = token.cancelled() => {
            debug!(operation, sequence = token.sequence(), "request superseded");
            Err(FinderError::Superseded)
        }
        result = tokio::time::timeout(after, fut) => {
            result.map_err(|_| FinderError::Timeout { operation, after })
        }
    }
}

#[cfg(test)]
#[path = "nearby_tests.rs"]
mod tests;
