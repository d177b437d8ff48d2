//! Nearby stop search errors.

use std::time::Duration;

use crate::directory::DirectoryError;
use crate::geolocation::PositionError;

/// Errors from a nearby stop search.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FinderError {
    /// Radius was zero, negative, NaN or infinite
    #[error("radius must be a positive number of meters, got {0}")]
    InvalidRadius(f64),

    /// Could not determine where the searcher is
    #[error("could not get current position: {0}")]
    PositionUnavailable(#[from] PositionError),

    /// Stop directory could not be loaded
    #[error("stop directory unavailable: {0}")]
    Directory(#[from] DirectoryError),

    /// A suspension point exceeded its configured bound
    #[error("timed out waiting for {operation} after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    /// A newer request from the same searcher replaced this one
    #[error("search superseded by a newer request")]
    Superseded,
}

impl FinderError {
    /// Whether the user can fix this by changing their input.
    pub fn is_user_error(&self) -> bool {
        matches!(self, FinderError::InvalidRadius(_))
    }
}
