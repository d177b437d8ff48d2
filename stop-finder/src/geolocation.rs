//! Source of the searcher's current position.
//!
//! Acquiring a position is a precondition of a search, not part of it.
//! Providers report failure with [`PositionError`] and are never retried
//! by the finder.

use std::future::Future;

use crate::domain::Position;

/// Why a position could not be obtained.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PositionError {
    /// The user refused location access
    #[error("location permission denied")]
    PermissionDenied,

    /// The provider gave up waiting for a fix
    #[error("timed out acquiring position")]
    Timeout,

    /// No fix available (no hardware, no signal)
    #[error("position unavailable: {0}")]
    Unavailable(String),
}

/// Provides the device's current position.
pub trait PositionProvider: Send + Sync {
    fn current_position(&self) -> impl Future<Output = Result<Position, PositionError>> + Send;
}

/// A provider that always reports the same position.
///
/// Used where the caller already knows its coordinates, such as an HTTP
/// request carrying `lat`/`lon`.
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(pub Position);

impl PositionProvider for FixedPosition {
    async fn current_position(&self) -> Result<Position, PositionError> {
        Ok(self.0)
    }
}
