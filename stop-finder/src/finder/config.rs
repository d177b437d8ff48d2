//! Configuration for nearby stop search.

use std::time::Duration;

/// Configuration parameters for nearby stop search.
#[derive(Debug, Clone)]
pub struct FinderConfig {
    /// How long to wait for the stop directory before giving up.
    pub directory_timeout: Duration,

    /// How long to wait for a position fix before giving up.
    pub position_timeout: Duration,

    /// Keep at most this many stops (nearest first). `None` keeps all.
    pub max_results: Option<usize>,
}

impl FinderConfig {
    /// Set the directory timeout.
    pub fn with_directory_timeout(mut self, timeout: Duration) -> Self {
        self.directory_timeout = timeout;
        self
    }

    /// Set the position timeout.
    pub fn with_position_timeout(mut self, timeout: Duration) -> Self {
        self.position_timeout = timeout;
        self
    }

    /// Cap the number of results.
    pub fn with_max_results(mut self, max_results: Option<usize>) -> Self {
        self.max_results = max_results;
        self
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            directory_timeout: Duration::from_secs(30),
            position_timeout: Duration::from_secs(10),
            max_results: None,
        }
    }
}
