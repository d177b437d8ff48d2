//! Nearby stop search.
//!
//! Answers "which stops are within this many meters of me?", nearest first.
//! The directory comes from the session cache, so only the first search in
//! a session touches the network.

mod config;
mod error;
mod nearby;

pub use config::FinderConfig;
pub use error::FinderError;
pub use nearby::{NearbyStopFinder, rank_stops, validate_radius};
