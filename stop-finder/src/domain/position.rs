//! Coordinates and ranked results.

use super::Stop;

/// A WGS-84 coordinate in degrees.
///
/// No range validation is performed: out-of-range values still flow through
/// distance computation and simply produce meaningless distances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub lat: f64,
    pub lon: f64,
}

impl Position {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// A stop annotated with its distance from the searcher.
///
/// Produced fresh for each search and never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedStop {
    pub stop: Stop,
    pub distance_meters: f64,
}
