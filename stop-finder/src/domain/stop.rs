//! Bus stop identity and the stop directory.

use std::collections::HashMap;
use std::fmt;

use tracing::warn;

use super::Position;

/// Error returned when parsing an invalid stop identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid stop id: {reason}")]
pub struct InvalidStopId {
    reason: &'static str,
}

/// An opaque bus stop identifier (e.g. `18492910339410B1`).
///
/// The feed treats these as opaque strings, so any non-empty string is
/// accepted. Callers that put an id into a URL must encode it.
///
/// # Examples
///
/// ```
/// use stop_finder::domain::StopId;
///
/// let id = StopId::parse("18492910339410B1").unwrap();
/// assert_eq!(id.as_str(), "18492910339410B1");
///
/// assert!(StopId::parse("").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct StopId(String);

impl StopId {
    /// Parse a stop id. Anything but the empty string is accepted.
    pub fn parse(s: &str) -> Result<Self, InvalidStopId> {
        if s.is_empty() {
            return Err(InvalidStopId {
                reason: "must not be empty",
            });
        }

        Ok(StopId(s.to_string()))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StopId({})", self.0)
    }
}

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A physical bus stop.
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    pub id: StopId,

    /// English display name.
    pub name_en: String,

    /// Traditional Chinese name, when the feed supplies one.
    pub name_tc: Option<String>,

    /// Simplified Chinese name, when the feed supplies one.
    pub name_sc: Option<String>,

    /// Latitude in degrees (WGS-84).
    pub lat: f64,

    /// Longitude in degrees (WGS-84).
    pub lon: f64,
}

impl Stop {
    /// Create a stop with only an English name.
    pub fn new(id: StopId, name_en: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            id,
            name_en: name_en.into(),
            name_tc: None,
            name_sc: None,
            lat,
            lon,
        }
    }

    /// The stop's coordinate.
    pub fn position(&self) -> Position {
        Position::new(self.lat, self.lon)
    }
}

/// The complete, ordered set of stops published by the feed.
///
/// Immutable once built. Order is the feed's order, which is what breaks
/// ties when ranking by distance. Ids are unique: if the feed repeats an
/// id, the first occurrence is kept.
#[derive(Debug, Clone, Default)]
pub struct StopDirectory {
    stops: Vec<Stop>,
    index: HashMap<StopId, usize>,
}

impl StopDirectory {
    /// Build a directory, dropping stops whose id was already seen.
    pub fn from_stops(stops: impl IntoIterator<Item = Stop>) -> Self {
        let mut directory = Self::default();

        for stop in stops {
            if directory.index.contains_key(&stop.id) {
                warn!(stop_id = %stop.id, "duplicate stop id in directory, keeping first");
                continue;
            }
            directory
                .index
                .insert(stop.id.clone(), directory.stops.len());
            directory.stops.push(stop);
        }

        directory
    }

    /// Look up a stop by id.
    pub fn get(&self, id: &StopId) -> Option<&Stop> {
        self.index.get(id).map(|&i| &self.stops[i])
    }

    /// All stops, in feed order.
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub fn iter(&self) -> impl Iterator<Item = &Stop> {
        self.stops.iter()
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }
}
