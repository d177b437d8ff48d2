//! Conversion from ETA DTOs to per-route arrival lists.
//!
//! Entries without an estimate are dropped. The rest are grouped by route
//! and direction, keeping the order routes first appear in the feed and the
//! feed's order of estimates within a route.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, FixedOffset};
use tracing::warn;

use super::types::EtaDto;

/// Error during DTO to domain conversion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    /// Direction was neither "O" nor "I"
    #[error("invalid direction: {0}")]
    InvalidDirection(String),

    /// Failed to parse an arrival timestamp
    #[error("invalid timestamp: {0}")]
    InvalidTime(String),
}

/// Travel direction along a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Outbound,
    Inbound,
}

impl Direction {
    /// Parse the feed's one-letter direction code.
    pub fn parse(s: &str) -> Result<Self, ConversionError> {
        match s {
            "O" | "o" => Ok(Direction::Outbound),
            "I" | "i" => Ok(Direction::Inbound),
            other => Err(ConversionError::InvalidDirection(other.to_string())),
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            Direction::Outbound => "O",
            Direction::Inbound => "I",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

/// Upcoming arrivals at a stop for one route in one direction.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteArrivals {
    pub route: String,
    pub direction: Direction,
    pub destination_en: String,
    /// Estimated arrival times, in feed order.
    pub arrivals: Vec<DateTime<FixedOffset>>,
}

/// Group arrival estimates by (route, direction).
///
/// Entries with a null `eta` are dropped. Entries with an unparseable
/// direction or timestamp are skipped with a warning.
pub fn group_arrivals(entries: &[EtaDto]) -> Vec<RouteArrivals> {
    let mut groups: Vec<RouteArrivals> = Vec::new();
    let mut index: HashMap<(String, Direction), usize> = HashMap::new();

    for entry in entries {
        let Some(eta) = entry.eta.as_deref() else {
            continue;
        };

        let (direction, time) = match convert_entry(&entry.dir, eta) {
            Ok(converted) => converted,
            Err(e) => {
                warn!(route = %entry.route, error = %e, "skipping arrival estimate");
                continue;
            }
        };

        let key = (entry.route.clone(), direction);
        match index.get(&key) {
            Some(&i) => groups[i].arrivals.push(time),
            None => {
                index.insert(key, groups.len());
                groups.push(RouteArrivals {
                    route: entry.route.clone(),
                    direction,
                    destination_en: entry.dest_en.clone(),
                    arrivals: vec![time],
                });
            }
        }
    }

    groups
}

fn convert_entry(
    dir: &str,
    eta: &str,
) -> Result<(Direction, DateTime<FixedOffset>), ConversionError> {
    let direction = Direction::parse(dir)?;
    let time = DateTime::parse_from_rfc3339(eta)
        .map_err(|_| ConversionError::InvalidTime(eta.to_string()))?;
    Ok((direction, time))
}
