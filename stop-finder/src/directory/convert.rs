//! Conversion from the raw stop list payload to a [`StopDirectory`].

use tracing::warn;

use crate::domain::{Stop, StopDirectory, StopId};

use super::client::{StopDto, StopListResponse};
use super::error::DirectoryError;

/// Decode a raw stop list payload.
///
/// A payload that is not a stop list at all is an error. Individual stops
/// with a bad id or unparseable coordinates are skipped with a warning
/// rather than failing the whole directory.
pub fn decode_directory(raw: &str) -> Result<StopDirectory, DirectoryError> {
    let response: StopListResponse =
        serde_json::from_str(raw).map_err(|e| DirectoryError::Json {
            message: e.to_string(),
        })?;

    let stops = response.data.into_iter().filter_map(|dto| {
        let stop_code = dto.stop.clone();
        match convert_stop(dto) {
            Some(stop) => Some(stop),
            None => {
                warn!(stop = %stop_code, "skipping malformed stop");
                None
            }
        }
    });

    Ok(StopDirectory::from_stops(stops))
}

fn convert_stop(dto: StopDto) -> Option<Stop> {
    let id = StopId::parse(&dto.stop).ok()?;
    let lat = dto.lat.to_degrees()?;
    let lon = dto.lon.to_degrees()?;

    Some(Stop {
        id,
        name_en: dto.name_en,
        name_tc: dto.name_tc,
        name_sc: dto.name_sc,
        lat,
        lon,
    })
}
