//! Current-conditions payload normalization.

use super::coerce::{as_number, as_object, as_text, clamp_aqi, field};
use super::{Messages, NormalizeError};
use crate::models::{Coordinates, LocationSnapshot};
use serde_json::Value;
use tracing::warn;

const UNKNOWN_LOCATION: &str = "Unknown location";

impl Messages {
    /// Default messages of the current-conditions endpoint.
    pub fn snapshot() -> Self {
        Messages::new(
            "Malformed location data response.",
            "No current data available for this location.",
        )
    }
}

/// Builds the current conditions at `coordinates`.
///
/// Every measurement is optional. Ozone is read from `o3`, falling back to the
/// `no3` key some backend versions emit.
pub fn normalize_location_snapshot(
    payload: &Value,
    coordinates: Coordinates,
    messages: &Messages,
) -> Result<LocationSnapshot, NormalizeError> {
    if as_object(payload).is_none() {
        warn!("Location payload is not an object");
        return Err(messages.malformed());
    }

    let number = |key: &str| field(payload, key).and_then(as_number);
    let text = |key: &str| field(payload, key).and_then(as_text).map(str::to_owned);

    Ok(LocationSnapshot {
        name: text("name").unwrap_or_else(|| UNKNOWN_LOCATION.to_string()),
        coordinates,
        aqi: number("aqi").map(clamp_aqi),
        pm25: number("pm25"),
        pm10: number("pm10"),
        no2: number("no2"),
        o3: number("o3").or_else(|| number("no3")),
        so2: number("so2"),
        co: number("co"),
        temperature: number("temperature"),
        humidity: number("humidity"),
        wind_speed: number("windSpeed"),
        wind_direction: text("windDirection"),
        pressure: number("pressure"),
        visibility: number("visibility"),
        last_updated: text("lastUpdated"),
    })
}
