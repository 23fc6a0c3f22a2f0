//! Nearby monitoring stations payload normalization.

use super::coerce::{as_number, as_object, as_string_list, as_text, field};
use super::{Messages, NormalizeError};
use crate::models::{
    Coordinates, DataAvailability, NearbyStation, NearbyStationsResult, SearchCenter,
    SearchParameters,
};
use num_traits::ToPrimitive;
use serde_json::Value;
use tracing::{debug, warn};

const UNKNOWN_STATION_NAME: &str = "Station inconnue";
const UNKNOWN: &str = "unknown";

/// The request that produced the payload; used where the backend does not echo a value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearbyFallback {
    pub coordinates: Coordinates,
    pub radius_km: f64,
    pub limit: u32,
}

impl Messages {
    /// Default messages of the nearby stations endpoint.
    pub fn nearby() -> Self {
        Messages::new(
            "Malformed nearby stations response.",
            "No monitoring station found for this location.",
        )
    }
}

/// Builds a stations result, dropping station records without `id`, `latitude` or `longitude`.
///
/// Server order is preserved.
pub fn normalize_nearby_stations(
    payload: &Value,
    fallback: &NearbyFallback,
    messages: &Messages,
) -> Result<NearbyStationsResult, NormalizeError> {
    if as_object(payload).is_none() {
        warn!("Nearby stations payload is not an object");
        return Err(messages.malformed());
    }

    let empty = Value::Null;
    let search_center = field(payload, "search_center").unwrap_or(&empty);
    let location_info = field(search_center, "location_info").unwrap_or(&empty);
    let search_parameters = field(payload, "search_parameters").unwrap_or(&empty);
    let results = field(payload, "results").unwrap_or(&empty);

    let raw_stations = field(results, "stations")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    let stations: Vec<NearbyStation> = raw_stations.iter().filter_map(station).collect();

    if stations.len() < raw_stations.len() {
        debug!(
            dropped = raw_stations.len() - stations.len(),
            "Dropped station records missing id or coordinates"
        );
    }

    if stations.is_empty() {
        warn!("Nearby stations payload contained no usable station");
        return Err(messages.empty());
    }

    let number = |value: &Value, key: &str| field(value, key).and_then(as_number);
    let text = |value: &Value, key: &str| field(value, key).and_then(as_text).map(str::to_owned);

    let total_found = number(results, "total_found")
        .and_then(|n| n.to_u32())
        .unwrap_or(stations.len() as u32);

    let data_availability = field(payload, "data_availability")
        .filter(|value| as_object(value).is_some())
        .map(|availability| DataAvailability {
            primary_sources: as_string_list(field(availability, "primary_sources")),
            air_quality_standard: text(availability, "air_quality_standard"),
            estimated_coverage: text(availability, "estimated_coverage"),
        });

    Ok(NearbyStationsResult {
        total_found,
        search_center: SearchCenter {
            latitude: number(search_center, "latitude")
                .unwrap_or(fallback.coordinates.latitude()),
            longitude: number(search_center, "longitude")
                .unwrap_or(fallback.coordinates.longitude()),
            city: text(location_info, "city"),
            state_province: text(location_info, "state_province"),
            country: text(location_info, "country"),
        },
        parameters: SearchParameters {
            radius_km: number(search_parameters, "radius_km").unwrap_or(fallback.radius_km),
            limit: number(search_parameters, "limit")
                .and_then(|n| n.to_u32())
                .unwrap_or(fallback.limit),
        },
        data_availability,
        stations,
    })
}

fn station(item: &Value) -> Option<NearbyStation> {
    let text = |key: &str| field(item, key).and_then(as_text).map(str::to_owned);
    let number = |key: &str| field(item, key).and_then(as_number);

    let id = text("id")?;
    let latitude = number("latitude")?;
    let longitude = number("longitude")?;

    Some(NearbyStation {
        id,
        name: text("name").unwrap_or_else(|| UNKNOWN_STATION_NAME.to_string()),
        latitude,
        longitude,
        distance_km: number("distance_km").unwrap_or(0.0),
        station_type: text("type").unwrap_or_else(|| UNKNOWN.to_string()),
        pollutants: as_string_list(field(item, "pollutants")),
        network: text("network"),
        status: text("status").unwrap_or_else(|| UNKNOWN.to_string()),
        last_update: text("last_update"),
    })
}
