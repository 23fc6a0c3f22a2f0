//! Nearby monitoring stations search result.

use serde::Serialize;

/// A physical monitoring station near the searched coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyStation {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub distance_km: f64,
    #[serde(rename = "type")]
    pub station_type: String,
    pub pollutants: Vec<String>,
    pub network: Option<String>,
    pub status: String,
    pub last_update: Option<String>,
}

/// Centre of the search, as echoed by the backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCenter {
    pub latitude: f64,
    pub longitude: f64,
    pub city: Option<String>,
    pub state_province: Option<String>,
    pub country: Option<String>,
}

/// Search parameters the result was computed with.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParameters {
    pub radius_km: f64,
    pub limit: u32,
}

/// Data sources backing the stations list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataAvailability {
    pub primary_sources: Vec<String>,
    pub air_quality_standard: Option<String>,
    pub estimated_coverage: Option<String>,
}

/// Nearby stations in backend order; never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyStationsResult {
    pub stations: Vec<NearbyStation>,
    pub total_found: u32,
    pub search_center: SearchCenter,
    pub parameters: SearchParameters,
    pub data_availability: Option<DataAvailability>,
}
