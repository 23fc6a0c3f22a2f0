//! AQI forecast and history series.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A predicted AQI value at a given instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    /// Hour:minute label in the configured locale.
    pub time: String,
    /// Timestamp exactly as the backend sent it.
    pub iso_timestamp: String,
    /// Rounded and clamped into `[0, 500]`.
    pub aqi: u16,
    /// Clamped into `[0, 1]`.
    pub confidence: f64,
}

/// A forecast run: never empty, points ascending by timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResult {
    pub generated_at: String,
    pub points: Vec<ForecastPoint>,
}

/// An observed AQI value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPoint {
    /// Day and abbreviated month label in the configured locale.
    pub time: String,
    pub aqi: u16,
    /// Parsed source instant; ordering is defined on this, not on `time`.
    pub recorded_at: DateTime<Utc>,
}

/// Daily pollutant levels with a composite index (simulated series).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryTrendPoint {
    pub time: String,
    pub no2: u32,
    pub o3: u32,
    pub so2: u32,
    pub composite: u16,
}
