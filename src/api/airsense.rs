//! Provides a client for the AirSense AQI backend.
//!
//! Each call fetches one endpoint and normalizes its payload. Failures are reported by
//! stage: unreachable endpoint, non-success status, undecodable body, then the
//! normalizer's shape and content failures. Nothing is retried.

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{
    Coordinates, ForecastResult, HistoryPoint, LocationSnapshot, NearbyStationsResult,
};
use crate::normalize::{
    normalize_forecast, normalize_history, normalize_location_snapshot,
    normalize_nearby_stations, ForecastSchema, HistorySchema, LabelFormatter, Messages,
    NearbyFallback,
};
use reqwest::{header, Client};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, info};

pub const DEFAULT_FORECAST_HOURS: u32 = 24;
pub const MAX_FORECAST_HOURS: u32 = 168;
pub const DEFAULT_RADIUS_KM: f64 = 50.0;
pub const DEFAULT_STATION_LIMIT: u32 = 20;

/// Search options for nearby stations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearbyOptions {
    pub radius_km: f64,
    pub limit: u32,
}

impl Default for NearbyOptions {
    fn default() -> Self {
        Self {
            radius_km: DEFAULT_RADIUS_KM,
            limit: DEFAULT_STATION_LIMIT,
        }
    }
}

/// An asynchronous client for the AirSense AQI backend.
#[derive(Debug, Clone)]
pub struct AirSenseClient {
    client: Client,
    base_url: String,
    labels: LabelFormatter,
    forecast_schema: ForecastSchema,
}

impl AirSenseClient {
    /// Creates a client for `base_url` (no trailing slash).
    pub fn new(base_url: &str, timeout: Duration, labels: LabelFormatter) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("airsense/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            labels,
            forecast_schema: ForecastSchema::current(),
        })
    }

    /// Creates a client from the application configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.require_api_url()?, config.timeout, config.labels())
    }

    /// Uses a different forecast field naming, e.g. [`ForecastSchema::legacy`].
    pub fn with_forecast_schema(mut self, schema: ForecastSchema) -> Self {
        self.forecast_schema = schema;
        self
    }

    /// Fetches the AQI forecast for the next `hours` hours.
    ///
    /// Corresponds to the `/forecast` endpoint.
    pub async fn get_forecast(&self, coords: Coordinates, hours: u32) -> Result<ForecastResult> {
        if !(1..=MAX_FORECAST_HOURS).contains(&hours) {
            return Err(AppError::InvalidInput(format!(
                "forecast hours must be within 1..={MAX_FORECAST_HOURS}, got {hours}"
            )));
        }
        info!("Fetching {}h AQI forecast for {}", hours, coords);

        let payload = self
            .get_json(
                "forecast",
                "/forecast",
                &[
                    ("latitude", coords.latitude().to_string()),
                    ("longitude", coords.longitude().to_string()),
                    ("hours", hours.to_string()),
                ],
            )
            .await?;

        let forecast = normalize_forecast(&payload, &self.forecast_schema, &self.labels)?;
        debug!("Normalized {} forecast points", forecast.points.len());
        Ok(forecast)
    }

    /// Fetches the observed AQI history.
    ///
    /// Corresponds to the `/historical` endpoint.
    pub async fn get_history(&self, coords: Coordinates) -> Result<Vec<HistoryPoint>> {
        info!("Fetching AQI history for {}", coords);

        let payload = self
            .get_json("history", "/historical", &coordinate_query(coords))
            .await?;

        let history = normalize_history(&payload, &HistorySchema::default(), &self.labels)?;
        debug!("Normalized {} history points", history.len());
        Ok(history)
    }

    /// Searches monitoring stations around `coords`.
    ///
    /// Corresponds to the `/geolocation/nearby` endpoint.
    pub async fn get_nearby_stations(
        &self,
        coords: Coordinates,
        options: NearbyOptions,
    ) -> Result<NearbyStationsResult> {
        if !options.radius_km.is_finite() || options.radius_km <= 0.0 {
            return Err(AppError::InvalidInput(format!(
                "search radius must be positive, got {}",
                options.radius_km
            )));
        }
        if options.limit == 0 {
            return Err(AppError::InvalidInput(
                "station limit must be at least 1".to_string(),
            ));
        }
        info!(
            "Searching stations within {} km of {} (limit {})",
            options.radius_km, coords, options.limit
        );

        let mut query = coordinate_query(coords);
        query.push(("radius_km", options.radius_km.to_string()));
        query.push(("limit", options.limit.to_string()));
        let payload = self
            .get_json("nearby stations", "/geolocation/nearby", &query)
            .await?;

        let fallback = NearbyFallback {
            coordinates: coords,
            radius_km: options.radius_km,
            limit: options.limit,
        };
        let result = normalize_nearby_stations(&payload, &fallback, &Messages::nearby())?;
        debug!(
            "Normalized {} stations ({} reported)",
            result.stations.len(),
            result.total_found
        );
        Ok(result)
    }

    /// Fetches current conditions at `coords`.
    ///
    /// Corresponds to the `/location/full` endpoint.
    pub async fn get_location_snapshot(&self, coords: Coordinates) -> Result<LocationSnapshot> {
        info!("Fetching current conditions for {}", coords);

        let payload = self
            .get_json("location", "/location/full", &coordinate_query(coords))
            .await?;

        Ok(normalize_location_snapshot(
            &payload,
            coords,
            &Messages::snapshot(),
        )?)
    }

    /// Performs a GET and decodes the body as JSON, classifying each failure stage.
    async fn get_json(
        &self,
        endpoint: &'static str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .query(query)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to reach AQI {} API at {}: {}", endpoint, url, e);
                AppError::Unreachable {
                    endpoint,
                    source: e.into(),
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            error!(
                "AQI {} API at {} returned non-success status {}",
                endpoint, url, status
            );
            return Err(AppError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| {
            error!("Failed to read AQI {} response body: {}", endpoint, e);
            AppError::Unreachable {
                endpoint,
                source: e.into(),
            }
        })?;

        serde_json::from_slice(&body).map_err(|e| {
            error!("Unable to parse AQI {} payload: {}", endpoint, e);
            AppError::Decode {
                endpoint,
                source: e.into(),
            }
        })
    }
}

fn coordinate_query(coords: Coordinates) -> Vec<(&'static str, String)> {
    vec![
        ("latitude", coords.latitude().to_string()),
        ("longitude", coords.longitude().to_string()),
    ]
}
