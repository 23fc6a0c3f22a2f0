//! Forecast payload normalization.

use super::coerce::{as_number, clamp_aqi, clamp_confidence, field, parse_instant};
use super::{LabelFormatter, Messages, NormalizeError};
use crate::models::{ForecastPoint, ForecastResult};
use chrono::{DateTime, SecondsFormat, Utc};
use rayon::prelude::*;
use serde_json::Value;
use tracing::{debug, warn};

/// Field names of one forecast source.
///
/// Backends disagree on naming (`forecast`/`aqi` versus `predictions`/`predicted_aqi`);
/// a schema captures one naming so a single normalizer serves both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastSchema {
    pub points_field: String,
    pub timestamp_field: String,
    pub aqi_field: String,
    pub confidence_field: String,
    pub generated_at_field: String,
    pub messages: Messages,
}

impl ForecastSchema {
    /// The current backend: `{ forecast: [{ timestamp, aqi, confidence }], forecast_timestamp }`.
    pub fn current() -> Self {
        Self::with_fields("forecast", "aqi")
    }

    /// The older prediction backend: `{ predictions: [{ timestamp, predicted_aqi, confidence }] }`.
    pub fn legacy() -> Self {
        Self::with_fields("predictions", "predicted_aqi")
    }

    fn with_fields(points_field: &str, aqi_field: &str) -> Self {
        Self {
            points_field: points_field.to_string(),
            timestamp_field: "timestamp".to_string(),
            aqi_field: aqi_field.to_string(),
            confidence_field: "confidence".to_string(),
            generated_at_field: "forecast_timestamp".to_string(),
            messages: Messages::new(
                "Malformed AQI forecast response.",
                "No AQI forecast data available.",
            ),
        }
    }

    pub fn with_messages(mut self, messages: Messages) -> Self {
        self.messages = messages;
        self
    }
}

impl Default for ForecastSchema {
    fn default() -> Self {
        Self::current()
    }
}

/// Validates, clamps and sorts a forecast payload.
///
/// Elements with a missing or unparseable timestamp or a non-numeric AQI are dropped.
/// The result always holds at least one point.
pub fn normalize_forecast(
    payload: &Value,
    schema: &ForecastSchema,
    labels: &LabelFormatter,
) -> Result<ForecastResult, NormalizeError> {
    let items = field(payload, &schema.points_field)
        .and_then(Value::as_array)
        .ok_or_else(|| {
            warn!(
                field = %schema.points_field,
                "Forecast payload is missing its points array"
            );
            schema.messages.malformed()
        })?;

    let mut parsed: Vec<(DateTime<Utc>, ForecastPoint)> = items
        .par_iter()
        .filter_map(|item| forecast_point(item, schema, labels))
        .collect();

    if parsed.len() < items.len() {
        debug!(
            dropped = items.len() - parsed.len(),
            total = items.len(),
            "Dropped invalid forecast points"
        );
    }

    if parsed.is_empty() {
        warn!("Forecast payload contained zero valid points");
        return Err(schema.messages.empty());
    }

    parsed.sort_by_key(|(at, _)| *at);

    let generated_at = field(payload, &schema.generated_at_field)
        .and_then(Value::as_str)
        .map(str::to_owned)
        .unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true));

    Ok(ForecastResult {
        generated_at,
        points: parsed.into_iter().map(|(_, point)| point).collect(),
    })
}

fn forecast_point(
    item: &Value,
    schema: &ForecastSchema,
    labels: &LabelFormatter,
) -> Option<(DateTime<Utc>, ForecastPoint)> {
    let iso_timestamp = field(item, &schema.timestamp_field)?.as_str()?;
    let at = parse_instant(iso_timestamp)?;
    let aqi = field(item, &schema.aqi_field).and_then(as_number)?;
    let confidence = field(item, &schema.confidence_field).and_then(as_number);

    Some((
        at,
        ForecastPoint {
            time: labels.forecast_label(at),
            iso_timestamp: iso_timestamp.to_string(),
            aqi: clamp_aqi(aqi),
            confidence: clamp_confidence(confidence),
        },
    ))
}
