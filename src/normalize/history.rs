//! History payload normalization.

use super::coerce::{as_number, clamp_aqi, field, parse_instant};
use super::{LabelFormatter, Messages, NormalizeError};
use crate::models::HistoryPoint;
use rayon::prelude::*;
use serde_json::Value;
use tracing::{debug, warn};

/// Field names of the history source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistorySchema {
    pub points_field: String,
    pub timestamp_field: String,
    pub aqi_field: String,
    pub messages: Messages,
}

impl Default for HistorySchema {
    fn default() -> Self {
        Self {
            points_field: "measurements".to_string(),
            timestamp_field: "timestamp".to_string(),
            aqi_field: "aqi".to_string(),
            messages: Messages::new(
                "Malformed AQI history response.",
                "No AQI history data available.",
            ),
        }
    }
}

/// Validates, clamps and sorts a history payload.
///
/// Points are ordered by their source timestamp; labels carry no year, so they are
/// never used for ordering.
pub fn normalize_history(
    payload: &Value,
    schema: &HistorySchema,
    labels: &LabelFormatter,
) -> Result<Vec<HistoryPoint>, NormalizeError> {
    let items = field(payload, &schema.points_field)
        .and_then(Value::as_array)
        .ok_or_else(|| {
            warn!(
                field = %schema.points_field,
                "History payload is missing its measurements array"
            );
            schema.messages.malformed()
        })?;

    let mut points: Vec<HistoryPoint> = items
        .par_iter()
        .filter_map(|item| {
            let at = field(item, &schema.timestamp_field)
                .and_then(Value::as_str)
                .and_then(parse_instant)?;
            let aqi = field(item, &schema.aqi_field).and_then(as_number)?;
            Some(HistoryPoint {
                time: labels.history_label(at),
                aqi: clamp_aqi(aqi),
                recorded_at: at,
            })
        })
        .collect();

    debug!(
        kept = points.len(),
        total = items.len(),
        "Normalized history measurements"
    );

    if points.is_empty() {
        warn!("History payload contained zero valid points");
        return Err(schema.messages.empty());
    }

    points.sort_by_key(|point| point.recorded_at);
    Ok(points)
}
