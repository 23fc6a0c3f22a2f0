//! Terminal rendering of normalized results.

use crate::models::{
    AqiLevel, ForecastResult, HistoryPoint, HistoryTrendPoint, LocationSnapshot,
    NearbyStationsResult,
};
use colored::{ColoredString, Colorize};
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use std::fmt::Display;

/// The AQI value followed by its category, coloured like the category.
pub fn colored_aqi(aqi: u16) -> ColoredString {
    let level = AqiLevel::for_aqi(aqi);
    let (r, g, b) = level.rgb();
    format!("{} ({})", aqi, level.level).truecolor(r, g, b).bold()
}

fn table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn or_dash<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

pub fn forecast_table(forecast: &ForecastResult) -> String {
    let mut table = table(vec!["Time", "Timestamp", "AQI", "Category", "Confidence"]);
    for point in &forecast.points {
        table.add_row(vec![
            point.time.clone(),
            point.iso_timestamp.clone(),
            point.aqi.to_string(),
            AqiLevel::for_aqi(point.aqi).level.to_string(),
            format!("{:.0}%", point.confidence * 100.0),
        ]);
    }
    format!("Forecast generated at {}\n{table}", forecast.generated_at)
}

pub fn history_table(points: &[HistoryPoint]) -> String {
    let mut table = table(vec!["Day", "AQI", "Category"]);
    for point in points {
        table.add_row(vec![
            point.time.clone(),
            point.aqi.to_string(),
            AqiLevel::for_aqi(point.aqi).level.to_string(),
        ]);
    }
    table.to_string()
}

pub fn trend_table(points: &[HistoryTrendPoint]) -> String {
    let mut table = table(vec!["Day", "NO2", "O3", "SO2", "Composite"]);
    for point in points {
        table.add_row(vec![
            point.time.clone(),
            point.no2.to_string(),
            point.o3.to_string(),
            point.so2.to_string(),
            point.composite.to_string(),
        ]);
    }
    table.to_string()
}

pub fn stations_table(result: &NearbyStationsResult) -> String {
    let center = &result.search_center;
    let place: Vec<&str> = [&center.city, &center.state_province, &center.country]
        .into_iter()
        .filter_map(|part| part.as_deref())
        .collect();

    let mut summary = format!(
        "{} of {} stations within {} km of {:.4}, {:.4}",
        result.stations.len(),
        result.total_found,
        result.parameters.radius_km,
        center.latitude,
        center.longitude
    );
    if !place.is_empty() {
        summary.push_str(&format!(" ({})", place.join(", ")));
    }

    let mut table = table(vec![
        "ID", "Name", "Distance", "Type", "Pollutants", "Network", "Status", "Last update",
    ]);
    for station in &result.stations {
        table.add_row(vec![
            station.id.clone(),
            station.name.clone(),
            format!("{:.1} km", station.distance_km),
            station.station_type.clone(),
            station.pollutants.join(", "),
            or_dash(station.network.as_deref()),
            station.status.clone(),
            or_dash(station.last_update.as_deref()),
        ]);
    }

    let mut output = format!("{summary}\n{table}");
    if let Some(availability) = &result.data_availability {
        if !availability.primary_sources.is_empty() {
            output.push_str(&format!(
                "\nSources: {}",
                availability.primary_sources.join(", ")
            ));
        }
        if let Some(standard) = &availability.air_quality_standard {
            output.push_str(&format!("\nStandard: {standard}"));
        }
        if let Some(coverage) = &availability.estimated_coverage {
            output.push_str(&format!("\nCoverage: {coverage}"));
        }
    }
    output
}

pub fn snapshot_table(snapshot: &LocationSnapshot) -> String {
    let mut table = table(vec!["Measure", "Value"]);
    let rows: [(&str, String); 13] = [
        ("AQI", or_dash(snapshot.aqi)),
        ("PM2.5 (µg/m³)", or_dash(snapshot.pm25)),
        ("PM10 (µg/m³)", or_dash(snapshot.pm10)),
        ("NO2 (µg/m³)", or_dash(snapshot.no2)),
        ("O3 (µg/m³)", or_dash(snapshot.o3)),
        ("SO2 (µg/m³)", or_dash(snapshot.so2)),
        ("CO (mg/m³)", or_dash(snapshot.co)),
        ("Temperature (°C)", or_dash(snapshot.temperature)),
        ("Humidity (%)", or_dash(snapshot.humidity)),
        ("Wind (km/h)", or_dash(snapshot.wind_speed)),
        ("Wind direction", or_dash(snapshot.wind_direction.as_deref())),
        ("Pressure (hPa)", or_dash(snapshot.pressure)),
        ("Visibility (km)", or_dash(snapshot.visibility)),
    ];
    for (label, value) in rows {
        table.add_row(vec![label.to_string(), value]);
    }
    format!(
        "{} ({})\nLast updated: {}\n{table}",
        snapshot.name,
        snapshot.coordinates,
        or_dash(snapshot.last_updated.as_deref())
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ForecastPoint, NearbyStation, SearchCenter, SearchParameters};

    #[test]
    fn test_forecast_table_lists_points() {
        let forecast = ForecastResult {
            generated_at: "2024-01-01T09:00:00Z".to_string(),
            points: vec![ForecastPoint {
                time: "10:00".to_string(),
                iso_timestamp: "2024-01-01T10:00:00Z".to_string(),
                aqi: 120,
                confidence: 0.85,
            }],
        };

        let output = forecast_table(&forecast);
        assert!(output.starts_with("Forecast generated at 2024-01-01T09:00:00Z"));
        assert!(output.contains("10:00"));
        assert!(output.contains("Unhealthy for Sensitive Groups"));
        assert!(output.contains("85%"));
    }

    #[test]
    fn test_stations_table_summary() {
        let result = NearbyStationsResult {
            stations: vec![NearbyStation {
                id: "st-1".to_string(),
                name: "Centre".to_string(),
                latitude: 6.36,
                longitude: 2.41,
                distance_km: 1.25,
                station_type: "reference".to_string(),
                pollutants: vec!["pm25".to_string(), "o3".to_string()],
                network: None,
                status: "active".to_string(),
                last_update: None,
            }],
            total_found: 3,
            search_center: SearchCenter {
                latitude: 6.3665,
                longitude: 2.4185,
                city: Some("Cotonou".to_string()),
                state_province: None,
                country: Some("Benin".to_string()),
            },
            parameters: SearchParameters {
                radius_km: 50.0,
                limit: 20,
            },
            data_availability: None,
        };

        let output = stations_table(&result);
        assert!(output.starts_with("1 of 3 stations within 50 km of 6.3665, 2.4185 (Cotonou, Benin)"));
        assert!(output.contains("pm25, o3"));
        assert!(output.contains("1.2 km") || output.contains("1.3 km"));
    }
}
