//! Provides a mock data provider for generating plausible air quality series.
//!
//! Used in demo mode, and for the pollutant trend which has no backend endpoint yet.
//! It is never substituted for a failed backend request.

use crate::models::{Coordinates, HistoryPoint, HistoryTrendPoint, LocationSnapshot};
use crate::normalize::coerce::{clamp_aqi, clamp_pollutant};
use crate::normalize::LabelFormatter;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use rand::{thread_rng, Rng};
use std::f64::consts::PI;
use tracing::debug;

/// Number of daily points in simulated series.
pub const DAYS_OF_HISTORY: i64 = 30;

/// Baseline and daily variation of one simulated pollutant (µg/m³).
struct PollutantProfile {
    base: f64,
    seed_weight: f64,
    seasonal_weight: f64,
    noise_weight: f64,
}

const NO2: PollutantProfile = PollutantProfile {
    base: 25.0,
    seed_weight: 0.2,
    seasonal_weight: 1.0,
    noise_weight: 1.0,
};
const O3: PollutantProfile = PollutantProfile {
    base: 40.0,
    seed_weight: 0.3,
    seasonal_weight: 1.4,
    noise_weight: 1.2,
};
const SO2: PollutantProfile = PollutantProfile {
    base: 10.0,
    seed_weight: 0.15,
    seasonal_weight: 0.7,
    noise_weight: 0.8,
};

impl PollutantProfile {
    fn level(&self, seed: f64, seasonal: f64, noise: f64) -> u32 {
        clamp_pollutant(
            self.base + seed * self.seed_weight + seasonal * self.seasonal_weight
                + noise * self.noise_weight,
        )
    }
}

/// Generates simulated AQI data for a location.
///
/// The baseline depends on the coordinates, so nearby places look alike; daily noise is random.
pub struct MockDataProvider {
    labels: LabelFormatter,
}

impl MockDataProvider {
    pub fn new(labels: LabelFormatter) -> Self {
        debug!("Creating MockDataProvider");
        Self { labels }
    }

    /// Daily AQI history ending at `now`.
    pub fn history(&self, coords: Coordinates, now: DateTime<Utc>) -> Vec<HistoryPoint> {
        self.history_with_rng(coords, now, &mut thread_rng())
    }

    /// Same as [`history`](Self::history) with a caller-provided random source.
    pub fn history_with_rng(
        &self,
        coords: Coordinates,
        now: DateTime<Utc>,
        rng: &mut impl Rng,
    ) -> Vec<HistoryPoint> {
        let seed = (coords.latitude() * coords.longitude()).sin().abs() * 100.0;
        let base = 40.0 + seed * 0.5;
        debug!("Generating {} simulated history points for {}", DAYS_OF_HISTORY, coords);

        (0..DAYS_OF_HISTORY)
            .map(|index| {
                let day = now - Duration::days(DAYS_OF_HISTORY - 1 - index);
                let trend = (index as f64 / DAYS_OF_HISTORY as f64 * PI).sin() * 30.0;
                let variation = rng.gen_range(-20.0..20.0);
                HistoryPoint {
                    time: self.labels.history_label(day),
                    aqi: clamp_aqi(base + trend + variation),
                    recorded_at: day,
                }
            })
            .collect()
    }

    /// Daily NO2, O3 and SO2 levels with a composite index, ending at `now`.
    pub fn trend(&self, coords: Coordinates, now: DateTime<Utc>) -> Vec<HistoryTrendPoint> {
        self.trend_with_rng(coords, now, &mut thread_rng())
    }

    /// Same as [`trend`](Self::trend) with a caller-provided random source.
    pub fn trend_with_rng(
        &self,
        coords: Coordinates,
        now: DateTime<Utc>,
        rng: &mut impl Rng,
    ) -> Vec<HistoryTrendPoint> {
        let seed = (coords.latitude() + coords.longitude()).cos().abs() * 50.0;
        debug!("Generating {} simulated trend points for {}", DAYS_OF_HISTORY, coords);

        (0..DAYS_OF_HISTORY)
            .map(|index| {
                let day = now - Duration::days(DAYS_OF_HISTORY - 1 - index);
                let seasonal = (index as f64 / DAYS_OF_HISTORY as f64 * PI * 2.0).sin() * 8.0;
                let noise = rng.gen_range(-5.0..5.0);

                let no2 = NO2.level(seed, seasonal, noise);
                let o3 = O3.level(seed, seasonal, noise);
                let so2 = SO2.level(seed, seasonal, noise);
                let composite =
                    clamp_aqi((f64::from(no2) * 0.3 + f64::from(o3) * 0.5 + f64::from(so2) * 0.2) * 2.5);

                HistoryTrendPoint {
                    time: self.labels.history_label(day),
                    no2,
                    o3,
                    so2,
                    composite,
                }
            })
            .collect()
    }

    /// Fixed demo conditions at `coords`.
    pub fn snapshot(&self, coords: Coordinates, now: DateTime<Utc>) -> LocationSnapshot {
        LocationSnapshot {
            name: "Demo location".to_string(),
            coordinates: coords,
            aqi: Some(25),
            pm25: Some(22.0),
            pm10: Some(26.0),
            no2: Some(15.0),
            o3: Some(45.0),
            so2: Some(8.0),
            co: Some(0.5),
            temperature: Some(27.0),
            humidity: Some(79.0),
            wind_speed: Some(12.0),
            wind_direction: Some("SW".to_string()),
            pressure: Some(1013.0),
            visibility: Some(10.0),
            last_updated: Some(now.to_rfc3339_opts(SecondsFormat::Secs, true)),
        }
    }
}
