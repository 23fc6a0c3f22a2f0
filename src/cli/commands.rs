use crate::api::{
    AirSenseClient, GeminiClient, MockDataProvider, NearbyOptions, DEFAULT_FORECAST_HOURS,
    DEFAULT_RADIUS_KM, DEFAULT_STATION_LIMIT,
};
use crate::assistant::Assistant;
use crate::cli::render;
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{AqiLevel, Coordinates, LocationSnapshot};
use crate::normalize::ForecastSchema;
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info};

/// CLI client for AirSense air quality forecasts, history and nearby stations
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Print results as JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Use simulated data where the backend is not needed (history, current conditions)
    #[arg(long, global = true)]
    pub demo: bool,

    /// Command to run; starts the interactive menu when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Args, Debug, Clone, Copy)]
pub struct LocationArgs {
    /// Latitude in decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,

    /// Longitude in decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lon: f64,
}

impl LocationArgs {
    pub fn coordinates(&self) -> Result<Coordinates> {
        Coordinates::new(self.lat, self.lon)
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Show the AQI forecast
    Forecast {
        #[command(flatten)]
        location: LocationArgs,

        /// Number of hours to forecast (default: 24)
        #[arg(long, default_value_t = DEFAULT_FORECAST_HOURS)]
        hours: u32,

        /// Read the older `predictions`/`predicted_aqi` payload
        #[arg(long)]
        legacy: bool,
    },

    /// Show the observed AQI history
    History {
        #[command(flatten)]
        location: LocationArgs,
    },

    /// List monitoring stations near a location
    Nearby {
        #[command(flatten)]
        location: LocationArgs,

        /// Search radius in kilometres (default: 50)
        #[arg(long, default_value_t = DEFAULT_RADIUS_KM)]
        radius_km: f64,

        /// Maximum number of stations (default: 20)
        #[arg(long, default_value_t = DEFAULT_STATION_LIMIT)]
        limit: u32,
    },

    /// Show current conditions
    Current {
        #[command(flatten)]
        location: LocationArgs,
    },

    /// Show the simulated NO2/O3/SO2 trend
    Trend {
        #[command(flatten)]
        location: LocationArgs,
    },

    /// Ask the air quality assistant a question
    Ask {
        #[command(flatten)]
        location: LocationArgs,

        /// The question to ask
        question: String,
    },

    /// Get health tips for the current AQI
    Tips {
        #[command(flatten)]
        location: LocationArgs,
    },
}

/// CLI application
pub struct App {
    config: Config,
    client: Option<AirSenseClient>,
    mock_provider: MockDataProvider,
    json: bool,
    demo: bool,
}

impl App {
    /// Create a new CLI application
    ///
    /// The backend client is only built when `AIRSENSE_API_URL` is set; commands that
    /// need it report the missing setting when run.
    pub fn new(config: Config, json: bool, demo: bool) -> Result<Self> {
        let client = match config.api_url {
            Some(_) => Some(AirSenseClient::from_config(&config)?),
            None => {
                debug!("AIRSENSE_API_URL not set; backend commands are unavailable");
                None
            },
        };
        let mock_provider = MockDataProvider::new(config.labels());

        Ok(Self {
            config,
            client,
            mock_provider,
            json,
            demo,
        })
    }

    fn client(&self) -> Result<&AirSenseClient> {
        self.config.require_api_url()?;
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Config("AQI backend client unavailable".to_string()))
    }

    /// Run one command
    pub async fn run_command(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Forecast {
                location,
                hours,
                legacy,
            } => self.show_forecast(location.coordinates()?, hours, legacy).await,
            Commands::History { location } => self.show_history(location.coordinates()?).await,
            Commands::Nearby {
                location,
                radius_km,
                limit,
            } => {
                self.show_nearby(location.coordinates()?, NearbyOptions { radius_km, limit })
                    .await
            },
            Commands::Current { location } => self.show_current(location.coordinates()?).await,
            Commands::Trend { location } => self.show_trend(location.coordinates()?),
            Commands::Ask { location, question } => {
                self.ask(location.coordinates()?, &question).await
            },
            Commands::Tips { location } => self.tips(location.coordinates()?).await,
        }
    }

    async fn show_forecast(&self, coords: Coordinates, hours: u32, legacy: bool) -> Result<()> {
        let mut client = self.client()?.clone();
        if legacy {
            client = client.with_forecast_schema(ForecastSchema::legacy());
        }
        let forecast = with_spinner("Fetching AQI forecast...", client.get_forecast(coords, hours))
            .await?;

        self.emit(&forecast, || {
            let peak = forecast.points.iter().map(|p| p.aqi).max().unwrap_or(0);
            format!(
                "{}\nPeak AQI: {}",
                render::forecast_table(&forecast),
                render::colored_aqi(peak)
            )
        })
    }

    async fn show_history(&self, coords: Coordinates) -> Result<()> {
        let history = if self.demo {
            info!("Using simulated history for {}", coords);
            self.mock_provider.history(coords, Utc::now())
        } else {
            with_spinner("Fetching AQI history...", self.client()?.get_history(coords)).await?
        };

        self.emit(&history, || {
            let mut output = render::history_table(&history);
            if self.demo {
                output.push_str(&format!("\n{}", "Simulated data (demo mode)".yellow()));
            }
            output
        })
    }

    async fn show_nearby(&self, coords: Coordinates, options: NearbyOptions) -> Result<()> {
        let result = with_spinner(
            "Searching nearby stations...",
            self.client()?.get_nearby_stations(coords, options),
        )
        .await?;

        self.emit(&result, || render::stations_table(&result))
    }

    async fn show_current(&self, coords: Coordinates) -> Result<()> {
        let snapshot = self.snapshot(coords).await?;

        self.emit(&snapshot, || {
            let mut output = render::snapshot_table(&snapshot);
            if let Some(aqi) = snapshot.aqi {
                let level = AqiLevel::for_aqi(aqi);
                output.push_str(&format!(
                    "\n{}\n{}\n{}",
                    render::colored_aqi(aqi),
                    level.description,
                    level.advice.italic()
                ));
            }
            output
        })
    }

    fn show_trend(&self, coords: Coordinates) -> Result<()> {
        let trend = self.mock_provider.trend(coords, Utc::now());
        self.emit(&trend, || {
            format!(
                "{}\n{}",
                render::trend_table(&trend),
                "Simulated pollutant trend".yellow()
            )
        })
    }

    async fn ask(&self, coords: Coordinates, question: &str) -> Result<()> {
        let snapshot = self.snapshot(coords).await?;
        let assistant = self.assistant()?;
        let answer = with_spinner("Thinking...", async {
            Ok::<_, AppError>(assistant.ask(&snapshot, question).await)
        })
        .await?;

        self.emit(&AssistantReply { answer: &answer }, || answer.clone())
    }

    async fn tips(&self, coords: Coordinates) -> Result<()> {
        let snapshot = self.snapshot(coords).await?;
        let assistant = self.assistant()?;
        let tips = with_spinner("Preparing tips...", assistant.tips(&snapshot)).await?;

        self.emit(&AssistantReply { answer: &tips }, || {
            format!("{}\n{}", "Health tips".cyan().bold(), tips)
        })
    }

    async fn snapshot(&self, coords: Coordinates) -> Result<LocationSnapshot> {
        if self.demo {
            info!("Using demo conditions for {}", coords);
            return Ok(self.mock_provider.snapshot(coords, Utc::now()));
        }
        with_spinner(
            "Fetching current conditions...",
            self.client()?.get_location_snapshot(coords),
        )
        .await
    }

    fn assistant(&self) -> Result<Assistant<GeminiClient>> {
        let gemini = GeminiClient::from_config(&self.config.gemini, self.config.timeout)?;
        Ok(Assistant::new(gemini, self.config.locale))
    }

    /// Prints `value` as JSON in `--json` mode, otherwise the rendered text.
    fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce() -> String) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            println!("{}", text());
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct AssistantReply<'a> {
    answer: &'a str,
}

/// Shows a spinner on stderr while `task` runs.
async fn with_spinner<T>(message: &str, task: impl Future<Output = Result<T>>) -> Result<T> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner:.cyan} {msg}")?);
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    let result = task.await;
    spinner.finish_and_clear();
    result
}
