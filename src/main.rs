mod api;
mod assistant;
mod cli;
mod config;
mod error;
mod models;
mod normalize;

use anyhow::Context;
use clap::Parser;
use cli::{App, Cli, Commands, LocationArgs};
use colored::*;
use config::{Config, LogFormat, LoggingConfig};
use dialoguer::{theme::ColorfulTheme, Select};
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Sets up stderr logging, plus a daily log file when a directory is configured.
///
/// The returned guard flushes the file writer and must live until exit.
fn init_tracing(logging: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let mut layers = Vec::new();
    layers.push(match logging.format {
        LogFormat::Pretty => fmt::layer().with_writer(std::io::stderr).boxed(),
        LogFormat::Json => fmt::layer().json().with_writer(std::io::stderr).boxed(),
    });

    let guard = logging.directory.as_ref().map(|directory| {
        let appender = tracing_appender::rolling::daily(directory, "airsense.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        layers.push(fmt::layer().with_ansi(false).with_writer(writer).boxed());
        guard
    });

    tracing_subscriber::registry().with(layers).with(filter).init();
    guard
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env().context("failed to load configuration")?;
    let _guard = init_tracing(&config.logging);

    info!("Starting AirSense CLI...");

    let app = match App::new(config, cli.json, cli.demo) {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to initialize application: {:?}", e);
            println!(
                "{}",
                "Error: Failed to initialize application. Check logs.".red()
            );
            return Err(e.into());
        },
    };

    match cli.command {
        Some(command) => app
            .run_command(command)
            .await
            .context("command failed"),
        None => interactive(&app).await,
    }
}

/// Menu-driven loop used when no subcommand is given.
async fn interactive(app: &App) -> anyhow::Result<()> {
    println!("{}", "Welcome to the AirSense CLI!".cyan().bold());

    let options = &[
        "AQI forecast",
        "AQI history",
        "Nearby monitoring stations",
        "Current conditions",
        "Pollutant trend (simulated)",
        "Ask the assistant",
        "Health tips",
        "Exit",
    ];

    loop {
        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("What would you like to do?")
            .items(options)
            .default(0)
            .interact_opt()?
            .unwrap_or(options.len() - 1);

        if selection == options.len() - 1 {
            println!("{}", "Goodbye!".green());
            break;
        }

        println!("\n---\n");

        let command = match menu_command(selection) {
            Ok(command) => command,
            Err(e) => {
                println!("{} {}", "Failed to get input:".red(), e);
                continue;
            },
        };

        if let Err(e) = app.run_command(command).await {
            error!("Command execution failed: {:?}", e);
            println!("{} {}", "Error:".red(), e.to_string().red());
        }

        println!("\n---\n");
    }

    Ok(())
}

fn menu_command(selection: usize) -> error::Result<Commands> {
    let coords = cli::prompt_coordinates()?;
    let location = LocationArgs {
        lat: coords.latitude(),
        lon: coords.longitude(),
    };

    Ok(match selection {
        0 => Commands::Forecast {
            location,
            hours: cli::prompt_hours(api::DEFAULT_FORECAST_HOURS)?,
            legacy: false,
        },
        1 => Commands::History { location },
        2 => {
            let options = api::NearbyOptions::default();
            Commands::Nearby {
                location,
                radius_km: options.radius_km,
                limit: options.limit,
            }
        },
        3 => Commands::Current { location },
        4 => Commands::Trend { location },
        5 => Commands::Ask {
            location,
            question: cli::prompt_question()?,
        },
        _ => Commands::Tips { location },
    })
}
