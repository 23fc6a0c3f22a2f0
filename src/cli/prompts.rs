//! Interactive prompts used by the menu-driven mode.

use crate::error::Result;
use crate::models::Coordinates;
use dialoguer::{theme::ColorfulTheme, Input};

/// Prompts for a latitude and longitude until both are in range.
pub fn prompt_coordinates() -> Result<Coordinates> {
    let theme = ColorfulTheme::default();
    let latitude: f64 = Input::with_theme(&theme)
        .with_prompt("Latitude")
        .validate_with(|value: &f64| -> std::result::Result<(), &str> {
            if (-90.0..=90.0).contains(value) {
                Ok(())
            } else {
                Err("latitude must be within [-90, 90]")
            }
        })
        .interact_text()?;
    let longitude: f64 = Input::with_theme(&theme)
        .with_prompt("Longitude")
        .validate_with(|value: &f64| -> std::result::Result<(), &str> {
            if (-180.0..=180.0).contains(value) {
                Ok(())
            } else {
                Err("longitude must be within [-180, 180]")
            }
        })
        .interact_text()?;
    Coordinates::new(latitude, longitude)
}

/// Prompts for the number of forecast hours.
pub fn prompt_hours(default: u32) -> Result<u32> {
    let hours = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Forecast hours")
        .default(default)
        .interact_text()?;
    Ok(hours)
}

/// Prompts for a free-text question.
pub fn prompt_question() -> Result<String> {
    let question: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Your question")
        .interact_text()?;
    Ok(question)
}
