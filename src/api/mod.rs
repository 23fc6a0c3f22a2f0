//! Provides clients and utilities for interacting with external APIs.
//!
//! Includes:
//! - `airsense`: Client for the AirSense AQI backend (forecast, history, nearby stations, current conditions).
//! - `gemini`: Generative-AI completion client behind the `CompletionProvider` trait.
//! - `mock`: Simulated series for demo mode.

mod airsense;
#[cfg(test)]
mod airsense_test;
mod gemini;
mod mock;

pub use airsense::*;
pub use gemini::*;
pub use mock::*;
