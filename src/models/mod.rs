//! Defines the data structures and models used throughout the application.
//!
//! These are the typed view-models produced by the normalizer from backend payloads,
//! plus the AQI category table used for display and assistant prompts.

mod aqi;
mod level;
mod location;
mod stations;

pub use aqi::*;
pub use level::*;
pub use location::*;
pub use stations::*;
