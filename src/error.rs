//! Defines the application's primary error type `AppError` and a convenience `Result` alias.
//!
//! Uses the `thiserror` crate for ergonomic error definition and provides `From`
//! implementations to convert common external errors into `AppError` variants.
//! Errors that do not implement `Clone` are wrapped in `Arc` to allow `AppError` to be cloneable.
//!
//! Failures of a backend call are kept apart by stage: the endpoint could not be reached,
//! it answered with a non-success status, its body was not JSON, or the JSON did not
//! normalize (see [`NormalizeError`]).

use crate::normalize::NormalizeError;
use std::sync::Arc;
use thiserror::Error;

/// The primary error enumeration for all application-specific errors.
#[derive(Error, Debug, Clone)]
pub enum AppError {
    /// The AQI backend could not be reached (connection refused, DNS, timeout...).
    #[error("Could not reach the AQI {endpoint} API: {source}")]
    Unreachable {
        endpoint: &'static str,
        source: Arc<reqwest::Error>,
    },

    /// The AQI backend answered with a non-success HTTP status.
    #[error("AQI {endpoint} request failed ({status}).")]
    Status { endpoint: &'static str, status: u16 },

    /// The AQI backend answered with a body that is not valid JSON.
    #[error("AQI {endpoint} response is not valid JSON: {source}")]
    Decode {
        endpoint: &'static str,
        source: Arc<serde_json::Error>,
    },

    /// The JSON payload was decoded but could not be normalized.
    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    /// Error returned by the generative-AI completion service.
    #[error("Completion Error: {0}")]
    Completion(String),

    /// Missing or invalid configuration.
    #[error("Configuration Error: {0}")]
    Config(String),

    /// Caller supplied arguments outside the accepted range.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Error during JSON (de)serialization outside of a backend response.
    #[error("JSON Error: {0}")]
    JsonParse(Arc<serde_json::Error>),

    /// Error originating from user interaction prompts (`dialoguer`).
    #[error("Dialoguer Error: {0}")]
    Dialoguer(Arc<dialoguer::Error>),

    /// Error related to progress bar style templating (`indicatif`).
    #[error("Progress Style Template Error: {0}")]
    Template(Arc<indicatif::style::TemplateError>),
}

/// A specialized `Result` type using the application's `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

// --- From implementations ---
// Arc is used for non-Clone error types.

impl From<dialoguer::Error> for AppError {
    fn from(err: dialoguer::Error) -> Self {
        AppError::Dialoguer(Arc::new(err))
    }
}

impl From<indicatif::style::TemplateError> for AppError {
    fn from(err: indicatif::style::TemplateError) -> Self {
        AppError::Template(Arc::new(err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::JsonParse(Arc::new(err))
    }
}
