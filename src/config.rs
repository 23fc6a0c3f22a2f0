//! Configuration management for the AirSense CLI.
//!
//! Settings come from the process environment, after `.env` has been loaded with `dotenv`.
//! Only the backend URL and the Gemini key are required, and only by the commands that
//! need them.

use crate::error::{AppError, Result};
use crate::normalize::{LabelFormatter, Locale};
use chrono::FixedOffset;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_TIMEOUT_SECS: u64 = 15;
const DEFAULT_LOG_LEVEL: &str = "airsense=info";

/// Root configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// AQI backend base URL (`AIRSENSE_API_URL`).
    pub api_url: Option<String>,
    /// Timeout applied to every HTTP request.
    pub timeout: Duration,
    pub locale: Locale,
    /// Offset used when rendering time labels.
    pub utc_offset: FixedOffset,
    pub gemini: GeminiConfig,
    pub logging: LoggingConfig,
}

/// Generative-AI completion settings.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging settings.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,
    pub format: LogFormat,
    /// Directory for daily-rolling log files; stderr only when unset.
    pub directory: Option<PathBuf>,
}

impl Config {
    /// Loads `.env` (if present) and reads the configuration from the environment.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let timeout_secs = match get("AIRSENSE_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| {
                    AppError::Config(format!(
                        "AIRSENSE_TIMEOUT_SECS must be a positive integer, got '{raw}'"
                    ))
                })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let locale = match get("AIRSENSE_LOCALE") {
            Some(raw) => raw.parse::<Locale>().map_err(AppError::Config)?,
            None => Locale::default(),
        };

        let utc_offset = match get("AIRSENSE_UTC_OFFSET_MINUTES") {
            Some(raw) => raw
                .parse::<i32>()
                .ok()
                .and_then(|minutes| minutes.checked_mul(60))
                .and_then(FixedOffset::east_opt)
                .ok_or_else(|| {
                    AppError::Config(format!(
                        "AIRSENSE_UTC_OFFSET_MINUTES must be between -1439 and 1439, got '{raw}'"
                    ))
                })?,
            None => FixedOffset::east_opt(0)
                .ok_or_else(|| AppError::Config("invalid UTC offset".to_string()))?,
        };

        let format = match get("AIRSENSE_LOG_FORMAT").as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(AppError::Config(format!(
                    "AIRSENSE_LOG_FORMAT must be 'pretty' or 'json', got '{other}'"
                )))
            },
        };

        Ok(Self {
            api_url: get("AIRSENSE_API_URL").map(|url| url.trim_end_matches('/').to_string()),
            timeout: Duration::from_secs(timeout_secs),
            locale,
            utc_offset,
            gemini: GeminiConfig {
                api_key: get("GEMINI_API_KEY"),
                base_url: get("GEMINI_API_URL")
                    .map(|url| url.trim_end_matches('/').to_string())
                    .unwrap_or_else(|| DEFAULT_GEMINI_URL.to_string()),
                model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            },
            logging: LoggingConfig {
                level: get("AIRSENSE_LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
                format,
                directory: get("AIRSENSE_LOG_DIR").map(PathBuf::from),
            },
        })
    }

    /// Label formatter for the configured locale and offset.
    pub fn labels(&self) -> LabelFormatter {
        LabelFormatter::new(self.locale, self.utc_offset)
    }

    /// The backend URL, or a configuration error naming the variable to set.
    pub fn require_api_url(&self) -> Result<&str> {
        self.api_url.as_deref().ok_or_else(|| {
            AppError::Config(
                "AIRSENSE_API_URL is not set (use --demo for simulated history)".to_string(),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.api_url, None);
        assert_eq!(config.timeout, Duration::from_secs(15));
        assert_eq!(config.locale, Locale::Fr);
        assert_eq!(config.utc_offset.local_minus_utc(), 0);
        assert_eq!(config.gemini.model, DEFAULT_GEMINI_MODEL);
        assert_eq!(config.gemini.base_url, DEFAULT_GEMINI_URL);
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert!(config.require_api_url().is_err());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("AIRSENSE_API_URL", "https://aqi.example.com/api/v1/"),
            ("AIRSENSE_TIMEOUT_SECS", "30"),
            ("AIRSENSE_LOCALE", "en"),
            ("AIRSENSE_UTC_OFFSET_MINUTES", "-300"),
            ("AIRSENSE_LOG_FORMAT", "json"),
            ("GEMINI_API_KEY", "secret"),
            ("GEMINI_MODEL", "gemini-pro"),
        ]))
        .unwrap();

        assert_eq!(config.require_api_url().unwrap(), "https://aqi.example.com/api/v1");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.locale, Locale::En);
        assert_eq!(config.utc_offset.local_minus_utc(), -300 * 60);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.gemini.api_key.as_deref(), Some("secret"));
        assert_eq!(config.gemini.model, "gemini-pro");
    }

    #[test]
    fn test_blank_values_are_unset() {
        let config = Config::from_lookup(lookup(&[("AIRSENSE_API_URL", "  ")])).unwrap();
        assert_eq!(config.api_url, None);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        for pairs in [
            [("AIRSENSE_TIMEOUT_SECS", "0")],
            [("AIRSENSE_LOCALE", "de")],
            [("AIRSENSE_UTC_OFFSET_MINUTES", "5000")],
            [("AIRSENSE_LOG_FORMAT", "xml")],
        ] {
            let err = Config::from_lookup(lookup(&pairs)).unwrap_err();
            assert!(matches!(err, AppError::Config(_)), "{pairs:?} gave {err:?}");
        }
    }

    #[test]
    #[serial]
    fn test_from_env_reads_process_environment() {
        std::env::set_var("AIRSENSE_API_URL", "http://localhost:8000");
        std::env::set_var("AIRSENSE_LOCALE", "en");
        let config = Config::from_env();
        std::env::remove_var("AIRSENSE_API_URL");
        std::env::remove_var("AIRSENSE_LOCALE");

        let config = config.unwrap();
        assert_eq!(config.api_url.as_deref(), Some("http://localhost:8000"));
        assert_eq!(config.locale, Locale::En);
    }
}
