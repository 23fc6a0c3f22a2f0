//! Human-readable time labels for chart axes and tables.

use chrono::{DateTime, Datelike, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const FR_MONTHS: [&str; 12] = [
    "janv.", "févr.", "mars", "avr.", "mai", "juin", "juil.", "août", "sept.", "oct.", "nov.",
    "déc.",
];

const EN_MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Display language for labels and assistant answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Fr,
    En,
}

impl Locale {
    /// Language name used when instructing the assistant.
    pub fn language(self) -> &'static str {
        match self {
            Locale::Fr => "French",
            Locale::En => "English",
        }
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fr" | "fr-fr" => Ok(Locale::Fr),
            "en" | "en-us" | "en-gb" => Ok(Locale::En),
            other => Err(format!("unsupported locale '{other}' (expected fr or en)")),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::Fr => write!(f, "fr"),
            Locale::En => write!(f, "en"),
        }
    }
}

/// Formats instants as labels in a fixed locale and UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelFormatter {
    locale: Locale,
    offset: FixedOffset,
}

impl Default for LabelFormatter {
    fn default() -> Self {
        Self::utc(Locale::default())
    }
}

impl LabelFormatter {
    pub fn new(locale: Locale, offset: FixedOffset) -> Self {
        Self { locale, offset }
    }

    pub fn utc(locale: Locale) -> Self {
        Self::new(locale, Utc.fix())
    }

    /// Hour and minute, e.g. `14:00` (fr) or `02:00 PM` (en).
    pub fn forecast_label(&self, at: DateTime<Utc>) -> String {
        let local = at.with_timezone(&self.offset);
        match self.locale {
            Locale::Fr => local.format("%H:%M").to_string(),
            Locale::En => local.format("%I:%M %p").to_string(),
        }
    }

    /// Two-digit day and abbreviated month, e.g. `05 janv.` (fr) or `Jan 05` (en).
    pub fn history_label(&self, at: DateTime<Utc>) -> String {
        let local = at.with_timezone(&self.offset);
        let month = local.month0() as usize;
        match self.locale {
            Locale::Fr => format!("{:02} {}", local.day(), FR_MONTHS[month]),
            Locale::En => format!("{} {:02}", EN_MONTHS[month], local.day()),
        }
    }
}
