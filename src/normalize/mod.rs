//! Turns loosely-typed backend JSON into validated, bounded, sorted domain values.
//!
//! Every function here is pure: it receives an already-decoded [`serde_json::Value`]
//! and either returns a typed result or a [`NormalizeError`]. Transport, HTTP status
//! and JSON decoding failures are detected by the caller before normalization runs.
//!
//! Two failure kinds exist and are never collapsed into an empty success:
//! - `Malformed`: the payload lacks the expected object/array shape.
//! - `Empty`: the shape is right but no element survived validation.

pub mod coerce;
mod forecast;
mod history;
mod labels;
mod snapshot;
mod stations;

pub use forecast::*;
pub use history::*;
pub use labels::*;
pub use snapshot::*;
pub use stations::*;

use thiserror::Error;

/// Shape or content failure detected while normalizing a payload.
///
/// The message is supplied by the caller so each endpoint can phrase it for its users.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("{0}")]
    Malformed(String),
    #[error("{0}")]
    Empty(String),
}

/// Caller-supplied failure messages for one endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Messages {
    pub malformed: String,
    pub empty: String,
}

impl Messages {
    pub fn new(malformed: impl Into<String>, empty: impl Into<String>) -> Self {
        Self {
            malformed: malformed.into(),
            empty: empty.into(),
        }
    }

    pub(crate) fn malformed(&self) -> NormalizeError {
        NormalizeError::Malformed(self.malformed.clone())
    }

    pub(crate) fn empty(&self) -> NormalizeError {
        NormalizeError::Empty(self.empty.clone())
    }
}
