//! Observation and yearly aggregate models

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One raw daily entry as delivered by a data source.
///
/// The date is kept as text and the value may be missing; the
/// [`ObservationStore`](crate::analysis::ObservationStore) decides what survives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawReading {
    pub date: String,
    pub value: Option<f64>,
}

impl RawReading {
    #[must_use]
    pub fn new(date: impl Into<String>, value: Option<f64>) -> Self {
        Self {
            date: date.into(),
            value,
        }
    }
}

/// A cleaned daily mean temperature for one location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Location identifier
    pub location: String,
    /// Calendar date of the daily mean
    pub date: NaiveDate,
    /// Daily mean temperature in Celsius, never missing
    pub value: f64,
}

impl Observation {
    /// Calendar year of the observation
    #[must_use]
    pub fn year(&self) -> i32 {
        self.date.year()
    }
}

/// Grouping scope of a [`YearlyMean`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Scope {
    /// Pooled over every location
    AllLocations,
    /// A single location
    Location(String),
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::AllLocations => write!(f, "all locations"),
            Scope::Location(name) => write!(f, "{name}"),
        }
    }
}

/// Arithmetic mean of the daily values falling in one calendar year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyMean {
    pub scope: Scope,
    pub year: i32,
    pub mean_value: f64,
    /// Number of daily values in the mean, always at least 1
    pub sample_count: usize,
}

/// All-time pooled mean of one location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationMean {
    pub location: String,
    pub mean_value: f64,
    pub sample_count: usize,
}
