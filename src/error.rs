//! Error types and handling for the `climatrend` pipeline

use thiserror::Error;

/// Why a single location's fetch did not produce usable data.
///
/// Fetch failures are isolated per location: they are logged, recorded in the
/// ingestion report and never abort the run on their own.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    /// Transport-level failure (DNS, connection refused, timeout)
    #[error("network error: {0}")]
    Network(String),

    /// Non-2xx response from the archive service
    #[error("HTTP status {0}")]
    HttpStatus(u16),

    /// The response body could not be decoded into a daily series
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The response decoded fine but contained no daily entries
    #[error("empty payload")]
    EmptyPayload,
}

/// Main error type for the `climatrend` pipeline
#[derive(Error, Debug)]
pub enum ClimateError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Per-location fetch failure (non-fatal)
    #[error("Fetch failed for {location}: {source}")]
    Fetch {
        location: String,
        #[source]
        source: FetchFailure,
    },

    /// No location produced a single usable observation (fatal)
    #[error("No data available: {message}")]
    NoDataAvailable { message: String },

    /// The trend fit needs at least two distinct years
    #[error("Insufficient data for trend: {distinct_years} distinct year(s), at least 2 required")]
    InsufficientData { distinct_years: usize },

    /// One side of the period boundary holds no observations
    #[error("Empty partition at boundary year {boundary_year}: {side} period has no observations")]
    EmptyPartition {
        boundary_year: i32,
        side: PartitionSide,
    },

    /// The ranking has no location to rank (fatal)
    #[error("Empty input: no location has any observations")]
    EmptyInput,

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Serialization errors while exporting results
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
}

/// Which side of a period boundary an [`ClimateError::EmptyPartition`] refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartitionSide {
    Early,
    Late,
}

impl std::fmt::Display for PartitionSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PartitionSide::Early => write!(f, "early"),
            PartitionSide::Late => write!(f, "late"),
        }
    }
}

impl ClimateError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new per-location fetch error
    pub fn fetch<S: Into<String>>(location: S, source: FetchFailure) -> Self {
        Self::Fetch {
            location: location.into(),
            source,
        }
    }

    /// Create a new "no data" error
    pub fn no_data<S: Into<String>>(message: S) -> Self {
        Self::NoDataAvailable {
            message: message.into(),
        }
    }

    /// Whether this error ends the run instead of degrading a single result
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            ClimateError::Fetch { .. }
                | ClimateError::InsufficientData { .. }
                | ClimateError::EmptyPartition { .. }
        )
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            ClimateError::Config { .. } => {
                "Configuration error. Please check your config file and location list.".to_string()
            }
            ClimateError::Validation { message } => format!("Invalid input: {message}"),
            ClimateError::Fetch { location, source } => {
                format!("Could not collect data for {location}: {source}")
            }
            ClimateError::NoDataAvailable { .. } | ClimateError::EmptyInput => {
                "No data was collected for any location. Nothing to analyse.".to_string()
            }
            ClimateError::InsufficientData { .. } => {
                "Not enough years of data to estimate a trend.".to_string()
            }
            ClimateError::EmptyPartition { boundary_year, side } => {
                format!("No observations in the {side} period around {boundary_year}.")
            }
            ClimateError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
            ClimateError::Serialization { .. } => "Could not serialize results.".to_string(),
        }
    }
}
