//! Configuration management for `climatrend`
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::ClimateError;
use crate::models::Location;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClimateConfig {
    /// Archive API configuration
    #[serde(default)]
    pub archive: ArchiveConfig,
    /// Analysis window and boundary
    #[serde(default)]
    pub analysis: AnalysisConfig,
    /// Locations to analyse, in the order they are registered
    #[serde(default = "default_locations")]
    pub locations: Vec<Location>,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// Historical weather archive settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Archive endpoint URL
    #[serde(default = "default_archive_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_archive_timeout")]
    pub timeout_seconds: u32,
    /// Maximum number of retries for failed requests
    #[serde(default = "default_archive_max_retries")]
    pub max_retries: u32,
    /// Courtesy pause between two location requests, in milliseconds
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// First day of the analysed range
    #[serde(default = "default_start_date")]
    pub start_date: NaiveDate,
    /// Last day of the analysed range (inclusive)
    #[serde(default = "default_end_date")]
    pub end_date: NaiveDate,
    /// Last year of the early period; midpoint of the observed range when unset
    #[serde(default)]
    pub boundary_year: Option<i32>,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Where to write the chart data JSON, if anywhere
    #[serde(default)]
    pub chart_data_path: Option<PathBuf>,
}

// Default value functions
fn default_archive_base_url() -> String {
    "https://archive-api.open-meteo.com/v1/archive".to_string()
}

fn default_archive_timeout() -> u32 {
    30
}

fn default_archive_max_retries() -> u32 {
    3
}

fn default_request_delay_ms() -> u64 {
    500
}

fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2014, 1, 1).unwrap_or_default()
}

fn default_end_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 12, 31).unwrap_or_default()
}

fn default_locations() -> Vec<Location> {
    vec![
        Location::new("São Paulo", -23.5505, -46.6333),
        Location::new("New York", 40.7128, -74.0060),
        Location::new("London", 51.5074, -0.1278),
    ]
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            base_url: default_archive_base_url(),
            timeout_seconds: default_archive_timeout(),
            max_retries: default_archive_max_retries(),
            request_delay_ms: default_request_delay_ms(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            start_date: default_start_date(),
            end_date: default_end_date(),
            boundary_year: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for ClimateConfig {
    fn default() -> Self {
        Self {
            archive: ArchiveConfig::default(),
            analysis: AnalysisConfig::default(),
            locations: default_locations(),
            logging: LoggingConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl ClimateConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. CLIMATREND_ARCHIVE__MAX_RETRIES=0
        builder = builder.add_source(
            Environment::with_prefix("CLIMATREND")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: ClimateConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("climatrend").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.archive.base_url.is_empty() {
            self.archive.base_url = default_archive_base_url();
        }
        if self.archive.timeout_seconds == 0 {
            self.archive.timeout_seconds = default_archive_timeout();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_locations()?;
        self.validate_date_range()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate the location list: non-empty, unique names, coordinates in range
    fn validate_locations(&self) -> Result<()> {
        if self.locations.is_empty() {
            return Err(ClimateError::config("At least one location must be configured").into());
        }

        let mut names = HashSet::new();
        for location in &self.locations {
            location.validate()?;
            if !names.insert(location.name.as_str()) {
                return Err(ClimateError::config(format!(
                    "Duplicate location name '{}'",
                    location.name
                ))
                .into());
            }
        }

        Ok(())
    }

    fn validate_date_range(&self) -> Result<()> {
        if self.analysis.start_date > self.analysis.end_date {
            return Err(ClimateError::config(format!(
                "Start date {} is after end date {}",
                self.analysis.start_date, self.analysis.end_date
            ))
            .into());
        }
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.archive.timeout_seconds > 300 {
            return Err(
                ClimateError::config("Archive API timeout cannot exceed 300 seconds").into(),
            );
        }

        if self.archive.max_retries > 10 {
            return Err(ClimateError::config("Archive API max retries cannot exceed 10").into());
        }

        if self.archive.request_delay_ms > 60_000 {
            return Err(
                ClimateError::config("Request delay cannot exceed 60000 milliseconds").into(),
            );
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(ClimateError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(ClimateError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if !self.archive.base_url.starts_with("http://")
            && !self.archive.base_url.starts_with("https://")
        {
            return Err(ClimateError::config(
                "Archive API base URL must be a valid HTTP or HTTPS URL",
            )
            .into());
        }

        Ok(())
    }
}
