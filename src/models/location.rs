//! Location model for the monitored points and their coordinates

use crate::error::ClimateError;
use serde::{Deserialize, Serialize};

/// A named geographic point whose daily series is analysed
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Location {
    /// Location name, also the identifier used for grouping
    pub name: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Location {
    /// Create a new location
    #[must_use]
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
        }
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }

    /// Check the name and coordinate ranges
    pub fn validate(&self) -> crate::Result<()> {
        if self.name.trim().is_empty() {
            return Err(ClimateError::validation("Location name cannot be empty"));
        }

        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(ClimateError::validation(format!(
                "Latitude of {} must be between -90 and 90, got: {}",
                self.name, self.latitude
            )));
        }

        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(ClimateError::validation(format!(
                "Longitude of {} must be between -180 and 180, got: {}",
                self.name, self.longitude
            )));
        }

        Ok(())
    }

    /// Parse a command-line location of the form `NAME:LAT,LON`
    pub fn parse(input: &str) -> crate::Result<Self> {
        let (name, coords) = input.rsplit_once(':').ok_or_else(|| {
            ClimateError::validation(format!("Location must be in format 'NAME:LAT,LON', got: {input}"))
        })?;

        let parts: Vec<&str> = coords
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .collect();

        if parts.len() != 2 {
            return Err(ClimateError::validation(
                "Coordinates must be in format 'lat,lon'",
            ));
        }

        let latitude = parts[0]
            .parse::<f64>()
            .map_err(|_| ClimateError::validation(format!("Invalid latitude: {}", parts[0])))?;
        let longitude = parts[1]
            .parse::<f64>()
            .map_err(|_| ClimateError::validation(format!("Invalid longitude: {}", parts[1])))?;

        let location = Self::new(name.trim(), latitude, longitude);
        location.validate()?;
        Ok(location)
    }
}
