//! Linear trend of the global yearly-mean series
//!
//! Ordinary least squares on `value = slope * year + intercept`. Sums are
//! taken around the mean year and mean value, which keeps the slope exact for
//! perfectly linear input even with four-digit years.

use super::aggregate::YearlySeries;
use crate::error::ClimateError;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Direction of the fitted trend. Only a strictly positive slope is warming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendClassification {
    Warming,
    CoolingOrFlat,
}

impl TrendClassification {
    #[must_use]
    pub fn from_slope(slope: f64) -> Self {
        if slope > 0.0 {
            TrendClassification::Warming
        } else {
            TrendClassification::CoolingOrFlat
        }
    }
}

impl fmt::Display for TrendClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendClassification::Warming => write!(f, "WARMING"),
            TrendClassification::CoolingOrFlat => write!(f, "COOLING"),
        }
    }
}

/// Fitted first-degree polynomial
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendResult {
    /// Change per year, in °C/year
    pub slope: f64,
    pub intercept: f64,
    /// Years used in the fit, ascending
    pub years: Vec<i32>,
}

impl TrendResult {
    /// Value of the fitted line at `year`
    #[must_use]
    pub fn predict(&self, year: i32) -> f64 {
        self.slope * f64::from(year) + self.intercept
    }

    /// Fitted value for every year of the input series
    #[must_use]
    pub fn fitted_series(&self) -> Vec<(i32, f64)> {
        self.years
            .iter()
            .map(|&year| (year, self.predict(year)))
            .collect()
    }

    #[must_use]
    pub fn classification(&self) -> TrendClassification {
        TrendClassification::from_slope(self.slope)
    }
}

pub struct TrendEstimator;

impl TrendEstimator {
    /// Fit the trend line to a yearly series
    pub fn fit(series: &YearlySeries) -> crate::Result<TrendResult> {
        let points: Vec<(i32, f64)> = series
            .values()
            .map(|mean| (mean.year, mean.mean_value))
            .collect();
        Self::fit_points(&points)
    }

    /// Fit the trend line to `(year, value)` points.
    ///
    /// Points are sorted by year first. Needs at least two distinct years.
    pub fn fit_points(points: &[(i32, f64)]) -> crate::Result<TrendResult> {
        let mut points = points.to_vec();
        points.sort_by_key(|&(year, _)| year);

        let mut years: Vec<i32> = points.iter().map(|&(year, _)| year).collect();
        years.dedup();
        if years.len() < 2 {
            return Err(ClimateError::InsufficientData {
                distinct_years: years.len(),
            });
        }

        let n = points.len() as f64;
        let mean_x = points.iter().map(|&(x, _)| f64::from(x)).sum::<f64>() / n;
        let mean_y = points.iter().map(|&(_, y)| y).sum::<f64>() / n;

        let (sxx, sxy) = points.iter().fold((0.0, 0.0), |(sxx, sxy), &(x, y)| {
            let dx = f64::from(x) - mean_x;
            (sxx + dx * dx, sxy + dx * (y - mean_y))
        });

        if sxx == 0.0 {
            return Err(ClimateError::InsufficientData {
                distinct_years: years.len(),
            });
        }

        let slope = sxy / sxx;
        let intercept = mean_y - slope * mean_x;

        debug!(slope, intercept, years = years.len(), "Fitted yearly trend");

        Ok(TrendResult {
            slope,
            intercept,
            years,
        })
    }
}
