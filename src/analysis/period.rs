//! Early/late period comparison around a boundary year

use crate::error::{ClimateError, PartitionSide};
use crate::models::Observation;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Pooled statistics of the observations on one side of the boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodWindow {
    /// First observed year in the window
    pub first_year: i32,
    /// Last observed year in the window
    pub last_year: i32,
    pub mean_value: f64,
    pub sample_count: usize,
}

impl PeriodWindow {
    /// Label such as `2014-2018`, or a single year when the window spans one
    #[must_use]
    pub fn label(&self) -> String {
        if self.first_year == self.last_year {
            self.first_year.to_string()
        } else {
            format!("{}-{}", self.first_year, self.last_year)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodComparison {
    pub boundary_year: i32,
    /// Years `<= boundary_year`
    pub early: PeriodWindow,
    /// Years `> boundary_year`
    pub late: PeriodWindow,
    /// `late.mean_value - early.mean_value`
    pub delta: f64,
}

impl PeriodComparison {
    #[must_use]
    pub fn early_mean(&self) -> f64 {
        self.early.mean_value
    }

    #[must_use]
    pub fn late_mean(&self) -> f64 {
        self.late.mean_value
    }
}

#[derive(Debug, Default)]
struct WindowAccumulator {
    sum: f64,
    count: usize,
    first_year: i32,
    last_year: i32,
}

impl WindowAccumulator {
    fn push(&mut self, year: i32, value: f64) {
        if self.count == 0 {
            self.first_year = year;
            self.last_year = year;
        } else {
            self.first_year = self.first_year.min(year);
            self.last_year = self.last_year.max(year);
        }
        self.sum += value;
        self.count += 1;
    }

    fn finish(self, boundary_year: i32, side: PartitionSide) -> crate::Result<PeriodWindow> {
        if self.count == 0 {
            return Err(ClimateError::EmptyPartition {
                boundary_year,
                side,
            });
        }
        Ok(PeriodWindow {
            first_year: self.first_year,
            last_year: self.last_year,
            mean_value: self.sum / self.count as f64,
            sample_count: self.count,
        })
    }
}

pub struct PeriodComparator;

impl PeriodComparator {
    /// Midpoint of the observed year range, rounded down
    #[must_use]
    pub fn default_boundary(observations: &[Observation]) -> Option<i32> {
        let mut years = observations.iter().map(Observation::year);
        let first = years.next()?;
        let (lo, hi) = years.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y)));
        Some((lo + hi).div_euclid(2))
    }

    /// Compare the pooled means before and after `boundary_year`.
    ///
    /// Without an explicit boundary the midpoint of the observed range is used.
    pub fn compare(
        observations: &[Observation],
        boundary_year: Option<i32>,
    ) -> crate::Result<PeriodComparison> {
        let Some(boundary_year) = boundary_year.or_else(|| Self::default_boundary(observations))
        else {
            return Err(ClimateError::EmptyPartition {
                boundary_year: 0,
                side: PartitionSide::Early,
            });
        };

        let mut early = WindowAccumulator::default();
        let mut late = WindowAccumulator::default();
        for observation in observations {
            let year = observation.year();
            if year <= boundary_year {
                early.push(year, observation.value);
            } else {
                late.push(year, observation.value);
            }
        }

        let early = early.finish(boundary_year, PartitionSide::Early)?;
        let late = late.finish(boundary_year, PartitionSide::Late)?;
        let delta = late.mean_value - early.mean_value;

        debug!(
            boundary_year,
            early = early.mean_value,
            late = late.mean_value,
            delta,
            "Compared periods"
        );

        Ok(PeriodComparison {
            boundary_year,
            early,
            late,
            delta,
        })
    }
}
