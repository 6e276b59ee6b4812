//! Location ranking by all-time mean temperature

use crate::error::ClimateError;
use crate::models::LocationMean;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedLocation {
    pub location: String,
    pub mean_value: f64,
}

/// Locations ordered by mean, warmest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    entries: Vec<RankedLocation>,
}

impl Ranking {
    #[must_use]
    pub fn entries(&self) -> &[RankedLocation] {
        &self.entries
    }

    #[must_use]
    pub fn warmest(&self) -> Option<&RankedLocation> {
        self.entries.first()
    }

    #[must_use]
    pub fn coldest(&self) -> Option<&RankedLocation> {
        self.entries.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub struct RankingBuilder;

impl RankingBuilder {
    /// Sort location means descending.
    ///
    /// `means` must be in registration order: the sort is stable, so equal
    /// means keep that order.
    pub fn build(means: &[LocationMean]) -> crate::Result<Ranking> {
        if means.is_empty() {
            return Err(ClimateError::EmptyInput);
        }

        let mut entries: Vec<RankedLocation> = means
            .iter()
            .map(|mean| RankedLocation {
                location: mean.location.clone(),
                mean_value: mean.mean_value,
            })
            .collect();
        entries.sort_by(|a, b| {
            b.mean_value
                .partial_cmp(&a.mean_value)
                .unwrap_or(Ordering::Equal)
        });

        Ok(Ranking { entries })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mean(location: &str, mean_value: f64) -> LocationMean {
        LocationMean {
            location: location.to_string(),
            mean_value,
            sample_count: 1,
        }
    }

    #[test]
    fn test_ranking_descending_with_stable_ties() {
        let means = [mean("A", 10.0), mean("B", 20.0), mean("C", 10.0)];
        let ranking = RankingBuilder::build(&means).unwrap();

        let order: Vec<&str> = ranking
            .entries()
            .iter()
            .map(|entry| entry.location.as_str())
            .collect();
        assert_eq!(order, ["B", "A", "C"]);
        assert_eq!(ranking.warmest().unwrap().location, "B");
        assert_eq!(ranking.coldest().unwrap().location, "C");
    }

    #[test]
    fn test_tie_order_follows_registration() {
        let means = [mean("C", 10.0), mean("A", 10.0)];
        let ranking = RankingBuilder::build(&means).unwrap();
        assert_eq!(ranking.entries()[0].location, "C");
        assert_eq!(ranking.entries()[1].location, "A");
    }

    #[test]
    fn test_negative_means() {
        let means = [mean("Oslo", -2.5), mean("Cairo", 22.0), mean("Yakutsk", -8.0)];
        let ranking = RankingBuilder::build(&means).unwrap();
        let values: Vec<f64> = ranking.entries().iter().map(|e| e.mean_value).collect();
        assert_eq!(values, [22.0, -2.5, -8.0]);
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(
            RankingBuilder::build(&[]),
            Err(ClimateError::EmptyInput)
        ));
    }
}
