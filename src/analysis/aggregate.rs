//! Temporal aggregation of daily observations into yearly means
//!
//! Two views are produced from the same store: one grouped by (location,
//! year) and one grouped by year alone. The global view is a pooled mean of
//! every daily value in the year, not a mean of the per-location means, so a
//! location with more samples weighs more.

use super::store::ObservationStore;
use crate::models::{LocationMean, Scope, YearlyMean};
use std::collections::BTreeMap;

/// Running sum for an arithmetic mean
#[derive(Debug, Clone, Copy, Default)]
struct MeanAccumulator {
    sum: f64,
    count: usize,
}

impl MeanAccumulator {
    fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn mean(&self) -> f64 {
        self.sum / self.count as f64
    }
}

/// Yearly means of one location, keyed by year
pub type YearlySeries = BTreeMap<i32, YearlyMean>;

/// `(location, year) → YearlyMean`, locations kept in registration order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationYearly {
    series: Vec<(String, YearlySeries)>,
}

impl LocationYearly {
    #[must_use]
    pub fn get(&self, location: &str, year: i32) -> Option<&YearlyMean> {
        self.series(location).and_then(|series| series.get(&year))
    }

    #[must_use]
    pub fn series(&self, location: &str) -> Option<&YearlySeries> {
        self.series
            .iter()
            .find(|(name, _)| name == location)
            .map(|(_, series)| series)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &YearlySeries)> {
        self.series
            .iter()
            .map(|(name, series)| (name.as_str(), series))
    }

    /// Number of (location, year) entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.series.iter().map(|(_, series)| series.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Groups the observations of a store by calendar year
pub struct TemporalAggregator<'a> {
    store: &'a ObservationStore,
}

impl<'a> TemporalAggregator<'a> {
    #[must_use]
    pub fn new(store: &'a ObservationStore) -> Self {
        Self { store }
    }

    /// Mean of each location's observations per calendar year.
    ///
    /// A location-year without observations is absent; locations without any
    /// observation are absent as well.
    #[must_use]
    pub fn per_location_yearly(&self) -> LocationYearly {
        let mut grouped: Vec<BTreeMap<i32, MeanAccumulator>> =
            vec![BTreeMap::new(); self.store.locations().len()];

        for observation in self.store.all() {
            if let Some(index) = self.store.location_index(&observation.location) {
                grouped[index]
                    .entry(observation.year())
                    .or_default()
                    .push(observation.value);
            }
        }

        let series = self
            .store
            .locations()
            .iter()
            .zip(grouped)
            .filter(|(_, years)| !years.is_empty())
            .map(|(location, years)| {
                let series = years
                    .into_iter()
                    .map(|(year, acc)| {
                        let mean = YearlyMean {
                            scope: Scope::Location(location.clone()),
                            year,
                            mean_value: acc.mean(),
                            sample_count: acc.count,
                        };
                        (year, mean)
                    })
                    .collect();
                (location.clone(), series)
            })
            .collect();

        LocationYearly { series }
    }

    /// Pooled mean of every observation, across all locations, per calendar year
    #[must_use]
    pub fn global_yearly(&self) -> YearlySeries {
        let mut grouped: BTreeMap<i32, MeanAccumulator> = BTreeMap::new();
        for observation in self.store.all() {
            grouped
                .entry(observation.year())
                .or_default()
                .push(observation.value);
        }

        grouped
            .into_iter()
            .map(|(year, acc)| {
                let mean = YearlyMean {
                    scope: Scope::AllLocations,
                    year,
                    mean_value: acc.mean(),
                    sample_count: acc.count,
                };
                (year, mean)
            })
            .collect()
    }

    /// All-time pooled mean per location, in registration order.
    /// Locations without observations are skipped.
    #[must_use]
    pub fn location_means(&self) -> Vec<LocationMean> {
        let mut grouped = vec![MeanAccumulator::default(); self.store.locations().len()];
        for observation in self.store.all() {
            if let Some(index) = self.store.location_index(&observation.location) {
                grouped[index].push(observation.value);
            }
        }

        self.store
            .locations()
            .iter()
            .zip(grouped)
            .filter(|(_, acc)| acc.count > 0)
            .map(|(location, acc)| LocationMean {
                location: location.clone(),
                mean_value: acc.mean(),
                sample_count: acc.count,
            })
            .collect()
    }

    /// First and last observed year
    #[must_use]
    pub fn year_range(&self) -> Option<(i32, i32)> {
        let mut years = self.store.all().iter().map(|o| o.year());
        let first = years.next()?;
        Some(years.fold((first, first), |(lo, hi), year| (lo.min(year), hi.max(year))))
    }
}
