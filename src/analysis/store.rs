//! In-memory observation store
//!
//! Holds the cleaned daily observations of every location together with the
//! ordered registry of locations. Missing values and unparseable dates are
//! dropped on ingestion, and a repeated (location, date) pair keeps the value
//! that arrived first.

use crate::models::{Observation, RawReading};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, trace};

/// Running ingestion counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestStats {
    /// Observations accepted into the store
    pub ingested: usize,
    /// Entries whose value was missing or not a finite number
    pub dropped_missing: usize,
    /// Entries with a value but a date that could not be parsed
    pub dropped_malformed_date: usize,
    /// Repeated (location, date) pairs
    pub dropped_duplicate: usize,
}

impl IngestStats {
    /// Total number of entries rejected for any reason
    #[must_use]
    pub fn dropped(&self) -> usize {
        self.dropped_missing + self.dropped_malformed_date + self.dropped_duplicate
    }

    fn absorb(&mut self, other: &IngestStats) {
        self.ingested += other.ingested;
        self.dropped_missing += other.dropped_missing;
        self.dropped_malformed_date += other.dropped_malformed_date;
        self.dropped_duplicate += other.dropped_duplicate;
    }
}

#[derive(Debug, Clone, Default)]
pub struct ObservationStore {
    /// Registered locations, in registration order
    locations: Vec<String>,
    observations: Vec<Observation>,
    /// (location index, date) pairs already present
    seen: HashSet<(usize, NaiveDate)>,
    stats: IngestStats,
}

impl ObservationStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a location, returning its position in the registry.
    /// Registering a known location is a no-op.
    pub fn register(&mut self, location: &str) -> usize {
        if let Some(index) = self.location_index(location) {
            return index;
        }
        self.locations.push(location.to_string());
        self.locations.len() - 1
    }

    /// Ingest a batch of raw readings for one location.
    ///
    /// Returns the counters for this batch only; the store keeps the running
    /// totals available through [`ObservationStore::stats`].
    pub fn ingest<I>(&mut self, location: &str, readings: I) -> IngestStats
    where
        I: IntoIterator<Item = RawReading>,
    {
        let index = self.register(location);
        let mut batch = IngestStats::default();

        for reading in readings {
            let value = match reading.value {
                Some(value) if value.is_finite() => value,
                _ => {
                    batch.dropped_missing += 1;
                    continue;
                }
            };

            let Some(date) = parse_observation_date(&reading.date) else {
                trace!(location, date = %reading.date, "Dropping reading with malformed date");
                batch.dropped_malformed_date += 1;
                continue;
            };

            if !self.seen.insert((index, date)) {
                batch.dropped_duplicate += 1;
                continue;
            }

            self.observations.push(Observation {
                location: location.to_string(),
                date,
                value,
            });
            batch.ingested += 1;
        }

        debug!(
            location,
            ingested = batch.ingested,
            dropped = batch.dropped(),
            "Ingested batch"
        );

        self.stats.absorb(&batch);
        batch
    }

    /// Every cleaned observation, in ingestion order
    #[must_use]
    pub fn all(&self) -> &[Observation] {
        &self.observations
    }

    /// Registered locations, in registration order
    #[must_use]
    pub fn locations(&self) -> &[String] {
        &self.locations
    }

    #[must_use]
    pub fn location_index(&self, location: &str) -> Option<usize> {
        self.locations.iter().position(|name| name == location)
    }

    #[must_use]
    pub fn stats(&self) -> IngestStats {
        self.stats
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

/// Parse the date of a daily reading: `YYYY-MM-DD`, optionally followed by `THH:MM`.
#[must_use]
pub fn parse_observation_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M")
                .ok()
                .map(|dt| dt.date())
        })
}
