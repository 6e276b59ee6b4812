//! End-to-end analysis pipeline
//!
//! Fetch outcomes are folded into an [`ObservationStore`]; the store is then
//! reduced into an [`AnalysisReport`]. Stage failures that only affect one
//! result (too few years for a trend, an empty period) mark that result
//! unavailable. Having no usable observation at all is fatal.

use crate::analysis::{
    IngestStats, LocationYearly, ObservationStore, PeriodComparator, PeriodComparison, Ranking,
    RankingBuilder, TemporalAggregator, TrendEstimator, TrendResult, YearlySeries,
};
use crate::archive::{DateRange, LocationFetch, ObservationSource, fetch_all};
use crate::error::{ClimateError, FetchFailure};
use crate::models::{Location, LocationMean};
use std::time::Duration;
use tracing::{error, info, instrument, warn};

/// A result that may have been degraded by a non-fatal stage failure
#[derive(Debug, Clone, PartialEq)]
pub enum Availability<T> {
    Available(T),
    Unavailable { reason: String },
}

impl<T> Availability<T> {
    /// Degrade a stage result, logging the failure under `stage`
    fn from_stage(stage: &str, result: crate::Result<T>) -> Self {
        match result {
            Ok(value) => Availability::Available(value),
            Err(err) => {
                warn!(stage, "{} unavailable: {}", stage, err);
                Availability::Unavailable {
                    reason: err.to_string(),
                }
            }
        }
    }

    #[must_use]
    pub fn as_available(&self) -> Option<&T> {
        match self {
            Availability::Available(value) => Some(value),
            Availability::Unavailable { .. } => None,
        }
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available(_))
    }
}

/// Which locations were collected and which failed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestionReport {
    /// Locations whose fetch succeeded, with the number of raw records received
    pub collected: Vec<(String, usize)>,
    /// Locations whose fetch failed, with the cause
    pub failed: Vec<(String, FetchFailure)>,
    pub stats: IngestStats,
}

impl IngestionReport {
    #[must_use]
    pub fn total_locations(&self) -> usize {
        self.collected.len() + self.failed.len()
    }
}

/// Every result derived from one store
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    pub per_location_yearly: LocationYearly,
    pub global_yearly: YearlySeries,
    /// All-time means in registration order
    pub location_means: Vec<LocationMean>,
    pub trend: Availability<TrendResult>,
    pub period: Availability<PeriodComparison>,
    pub ranking: Ranking,
}

/// Fold fetch outcomes into a store, in the order they were fetched.
///
/// Fails with [`ClimateError::NoDataAvailable`] when no location yields a
/// single usable observation.
pub fn build_store(
    outcomes: Vec<LocationFetch>,
) -> crate::Result<(ObservationStore, IngestionReport)> {
    let mut store = ObservationStore::new();
    let mut report = IngestionReport::default();

    for outcome in outcomes {
        match outcome.result {
            Ok(readings) => {
                let received = readings.len();
                store.ingest(&outcome.location.name, readings);
                report.collected.push((outcome.location.name, received));
            }
            Err(failure) => {
                let err = ClimateError::fetch(outcome.location.name.clone(), failure.clone());
                warn!("{}", err);
                report.failed.push((outcome.location.name, failure));
            }
        }
    }

    report.stats = store.stats();
    info!(
        "Ingestion finished: {}/{} locations collected, {} observations kept, {} dropped",
        report.collected.len(),
        report.total_locations(),
        report.stats.ingested,
        report.stats.dropped()
    );

    if store.is_empty() {
        let message = if report.collected.is_empty() {
            format!("all {} location fetches failed", report.failed.len())
        } else {
            "collected series contained no usable values".to_string()
        };
        error!("No data available: {}", message);
        return Err(ClimateError::no_data(message));
    }

    Ok((store, report))
}

/// Derive every statistic from a populated store
#[instrument(skip(store), fields(observations = store.len()))]
pub fn analyze(
    store: &ObservationStore,
    boundary_year: Option<i32>,
) -> crate::Result<AnalysisReport> {
    let aggregator = TemporalAggregator::new(store);
    let per_location_yearly = aggregator.per_location_yearly();
    let global_yearly = aggregator.global_yearly();
    let location_means = aggregator.location_means();

    info!(
        "Aggregated {} location-years and {} global years",
        per_location_yearly.len(),
        global_yearly.len()
    );

    let ranking = RankingBuilder::build(&location_means)?;
    let trend = Availability::from_stage("trend", TrendEstimator::fit(&global_yearly));
    let period = Availability::from_stage(
        "period comparison",
        PeriodComparator::compare(store.all(), boundary_year),
    );

    Ok(AnalysisReport {
        per_location_yearly,
        global_yearly,
        location_means,
        trend,
        period,
        ranking,
    })
}

/// What one full run needs besides the data source
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub locations: Vec<Location>,
    pub range: DateRange,
    pub boundary_year: Option<i32>,
    /// Pause between two location requests
    pub request_delay: Duration,
}

/// Result of a complete run
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub ingestion: IngestionReport,
    pub analysis: AnalysisReport,
}

/// Fetch, clean and analyse in one go
pub fn run<S: ObservationSource + ?Sized>(
    source: &mut S,
    options: &PipelineOptions,
) -> crate::Result<PipelineOutput> {
    let outcomes = fetch_all(
        source,
        &options.locations,
        &options.range,
        options.request_delay,
    );
    let (store, ingestion) = build_store(outcomes)?;
    let analysis = analyze(&store, options.boundary_year)?;

    Ok(PipelineOutput {
        ingestion,
        analysis,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawReading;

    fn fetched(name: &str, readings: Vec<RawReading>) -> LocationFetch {
        LocationFetch {
            location: Location::new(name, 0.0, 0.0),
            result: Ok(readings),
        }
    }

    fn failed(name: &str, failure: FetchFailure) -> LocationFetch {
        LocationFetch {
            location: Location::new(name, 0.0, 0.0),
            result: Err(failure),
        }
    }

    #[test]
    fn test_build_store_skips_failed_locations() {
        let outcomes = vec![
            failed("A", FetchFailure::Network("refused".into())),
            fetched("B", vec![RawReading::new("2020-01-01", Some(3.0))]),
        ];

        let (store, report) = build_store(outcomes).unwrap();
        assert_eq!(store.locations(), ["B"]);
        assert_eq!(report.collected, vec![("B".to_string(), 1)]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.total_locations(), 2);
    }

    #[test]
    fn test_build_store_all_failed_is_fatal() {
        let outcomes = vec![
            failed("A", FetchFailure::HttpStatus(500)),
            failed("B", FetchFailure::EmptyPayload),
        ];
        let err = build_store(outcomes).unwrap_err();
        assert!(matches!(err, ClimateError::NoDataAvailable { .. }));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_build_store_only_nulls_is_fatal() {
        let outcomes = vec![fetched("A", vec![RawReading::new("2020-01-01", None)])];
        let err = build_store(outcomes).unwrap_err();
        assert!(err.to_string().contains("no usable values"));
    }

    #[test]
    fn test_single_year_degrades_trend_and_period() {
        let outcomes = vec![fetched(
            "A",
            vec![
                RawReading::new("2020-01-01", Some(3.0)),
                RawReading::new("2020-02-01", Some(5.0)),
            ],
        )];
        let (store, _) = build_store(outcomes).unwrap();
        let report = analyze(&store, None).unwrap();

        assert!(!report.trend.is_available());
        assert!(!report.period.is_available());
        assert_eq!(report.ranking.len(), 1);
        assert_eq!(report.location_means[0].mean_value, 4.0);
        match &report.trend {
            Availability::Unavailable { reason } => assert!(reason.contains("Insufficient")),
            Availability::Available(_) => panic!("trend should be unavailable"),
        }
    }

    #[test]
    fn test_analyze_twice_is_identical() {
        let readings: Vec<RawReading> = (2014..=2023)
            .map(|year| RawReading::new(format!("{year}-06-15"), Some(f64::from(year) * 0.01)))
            .collect();
        let (store, _) = build_store(vec![fetched("A", readings)]).unwrap();

        let first = analyze(&store, Some(2018)).unwrap();
        let second = analyze(&store, Some(2018)).unwrap();
        assert_eq!(first, second);

        let (a, b) = (
            first.trend.as_available().unwrap(),
            second.trend.as_available().unwrap(),
        );
        assert_eq!(a.slope.to_bits(), b.slope.to_bits());
        assert_eq!(a.intercept.to_bits(), b.intercept.to_bits());
    }
}
