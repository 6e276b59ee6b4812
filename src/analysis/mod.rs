//! Analysis module
//!
//! Turns raw daily series into comparative statistics:
//! - Observation store with de-duplication and null filtering
//! - Yearly aggregation per location and pooled across locations
//! - Linear trend of the global yearly series
//! - Early/late period comparison
//! - Location ranking by all-time mean

pub mod aggregate;
pub mod period;
pub mod ranking;
pub mod store;
pub mod trend;

// Re-export commonly used types from submodules
pub use aggregate::{LocationYearly, TemporalAggregator, YearlySeries};
pub use period::{PeriodComparator, PeriodComparison, PeriodWindow};
pub use ranking::{RankedLocation, Ranking, RankingBuilder};
pub use store::{IngestStats, ObservationStore};
pub use trend::{TrendClassification, TrendEstimator, TrendResult};
