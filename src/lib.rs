//! `climatrend` - yearly temperature aggregation and trend analysis
//!
//! This library turns daily mean-temperature series of a fixed set of
//! locations into yearly summaries, a global linear trend, an early/late
//! period comparison and a ranking of locations.

pub mod analysis;
pub mod archive;
pub mod chart_data;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod report;

// Re-export core types for public API
pub use analysis::{
    ObservationStore, PeriodComparator, RankingBuilder, TemporalAggregator, TrendEstimator,
};
pub use archive::{ArchiveClient, DateRange, ObservationSource};
pub use chart_data::ChartData;
pub use config::ClimateConfig;
pub use error::{ClimateError, FetchFailure};
pub use models::{Location, Observation, RawReading, YearlyMean};
pub use pipeline::{AnalysisReport, Availability, PipelineOptions, PipelineOutput};
pub use report::ReportComposer;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, ClimateError>;
