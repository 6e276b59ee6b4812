//! Data models for the climatrend pipeline
//!
//! This module contains the core domain models organized by concern:
//! - Location: Named points and their coordinates
//! - Observation: Raw readings, cleaned daily values and yearly aggregates

pub mod location;
pub mod observation;

// Re-export all public types for convenient access
pub use location::Location;
pub use observation::{LocationMean, Observation, RawReading, Scope, YearlyMean};
