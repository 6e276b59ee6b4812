//! Chart-ready series for an external renderer
//!
//! Rendering itself lives outside this crate. This module only flattens an
//! [`AnalysisReport`] into the four series a renderer draws and writes them
//! as JSON.

use crate::pipeline::AnalysisReport;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub year: i32,
    pub value: f64,
}

/// Yearly means of one location
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationSeries {
    pub location: String,
    pub points: Vec<Point>,
}

/// Global yearly means with the fitted trend line when one exists
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlobalSeries {
    pub points: Vec<Point>,
    pub trend: Option<Vec<Point>>,
    pub slope: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    /// Location order is registration order, so legend order is stable
    pub locations: Vec<LocationSeries>,
    pub global: GlobalSeries,
    /// Early and late bars, absent when the comparison is unavailable
    pub periods: Option<[Bar; 2]>,
    /// Warmest first
    pub ranking: Vec<Bar>,
}

impl ChartData {
    #[must_use]
    pub fn from_report(report: &AnalysisReport) -> Self {
        let locations = report
            .per_location_yearly
            .iter()
            .map(|(location, series)| LocationSeries {
                location: location.to_string(),
                points: series
                    .values()
                    .map(|mean| Point {
                        year: mean.year,
                        value: mean.mean_value,
                    })
                    .collect(),
            })
            .collect();

        let trend = report.trend.as_available();
        let global = GlobalSeries {
            points: report
                .global_yearly
                .values()
                .map(|mean| Point {
                    year: mean.year,
                    value: mean.mean_value,
                })
                .collect(),
            trend: trend.map(|trend| {
                trend
                    .fitted_series()
                    .into_iter()
                    .map(|(year, value)| Point { year, value })
                    .collect()
            }),
            slope: trend.map(|trend| trend.slope),
        };

        let periods = report.period.as_available().map(|comparison| {
            [
                Bar {
                    label: comparison.early.label(),
                    value: comparison.early_mean(),
                },
                Bar {
                    label: comparison.late.label(),
                    value: comparison.late_mean(),
                },
            ]
        });

        let ranking = report
            .ranking
            .entries()
            .iter()
            .map(|entry| Bar {
                label: entry.location.clone(),
                value: entry.mean_value,
            })
            .collect();

        Self {
            locations,
            global,
            periods,
            ranking,
        }
    }

    /// Write the chart data as pretty-printed JSON
    pub fn write_json(&self, path: &Path) -> crate::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        info!("Chart data written to {}", path.display());
        Ok(())
    }
}
