//! Integration tests for the climatrend pipeline and CLI

use chrono::NaiveDate;
use climatrend::archive::{DateRange, ObservationSource};
use climatrend::models::{Location, RawReading, Scope};
use climatrend::pipeline::{self, PipelineOptions};
use climatrend::{ChartData, ClimateError, FetchFailure, ReportComposer};
use std::collections::HashMap;
use std::process::Command;
use std::time::Duration;

/// In-memory source serving fixed series per location name
struct FixtureSource {
    series: HashMap<String, Vec<RawReading>>,
}

impl ObservationSource for FixtureSource {
    fn fetch(
        &mut self,
        location: &Location,
        range: &DateRange,
    ) -> Result<Vec<RawReading>, FetchFailure> {
        let readings = self
            .series
            .get(&location.name)
            .ok_or_else(|| FetchFailure::Network("connection refused".to_string()))?;

        Ok(readings
            .iter()
            .filter(|r| {
                NaiveDate::parse_from_str(&r.date, "%Y-%m-%d")
                    .map(|d| d >= range.start && d <= range.end)
                    .unwrap_or(true)
            })
            .cloned()
            .collect())
    }
}

/// Two readings per year (Jan 1st and Jul 1st) for every year in `years`
fn yearly_pairs(years: std::ops::RangeInclusive<i32>, value: impl Fn(i32) -> f64) -> Vec<RawReading> {
    years
        .flat_map(|year| {
            let v = value(year);
            [
                RawReading::new(format!("{year}-01-01"), Some(v)),
                RawReading::new(format!("{year}-07-01"), Some(v)),
            ]
        })
        .collect()
}

fn options(locations: &[&str], boundary_year: Option<i32>) -> PipelineOptions {
    PipelineOptions {
        locations: locations
            .iter()
            .enumerate()
            .map(|(i, name)| Location::new(*name, i as f64, i as f64))
            .collect(),
        range: DateRange::new(
            NaiveDate::from_ymd_opt(2014, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
        ),
        boundary_year,
        request_delay: Duration::ZERO,
    }
}

#[test]
fn test_pipeline_end_to_end() {
    let mut source = FixtureSource {
        series: HashMap::from([
            // Warming exactly 0.1°C per year, 20°C in 2014
            (
                "Warm".to_string(),
                yearly_pairs(2014..=2023, |y| 20.0 + f64::from(y - 2014) * 0.1),
            ),
            ("Cold".to_string(), yearly_pairs(2014..=2023, |_| 5.0)),
        ]),
    };

    let output = pipeline::run(&mut source, &options(&["Cold", "Warm", "Offline"], None)).unwrap();

    assert_eq!(output.ingestion.collected.len(), 2);
    assert_eq!(output.ingestion.failed.len(), 1);
    assert_eq!(output.ingestion.failed[0].0, "Offline");
    assert_eq!(output.ingestion.stats.ingested, 40);

    let analysis = &output.analysis;
    assert_eq!(analysis.global_yearly.len(), 10);
    assert_eq!(analysis.global_yearly[&2014].scope, Scope::AllLocations);
    assert!((analysis.global_yearly[&2014].mean_value - 12.5).abs() < 1e-9);
    assert_eq!(analysis.per_location_yearly.len(), 20);

    let trend = analysis.trend.as_available().unwrap();
    assert!((trend.slope - 0.05).abs() < 1e-9);

    let period = analysis.period.as_available().unwrap();
    assert_eq!(period.boundary_year, 2018);
    assert_eq!(period.early.label(), "2014-2018");
    assert_eq!(period.late.label(), "2019-2023");
    assert!((period.delta - 0.25).abs() < 1e-9);

    let ranking: Vec<&str> = analysis
        .ranking
        .entries()
        .iter()
        .map(|e| e.location.as_str())
        .collect();
    assert_eq!(ranking, ["Warm", "Cold"]);

    let lines = ReportComposer::from_report(analysis);
    assert!(lines.iter().any(|l| l == "Trend: WARMING"));
    assert!(lines.iter().any(|l| l == "Difference: +0.25°C"));

    let chart = ChartData::from_report(analysis);
    assert_eq!(chart.locations[0].location, "Cold");
    assert_eq!(chart.ranking[0].label, "Warm");
}

#[test]
fn test_pipeline_pooled_global_mean_with_unequal_counts() {
    // A has two samples in 2020, B only one: pooled mean is (0 + 0 + 30) / 3
    let mut source = FixtureSource {
        series: HashMap::from([
            (
                "A".to_string(),
                vec![
                    RawReading::new("2020-01-01", Some(0.0)),
                    RawReading::new("2020-01-02", Some(0.0)),
                    RawReading::new("2021-01-01", Some(0.0)),
                ],
            ),
            (
                "B".to_string(),
                vec![
                    RawReading::new("2020-01-01", Some(30.0)),
                    RawReading::new("2021-01-01", Some(30.0)),
                ],
            ),
        ]),
    };

    let output = pipeline::run(&mut source, &options(&["A", "B"], Some(2020))).unwrap();
    let global = &output.analysis.global_yearly;
    assert_eq!(global[&2020].mean_value, 10.0);
    assert_eq!(global[&2020].sample_count, 3);
    assert_eq!(global[&2021].mean_value, 15.0);
}

#[test]
fn test_pipeline_no_location_succeeds() {
    let mut source = FixtureSource {
        series: HashMap::new(),
    };

    let err = pipeline::run(&mut source, &options(&["A", "B"], None)).unwrap_err();
    assert!(matches!(err, ClimateError::NoDataAvailable { .. }));
    assert!(err.is_fatal());
}

#[test]
fn test_pipeline_boundary_outside_range_degrades_comparison() {
    let mut source = FixtureSource {
        series: HashMap::from([("A".to_string(), yearly_pairs(2014..=2023, |_| 1.0))]),
    };

    let output = pipeline::run(&mut source, &options(&["A"], Some(2030))).unwrap();
    assert!(!output.analysis.period.is_available());
    assert!(output.analysis.trend.is_available());
    assert_eq!(output.analysis.ranking.len(), 1);
}

#[test]
fn test_pipeline_duplicate_dates_first_write_wins() {
    let mut source = FixtureSource {
        series: HashMap::from([(
            "A".to_string(),
            vec![
                RawReading::new("2020-05-05", Some(1.0)),
                RawReading::new("2020-05-05", Some(1.0)),
                RawReading::new("2020-05-05", Some(9.0)),
                RawReading::new("2021-05-05", Some(3.0)),
            ],
        )]),
    };

    let output = pipeline::run(&mut source, &options(&["A"], None)).unwrap();
    assert_eq!(output.ingestion.stats.ingested, 2);
    assert_eq!(output.ingestion.stats.dropped_duplicate, 2);
    assert_eq!(
        output.analysis.per_location_yearly.get("A", 2020).unwrap().mean_value,
        1.0
    );
}

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = Command::new(env!("CARGO_BIN_EXE_climatrend"))
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("climatrend"));
    assert!(stdout.contains("Yearly temperature trends"));
    assert!(stdout.contains("--boundary-year"));
}

/// Test that an unreachable archive ends the run with a non-zero exit
#[test]
fn test_cli_no_data_exits_with_failure() {
    let output = Command::new(env!("CARGO_BIN_EXE_climatrend"))
        .env("CLIMATREND_ARCHIVE__BASE_URL", "http://127.0.0.1:9/v1/archive")
        .env("CLIMATREND_ARCHIVE__MAX_RETRIES", "0")
        .env("CLIMATREND_ARCHIVE__TIMEOUT_SECONDS", "5")
        .env("CLIMATREND_ARCHIVE__REQUEST_DELAY_MS", "0")
        .args([
            "--config",
            "/nonexistent/climatrend.toml",
            "--location",
            "Test:10.0,20.0",
        ])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No data"), "unexpected stderr: {stderr}");
}

/// Test error handling for a malformed location argument
#[test]
fn test_cli_invalid_location() {
    let output = Command::new(env!("CARGO_BIN_EXE_climatrend"))
        .args(["--config", "/nonexistent/climatrend.toml", "--location", "Nowhere:95,0"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Latitude"), "unexpected stderr: {stderr}");
}
