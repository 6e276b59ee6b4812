//! Historical archive client for OpenMeteo daily means
//!
//! This module provides the data source side of the pipeline: a trait that
//! yields raw daily readings per location, an HTTP implementation against the
//! OpenMeteo archive API with retry logic, and a sequential driver that
//! fetches every configured location with a courtesy delay in between.

use crate::config::ArchiveConfig;
use crate::error::FetchFailure;
use crate::models::{Location, RawReading};
use chrono::NaiveDate;
use reqwest::blocking::{Client, Response};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument, warn};

/// Inclusive range of days to request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    #[must_use]
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }
}

/// Anything that can produce the daily series of a location
pub trait ObservationSource {
    fn fetch(
        &mut self,
        location: &Location,
        range: &DateRange,
    ) -> Result<Vec<RawReading>, FetchFailure>;
}

/// Outcome of fetching one location
#[derive(Debug, Clone, PartialEq)]
pub struct LocationFetch {
    pub location: Location,
    pub result: Result<Vec<RawReading>, FetchFailure>,
}

/// Fetch every location in order, pausing `delay` between consecutive requests.
///
/// Failures are captured per location; this function never aborts early.
pub fn fetch_all<S: ObservationSource + ?Sized>(
    source: &mut S,
    locations: &[Location],
    range: &DateRange,
    delay: Duration,
) -> Vec<LocationFetch> {
    let mut outcomes = Vec::with_capacity(locations.len());

    for (i, location) in locations.iter().enumerate() {
        if i > 0 && !delay.is_zero() {
            thread::sleep(delay);
        }

        info!("Collecting data for {}...", location.name);
        let result = source.fetch(location, range);
        match &result {
            Ok(readings) => info!("Collected {} records for {}", readings.len(), location.name),
            Err(failure) => warn!(location = %location.name, "Fetch failed: {}", failure),
        }

        outcomes.push(LocationFetch {
            location: location.clone(),
            result,
        });
    }

    outcomes
}

/// OpenMeteo archive API client
pub struct ArchiveClient {
    /// HTTP client
    client: Client,
    /// API configuration
    config: ArchiveConfig,
}

impl ArchiveClient {
    /// Create a new archive client
    pub fn new(config: ArchiveConfig) -> anyhow::Result<Self> {
        let timeout = Duration::from_secs(config.timeout_seconds.into());

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("climatrend/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {e}"))?;

        Ok(Self { client, config })
    }

    fn request_url(&self, location: &Location, range: &DateRange) -> String {
        format!(
            "{}?latitude={}&longitude={}&start_date={}&end_date={}&daily=temperature_2m_mean&timezone=UTC",
            self.config.base_url,
            location.latitude,
            location.longitude,
            range.start.format("%Y-%m-%d"),
            range.end.format("%Y-%m-%d"),
        )
    }

    /// Make a request with retry logic
    #[instrument(skip(self))]
    fn make_request(&self, url: &str) -> Result<Response, FetchFailure> {
        let max_attempts = self.config.max_retries + 1;
        let request_start = Instant::now();
        let mut attempt = 0;

        debug!("Starting HTTP request (max attempts: {})", max_attempts);

        loop {
            let attempt_start = Instant::now();
            let last_attempt = attempt + 1 >= max_attempts;

            let failure = match self.client.get(url).send() {
                Ok(response) => {
                    let status = response.status();
                    debug!(
                        "HTTP response received: {} in {:.3}s",
                        status,
                        attempt_start.elapsed().as_secs_f64()
                    );

                    if status.is_success() {
                        info!(
                            "Successful archive request in {:.3}s (attempt {})",
                            request_start.elapsed().as_secs_f64(),
                            attempt + 1
                        );
                        return Ok(response);
                    }

                    if status.as_u16() == 429 {
                        let retry_after = response
                            .headers()
                            .get("retry-after")
                            .and_then(|h| h.to_str().ok())
                            .and_then(|s| s.parse::<u64>().ok())
                            .unwrap_or(60);

                        warn!(
                            "Server rate limit exceeded (HTTP 429), retry after {}s",
                            retry_after
                        );
                        if !last_attempt {
                            thread::sleep(Duration::from_secs(retry_after));
                            attempt += 1;
                            continue;
                        }
                    } else if status.is_client_error() {
                        error!("Archive request rejected: {}", status);
                        return Err(FetchFailure::HttpStatus(status.as_u16()));
                    }

                    warn!("HTTP error on attempt {}: {}", attempt + 1, status);
                    FetchFailure::HttpStatus(status.as_u16())
                }
                Err(e) => {
                    warn!(
                        "Network error on attempt {} ({:.3}s): {}",
                        attempt + 1,
                        attempt_start.elapsed().as_secs_f64(),
                        e
                    );
                    FetchFailure::Network(e.to_string())
                }
            };

            if last_attempt {
                error!("Archive request failed after {} attempts: {}", max_attempts, failure);
                return Err(failure);
            }

            // Exponential backoff for server and network errors
            let backoff = Duration::from_millis(1000 * 2_u64.pow(attempt));
            debug!("Backing off {:.1}s before retry", backoff.as_secs_f64());
            thread::sleep(backoff);
            attempt += 1;
        }
    }
}

impl ObservationSource for ArchiveClient {
    #[instrument(skip(self, location, range), fields(location = %location.name))]
    fn fetch(
        &mut self,
        location: &Location,
        range: &DateRange,
    ) -> Result<Vec<RawReading>, FetchFailure> {
        let url = self.request_url(location, range);
        debug!("Archive request URL: {}", url);

        let response = self.make_request(&url)?;
        let body: openmeteo::ArchiveResponse = response.json().map_err(|e| {
            error!("Failed to parse archive response: {}", e);
            FetchFailure::MalformedResponse(e.to_string())
        })?;

        body.into_readings()
    }
}

/// `OpenMeteo` archive response structures
pub mod openmeteo {
    use crate::error::FetchFailure;
    use crate::models::RawReading;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct ArchiveResponse {
        pub latitude: Option<f64>,
        pub longitude: Option<f64>,
        pub daily: Option<DailyData>,
    }

    /// Daily series; null entries mark days without a value
    #[derive(Debug, Deserialize)]
    pub struct DailyData {
        pub time: Vec<String>,
        #[serde(rename = "temperature_2m_mean")]
        pub temperature_mean: Vec<Option<f64>>,
    }

    impl ArchiveResponse {
        /// Pair every day with its value
        pub fn into_readings(self) -> Result<Vec<RawReading>, FetchFailure> {
            let daily = self.daily.ok_or_else(|| {
                FetchFailure::MalformedResponse("response has no daily section".to_string())
            })?;

            if daily.time.len() != daily.temperature_mean.len() {
                return Err(FetchFailure::MalformedResponse(format!(
                    "{} dates but {} values",
                    daily.time.len(),
                    daily.temperature_mean.len()
                )));
            }

            if daily.time.is_empty() {
                return Err(FetchFailure::EmptyPayload);
            }

            Ok(daily
                .time
                .into_iter()
                .zip(daily.temperature_mean)
                .map(|(date, value)| RawReading { date, value })
                .collect())
        }
    }
}
