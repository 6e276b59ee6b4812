use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{ArgAction, Parser, ValueHint};
use climatrend::archive::ArchiveClient;
use climatrend::pipeline::{self, PipelineOptions};
use climatrend::{ChartData, ClimateConfig, ClimateError, DateRange, Location, ReportComposer, logging};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{debug, error};

#[derive(Parser, Debug)]
#[command(
    name = "climatrend",
    author,
    version,
    about = "Yearly temperature trends, period comparison and ranking for a set of locations",
    long_about = None
)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    /// First day of the analysed range (YYYY-MM-DD)
    #[arg(long)]
    start_date: Option<NaiveDate>,

    /// Last day of the analysed range (YYYY-MM-DD)
    #[arg(long)]
    end_date: Option<NaiveDate>,

    /// Last year of the early period (default: midpoint of the observed years)
    #[arg(long)]
    boundary_year: Option<i32>,

    /// Location to analyse, repeatable; replaces the configured locations
    #[arg(short, long = "location", value_name = "NAME:LAT,LON")]
    locations: Vec<String>,

    /// Write chart-ready series as JSON to this path
    #[arg(long, value_hint = ValueHint::FilePath)]
    chart_data: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            let message = match err.downcast_ref::<ClimateError>() {
                Some(climate) => format!("{} ({climate})", climate.user_message()),
                None => format!("{err:#}"),
            };
            eprintln!("Error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn apply_overrides(config: &mut ClimateConfig, cli: &Cli) -> Result<()> {
    if let Some(start) = cli.start_date {
        config.analysis.start_date = start;
    }
    if let Some(end) = cli.end_date {
        config.analysis.end_date = end;
    }
    if cli.boundary_year.is_some() {
        config.analysis.boundary_year = cli.boundary_year;
    }
    if !cli.locations.is_empty() {
        config.locations = cli
            .locations
            .iter()
            .map(|input| Location::parse(input))
            .collect::<climatrend::Result<Vec<_>>>()?;
    }
    if let Some(path) = &cli.chart_data {
        config.output.chart_data_path = Some(path.clone());
    }
    config.validate()
}

fn run(cli: Cli) -> Result<()> {
    let mut config = ClimateConfig::load_from_path(cli.config.clone())
        .with_context(|| "Failed to load configuration")?;
    apply_overrides(&mut config, &cli)?;
    logging::init(&config.logging, cli.verbose);

    debug!(
        "Analysing {} locations from {} to {}",
        config.locations.len(),
        config.analysis.start_date,
        config.analysis.end_date
    );
    for location in &config.locations {
        debug!("  {} ({})", location.name, location.format_coordinates());
    }

    let mut client = ArchiveClient::new(config.archive.clone())?;
    let options = PipelineOptions {
        locations: config.locations.clone(),
        range: DateRange::new(config.analysis.start_date, config.analysis.end_date),
        boundary_year: config.analysis.boundary_year,
        request_delay: Duration::from_millis(config.archive.request_delay_ms),
    };

    let output = pipeline::run(&mut client, &options)?;

    for (location, failure) in &output.ingestion.failed {
        println!("Skipped {location}: {failure}");
    }
    println!("Total records: {}", output.ingestion.stats.ingested);
    println!();

    for line in ReportComposer::from_report(&output.analysis) {
        println!("{line}");
    }

    if let Some(path) = &config.output.chart_data_path {
        ChartData::from_report(&output.analysis)
            .write_json(path)
            .with_context(|| format!("Failed to write chart data to {}", path.display()))?;
    }

    Ok(())
}
