//! Human-readable summary of an analysis run

use crate::analysis::{PeriodComparison, Ranking, TrendResult};
use crate::models::LocationMean;
use crate::pipeline::{AnalysisReport, Availability};

pub struct ReportComposer;

impl ReportComposer {
    /// Summary lines for a complete report
    #[must_use]
    pub fn from_report(report: &AnalysisReport) -> Vec<String> {
        Self::compose(
            &report.trend,
            &report.period,
            &report.ranking,
            &report.location_means,
        )
    }

    #[must_use]
    pub fn compose(
        trend: &Availability<TrendResult>,
        period: &Availability<PeriodComparison>,
        ranking: &Ranking,
        location_means: &[LocationMean],
    ) -> Vec<String> {
        let mut lines = vec!["--- RESULTS ---".to_string()];

        match period {
            Availability::Available(comparison) => {
                lines.push(format!(
                    "Mean temperature {}: {:.2}°C",
                    comparison.early.label(),
                    comparison.early_mean()
                ));
                lines.push(format!(
                    "Mean temperature {}: {:.2}°C",
                    comparison.late.label(),
                    comparison.late_mean()
                ));
                lines.push(format!("Difference: {:+.2}°C", comparison.delta));
            }
            Availability::Unavailable { reason } => {
                lines.push(format!("Period comparison unavailable: {reason}"));
            }
        }

        match trend {
            Availability::Available(trend) => {
                lines.push(format!("Rate of change: {:+.3}°C per year", trend.slope));
                lines.push(format!("Trend: {}", trend.classification()));
            }
            Availability::Unavailable { reason } => {
                lines.push(format!("Trend unavailable: {reason}"));
            }
        }

        lines.push(String::new());
        lines.push("Ranking:".to_string());
        for (position, entry) in ranking.entries().iter().enumerate() {
            lines.push(format!(
                "{}. {}: {:.1}°C",
                position + 1,
                entry.location,
                entry.mean_value
            ));
        }

        lines.push(String::new());
        lines.push("By location:".to_string());
        for mean in location_means {
            lines.push(format!("{}: {:.1}°C", mean.location, mean.mean_value));
        }

        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{PeriodWindow, RankingBuilder};

    fn means() -> Vec<LocationMean> {
        vec![
            LocationMean {
                location: "London".to_string(),
                mean_value: 11.84,
                sample_count: 10,
            },
            LocationMean {
                location: "São Paulo".to_string(),
                mean_value: 20.06,
                sample_count: 10,
            },
        ]
    }

    #[test]
    fn test_full_report() {
        let trend = Availability::Available(TrendResult {
            slope: 0.0312,
            intercept: -50.0,
            years: vec![2014, 2023],
        });
        let period = Availability::Available(PeriodComparison {
            boundary_year: 2018,
            early: PeriodWindow {
                first_year: 2014,
                last_year: 2018,
                mean_value: 15.234,
                sample_count: 5,
            },
            late: PeriodWindow {
                first_year: 2019,
                last_year: 2023,
                mean_value: 15.5,
                sample_count: 5,
            },
            delta: 0.266,
        });
        let means = means();
        let ranking = RankingBuilder::build(&means).unwrap();

        let lines = ReportComposer::compose(&trend, &period, &ranking, &means);

        assert_eq!(lines[0], "--- RESULTS ---");
        assert!(lines.contains(&"Mean temperature 2014-2018: 15.23°C".to_string()));
        assert!(lines.contains(&"Mean temperature 2019-2023: 15.50°C".to_string()));
        assert!(lines.contains(&"Difference: +0.27°C".to_string()));
        assert!(lines.contains(&"Rate of change: +0.031°C per year".to_string()));
        assert!(lines.contains(&"Trend: WARMING".to_string()));
        assert!(lines.contains(&"1. São Paulo: 20.1°C".to_string()));
        assert!(lines.contains(&"2. London: 11.8°C".to_string()));

        // Per-location block keeps registration order
        let by_location = lines.iter().position(|l| l == "By location:").unwrap();
        assert_eq!(lines[by_location + 1], "London: 11.8°C");
        assert_eq!(lines[by_location + 2], "São Paulo: 20.1°C");
    }

    #[test]
    fn test_unavailable_results() {
        let trend = Availability::Unavailable {
            reason: "too few years".to_string(),
        };
        let period = Availability::Unavailable {
            reason: "late period empty".to_string(),
        };
        let means = means();
        let ranking = RankingBuilder::build(&means).unwrap();

        let lines = ReportComposer::compose(&trend, &period, &ranking, &means);
        assert!(lines.contains(&"Trend unavailable: too few years".to_string()));
        assert!(lines.contains(&"Period comparison unavailable: late period empty".to_string()));
        assert!(!lines.iter().any(|l| l.starts_with("Rate of change")));
    }
}
