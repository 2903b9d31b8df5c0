//! Shared pipeline logic behind the CLI commands.
//!
//! Acquisition: archive fetch -> classify -> persist.
//! Aggregation: loaded dataset -> period -> filter -> summarize.
//!
//! The CLI only decides what to print.

use crate::aggregate::{Dataset, filter_by_range, summarize};
use crate::data::ArchiveClient;
use crate::domain::{AcquireConfig, DateRange, Observation, PeriodRequest, PeriodSummary};
use crate::error::AppError;
use crate::io::dataset::write_dataset_csv;
use crate::report::format_period_label;

/// Outputs of one summary run.
#[derive(Debug, Clone)]
pub struct SummaryRun {
    pub range: DateRange,
    pub period_label: String,
    pub filtered: Vec<Observation>,
    pub summary: PeriodSummary,
}

/// Run the acquirer. Any failure is logged and reported as `None`; the
/// existing dataset file is left untouched in that case.
pub fn run_acquire(config: &AcquireConfig) -> Option<Vec<Observation>> {
    match acquire(config) {
        Ok(observations) => Some(observations),
        Err(err) => {
            tracing::error!(
                message = "failed to acquire dataset",
                error = %err,
                output = %config.output.display(),
            );
            None
        }
    }
}

/// Fetch, classify and persist, propagating the first failure.
pub fn acquire(config: &AcquireConfig) -> Result<Vec<Observation>, AppError> {
    tracing::info!(
        message = "fetching daily archive",
        station = %config.station.name,
        start = %config.start,
        end = %config.end,
    );

    let client = ArchiveClient::new(&config.archive_url, &config.timezone, config.timeout)?;
    let observations = client.fetch_range(
        config.station.latitude,
        config.station.longitude,
        config.start,
        config.end,
    )?;

    if observations.is_empty() {
        return Err(AppError::fetch(format!(
            "Archive returned no usable days for {}..{}.",
            config.start, config.end
        )));
    }

    write_dataset_csv(&config.output, &observations)?;
    tracing::info!(
        message = "dataset saved",
        rows = observations.len(),
        path = %config.output.display(),
    );

    Ok(observations)
}

/// Resolve the requested period, filter the dataset and summarize it.
pub fn run_summary(dataset: &Dataset, period: PeriodRequest) -> Result<SummaryRun, AppError> {
    let range = dataset.resolve_period(period)?;
    let filtered = filter_by_range(dataset.observations(), &range);
    let summary = summarize(&filtered);

    tracing::debug!(
        message = "period summarized",
        start = %range.start(),
        end = %range.end(),
        days = summary.day_count,
        status = ?summary.status,
    );

    Ok(SummaryRun {
        period_label: format_period_label(period, &range),
        range,
        filtered,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Status, Station};
    use chrono::NaiveDate;
    use std::time::Duration;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn summary_for_latest_year() {
        let ds = Dataset::from_observations(vec![
            Observation::new(day(2023, 5, 1), Some(300.0), 5.0, 24.0),
            Observation::new(day(2024, 1, 1), Some(0.0), 8.0, 24.0),
            Observation::new(day(2024, 1, 2), Some(15.0), 12.0, 23.0),
            Observation::new(day(2024, 1, 3), Some(60.0), 20.0, 21.5),
        ])
        .unwrap();
        let run = run_summary(&ds, PeriodRequest::LatestYear).unwrap();
        assert_eq!(run.period_label, "Tahun 2024");
        assert_eq!(run.filtered.len(), 3);
        assert_eq!(run.summary.total_rainfall_mm, 75.0);
        assert_eq!(run.summary.status, Status::Medium);

        let custom = run_summary(
            &ds,
            PeriodRequest::Custom {
                start: Some(day(2024, 1, 1)),
                end: Some(day(2024, 12, 31)),
            },
        )
        .unwrap();
        assert_eq!(custom.period_label, "1 Januari 2024 - 31 Desember 2024");
        assert_eq!(custom.summary, run.summary);
    }

    #[test]
    fn invalid_range_is_rejected_before_filtering() {
        let ds = Dataset::from_observations(vec![Observation::new(day(2024, 1, 1), Some(1.0), 1.0, 20.0)]).unwrap();
        let err = run_summary(
            &ds,
            PeriodRequest::Custom {
                start: Some(day(2024, 2, 1)),
                end: Some(day(2024, 1, 1)),
            },
        )
        .unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn failed_fetch_produces_nothing() {
        let dir = std::env::temp_dir().join(format!("hujan-pipeline-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let output = dir.join("never.csv");
        let _ = std::fs::remove_file(&output);

        let config = AcquireConfig {
            station: Station::bandung(),
            start: day(2024, 1, 1),
            end: day(2024, 1, 31),
            // Port 9 (discard) on loopback refuses connections.
            archive_url: "http://127.0.0.1:9/v1/archive".to_string(),
            timezone: "Asia/Jakarta".to_string(),
            timeout: Duration::from_secs(2),
            output: output.clone(),
            preview_rows: 10,
        };

        assert!(run_acquire(&config).is_none());
        assert!(!output.exists());
    }

    #[test]
    fn silent_archive_times_out_without_writing() {
        // Connections complete in the backlog but never get a response.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let dir = std::env::temp_dir().join(format!("hujan-pipeline-timeout-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let output = dir.join("never.csv");
        let _ = std::fs::remove_file(&output);

        let config = AcquireConfig {
            station: Station::bandung(),
            start: day(2024, 1, 1),
            end: day(2024, 1, 31),
            archive_url: format!("http://{addr}/v1/archive"),
            timezone: "Asia/Jakarta".to_string(),
            timeout: Duration::from_secs(1),
            output: output.clone(),
            preview_rows: 10,
        };

        let started = std::time::Instant::now();
        let err = acquire(&config).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Fetch);
        assert!(err.to_string().contains("timed out"), "{err}");
        assert!(started.elapsed() < Duration::from_secs(10));

        assert!(run_acquire(&config).is_none());
        assert!(!output.exists());
        drop(listener);
    }
}
