//! Artifact contract tests.
//!
//! Observations written by the acquirer's writer must come back unchanged
//! through the aggregator's loader, and an aborted acquisition must not touch
//! an existing dataset.

use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use hujan::aggregate::{Dataset, filter_by_range, summarize};
use hujan::app::pipeline::run_acquire;
use hujan::domain::{AcquireConfig, DateRange, Intensity, Observation, Station, Status};
use hujan::io::dataset::write_dataset_csv;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("hujan-it-{}-{name}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn test_round_trip_preserves_observations() {
    let observations = vec![
        Observation::from_daily(day(2024, 1, 1), Some(0.0), 29.3, 19.1, 8.3),
        Observation::from_daily(day(2024, 1, 2), Some(10.0), 28.0, 20.0, 12.1),
        Observation::from_daily(day(2024, 1, 3), Some(10.01), 27.7, 18.9, 6.4),
        Observation::from_daily(day(2024, 1, 4), None, 27.1, 19.4, 15.9),
        Observation::from_daily(day(2024, 1, 5), Some(50.01), 25.2, 18.8, 22.7),
        Observation::from_daily(day(2024, 1, 6), Some(0.1), 30.05, 20.15, 7.25),
    ];

    let path = scratch_dir("round-trip").join("curah_hujan.csv");
    write_dataset_csv(&path, &observations).unwrap();

    let dataset = Dataset::load(&path).unwrap();
    assert_eq!(dataset.observations(), observations.as_slice());

    let intensities: Vec<Intensity> = dataset.observations().iter().map(|o| o.intensity()).collect();
    assert_eq!(
        intensities,
        vec![
            Intensity::NoRain,
            Intensity::Light,
            Intensity::Moderate,
            Intensity::NotAvailable,
            Intensity::VeryHeavy,
            Intensity::Light,
        ]
    );
}

#[test]
fn test_three_day_example_through_artifact() {
    let observations = vec![
        Observation::new(day(2024, 1, 1), Some(0.0), 8.0, 24.0),
        Observation::new(day(2024, 1, 2), Some(15.0), 12.0, 23.0),
        Observation::new(day(2024, 1, 3), Some(60.0), 20.0, 21.5),
    ];
    let path = scratch_dir("three-day").join("curah_hujan.csv");
    write_dataset_csv(&path, &observations).unwrap();

    let dataset = Dataset::load(&path).unwrap();
    let range = DateRange::new(day(2024, 1, 1), day(2024, 1, 3)).unwrap();
    let summary = summarize(&filter_by_range(dataset.observations(), &range));

    assert_eq!(summary.mean_rainfall_mm, 25.0);
    assert_eq!(summary.max_rainfall_mm, 60.0);
    assert_eq!(summary.total_rainfall_mm, 75.0);
    assert_eq!(summary.status, Status::Medium);
    assert_eq!(summary.histogram.get(Intensity::NoRain), 1);
    assert_eq!(summary.histogram.get(Intensity::Moderate), 1);
    assert_eq!(summary.histogram.get(Intensity::VeryHeavy), 1);
    assert_eq!(summary.histogram.total(), 3);
}

#[test]
fn test_failed_fetch_keeps_existing_dataset() {
    let path = scratch_dir("keep").join("curah_hujan.csv");
    let existing = vec![Observation::new(day(2023, 6, 1), Some(4.0), 9.0, 24.0)];
    write_dataset_csv(&path, &existing).unwrap();
    let before = std::fs::read(&path).unwrap();

    let config = AcquireConfig {
        station: Station::bandung(),
        start: day(2024, 1, 1),
        end: day(2024, 12, 31),
        archive_url: "http://127.0.0.1:9/v1/archive".to_string(),
        timezone: "Asia/Jakarta".to_string(),
        timeout: Duration::from_secs(2),
        output: path.clone(),
        preview_rows: 10,
    };
    assert!(run_acquire(&config).is_none());

    assert_eq!(std::fs::read(&path).unwrap(), before);
}
