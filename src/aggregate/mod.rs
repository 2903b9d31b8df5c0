//! Aggregator: the loaded dataset, date filtering and period summaries.
//!
//! The dataset is loaded once and never mutated; every operation here borrows
//! it and returns a new value.

use std::path::Path;

use chrono::{Datelike, NaiveDate};

use crate::domain::{DateRange, IntensityHistogram, Observation, PeriodRequest, PeriodSummary, Status};
use crate::error::AppError;
use crate::io::dataset::read_dataset_csv;

/// Immutable in-memory table of observations, sorted by date.
#[derive(Debug, Clone)]
pub struct Dataset {
    observations: Vec<Observation>,
}

impl Dataset {
    /// Load the artifact at `path`. A missing file is a fatal error.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let loaded = read_dataset_csv(path)?;
        tracing::info!(
            message = "dataset loaded",
            path = %path.display(),
            rows_read = loaded.rows_read,
            rows_used = loaded.observations.len(),
            rows_skipped = loaded.row_errors.len(),
        );
        Self::from_observations(loaded.observations)
    }

    /// Build from observations in any order. More than one observation for
    /// the same date is an invalid dataset.
    pub fn from_observations(mut observations: Vec<Observation>) -> Result<Self, AppError> {
        observations.sort_by_key(|o| o.date());
        if let Some(pair) = observations.windows(2).find(|w| w[0].date() == w[1].date()) {
            return Err(AppError::invalid_artifact(format!(
                "Dataset has more than one row for {}.",
                pair[0].date()
            )));
        }
        Ok(Self { observations })
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// First and last date present.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.observations.first()?.date();
        let last = self.observations.last()?.date();
        Some((first, last))
    }

    /// Distinct calendar years present, ascending.
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.observations.iter().map(|o| o.date().year()).collect();
        years.dedup();
        years
    }

    /// Largest daily rainfall across the whole dataset (0 when empty).
    pub fn max_rainfall_mm(&self) -> f64 {
        self.observations
            .iter()
            .map(Observation::rainfall_mm)
            .fold(0.0, f64::max)
    }

    /// Turn a period request into a concrete range against this dataset.
    pub fn resolve_period(&self, request: PeriodRequest) -> Result<DateRange, AppError> {
        match request {
            PeriodRequest::Year(year) => DateRange::for_year(year),
            PeriodRequest::LatestYear => {
                let year = self
                    .years()
                    .last()
                    .copied()
                    .ok_or_else(|| AppError::invalid_artifact("Dataset has no rows; nothing to summarize."))?;
                DateRange::for_year(year)
            }
            PeriodRequest::Custom { start, end } => {
                let bounds = self.date_bounds();
                let start = start.or(bounds.map(|(first, _)| first));
                let end = end.or(bounds.map(|(_, last)| last));
                match (start, end) {
                    (Some(start), Some(end)) => DateRange::new(start, end),
                    _ => Err(AppError::invalid_artifact(
                        "Dataset has no rows; give both --start and --end.",
                    )),
                }
            }
        }
    }
}

/// Observations with `range.start() <= date <= range.end()`, original order
/// kept. An empty result is not an error.
pub fn filter_by_range(observations: &[Observation], range: &DateRange) -> Vec<Observation> {
    observations
        .iter()
        .filter(|o| range.contains(o.date()))
        .copied()
        .collect()
}

/// Compute the period summary. Empty input gives zeros and `Status::Low`.
pub fn summarize(observations: &[Observation]) -> PeriodSummary {
    let rainfall = Reducer::over(observations.iter().map(Observation::rainfall_mm));
    let wind = Reducer::over(observations.iter().map(Observation::wind_speed_kmh));
    let temp = Reducer::over(observations.iter().map(Observation::avg_temp_c));
    let histogram: IntensityHistogram = observations.iter().map(Observation::intensity).collect();

    PeriodSummary {
        day_count: observations.len(),
        total_rainfall_mm: rainfall.sum,
        mean_rainfall_mm: rainfall.mean(),
        max_rainfall_mm: rainfall.max_or_zero(),
        mean_wind_kmh: wind.mean(),
        min_wind_kmh: wind.min_or_zero(),
        max_wind_kmh: wind.max_or_zero(),
        mean_temp_c: temp.mean(),
        min_temp_c: temp.min_or_zero(),
        max_temp_c: temp.max_or_zero(),
        status: Status::from_total_rainfall(rainfall.sum),
        histogram,
    }
}

/// Single-pass sum/min/max over a column.
struct Reducer {
    n: usize,
    sum: f64,
    min: Option<f64>,
    max: Option<f64>,
}

impl Reducer {
    fn over(values: impl Iterator<Item = f64>) -> Self {
        let mut r = Reducer {
            n: 0,
            sum: 0.0,
            min: None,
            max: None,
        };
        for v in values {
            r.n += 1;
            r.sum += v;
            r.min = Some(r.min.map_or(v, |m| m.min(v)));
            r.max = Some(r.max.map_or(v, |m| m.max(v)));
        }
        r
    }

    fn mean(&self) -> f64 {
        if self.n == 0 { 0.0 } else { self.sum / self.n as f64 }
    }

    fn min_or_zero(&self) -> f64 {
        self.min.unwrap_or(0.0)
    }

    fn max_or_zero(&self) -> f64 {
        self.max.unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Intensity;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn three_days() -> Vec<Observation> {
        vec![
            Observation::new(day(2024, 1, 1), Some(0.0), 8.0, 24.0),
            Observation::new(day(2024, 1, 2), Some(15.0), 12.0, 23.0),
            Observation::new(day(2024, 1, 3), Some(60.0), 20.0, 21.5),
        ]
    }

    fn spread_dataset() -> Dataset {
        Dataset::from_observations(vec![
            Observation::new(day(2024, 12, 31), Some(2.0), 5.0, 25.0),
            Observation::new(day(2023, 1, 1), Some(1.0), 5.0, 25.0),
            Observation::new(day(2025, 6, 15), Some(30.0), 9.0, 24.0),
            Observation::new(day(2024, 1, 1), Some(11.0), 6.0, 23.0),
        ])
        .unwrap()
    }

    #[test]
    fn three_day_example() {
        let obs = three_days();
        let range = DateRange::new(day(2024, 1, 1), day(2024, 1, 3)).unwrap();
        let filtered = filter_by_range(&obs, &range);
        let s = summarize(&filtered);

        assert_eq!(s.day_count, 3);
        assert!((s.mean_rainfall_mm - 25.0).abs() < 1e-12);
        assert_eq!(s.max_rainfall_mm, 60.0);
        assert_eq!(s.total_rainfall_mm, 75.0);
        assert_eq!(s.status, Status::Medium);
        assert_eq!(s.histogram.get(Intensity::NoRain), 1);
        assert_eq!(s.histogram.get(Intensity::Moderate), 1);
        assert_eq!(s.histogram.get(Intensity::VeryHeavy), 1);
        assert_eq!(s.histogram.get(Intensity::Light), 0);
        assert_eq!(s.histogram.total(), 3);
        assert_eq!(s.min_wind_kmh, 8.0);
        assert_eq!(s.max_wind_kmh, 20.0);
        assert_eq!(s.min_temp_c, 21.5);
        assert_eq!(s.max_temp_c, 24.0);
    }

    #[test]
    fn empty_summary_is_all_zero_and_low() {
        let s = summarize(&[]);
        assert_eq!(s.day_count, 0);
        for v in [
            s.total_rainfall_mm,
            s.mean_rainfall_mm,
            s.max_rainfall_mm,
            s.mean_wind_kmh,
            s.min_wind_kmh,
            s.max_wind_kmh,
            s.mean_temp_c,
            s.min_temp_c,
            s.max_temp_c,
        ] {
            assert_eq!(v, 0.0);
        }
        assert_eq!(s.status, Status::Low);
        assert_eq!(s.histogram.total(), 0);
    }

    #[test]
    fn status_tracks_period_total() {
        let at_200 = [
            Observation::new(day(2024, 2, 1), Some(100.0), 1.0, 20.0),
            Observation::new(day(2024, 2, 2), Some(100.0), 1.0, 20.0),
        ];
        assert_eq!(summarize(&at_200).status, Status::Medium);

        let above = [
            Observation::new(day(2024, 2, 1), Some(100.0), 1.0, 20.0),
            Observation::new(day(2024, 2, 2), Some(100.01), 1.0, 20.0),
        ];
        assert_eq!(summarize(&above).status, Status::High);
    }

    #[test]
    fn filter_is_inclusive_and_keeps_order() {
        let ds = spread_dataset();
        let range = DateRange::new(day(2024, 1, 1), day(2024, 12, 31)).unwrap();
        let filtered = filter_by_range(ds.observations(), &range);
        let dates: Vec<_> = filtered.iter().map(|o| o.date()).collect();
        assert_eq!(dates, vec![day(2024, 1, 1), day(2024, 12, 31)]);
        assert!(filtered.iter().all(|o| range.contains(o.date())));

        // Relative order of an unsorted input is preserved too.
        let unsorted = [
            Observation::new(day(2024, 3, 2), Some(1.0), 1.0, 20.0),
            Observation::new(day(2024, 3, 1), Some(2.0), 1.0, 20.0),
        ];
        let kept = filter_by_range(&unsorted, &range);
        assert_eq!(kept, unsorted.to_vec());
    }

    #[test]
    fn filter_is_idempotent() {
        let ds = spread_dataset();
        let range = DateRange::for_year(2024).unwrap();
        let once = filter_by_range(ds.observations(), &range);
        let twice = filter_by_range(&once, &range);
        assert_eq!(once, twice);
    }

    #[test]
    fn filter_outside_data_is_empty() {
        let ds = spread_dataset();
        let range = DateRange::for_year(1999).unwrap();
        assert!(filter_by_range(ds.observations(), &range).is_empty());
    }

    #[test]
    fn years_bounds_and_periods() {
        let ds = spread_dataset();
        assert_eq!(ds.years(), vec![2023, 2024, 2025]);
        assert_eq!(ds.date_bounds(), Some((day(2023, 1, 1), day(2025, 6, 15))));
        assert_eq!(ds.max_rainfall_mm(), 30.0);

        let latest = ds.resolve_period(PeriodRequest::LatestYear).unwrap();
        assert_eq!(latest, DateRange::for_year(2025).unwrap());

        let open_end = ds
            .resolve_period(PeriodRequest::Custom {
                start: Some(day(2024, 6, 1)),
                end: None,
            })
            .unwrap();
        assert_eq!(open_end.end(), day(2025, 6, 15));

        let inverted = ds.resolve_period(PeriodRequest::Custom {
            start: Some(day(2025, 1, 1)),
            end: Some(day(2024, 1, 1)),
        });
        assert_eq!(inverted.unwrap_err().kind(), crate::error::ErrorKind::Usage);
    }

    #[test]
    fn repeated_date_is_rejected() {
        let err = Dataset::from_observations(vec![
            Observation::new(day(2024, 1, 2), Some(1.0), 5.0, 25.0),
            Observation::new(day(2024, 1, 1), Some(2.0), 5.0, 25.0),
            Observation::new(day(2024, 1, 1), Some(3.0), 5.0, 25.0),
        ])
        .unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::InvalidArtifact);
    }

    #[test]
    fn empty_dataset_has_no_latest_year() {
        let ds = Dataset::from_observations(Vec::new()).unwrap();
        assert!(ds.is_empty());
        assert!(ds.resolve_period(PeriodRequest::LatestYear).is_err());
        assert!(ds.resolve_period(PeriodRequest::Year(2024)).is_ok());
    }
}
