//! Shared domain types.
//!
//! These types are kept small and `Copy` where possible so the aggregator can
//! hand out filtered copies of the loaded table without touching it:
//!
//! - one observed day (`Observation`)
//! - the inclusive filter window (`DateRange`)
//! - period-level outputs (`Status`, `IntensityHistogram`, `PeriodSummary`)
//! - run configuration (`AcquireConfig`, `SummaryConfig`)

use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::domain::intensity::{Intensity, classify};
use crate::error::AppError;

/// Period totals strictly above this are `High`.
pub const STATUS_HIGH_ABOVE_MM: f64 = 200.0;
/// Period totals strictly above this (and not `High`) are `Medium`.
pub const STATUS_MEDIUM_ABOVE_MM: f64 = 50.0;

/// A weather station location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Station {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Station {
    pub fn bandung() -> Self {
        Self {
            name: "Stasiun Geofisika Bandung".to_string(),
            latitude: -6.9175,
            longitude: 107.6025,
        }
    }
}

/// One day of observations for the station.
///
/// Built only through [`Observation::new`] / [`Observation::from_daily`], so
/// `intensity` always agrees with the rainfall reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    date: NaiveDate,
    rainfall_mm: f64,
    wind_speed_kmh: f64,
    avg_temp_c: f64,
    intensity: Intensity,
}

impl Observation {
    /// `rainfall` is the raw reading; an unusable reading is stored as `0.0 mm`
    /// with intensity `N/A`.
    pub fn new(date: NaiveDate, rainfall: Option<f64>, wind_speed_kmh: f64, avg_temp_c: f64) -> Self {
        let intensity = classify(rainfall);
        let rainfall_mm = match (intensity, rainfall) {
            (Intensity::NotAvailable, _) | (_, None) => 0.0,
            (_, Some(mm)) => mm,
        };
        Self {
            date,
            rainfall_mm,
            wind_speed_kmh,
            avg_temp_c,
            intensity,
        }
    }

    /// Build from one day of archive readings; average temperature is the
    /// midpoint of the daily max and min.
    pub fn from_daily(
        date: NaiveDate,
        rainfall: Option<f64>,
        temp_max_c: f64,
        temp_min_c: f64,
        wind_speed_kmh: f64,
    ) -> Self {
        Self::new(date, rainfall, wind_speed_kmh, (temp_max_c + temp_min_c) / 2.0)
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn rainfall_mm(&self) -> f64 {
        self.rainfall_mm
    }

    pub fn wind_speed_kmh(&self) -> f64 {
        self.wind_speed_kmh
    }

    pub fn avg_temp_c(&self) -> f64 {
        self.avg_temp_c
    }

    pub fn intensity(&self) -> Intensity {
        self.intensity
    }

    /// The rainfall reading as it should be persisted (`None` when it was
    /// unusable).
    pub fn rainfall_reading(&self) -> Option<f64> {
        match self.intensity {
            Intensity::NotAvailable => None,
            _ => Some(self.rainfall_mm),
        }
    }
}

/// Inclusive date window used to filter observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, AppError> {
        if start > end {
            return Err(AppError::usage(format!(
                "Invalid date range: start {start} is after end {end}."
            )));
        }
        Ok(Self { start, end })
    }

    /// January 1st through December 31st of `year`.
    pub fn for_year(year: i32) -> Result<Self, AppError> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1)
            .ok_or_else(|| AppError::usage(format!("Year {year} is out of range.")))?;
        let end = NaiveDate::from_ymd_opt(year, 12, 31)
            .ok_or_else(|| AppError::usage(format!("Year {year} is out of range.")))?;
        Self::new(start, end)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Period-level severity derived from total rainfall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Status {
    Low,
    Medium,
    High,
}

impl Status {
    /// Thresholds are strictly-greater: exactly 200 mm is still `Medium`.
    pub fn from_total_rainfall(total_mm: f64) -> Self {
        if total_mm > STATUS_HIGH_ABOVE_MM {
            Status::High
        } else if total_mm > STATUS_MEDIUM_ABOVE_MM {
            Status::Medium
        } else {
            Status::Low
        }
    }
}

/// Day counts per intensity category over the fixed category set.
///
/// Every category is always present, with zero when no day matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IntensityHistogram {
    counts: [usize; 6],
}

impl IntensityHistogram {
    pub fn add(&mut self, intensity: Intensity) {
        self.counts[intensity.index()] += 1;
    }

    pub fn get(&self, intensity: Intensity) -> usize {
        self.counts[intensity.index()]
    }

    /// `(category, count)` pairs in [`Intensity::ALL`] order, zeros included.
    pub fn iter(&self) -> impl Iterator<Item = (Intensity, usize)> + '_ {
        Intensity::ALL.into_iter().map(|i| (i, self.get(i)))
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

impl FromIterator<Intensity> for IntensityHistogram {
    fn from_iter<T: IntoIterator<Item = Intensity>>(iter: T) -> Self {
        let mut histogram = IntensityHistogram::default();
        for intensity in iter {
            histogram.add(intensity);
        }
        histogram
    }
}

impl Serialize for IntensityHistogram {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Intensity::ALL.len()))?;
        for (intensity, count) in self.iter() {
            map.serialize_entry(intensity.label(), &count)?;
        }
        map.end()
    }
}

/// Aggregates over a filtered set of observations.
///
/// Numeric fields are zero for an empty period rather than NaN.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodSummary {
    pub day_count: usize,
    pub total_rainfall_mm: f64,
    pub mean_rainfall_mm: f64,
    pub max_rainfall_mm: f64,
    pub mean_wind_kmh: f64,
    pub min_wind_kmh: f64,
    pub max_wind_kmh: f64,
    pub mean_temp_c: f64,
    pub min_temp_c: f64,
    pub max_temp_c: f64,
    pub status: Status,
    pub histogram: IntensityHistogram,
}

/// Which daily series to chart in the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ChartKind {
    Rain,
    Wind,
    Temp,
    Intensity,
    All,
}

impl ChartKind {
    pub fn includes(self, other: ChartKind) -> bool {
        self == ChartKind::All || self == other
    }
}

/// Configuration for one acquisition run.
#[derive(Debug, Clone)]
pub struct AcquireConfig {
    pub station: Station,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub archive_url: String,
    pub timezone: String,
    pub timeout: Duration,
    pub output: PathBuf,
    pub preview_rows: usize,
}

/// How the summary period was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodRequest {
    /// Latest year present in the dataset.
    LatestYear,
    Year(i32),
    /// Missing bounds default to the dataset's first/last date.
    Custom {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
}

/// Configuration for one summary run.
#[derive(Debug, Clone)]
pub struct SummaryConfig {
    pub dataset: PathBuf,
    pub period: PeriodRequest,
    pub station: Station,
    pub show_map: bool,
    pub chart: Option<ChartKind>,
    pub show_rows: bool,
    pub plot_width: usize,
    pub plot_height: usize,
    pub export_summary: Option<PathBuf>,
}
