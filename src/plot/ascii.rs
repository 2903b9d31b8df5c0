//! ASCII charts for terminal output.
//!
//! Fixed-size grid, deterministic output. Days are grouped into at most
//! `width` columns; each column shows the group's max (rainfall) or mean
//! (wind, temperature).
//!
//! Plot elements:
//! - rainfall: `#` bars
//! - wind / temperature: `o` line with `.` area fill below
//! - intensity distribution: horizontal `#` bars

use crate::domain::{IntensityHistogram, Observation};

/// Headroom above the dataset's wettest day on the rainfall axis.
pub const RAIN_AXIS_HEADROOM: f64 = 1.2;
pub const WIND_AXIS_MAX: f64 = 50.0;
pub const TEMP_AXIS_MAX: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Series {
    Rainfall,
    Wind,
    Temperature,
}

impl Series {
    pub fn label(self) -> &'static str {
        match self {
            Series::Rainfall => "Curah Hujan (mm)",
            Series::Wind => "Kecepatan Angin (km/h)",
            Series::Temperature => "Suhu (°C)",
        }
    }

    fn value(self, obs: &Observation) -> f64 {
        match self {
            Series::Rainfall => obs.rainfall_mm(),
            Series::Wind => obs.wind_speed_kmh(),
            Series::Temperature => obs.avg_temp_c(),
        }
    }

    fn is_bar(self) -> bool {
        self == Series::Rainfall
    }
}

/// Rainfall axis cap from the wettest day of the whole dataset, so charts of
/// different periods share a scale.
pub fn rainfall_axis_max(dataset_max_mm: f64) -> f64 {
    let cap = dataset_max_mm * RAIN_AXIS_HEADROOM;
    if cap.is_finite() && cap > 0.0 { cap } else { 1.0 }
}

/// Render one daily series over `[0, y_max]`.
pub fn render_daily_chart(
    observations: &[Observation],
    series: Series,
    y_max: f64,
    width: usize,
    height: usize,
) -> String {
    let (Some(first), Some(last)) = (observations.first(), observations.last()) else {
        return format!("Plot: {} | no data\n", series.label());
    };

    let width = width.max(1);
    let height = height.max(2);
    let y_max = if y_max > 0.0 { y_max } else { 1.0 };

    let columns = bucket_values(observations, series, width);
    let mut grid = vec![vec![' '; columns.len()]; height];

    for (x, &v) in columns.iter().enumerate() {
        let filled = scaled_height(v, y_max, height);
        if filled == 0 {
            continue;
        }
        let top = height - filled;
        for (y, row) in grid.iter_mut().enumerate().skip(top) {
            row[x] = if series.is_bar() {
                '#'
            } else if y == top {
                'o'
            } else {
                '.'
            };
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: {} | {} .. {} | y=[0.0, {y_max:.1}]\n",
        series.label(),
        first.date(),
        last.date(),
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out
}

/// Horizontal bars, one per category that has at least one day.
pub fn render_intensity_bars(histogram: &IntensityHistogram, width: usize) -> String {
    let max = histogram.max_count();
    if max == 0 {
        return "Distribusi: no data\n".to_string();
    }
    let width = width.max(1);

    let mut out = String::new();
    out.push_str("Distribusi intensitas (hari):\n");
    for (intensity, count) in histogram.iter().filter(|&(_, c)| c > 0) {
        let len = ((count as f64 / max as f64) * width as f64).round().max(1.0) as usize;
        out.push_str(&format!(
            "{:<12} |{} {count}\n",
            intensity.label(),
            "#".repeat(len)
        ));
    }
    out
}

fn bucket_values(observations: &[Observation], series: Series, width: usize) -> Vec<f64> {
    let n = observations.len();
    let cols = n.min(width);
    let mut out = Vec::with_capacity(cols);
    for c in 0..cols {
        let lo = c * n / cols;
        let hi = ((c + 1) * n / cols).max(lo + 1);
        let values = observations[lo..hi].iter().map(|o| series.value(o));
        let v = if series.is_bar() {
            values.fold(0.0, f64::max)
        } else {
            let len = (hi - lo) as f64;
            values.sum::<f64>() / len
        };
        out.push(v);
    }
    out
}

fn scaled_height(v: f64, y_max: f64, height: usize) -> usize {
    if !v.is_finite() || v <= 0.0 {
        return 0;
    }
    let u = (v / y_max).clamp(0.0, 1.0);
    (u * height as f64).round() as usize
}
