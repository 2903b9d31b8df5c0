//! Formatted terminal output: period labels, metric cards, tables and the
//! station marker card.
//!
//! Formatting lives here so the aggregation code stays free of presentation
//! concerns and output changes stay local.

use std::path::Path;

use chrono::{Datelike, NaiveDate};

use crate::domain::{
    DateRange, Intensity, IntensityHistogram, Observation, PeriodRequest, PeriodSummary, Station, Status,
};

const MONTHS: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// `1 Januari 2024`.
pub fn format_indo_date(date: NaiveDate) -> String {
    let month = MONTHS[date.month0() as usize];
    format!("{} {month} {}", date.day(), date.year())
}

/// `Tahun 2024` when a year was requested, otherwise `start - end` even if
/// the custom range happens to cover a whole year.
pub fn format_period_label(request: PeriodRequest, range: &DateRange) -> String {
    match request {
        PeriodRequest::Year(_) | PeriodRequest::LatestYear => format!("Tahun {}", range.start().year()),
        PeriodRequest::Custom { .. } => format!(
            "{} - {}",
            format_indo_date(range.start()),
            format_indo_date(range.end())
        ),
    }
}

/// Marker text and color for a period status.
pub fn status_marker(status: Status) -> (&'static str, &'static str) {
    match status {
        Status::High => ("Curah Hujan Tinggi", "red"),
        Status::Medium => ("Curah Hujan Sedang", "orange"),
        Status::Low => ("Curah Hujan Rendah", "green"),
    }
}

/// Headline metrics for the period.
pub fn format_summary(station: &Station, period_label: &str, summary: &PeriodSummary) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== Dashboard Hujan | {} ===\n", station.name));
    out.push_str(&format!("Periode Analisis: {period_label}\n"));
    out.push_str(&format!("Total Hari: {}\n\n", summary.day_count));

    let cards = [
        ("Rata-rata Curah Hujan", summary.mean_rainfall_mm, "mm"),
        ("Curah Hujan Tertinggi", summary.max_rainfall_mm, "mm"),
        ("Rata-rata Kecepatan Angin", summary.mean_wind_kmh, "km/h"),
        ("Suhu Rata-rata", summary.mean_temp_c, "°C"),
    ];
    for (label, value, unit) in cards {
        out.push_str(&format!("{label:<26} {} {unit}\n", fmt_1(value)));
    }
    out.push_str(&format!(
        "{:<26} {} mm\n",
        "Total Curah Hujan",
        fmt_1(summary.total_rainfall_mm)
    ));

    let (status_text, _) = status_marker(summary.status);
    out.push_str(&format!("{:<26} {status_text}\n", "Status"));
    out
}

/// Day counts per category, zeros included, in fixed category order.
pub fn format_distribution(histogram: &IntensityHistogram) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<14} {:>10}\n", "Intensitas", "Total Hari"));
    out.push_str(&format!("{:-<14} {:->10}\n", "", ""));
    for (intensity, count) in histogram.iter() {
        out.push_str(&format!("{:<14} {count:>10}\n", intensity.label()));
    }
    out
}

/// Raw rows in artifact column order.
pub fn format_rows(observations: &[Observation]) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:<10} {:>16} {:>22} {:<12} {:>19}",
            "Tanggal", "Curah Hujan (mm)", "Kecepatan Angin (km/h)", "Intensitas", "Suhu rata-rata (°C)"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(format!("{:-<10} {:->16} {:->22} {:-<12} {:->19}", "", "", "", "", "").trim_end());
    out.push('\n');

    for obs in observations {
        out.push_str(
            format!(
                "{:<10} {:>16.1} {:>22.1} {:<12} {:>19.1}",
                obs.date().to_string(),
                obs.rainfall_mm(),
                obs.wind_speed_kmh(),
                obs.intensity().label(),
                obs.avg_temp_c(),
            )
            .trim_end(),
        );
        out.push('\n');
    }
    out
}

/// The map popup content as a text card.
pub fn format_station_card(station: &Station, period_label: &str, summary: &PeriodSummary) -> String {
    let (status_text, color) = status_marker(summary.status);
    let mut out = String::new();

    out.push_str(&format!(
        "[{color}] {} ({:.4}, {:.4})\n",
        station.name, station.latitude, station.longitude
    ));
    let rows = [
        ("Periode", period_label.to_string()),
        ("Total Curah Hujan", format!("{} mm", fmt_1(summary.total_rainfall_mm))),
        (
            "Angin Min/Max",
            format!("{} - {} km/h", fmt_1(summary.min_wind_kmh), fmt_1(summary.max_wind_kmh)),
        ),
        (
            "Suhu Min/Max",
            format!("{} - {} °C", fmt_1(summary.min_temp_c), fmt_1(summary.max_temp_c)),
        ),
        ("Total Hari", format!("{} Hari", summary.day_count)),
    ];
    for (label, value) in rows {
        out.push_str(&format!("  {label:<18}: {value}\n"));
    }
    out.push_str(&format!("  {}\n", status_text.to_uppercase()));
    out
}

/// Operator report printed after a successful acquisition run.
pub fn format_fetch_report(observations: &[Observation], output: &Path, preview_rows: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!("Data berhasil diunduh: {} records\n", observations.len()));
    out.push_str(&format!("File tersimpan: {}\n\n", output.display()));

    let preview = &observations[..observations.len().min(preview_rows)];
    out.push_str(&format!("Preview data ({} baris pertama):\n", preview.len()));
    out.push_str(&format_rows(preview));

    // Like a value count: only categories that occur, ordered by label.
    let histogram: IntensityHistogram = observations.iter().map(Observation::intensity).collect();
    let mut present: Vec<(Intensity, usize)> = histogram.iter().filter(|&(_, c)| c > 0).collect();
    present.sort_by_key(|(i, _)| i.label());
    out.push_str("\nStatistik intensitas curah hujan:\n");
    for (intensity, count) in present {
        out.push_str(&format!("{:<14} {count}\n", intensity.label()));
    }

    let summary = crate::aggregate::summarize(observations);
    out.push_str("\nRingkasan statistik:\n");
    out.push_str(&format!("Total hari: {}\n", summary.day_count));
    out.push_str(&format!("Total curah hujan: {:.2} mm\n", summary.total_rainfall_mm));
    out.push_str(&format!("Rata-rata curah hujan: {:.2} mm\n", summary.mean_rainfall_mm));
    out.push_str(&format!("Suhu rata-rata: {:.2} °C\n", summary.mean_temp_c));
    out.push_str(&format!("Rata-rata kecepatan angin: {:.2} km/h\n", summary.mean_wind_kmh));
    out
}

/// Years available for `--year`.
pub fn format_years(years: &[i32], bounds: Option<(NaiveDate, NaiveDate)>) -> String {
    let mut out = String::new();
    match bounds {
        Some((first, last)) => out.push_str(&format!(
            "Rentang data: {} - {}\n",
            format_indo_date(first),
            format_indo_date(last)
        )),
        None => out.push_str("Rentang data: kosong\n"),
    }
    let list: Vec<String> = years.iter().map(i32::to_string).collect();
    out.push_str(&format!("Tahun tersedia: {}\n", list.join(", ")));
    out
}

/// One decimal; never renders `NaN`.
fn fmt_1(v: f64) -> String {
    if v.is_finite() { format!("{v:.1}") } else { "0.0".to_string() }
}
