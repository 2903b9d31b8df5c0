//! Dataset artifact read/write.
//!
//! The artifact is a CSV file with a fixed column contract shared by the
//! acquirer (writer) and the aggregator (reader):
//!
//! | column                   | content                                  |
//! |--------------------------|------------------------------------------|
//! | `Tanggal`                | ISO date                                 |
//! | `Curah Hujan (mm)`       | rainfall, empty when the reading was N/A |
//! | `Kecepatan Angin (km/h)` | max wind speed                           |
//! | `Intensitas`             | intensity label                          |
//! | `Suhu rata-rata (°C)`    | average temperature                      |

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use csv::StringRecord;

use crate::domain::{Intensity, Observation};
use crate::error::{AppError, ErrorKind};

pub const COL_DATE: &str = "Tanggal";
pub const COL_RAINFALL: &str = "Curah Hujan (mm)";
pub const COL_WIND: &str = "Kecepatan Angin (km/h)";
pub const COL_INTENSITY: &str = "Intensitas";
pub const COL_AVG_TEMP: &str = "Suhu rata-rata (°C)";

/// Column order of the artifact.
pub const COLUMNS: [&str; 5] = [COL_DATE, COL_RAINFALL, COL_WIND, COL_INTENSITY, COL_AVG_TEMP];

pub const DEFAULT_DATASET_PATH: &str = "curah_hujan_bandung.csv";

/// A row that could not be turned into an observation.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Rows read back from an artifact.
#[derive(Debug, Clone)]
pub struct LoadedRows {
    /// Sorted by date, one per date.
    pub observations: Vec<Observation>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    /// Rows whose stored `Intensitas` disagreed with the re-derived value.
    pub intensity_mismatches: usize,
}

/// Render observations as CSV bytes in the artifact layout.
pub fn render_dataset_csv(observations: &[Observation]) -> Result<Vec<u8>, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(COLUMNS)
        .map_err(|e| AppError::io(format!("Failed to render dataset header: {e}")))?;

    for obs in observations {
        let rainfall = obs.rainfall_reading().map(|v| v.to_string()).unwrap_or_default();
        writer
            .write_record([
                obs.date().format("%Y-%m-%d").to_string(),
                rainfall,
                obs.wind_speed_kmh().to_string(),
                obs.intensity().label().to_string(),
                obs.avg_temp_c().to_string(),
            ])
            .map_err(|e| AppError::io(format!("Failed to render dataset row {}: {e}", obs.date())))?;
    }

    writer
        .into_inner()
        .map_err(|e| AppError::io(format!("Failed to finish dataset CSV: {e}")))
}

/// Write the dataset, replacing any existing file at `path`.
///
/// The whole file is rendered in memory first, written to a sibling temp file
/// and renamed into place, so an interrupted run never leaves a half-written
/// artifact at `path`.
pub fn write_dataset_csv(path: &Path, observations: &[Observation]) -> Result<(), AppError> {
    let bytes = render_dataset_csv(observations)?;
    let tmp = temp_path_for(path);

    if let Err(e) = fs::write(&tmp, &bytes) {
        let _ = fs::remove_file(&tmp);
        return Err(AppError::io(format!("Failed to write '{}': {e}", tmp.display())));
    }

    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(AppError::io(format!(
            "Failed to move dataset into place at '{}': {e}",
            path.display()
        )));
    }

    tracing::debug!(message = "dataset written", path = %path.display(), bytes = bytes.len());
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "dataset".into());
    name.push(".tmp");
    path.with_file_name(name)
}

/// Read an artifact written by [`write_dataset_csv`].
///
/// A missing file is [`ErrorKind::MissingArtifact`]. Bad rows are skipped and
/// reported; a repeated date makes the whole artifact invalid.
pub fn read_dataset_csv(path: &Path) -> Result<LoadedRows, AppError> {
    let file = fs::File::open(path).map_err(|e| {
        if e.kind() == IoErrorKind::NotFound {
            AppError::new(
                ErrorKind::MissingArtifact,
                format!(
                    "Dataset '{}' not found. Run `hujan fetch` first.",
                    path.display()
                ),
            )
        } else {
            AppError::invalid_artifact(format!("Failed to open dataset '{}': {e}", path.display()))
        }
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::invalid_artifact(format!("Failed to read dataset headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);
    for column in COLUMNS {
        if !header_map.contains_key(column) {
            return Err(AppError::invalid_artifact(format!(
                "Dataset '{}' is missing column `{column}`.",
                path.display()
            )));
        }
    }

    let mut observations = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;
    let mut intensity_mismatches = 0usize;
    let mut seen = HashSet::new();

    for (idx, result) in reader.records().enumerate() {
        // +2: header is line 1.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        let (obs, stored) = match parse_row(&record, &header_map) {
            Ok(parsed) => parsed,
            Err(message) => {
                row_errors.push(RowError { line, message });
                continue;
            }
        };

        if !seen.insert(obs.date()) {
            return Err(AppError::invalid_artifact(format!(
                "Dataset '{}' has more than one row for {} (line {line}).",
                path.display(),
                obs.date()
            )));
        }

        if stored != Some(obs.intensity()) {
            intensity_mismatches += 1;
            tracing::warn!(
                message = "stored intensity disagrees with rainfall; using derived value",
                line,
                date = %obs.date(),
                derived = %obs.intensity(),
            );
        }

        observations.push(obs);
    }

    for err in &row_errors {
        tracing::warn!(message = "skipping dataset row", line = err.line, reason = %err.message);
    }

    observations.sort_by_key(|o| o.date());

    Ok(LoadedRows {
        observations,
        row_errors,
        rows_read,
        intensity_mismatches,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        // Spreadsheet exports may prefix the first header with a BOM.
        .map(|(idx, name)| (name.trim().trim_start_matches('\u{feff}').to_string(), idx))
        .collect()
}

fn get<'a>(record: &'a StringRecord, header_map: &HashMap<String, usize>, column: &str) -> Option<&'a str> {
    header_map
        .get(column)
        .and_then(|&idx| record.get(idx))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn parse_row(
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
) -> Result<(Observation, Option<Intensity>), String> {
    let raw_date = get(record, header_map, COL_DATE).ok_or_else(|| format!("Missing `{COL_DATE}`."))?;
    let date = parse_date(raw_date)?;

    let rainfall = get(record, header_map, COL_RAINFALL).and_then(|s| s.parse::<f64>().ok());
    let wind = parse_required_f64(record, header_map, COL_WIND)?;
    if wind < 0.0 {
        return Err(format!("Negative `{COL_WIND}` value '{wind}'."));
    }
    let avg_temp = parse_required_f64(record, header_map, COL_AVG_TEMP)?;
    let stored = get(record, header_map, COL_INTENSITY).and_then(Intensity::from_label);

    Ok((Observation::new(date, rainfall, wind, avg_temp), stored))
}

fn parse_required_f64(
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
    column: &str,
) -> Result<f64, String> {
    let raw = get(record, header_map, column).ok_or_else(|| format!("Missing `{column}`."))?;
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(format!("Invalid `{column}` value '{raw}'.")),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    // Spreadsheet round-trips sometimes turn dates into midnight timestamps.
    let date_part = raw.split([' ', 'T']).next().unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|e| format!("Invalid date '{raw}': {e}"))
}
