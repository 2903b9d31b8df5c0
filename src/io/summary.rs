//! Write a period summary as JSON.
//!
//! This is the portable form of what the dashboard shows for one period:
//! station, bounds, scalar aggregates, status and the intensity histogram.

use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{DateRange, PeriodSummary, Station};
use crate::error::AppError;

#[derive(Debug, Serialize)]
pub struct SummaryFile<'a> {
    pub tool: &'static str,
    pub station: &'a Station,
    pub period_label: &'a str,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub summary: &'a PeriodSummary,
}

pub fn write_summary_json(
    path: &Path,
    station: &Station,
    range: &DateRange,
    period_label: &str,
    summary: &PeriodSummary,
) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create summary JSON '{}': {e}", path.display())))?;

    let out = SummaryFile {
        tool: "hujan",
        station,
        period_label,
        start: range.start(),
        end: range.end(),
        summary,
    };

    serde_json::to_writer_pretty(file, &out)
        .map_err(|e| AppError::io(format!("Failed to write summary JSON: {e}")))?;

    Ok(())
}
