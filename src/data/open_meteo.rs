//! Open-Meteo archive API integration (daily station readings).

use std::collections::HashSet;
use std::time::Duration;

use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::domain::Observation;
use crate::error::AppError;

pub const DEFAULT_ARCHIVE_URL: &str = "https://archive-api.open-meteo.com/v1/archive";
pub const DEFAULT_TIMEZONE: &str = "Asia/Jakarta";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const DAILY_FIELDS: &str = "precipitation_sum,temperature_2m_max,temperature_2m_min,wind_speed_10m_max";

pub struct ArchiveClient {
    client: Client,
    base_url: String,
    timezone: String,
}

impl ArchiveClient {
    pub fn new(base_url: &str, timezone: &str, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::fetch(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.to_string(),
            timezone: timezone.to_string(),
        })
    }

    /// Fetch one observation per day in `start..=end`, in date order.
    ///
    /// Exactly one request is made; there is no retry.
    pub fn fetch_range(
        &self,
        latitude: f64,
        longitude: f64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Observation>, AppError> {
        if start > end {
            return Err(AppError::usage(format!(
                "Invalid fetch range: start {start} is after end {end}."
            )));
        }

        tracing::debug!(
            message = "requesting daily archive",
            url = %self.base_url,
            latitude,
            longitude,
            start = %start,
            end = %end,
        );

        let resp = self
            .client
            .get(&self.base_url)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("start_date", start.to_string()),
                ("end_date", end.to_string()),
                ("daily", DAILY_FIELDS.to_string()),
                ("temperature_unit", "celsius".to_string()),
                ("wind_speed_unit", "kmh".to_string()),
                ("timezone", self.timezone.clone()),
            ])
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::fetch(format!("Archive request timed out: {e}"))
                } else {
                    AppError::fetch(format!("Archive request failed: {e}"))
                }
            })?;

        if !resp.status().is_success() {
            return Err(AppError::fetch(format!(
                "Archive request failed with status {}.",
                resp.status()
            )));
        }

        let body: ArchiveResponse = resp
            .json()
            .map_err(|e| AppError::fetch(format!("Failed to parse archive response: {e}")))?;

        observations_from_response(body)
    }
}

#[derive(Debug, Deserialize)]
pub struct ArchiveResponse {
    daily: DailyReadings,
}

/// Parallel arrays keyed by position; `time[i]` is the date of every `*[i]`.
#[derive(Debug, Deserialize)]
struct DailyReadings {
    time: Vec<String>,
    precipitation_sum: Vec<Option<f64>>,
    temperature_2m_max: Vec<Option<f64>>,
    temperature_2m_min: Vec<Option<f64>>,
    wind_speed_10m_max: Vec<Option<f64>>,
}

/// Turn the archive's parallel arrays into observations.
///
/// A day with no wind or temperature reading is dropped (the archive returns
/// nulls for days it has not published yet). A missing precipitation value
/// keeps the day, classified `N/A`.
pub fn observations_from_response(body: ArchiveResponse) -> Result<Vec<Observation>, AppError> {
    let daily = body.daily;
    let n = daily.time.len();

    let lengths = [
        ("precipitation_sum", daily.precipitation_sum.len()),
        ("temperature_2m_max", daily.temperature_2m_max.len()),
        ("temperature_2m_min", daily.temperature_2m_min.len()),
        ("wind_speed_10m_max", daily.wind_speed_10m_max.len()),
    ];
    for (field, len) in lengths {
        if len != n {
            return Err(AppError::fetch(format!(
                "Archive field `{field}` has {len} values for {n} dates."
            )));
        }
    }

    let mut seen = HashSet::with_capacity(n);
    let mut out = Vec::with_capacity(n);
    let mut dropped = 0usize;

    for (i, raw_date) in daily.time.iter().enumerate() {
        let date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d")
            .map_err(|e| AppError::fetch(format!("Invalid archive date '{raw_date}': {e}")))?;
        if !seen.insert(date) {
            return Err(AppError::fetch(format!("Archive returned {date} more than once.")));
        }

        let readings = (
            daily.temperature_2m_max[i],
            daily.temperature_2m_min[i],
            daily.wind_speed_10m_max[i],
        );
        let (Some(temp_max), Some(temp_min), Some(wind)) = readings else {
            dropped += 1;
            tracing::warn!(message = "dropping day with incomplete readings", date = %date);
            continue;
        };

        out.push(Observation::from_daily(
            date,
            daily.precipitation_sum[i],
            temp_max,
            temp_min,
            wind,
        ));
    }

    out.sort_by_key(|o| o.date());

    if dropped > 0 {
        tracing::info!(message = "archive days skipped", dropped, kept = out.len());
    }

    Ok(out)
}
