//! Environment-provided defaults.
//!
//! `.env` is loaded if present. Values here are fallbacks; explicit CLI flags
//! always win.

use std::path::PathBuf;
use std::time::Duration;

use crate::data::open_meteo::{DEFAULT_ARCHIVE_URL, DEFAULT_TIMEOUT};
use crate::error::AppError;
use crate::io::dataset::DEFAULT_DATASET_PATH;

pub const ENV_DATASET: &str = "HUJAN_DATASET";
pub const ENV_ARCHIVE_URL: &str = "HUJAN_ARCHIVE_URL";
pub const ENV_TIMEOUT_SECS: &str = "HUJAN_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub dataset: PathBuf,
    pub archive_url: String,
    pub timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dataset: PathBuf::from(DEFAULT_DATASET_PATH),
            archive_url: DEFAULT_ARCHIVE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (the process environment in practice).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let mut settings = Settings::default();
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(path) = non_empty(ENV_DATASET) {
            settings.dataset = PathBuf::from(path);
        }
        if let Some(url) = non_empty(ENV_ARCHIVE_URL) {
            settings.archive_url = url;
        }
        if let Some(raw) = non_empty(ENV_TIMEOUT_SECS) {
            let secs = raw
                .parse::<u64>()
                .ok()
                .filter(|&s| s > 0)
                .ok_or_else(|| AppError::usage(format!("{ENV_TIMEOUT_SECS} must be a positive integer, got '{raw}'.")))?;
            settings.timeout = Duration::from_secs(secs);
        }

        Ok(settings)
    }
}
