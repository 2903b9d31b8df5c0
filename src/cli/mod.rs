//! Command-line parsing for the rainfall dashboard.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! acquisition and aggregation code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::Level;

use crate::domain::ChartKind;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "hujan", version, about = "Daily rainfall dataset and period dashboard")]
pub struct Cli {
    /// Logging verbosity: trace, debug, info, warn or error.
    #[arg(long, global = true, default_value_t = Level::INFO)]
    pub log_level: Level,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Download daily readings from the Open-Meteo archive and write the dataset.
    Fetch(FetchArgs),
    /// Summarize a period of the dataset (the default command).
    Summary(SummaryArgs),
    /// List the years and date span available in the dataset.
    Years(YearsArgs),
}

#[derive(Debug, Parser, Clone)]
pub struct FetchArgs {
    /// First day to fetch (YYYY-MM-DD).
    #[arg(long, default_value = "2023-01-01")]
    pub start: NaiveDate,

    /// Last day to fetch (YYYY-MM-DD).
    #[arg(long, default_value = "2025-12-31")]
    pub end: NaiveDate,

    /// Station latitude (defaults to Stasiun Geofisika Bandung).
    #[arg(long, allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Station longitude.
    #[arg(long, allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// Dataset file to write (overwritten). Defaults to $HUJAN_DATASET.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Archive endpoint. Defaults to $HUJAN_ARCHIVE_URL or Open-Meteo.
    #[arg(long)]
    pub archive_url: Option<String>,

    /// Request timeout in seconds. Defaults to $HUJAN_TIMEOUT_SECS or 10.
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Timezone used by the archive to cut days.
    #[arg(long, default_value = crate::data::open_meteo::DEFAULT_TIMEZONE)]
    pub timezone: String,

    /// Rows to show in the post-download preview.
    #[arg(long, default_value_t = 10)]
    pub preview: usize,
}

#[derive(Debug, Parser, Clone, Default)]
pub struct SummaryArgs {
    /// Dataset file to read. Defaults to $HUJAN_DATASET.
    #[arg(short, long)]
    pub dataset: Option<PathBuf>,

    /// Summarize one calendar year. Defaults to the latest year in the dataset.
    #[arg(short, long, conflicts_with_all = ["start", "end"])]
    pub year: Option<i32>,

    /// Custom range start (YYYY-MM-DD). Defaults to the first day in the dataset.
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Custom range end (YYYY-MM-DD). Defaults to the last day in the dataset.
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Show the station marker card.
    #[arg(long)]
    pub map: bool,

    /// Render a terminal chart.
    #[arg(long, value_enum)]
    pub chart: Option<ChartKind>,

    /// Print the filtered rows.
    #[arg(long)]
    pub rows: bool,

    /// Chart width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Chart height (rows).
    #[arg(long, default_value_t = 15)]
    pub height: usize,

    /// Write the period summary to a JSON file.
    #[arg(long = "export-summary", value_name = "JSON")]
    pub export_summary: Option<PathBuf>,
}

#[derive(Debug, Parser, Clone)]
pub struct YearsArgs {
    /// Dataset file to read. Defaults to $HUJAN_DATASET.
    #[arg(short, long)]
    pub dataset: Option<PathBuf>,
}
