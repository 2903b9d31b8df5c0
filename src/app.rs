//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and environment defaults
//! - installs the log subscriber
//! - runs the acquirer or the aggregator
//! - prints reports/charts and writes optional exports

use clap::Parser;
use tracing::Level;

use crate::aggregate::Dataset;
use crate::cli::{Command, FetchArgs, SummaryArgs, YearsArgs};
use crate::domain::{AcquireConfig, ChartKind, PeriodRequest, Station, SummaryConfig};
use crate::error::AppError;
use crate::plot::Series;
use crate::settings::Settings;

pub mod pipeline;

/// Entry point for the `hujan` binary.
pub fn run() -> Result<(), AppError> {
    // `hujan` and `hujan --year 2024` behave like `hujan summary ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);
    init_logging(cli.log_level);

    let settings = Settings::from_env()?;

    match cli.command {
        Command::Fetch(args) => handle_fetch(&args, &settings),
        Command::Summary(args) => handle_summary(&args, &settings),
        Command::Years(args) => handle_years(&args, &settings),
    }
}

/// Logs go to stderr so stdout carries only reports.
fn init_logging(level: Level) {
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to set tracing subscriber: {e}");
    }
}

fn handle_fetch(args: &FetchArgs, settings: &Settings) -> Result<(), AppError> {
    let config = acquire_config_from_args(args, settings)?;

    let Some(observations) = pipeline::run_acquire(&config) else {
        return Err(AppError::fetch(format!(
            "No dataset produced; '{}' was not modified.",
            config.output.display()
        )));
    };

    println!(
        "{}",
        crate::report::format_fetch_report(&observations, &config.output, config.preview_rows)
    );
    Ok(())
}

fn handle_summary(args: &SummaryArgs, settings: &Settings) -> Result<(), AppError> {
    let config = summary_config_from_args(args, settings);

    // Loaded once; everything below borrows it.
    let dataset = Dataset::load(&config.dataset)?;
    let run = pipeline::run_summary(&dataset, config.period)?;

    println!(
        "{}",
        crate::report::format_summary(&config.station, &run.period_label, &run.summary)
    );
    println!("{}", crate::report::format_distribution(&run.summary.histogram));

    if let Some(chart) = config.chart {
        let rain_cap = crate::plot::rainfall_axis_max(dataset.max_rainfall_mm());
        let daily = [
            (ChartKind::Rain, Series::Rainfall, rain_cap),
            (ChartKind::Wind, Series::Wind, crate::plot::WIND_AXIS_MAX),
            (ChartKind::Temp, Series::Temperature, crate::plot::TEMP_AXIS_MAX),
        ];
        for (kind, series, y_max) in daily {
            if chart.includes(kind) {
                println!(
                    "{}",
                    crate::plot::render_daily_chart(
                        &run.filtered,
                        series,
                        y_max,
                        config.plot_width,
                        config.plot_height,
                    )
                );
            }
        }
        if chart.includes(ChartKind::Intensity) {
            println!(
                "{}",
                crate::plot::render_intensity_bars(&run.summary.histogram, config.plot_width / 2)
            );
        }
    }

    if config.show_rows {
        println!("{}", crate::report::format_rows(&run.filtered));
    }

    if config.show_map {
        println!(
            "{}",
            crate::report::format_station_card(&config.station, &run.period_label, &run.summary)
        );
    }

    if let Some(path) = &config.export_summary {
        crate::io::summary::write_summary_json(path, &config.station, &run.range, &run.period_label, &run.summary)?;
        tracing::info!(message = "summary exported", path = %path.display());
    }

    Ok(())
}

fn handle_years(args: &YearsArgs, settings: &Settings) -> Result<(), AppError> {
    let path = args.dataset.clone().unwrap_or_else(|| settings.dataset.clone());
    let dataset = Dataset::load(&path)?;
    println!(
        "{}",
        crate::report::format_years(&dataset.years(), dataset.date_bounds())
    );
    Ok(())
}

pub fn acquire_config_from_args(args: &FetchArgs, settings: &Settings) -> Result<AcquireConfig, AppError> {
    if args.start > args.end {
        return Err(AppError::usage(format!(
            "Invalid fetch range: start {} is after end {}.",
            args.start, args.end
        )));
    }

    let mut station = Station::bandung();
    if let Some(lat) = args.lat {
        station.latitude = lat;
    }
    if let Some(lon) = args.lon {
        station.longitude = lon;
    }

    let timeout = match args.timeout_secs {
        Some(0) => return Err(AppError::usage("--timeout-secs must be positive.")),
        Some(secs) => std::time::Duration::from_secs(secs),
        None => settings.timeout,
    };

    Ok(AcquireConfig {
        station,
        start: args.start,
        end: args.end,
        archive_url: args.archive_url.clone().unwrap_or_else(|| settings.archive_url.clone()),
        timezone: args.timezone.clone(),
        timeout,
        output: args.output.clone().unwrap_or_else(|| settings.dataset.clone()),
        preview_rows: args.preview,
    })
}

pub fn summary_config_from_args(args: &SummaryArgs, settings: &Settings) -> SummaryConfig {
    let period = match (args.year, args.start, args.end) {
        (Some(year), _, _) => PeriodRequest::Year(year),
        (None, None, None) => PeriodRequest::LatestYear,
        (None, start, end) => PeriodRequest::Custom { start, end },
    };

    SummaryConfig {
        dataset: args.dataset.clone().unwrap_or_else(|| settings.dataset.clone()),
        period,
        station: Station::bandung(),
        show_map: args.map,
        chart: args.chart,
        show_rows: args.rows,
        plot_width: args.width,
        plot_height: args.height,
        export_summary: args.export_summary.clone(),
    }
}

/// Rewrite argv so `hujan` defaults to `hujan summary`.
///
/// Rules:
/// - `hujan`                       -> `hujan summary`
/// - `hujan --year 2024 ...`       -> `hujan summary --year 2024 ...`
/// - `hujan --help/--version/-h`   -> unchanged
/// - any argv naming a subcommand  -> unchanged
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("summary".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let names_subcommand = argv
        .iter()
        .skip(1)
        .any(|a| matches!(a.as_str(), "fetch" | "summary" | "years"));
    if names_subcommand {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "summary".to_string());
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_summary() {
        assert_eq!(rewrite_args(argv(&["hujan"])), argv(&["hujan", "summary"]));
        assert_eq!(
            rewrite_args(argv(&["hujan", "--year", "2024"])),
            argv(&["hujan", "summary", "--year", "2024"])
        );
        assert_eq!(
            rewrite_args(argv(&["hujan", "--log-level", "debug", "fetch"])),
            argv(&["hujan", "--log-level", "debug", "fetch"])
        );
        assert_eq!(rewrite_args(argv(&["hujan", "--help"])), argv(&["hujan", "--help"]));
    }

    #[test]
    fn summary_period_from_flags() {
        let settings = Settings::default();

        let latest = summary_config_from_args(&SummaryArgs::default(), &settings);
        assert_eq!(latest.period, PeriodRequest::LatestYear);
        assert_eq!(latest.dataset, settings.dataset);

        let year = SummaryArgs {
            year: Some(2023),
            ..SummaryArgs::default()
        };
        assert_eq!(summary_config_from_args(&year, &settings).period, PeriodRequest::Year(2023));

        let start = NaiveDate::from_ymd_opt(2024, 3, 1);
        let custom = SummaryArgs {
            start,
            ..SummaryArgs::default()
        };
        assert_eq!(
            summary_config_from_args(&custom, &settings).period,
            PeriodRequest::Custom { start, end: None }
        );
    }

    #[test]
    fn fetch_config_validates_range_and_uses_settings() {
        let cli = crate::cli::Cli::try_parse_from(["hujan", "fetch", "--start", "2024-02-01", "--end", "2024-01-01"])
            .unwrap();
        let Command::Fetch(args) = cli.command else {
            panic!("expected fetch");
        };
        let err = acquire_config_from_args(&args, &Settings::default()).unwrap_err();
        assert_eq!(err.exit_code(), 2);

        let cli = crate::cli::Cli::try_parse_from(["hujan", "fetch", "--lat", "-7.0"]).unwrap();
        let Command::Fetch(args) = cli.command else {
            panic!("expected fetch");
        };
        let config = acquire_config_from_args(&args, &Settings::default()).unwrap();
        assert_eq!(config.station.latitude, -7.0);
        assert_eq!(config.station.longitude, 107.6025);
        assert_eq!(config.archive_url, crate::data::open_meteo::DEFAULT_ARCHIVE_URL);
        assert_eq!(config.output, Settings::default().dataset);
    }
}
