mod ephemeris;
mod predict;
mod tracker;
mod web;

use chrono::{DateTime, Utc};
use clap::{CommandFactory, Parser, Subcommand};
use std::process::ExitCode;

use crate::predict::{
    predict_passes, warn_if_stale, GroundStation, PassReport, PredictError, TleSet,
    OBSERVER_ELEVATION_M,
};
use crate::tracker::current_position;

#[derive(Parser)]
#[command(name = "passview")]
#[command(about = "Visible satellite pass predictions")]
#[command(args_conflicts_with_subcommands = true, allow_negative_numbers = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    /// TLE as a JSON array: ["name", "line 1", "line 2"]
    tle: Option<String>,
    /// Observer longitude in degrees
    lon: Option<f64>,
    /// Observer latitude in degrees
    lat: Option<f64>,
    /// Number of days to search forward
    days: Option<i64>,
    /// Start of the search (RFC3339), defaults to now
    #[arg(long, value_parser = parse_datetime)]
    start: Option<DateTime<Utc>>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the current position of a satellite
    Track {
        /// TLE as a JSON array: ["name", "line 1", "line 2"]
        tle: String,
        /// Instant to evaluate (RFC3339), defaults to now
        #[arg(long, value_parser = parse_datetime)]
        at: Option<DateTime<Utc>>,
    },
    /// Serve predictions over HTTP
    Serve {
        #[arg(long)]
        config: String,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Track { tle, at }) => track(&tle, at.unwrap_or_else(Utc::now)),
        Some(Commands::Serve { config }) => serve(&config),
        None => match (cli.tle, cli.lon, cli.lat, cli.days) {
            (Some(tle), Some(lon), Some(lat), Some(days)) => {
                predict(&tle, lon, lat, days, cli.start.unwrap_or_else(Utc::now))
            }
            _ => {
                eprintln!(
                    "error: missing arguments\n\n{}",
                    Cli::command().render_usage()
                );
                ExitCode::from(2)
            }
        },
    }
}

fn predict(tle: &str, lon: f64, lat: f64, days: i64, start: DateTime<Utc>) -> ExitCode {
    let passes = match run_prediction(tle, lon, lat, days, start) {
        Ok(passes) => passes,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    print_json(&passes)
}

fn run_prediction(
    tle: &str,
    lon: f64,
    lat: f64,
    days: i64,
    start: DateTime<Utc>,
) -> Result<Vec<PassReport>, PredictError> {
    let ephemeris = TleSet::from_json(tle)?.ephemeris()?;
    warn_if_stale(&ephemeris, start);
    let station = GroundStation::new(lat, lon, OBSERVER_ELEVATION_M);
    predict_passes(&ephemeris, station, start, days)
}

fn track(tle: &str, at: DateTime<Utc>) -> ExitCode {
    let position = TleSet::from_json(tle)
        .and_then(|t| t.ephemeris())
        .and_then(|ephemeris| current_position(&ephemeris, at));

    match position {
        Ok(position) => print_json(&position),
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn serve(path: &str) -> ExitCode {
    let config = match web::Config::from_file(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(web::run_server(config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string(value) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| e.to_string())
}
