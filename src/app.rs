//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - sets up logging
//! - runs the trial pipeline
//! - prints the result (and optionally the trial log)

use std::ffi::OsString;
use std::io;

use clap::Parser;
use clap::error::ErrorKind;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::domain::{OutputFormat, RunConfig, TrialInput};
use crate::error::{AppError, EXIT_VALIDATION};
use crate::io::log::{LogSettings, read_trials};

pub mod pipeline;

/// Entry point for the `crr` binary.
pub fn run() -> Result<(), AppError> {
    run_from(std::env::args_os())
}

/// Same as [`run`] with an explicit argv (first element is the program name).
pub fn run_from<I, T>(argv: I) -> Result<(), AppError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(argv) {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            print!("{err}");
            return Ok(());
        }
        Err(err) => {
            return Err(AppError::new(
                EXIT_VALIDATION,
                format!("Validation error: {}", err.render().to_string().trim_end()),
            ));
        }
    };

    init_tracing(cli.verbose);

    let settings = LogSettings::from_env();
    let config = run_config_from_args(&cli, &settings);
    debug!(?config, "resolved run config");

    let output = pipeline::run_trial(&config)?;

    match config.format {
        OutputFormat::Text => {
            println!("{}", crate::report::format_result(&output.breakdown, &config));
        }
        OutputFormat::Json => {
            println!("{}", crate::report::format_result_json(&output.breakdown, &config)?);
        }
    }

    if config.show_log {
        if let Some(path) = &config.log_file {
            let records = read_trials(path)?;
            println!();
            println!("{}", crate::report::format_log_table(&records).trim_end());
        } else {
            warn!("--show-log ignored: logging is disabled");
        }
    }

    Ok(())
}

pub fn run_config_from_args(cli: &Cli, settings: &LogSettings) -> RunConfig {
    let log_file = if cli.no_log {
        None
    } else {
        Some(settings.resolve(cli.log_file.as_deref()))
    };

    RunConfig {
        input: TrialInput {
            rider_mass_kg: cli.rider_mass_kg,
            rear_mass_percent: cli.rear_mass_percent,
            dia_wheel_mm: cli.dia_wheel_mm,
            dia_drum_mm: cli.dia_drum_mm,
            roller_spread_mm: cli.roller_spread_mm,
            elapsed: cli.hms,
            distance_meters: cli.distance_meters,
            avg_watts: cli.avg_watts,
        },
        tire_pressure_psi: cli.tire_pressure_psi,
        tire_name: cli.tire_name.trim().to_string(),
        log_file,
        show_log: cli.show_log,
        verbose: cli.verbose,
        format: if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        },
    }
}

/// Diagnostics go to stderr; `RUST_LOG` overrides the level.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}
