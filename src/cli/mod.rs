//! Command-line parsing for the `crr` calculator.
//!
//! Parsing only: flags are turned into a `RunConfig` in `app`, and all range
//! checks happen in the domain layer.

use std::path::PathBuf;

use clap::Parser;

use crate::domain::{
    DEFAULT_DIA_DRUM_MM, DEFAULT_DIA_WHEEL_MM, DEFAULT_REAR_MASS_PERCENT, DEFAULT_RIDER_MASS_KG,
    DEFAULT_ROLLER_SPREAD_MM, ElapsedTime,
};

/// Top-level CLI.
///
/// Measurement flags keep their snake_case spelling so existing shell history
/// and scripts continue to work.
#[derive(Debug, Parser, Clone)]
#[command(
    name = "crr",
    version,
    about = "Tire rolling-resistance (Crr) calculator for roller-trainer trials"
)]
pub struct Cli {
    /// Rider plus bike mass (kg).
    #[arg(long = "rider_mass_kg", default_value_t = DEFAULT_RIDER_MASS_KG)]
    pub rider_mass_kg: f64,

    /// Share of the mass on the rear wheel (percent, 0-100).
    #[arg(long = "rear_mass_percent", default_value_t = DEFAULT_REAR_MASS_PERCENT)]
    pub rear_mass_percent: f64,

    /// Outer wheel diameter including the tire (mm).
    #[arg(long = "dia_wheel_mm", default_value_t = DEFAULT_DIA_WHEEL_MM)]
    pub dia_wheel_mm: f64,

    /// Roller drum diameter (mm).
    #[arg(long = "dia_drum_mm", default_value_t = DEFAULT_DIA_DRUM_MM)]
    pub dia_drum_mm: f64,

    /// Center-to-center distance between the two rear rollers (mm).
    #[arg(long = "roller_spread_mm", default_value_t = DEFAULT_ROLLER_SPREAD_MM)]
    pub roller_spread_mm: f64,

    /// Elapsed trial time as HH:MM:SS. Hours may exceed 24; minutes and
    /// seconds must be 00-59 (write 01:15:00, not 00:75:00).
    #[arg(long, value_name = "HH:MM:SS", value_parser = parse_hms)]
    pub hms: ElapsedTime,

    /// Distance covered during the trial (m).
    #[arg(long = "distance_meters")]
    pub distance_meters: f64,

    /// Average power over the trial (W).
    #[arg(long = "avg_watts")]
    pub avg_watts: f64,

    /// Tire pressure, recorded in the log only (psi).
    #[arg(long = "tire_pressure_psi")]
    pub tire_pressure_psi: Option<f64>,

    /// Tire name, recorded in the log only.
    #[arg(long = "tire_name", default_value = "")]
    pub tire_name: String,

    /// Trial log CSV. Defaults to $CRR_LOG_FILE, then `tire_data.csv`.
    #[arg(long = "log-file", value_name = "CSV")]
    pub log_file: Option<PathBuf>,

    /// Do not append this trial to the log.
    #[arg(long = "no-log", conflicts_with = "show_log")]
    pub no_log: bool,

    /// Print the whole trial log after appending.
    #[arg(long = "show-log")]
    pub show_log: bool,

    /// Print intermediate values (elapsed seconds, drum speed, effective mass).
    #[arg(short, long)]
    pub verbose: bool,

    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,
}

fn parse_hms(s: &str) -> Result<ElapsedTime, String> {
    s.parse::<ElapsedTime>().map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUIRED: [&str; 7] = [
        "crr",
        "--hms",
        "01:00:00",
        "--distance_meters",
        "40000",
        "--avg_watts",
        "281",
    ];

    #[test]
    fn required_flags_with_defaults() {
        let cli = Cli::try_parse_from(REQUIRED).unwrap();
        assert_eq!(cli.hms, ElapsedTime::new(1, 0, 0));
        assert_eq!(cli.distance_meters, 40_000.0);
        assert_eq!(cli.avg_watts, 281.0);
        assert_eq!(cli.rider_mass_kg, DEFAULT_RIDER_MASS_KG);
        assert_eq!(cli.roller_spread_mm, DEFAULT_ROLLER_SPREAD_MM);
        assert_eq!(cli.tire_pressure_psi, None);
        assert!(cli.tire_name.is_empty());
        assert!(!cli.no_log);
    }

    #[test]
    fn overrides_and_tire_metadata() {
        let mut argv = REQUIRED.to_vec();
        argv.extend([
            "--rider_mass_kg",
            "103",
            "--roller_spread_mm",
            "257",
            "--tire_pressure_psi",
            "80",
            "--tire_name",
            "GP5000 28c",
        ]);
        let cli = Cli::try_parse_from(argv).unwrap();
        assert_eq!(cli.rider_mass_kg, 103.0);
        assert_eq!(cli.tire_pressure_psi, Some(80.0));
        assert_eq!(cli.tire_name, "GP5000 28c");
    }

    #[test]
    fn missing_required_flag_is_an_error() {
        let err =
            Cli::try_parse_from(["crr", "--hms", "01:00:00", "--avg_watts", "281"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn malformed_hms_is_an_error() {
        let err = Cli::try_parse_from([
            "crr",
            "--hms",
            "1h30m",
            "--distance_meters",
            "40000",
            "--avg_watts",
            "281",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn non_numeric_value_is_an_error() {
        let mut argv = REQUIRED.to_vec();
        argv.extend(["--dia_drum_mm", "big"]);
        assert!(Cli::try_parse_from(argv).is_err());
    }
}
