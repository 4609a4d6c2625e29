//! Shared domain types.
//!
//! All lengths are millimeters, masses kilograms, power watts and distance
//! meters. There is no unit conversion anywhere in the crate; callers supply
//! values in these units.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CrrError;

pub const DEFAULT_RIDER_MASS_KG: f64 = 94.0;
pub const DEFAULT_REAR_MASS_PERCENT: f64 = 60.0;
pub const DEFAULT_DIA_WHEEL_MM: f64 = 689.0;
pub const DEFAULT_DIA_DRUM_MM: f64 = 85.0;
pub const DEFAULT_ROLLER_SPREAD_MM: f64 = 257.0;
pub const DEFAULT_LOG_FILE: &str = "tire_data.csv";

/// Defaults for the optional bike/stand measurements.
///
/// The CLI reads its defaults from here so tests can build inputs without
/// going through argument parsing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrialDefaults {
    pub rider_mass_kg: f64,
    pub rear_mass_percent: f64,
    pub dia_wheel_mm: f64,
    pub dia_drum_mm: f64,
    pub roller_spread_mm: f64,
}

impl Default for TrialDefaults {
    fn default() -> Self {
        Self {
            rider_mass_kg: DEFAULT_RIDER_MASS_KG,
            rear_mass_percent: DEFAULT_REAR_MASS_PERCENT,
            dia_wheel_mm: DEFAULT_DIA_WHEEL_MM,
            dia_drum_mm: DEFAULT_DIA_DRUM_MM,
            roller_spread_mm: DEFAULT_ROLLER_SPREAD_MM,
        }
    }
}

/// Elapsed ride time as entered on the command line (`HH:MM:SS`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ElapsedTime {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl ElapsedTime {
    pub fn new(hours: u32, minutes: u32, seconds: u32) -> Self {
        Self {
            hours,
            minutes,
            seconds,
        }
    }

    pub fn total_seconds(&self) -> u64 {
        u64::from(self.hours) * 3600 + u64::from(self.minutes) * 60 + u64::from(self.seconds)
    }
}

impl FromStr for ElapsedTime {
    type Err = CrrError;

    /// Parse `HH:MM:SS`.
    ///
    /// Hours are unbounded (long trainer sessions exceed a day); minutes and
    /// seconds must be below 60.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || CrrError::InvalidElapsedTime(s.to_string());

        let parts: Vec<&str> = s.trim().split(':').collect();
        let [h, m, sec] = parts.as_slice() else {
            return Err(bad());
        };

        let field = |p: &str| -> Result<u32, CrrError> {
            if p.is_empty() || !p.bytes().all(|b| b.is_ascii_digit()) {
                return Err(bad());
            }
            p.parse::<u32>().map_err(|_| bad())
        };

        let (hours, minutes, seconds) = (field(*h)?, field(*m)?, field(*sec)?);
        if minutes >= 60 || seconds >= 60 {
            return Err(bad());
        }

        Ok(Self::new(hours, minutes, seconds))
    }
}

impl fmt::Display for ElapsedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}

/// Measurements from a single roller trial.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrialInput {
    /// Rider plus bike.
    pub rider_mass_kg: f64,
    /// Share of the mass carried by the rear wheel, 0..=100.
    pub rear_mass_percent: f64,
    /// Outer wheel diameter including the tire.
    pub dia_wheel_mm: f64,
    pub dia_drum_mm: f64,
    /// Center-to-center distance of the two rear rollers.
    pub roller_spread_mm: f64,
    pub elapsed: ElapsedTime,
    pub distance_meters: f64,
    pub avg_watts: f64,
}

impl TrialInput {
    /// Build an input from the ride measurements, taking the stand and mass
    /// values from `defaults`.
    pub fn with_defaults(
        defaults: &TrialDefaults,
        elapsed: ElapsedTime,
        distance_meters: f64,
        avg_watts: f64,
    ) -> Self {
        Self {
            rider_mass_kg: defaults.rider_mass_kg,
            rear_mass_percent: defaults.rear_mass_percent,
            dia_wheel_mm: defaults.dia_wheel_mm,
            dia_drum_mm: defaults.dia_drum_mm,
            roller_spread_mm: defaults.roller_spread_mm,
            elapsed,
            distance_meters,
            avg_watts,
        }
    }

    /// Field-level range checks.
    ///
    /// Geometry and elapsed-time feasibility are checked by the calculator,
    /// which reports them as domain errors instead.
    pub fn validate(&self) -> Result<(), CrrError> {
        positive("rider_mass_kg", self.rider_mass_kg)?;
        positive("dia_wheel_mm", self.dia_wheel_mm)?;
        positive("dia_drum_mm", self.dia_drum_mm)?;
        positive("distance_meters", self.distance_meters)?;
        positive("avg_watts", self.avg_watts)?;

        finite("rear_mass_percent", self.rear_mass_percent)?;
        if !(0.0..=100.0).contains(&self.rear_mass_percent) {
            return Err(CrrError::invalid(
                "rear_mass_percent",
                format!("{} is outside 0..=100", self.rear_mass_percent),
            ));
        }

        finite("roller_spread_mm", self.roller_spread_mm)?;
        if self.roller_spread_mm < 0.0 {
            return Err(CrrError::invalid(
                "roller_spread_mm",
                format!("{} must not be negative", self.roller_spread_mm),
            ));
        }

        Ok(())
    }
}

/// Tire pressure is optional, but when given it must be a positive number.
pub fn validate_tire_pressure(psi: Option<f64>) -> Result<(), CrrError> {
    match psi {
        Some(value) => positive("tire_pressure_psi", value),
        None => Ok(()),
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), CrrError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(CrrError::invalid(field, format!("{value} is not a finite number")))
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), CrrError> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(CrrError::invalid(field, format!("{value} must be greater than zero")))
    }
}

/// One row of the trial log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialRecord {
    pub input: TrialInput,
    pub tire_pressure_psi: Option<f64>,
    pub tire_name: String,
    pub crr: f64,
}

/// How the result is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Fully resolved options for one `crr` invocation.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input: TrialInput,
    pub tire_pressure_psi: Option<f64>,
    pub tire_name: String,
    /// `None` disables the trial log.
    pub log_file: Option<PathBuf>,
    pub show_log: bool,
    pub verbose: bool,
    pub format: OutputFormat,
}
