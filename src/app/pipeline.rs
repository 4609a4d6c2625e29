//! The trial pipeline: validate -> compute -> log.
//!
//! Kept apart from `app::run` so it can be driven without argv or stdout.
//! The log is only touched after the computation succeeded, so a rejected
//! trial never leaves a partial row behind.

use tracing::{debug, info};

use crate::calc::{CrrBreakdown, compute_breakdown};
use crate::domain::{RunConfig, TrialRecord, validate_tire_pressure};
use crate::error::AppError;
use crate::io::log::append_trial;

/// All computed outputs of a single `crr` run.
#[derive(Debug, Clone)]
pub struct TrialOutput {
    pub breakdown: CrrBreakdown,
    pub record: TrialRecord,
    /// `true` if the record was appended to the log.
    pub logged: bool,
}

pub fn run_trial(config: &RunConfig) -> Result<TrialOutput, AppError> {
    validate_tire_pressure(config.tire_pressure_psi)?;
    let breakdown = compute_breakdown(&config.input)?;
    debug!(
        seconds_total = breakdown.seconds_total,
        v_drum_ms = breakdown.v_drum_ms,
        theta_rad = breakdown.theta_rad,
        mass_eff_kg = breakdown.mass_eff_kg,
        drum_correction = breakdown.drum_correction,
        crr = breakdown.crr,
        "computed trial"
    );

    let record = TrialRecord {
        input: config.input,
        tire_pressure_psi: config.tire_pressure_psi,
        tire_name: config.tire_name.clone(),
        crr: breakdown.crr,
    };

    let logged = match &config.log_file {
        Some(path) => {
            append_trial(path, &record)?;
            info!(path = %path.display(), "appended trial to log");
            true
        }
        None => false,
    };

    Ok(TrialOutput {
        breakdown,
        record,
        logged,
    })
}
