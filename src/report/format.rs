//! Formatted terminal output.
//!
//! Formatting lives here so the calculator stays free of presentation
//! concerns. The core never rounds; text output does.

use std::path::Path;

use serde::Serialize;

use crate::calc::CrrBreakdown;
use crate::domain::{RunConfig, TrialInput, TrialRecord};
use crate::error::{AppError, EXIT_OUTPUT};

/// Plain-text result. Crr is shown to 8 decimals; intermediate values are
/// included with `verbose`.
pub fn format_result(breakdown: &CrrBreakdown, config: &RunConfig) -> String {
    let mut out = String::new();

    if config.verbose {
        let input = &config.input;
        out.push_str("=== crr - roller trial ===\n");
        if !config.tire_name.is_empty() {
            out.push_str(&format!("Tire: {}\n", config.tire_name));
        }
        if let Some(psi) = config.tire_pressure_psi {
            out.push_str(&format!("Pressure: {psi:.1} psi\n"));
        }
        out.push_str(&format!(
            "Mass: {:.2} kg ({:.1}% rear)\n",
            input.rider_mass_kg, input.rear_mass_percent
        ));
        out.push_str(&format!(
            "Geometry: wheel={:.1}mm drum={:.1}mm spread={:.1}mm\n",
            input.dia_wheel_mm, input.dia_drum_mm, input.roller_spread_mm
        ));
        out.push_str(&format!(
            "Trial: {} ({} s) | {:.1} m | {:.1} W\n",
            input.elapsed, breakdown.seconds_total, input.distance_meters, input.avg_watts
        ));
        out.push('\n');
        out.push_str(&format!("Drum speed: {:.4} m/s\n", breakdown.v_drum_ms));
        out.push_str(&format!(
            "Roller angle: {:.4} rad ({:.2} deg)\n",
            breakdown.theta_rad,
            breakdown.theta_rad.to_degrees()
        ));
        out.push_str(&format!("Effective mass: {:.4} kg\n", breakdown.mass_eff_kg));
        out.push_str(&format!("Drum correction: {:.6}\n", breakdown.drum_correction));
    }

    out.push_str(&format!("Crr: {:.8}", breakdown.crr));
    out
}

#[derive(Serialize)]
struct JsonResult<'a> {
    input: &'a TrialInput,
    tire_pressure_psi: Option<f64>,
    tire_name: &'a str,
    #[serde(flatten)]
    breakdown: &'a CrrBreakdown,
    log_file: Option<&'a Path>,
}

/// Pretty JSON result at full precision.
pub fn format_result_json(
    breakdown: &CrrBreakdown,
    config: &RunConfig,
) -> Result<String, AppError> {
    let doc = JsonResult {
        input: &config.input,
        tire_pressure_psi: config.tire_pressure_psi,
        tire_name: &config.tire_name,
        breakdown,
        log_file: config.log_file.as_deref(),
    };
    serde_json::to_string_pretty(&doc)
        .map_err(|e| AppError::new(EXIT_OUTPUT, format!("Failed to encode JSON result: {e}")))
}

/// Table of logged trials, oldest first.
pub fn format_log_table(records: &[TrialRecord]) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:>3} {:<20} {:>6} {:>9} {:>9} {:>7} {:>10}\n",
            "#", "tire", "psi", "time", "dist_m", "watts", "crr"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<3} {:-<20} {:-<6} {:-<9} {:-<9} {:-<7} {:-<10}\n",
            "", "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for (i, r) in records.iter().enumerate() {
        let psi = r
            .tire_pressure_psi
            .map(|p| format!("{p:.1}"))
            .unwrap_or_else(|| "-".to_string());
        out.push_str(
            format!(
                "{:>3} {:<20} {:>6} {:>9} {:>9.0} {:>7.1} {:>10.8}\n",
                i + 1,
                clip(&r.tire_name, 20),
                psi,
                r.input.elapsed.to_string(),
                r.input.distance_meters,
                r.input.avg_watts,
                r.crr,
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// Clip to `width` characters, marking the cut with an ellipsis.
fn clip(s: &str, width: usize) -> String {
    if s.char_indices().nth(width).is_none() {
        return s.to_string();
    }
    let kept: String = s.chars().take(width.saturating_sub(1)).collect();
    format!("{kept}…")
}
