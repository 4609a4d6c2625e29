//! Effective mass at the drum contact points.
//!
//! The rear wheel sits between two rollers. Each contact point lies on a line
//! through the wheel axle tilted by the half-angle
//!
//! ```text
//! θ = asin(roller_spread / (dia_wheel + dia_drum))
//! ```
//!
//! from vertical, so the normal load the rollers see on the rear wheel is the
//! rear mass scaled by `1 / cos θ`. The front wheel sits on flat ground and is
//! counted as is.

use crate::domain::TrialInput;
use crate::error::CrrError;

/// Half-angle (radians) between the roller contact points and the wheel axle.
///
/// Fails if the rollers are spread at least as wide as wheel plus drum, where
/// the angle is undefined (or 90°, which makes the secant blow up).
pub fn roller_half_angle(input: &TrialInput) -> Result<f64, CrrError> {
    let limit_mm = input.dia_wheel_mm + input.dia_drum_mm;
    let ratio = input.roller_spread_mm / limit_mm;
    if !ratio.is_finite() || ratio >= 1.0 {
        return Err(CrrError::RollerGeometry {
            roller_spread_mm: input.roller_spread_mm,
            limit_mm,
        });
    }
    Ok(ratio.asin())
}

/// Rider + bike mass with the rear share inflated by the roller secant.
pub fn compute_effective_mass(input: &TrialInput) -> Result<f64, CrrError> {
    let theta = roller_half_angle(input)?;
    Ok(effective_mass_at(input, theta))
}

/// Effective mass for an already checked half-angle.
pub(crate) fn effective_mass_at(input: &TrialInput, theta: f64) -> f64 {
    let mass_rear = input.rider_mass_kg * input.rear_mass_percent / 100.0;
    let mass_front = input.rider_mass_kg - mass_rear;

    mass_front + mass_rear / theta.cos()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ElapsedTime;

    fn fixture() -> TrialInput {
        TrialInput {
            rider_mass_kg: 103.0,
            rear_mass_percent: 60.0,
            dia_wheel_mm: 689.0,
            dia_drum_mm: 85.0,
            roller_spread_mm: 257.0,
            elapsed: ElapsedTime::new(1, 0, 0),
            distance_meters: 40_000.0,
            avg_watts: 281.0,
        }
    }

    #[test]
    fn fixture_effective_mass() {
        let m = compute_effective_mass(&fixture()).unwrap();
        let expected = 106.717_124_996_068_12;
        assert!(((m - expected) / expected).abs() < 1e-9, "{m}");
    }

    #[test]
    fn no_rear_mass_means_no_inflation() {
        for spread in [0.0, 100.0, 257.0, 700.0] {
            let mut input = fixture();
            input.rear_mass_percent = 0.0;
            input.roller_spread_mm = spread;
            assert_eq!(compute_effective_mass(&input).unwrap(), input.rider_mass_kg);
        }
    }

    #[test]
    fn zero_spread_gives_rider_mass() {
        for pct in [0.0, 35.0, 60.0, 100.0] {
            let mut input = fixture();
            input.roller_spread_mm = 0.0;
            input.rear_mass_percent = pct;
            assert_eq!(roller_half_angle(&input).unwrap(), 0.0);
            let m = compute_effective_mass(&input).unwrap();
            assert!((m - input.rider_mass_kg).abs() < 1e-12, "{m}");
        }
    }

    #[test]
    fn spread_wider_than_wheel_and_drum_is_rejected() {
        let mut input = fixture();
        input.roller_spread_mm = 800.0;
        let err = compute_effective_mass(&input).unwrap_err();
        assert!(err.is_domain());
        assert_eq!(
            err,
            CrrError::RollerGeometry {
                roller_spread_mm: 800.0,
                limit_mm: 774.0
            }
        );
    }

    #[test]
    fn spread_equal_to_wheel_and_drum_is_rejected() {
        let mut input = fixture();
        input.roller_spread_mm = 774.0;
        assert!(compute_effective_mass(&input).unwrap_err().is_domain());
    }
}
