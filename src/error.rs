//! Error types.
//!
//! - `CrrError` is what the calculator and input parsing return. It keeps
//!   malformed input (validation) apart from physically infeasible input
//!   (domain).
//! - `AppError` is the process-level error: a message plus the exit code the
//!   `crr` binary terminates with.

use thiserror::Error;

/// Exit code for failures rendering the result.
pub const EXIT_OUTPUT: u8 = 1;
/// Exit code for malformed or out-of-range input (including clap usage errors).
pub const EXIT_VALIDATION: u8 = 2;
/// Exit code for syntactically valid but physically infeasible input.
pub const EXIT_DOMAIN: u8 = 3;
/// Exit code for failures reading or appending the trial log.
pub const EXIT_LOG: u8 = 4;

/// Errors raised while validating a trial or computing its Crr.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CrrError {
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("invalid elapsed time '{0}': expected HH:MM:SS")]
    InvalidElapsedTime(String),

    #[error("elapsed time is zero; drum velocity is undefined")]
    ZeroElapsedTime,

    #[error("roller spread {roller_spread_mm} mm must be below wheel + drum ({limit_mm} mm)")]
    RollerGeometry { roller_spread_mm: f64, limit_mm: f64 },
}

impl CrrError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        CrrError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    /// `true` for physically infeasible input, `false` for malformed input.
    pub fn is_domain(&self) -> bool {
        matches!(
            self,
            CrrError::ZeroElapsedTime | CrrError::RollerGeometry { .. }
        )
    }

    pub fn exit_code(&self) -> u8 {
        if self.is_domain() {
            EXIT_DOMAIN
        } else {
            EXIT_VALIDATION
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<CrrError> for AppError {
    fn from(err: CrrError) -> Self {
        let kind = if err.is_domain() {
            "Domain error"
        } else {
            "Validation error"
        };
        AppError::new(err.exit_code(), format!("{kind}: {err}"))
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
