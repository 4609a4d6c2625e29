//! `tire-crr` library crate.
//!
//! The binary (`crr`) is a thin wrapper around this library so that:
//!
//! - the calculator is testable without spawning processes
//! - CLI parsing, the CSV log and formatting stay out of the physics code

pub mod app;
pub mod calc;
pub mod cli;
pub mod domain;
pub mod error;
pub mod io;
pub mod report;
