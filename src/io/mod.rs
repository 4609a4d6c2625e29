//! Input/output helpers.
//!
//! - append-only trial log (`log`)

pub mod log;

pub use log::*;
