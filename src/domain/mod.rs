//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - trial measurements (`TrialInput`, `ElapsedTime`) and their defaults
//! - log rows (`TrialRecord`)
//! - resolved run options (`RunConfig`)

pub mod types;

pub use types::*;
