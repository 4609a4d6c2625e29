//! Reporting: text/JSON rendering of a computed trial and of the trial log.

pub mod format;

pub use format::*;
