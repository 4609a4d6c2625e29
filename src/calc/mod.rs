//! Rolling-resistance calculator: effective mass on a two-roller stand and the
//! Crr derivation.

pub mod crr;
pub mod mass;

pub use crr::*;
pub use mass::*;
