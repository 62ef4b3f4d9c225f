//! Shared constants and defaults.

pub mod constants;

pub use constants::*;
