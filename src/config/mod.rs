//! Solver configuration.

mod signal;

pub use signal::{SignalConfig, SATURATION_CEILING};
