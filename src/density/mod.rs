//! Weighted traffic density (PCU) of a lane.

mod calculator;

pub use calculator::DensityCalculator;
