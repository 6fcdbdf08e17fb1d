//! # u-signal
//!
//! Fixed-phase traffic signal timing from per-lane vehicle counts, using
//! Webster's method with safety clamps for oversaturated or degenerate
//! inputs.
//!
//! ## Modules
//!
//! - [`models`] — Domain model types (VehicleCategory, WeightTable, IntersectionRequest, IntersectionSolution)
//! - [`config`] — Solver constants with TOML loading and validation
//! - [`density`] — Passenger-car-unit density per lane
//! - [`cycle`] — Webster cycle length with saturation ceiling
//! - [`allocation`] — Proportional green split with minimum-green floor
//! - [`optimizer`] — End-to-end pipeline
//! - [`detection`] — Interface to the upstream vehicle detector
//!
//! ## Example
//!
//! ```
//! use u_signal::models::{IntersectionRequest, LaneObservation, VehicleCategory};
//! use u_signal::optimizer::SignalOptimizer;
//!
//! let request = IntersectionRequest::new()
//!     .with_lane(LaneObservation::new("North").with_count(VehicleCategory::Car, 12))
//!     .with_lane(LaneObservation::new("East").with_count(VehicleCategory::Truck, 2));
//!
//! let solution = SignalOptimizer::default().optimize(&request).unwrap();
//! for lane in &solution.lanes {
//!     assert!(lane.green_time >= 10);
//! }
//! ```

pub mod allocation;
pub mod config;
pub mod cycle;
pub mod density;
pub mod detection;
pub mod error;
pub mod models;
pub mod optimizer;

#[cfg(feature = "ffi")]
pub mod ffi;
#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::{Result, SignalError};
