//! Domain model types for signal timing.
//!
//! Inputs are per-lane vehicle counts grouped into an intersection request;
//! outputs are per-lane green/yellow/red timings plus diagnostics. The
//! intermediate [`CyclePlan`] carries flow state between solver stages.

mod category;
mod observation;
mod plan;
mod solution;

pub use category::{VehicleCategory, WeightTable, DEFAULT_WEIGHT};
pub use observation::{IntersectionRequest, LaneObservation, VehicleCounts};
pub use plan::{CyclePlan, LaneFlow};
pub use solution::{Diagnostic, DiagnosticKind, IntersectionSolution, LaneTiming};
