//! Interface to the upstream vehicle detector.
//!
//! Detection itself (model inference on imagery) happens outside this crate.
//! A detector is plugged in through [`VehicleCounter`]; its raw boxes are
//! reduced to per-category counts by [`DetectionTally`].

mod tally;

pub use tally::{
    observe_lanes, Detection, DetectionTally, VehicleCounter, DEFAULT_CONFIDENCE_THRESHOLD,
};
