//! Cycle length computation.
//!
//! - [`CycleTimeSolver`] — Webster's optimal cycle length (1958) with a
//!   stability ceiling on the saturation sum and clamping to configured bounds.

mod webster;

pub use webster::CycleTimeSolver;
