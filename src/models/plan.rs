//! Intermediate per-request values shared between the solver stages.

/// Derived flow state of one lane.
#[derive(Debug, Clone, PartialEq)]
pub struct LaneFlow {
    /// Lane identifier.
    pub lane: String,
    /// Weighted density in PCU.
    pub density: f64,
    /// `density / saturation_flow`.
    pub flow_ratio: f64,
}

/// Output of the cycle-length stage, input to green allocation.
#[derive(Debug, Clone, PartialEq)]
pub struct CyclePlan {
    /// Nominal cycle length in seconds, clamped to the configured bounds.
    pub cycle_time: i64,
    /// Lost time summed over all phases, in seconds.
    pub total_lost_time: i64,
    /// Unclamped sum of flow ratios (Y).
    pub saturation_sum: f64,
    /// Per-lane flow state in request order.
    pub lanes: Vec<LaneFlow>,
}

impl CyclePlan {
    /// Green time left for distribution after lost time.
    ///
    /// May be zero or negative when lost time dominates the cycle.
    pub fn effective_green(&self) -> i64 {
        self.cycle_time - self.total_lost_time
    }

    /// Number of phases (one per lane).
    pub fn num_phases(&self) -> usize {
        self.lanes.len()
    }
}
