//! Webster's optimal cycle length.
//!
//! # Algorithm
//!
//! Each lane's flow ratio is `y = density / saturation_flow`; their sum `Y`
//! measures aggregate demand against capacity. With total lost time
//! `L = lost_time_per_phase × phases`, the delay-minimising cycle is
//!
//! ```text
//! C0 = (1.5 L + 5) / (1 - Y)
//! ```
//!
//! `Y` is capped at [`SATURATION_CEILING`] before the division so that
//! oversaturated inputs yield a finite cycle, which is then truncated to
//! whole seconds and clamped to `[min_cycle_time, max_cycle_time]`.
//!
//! # Complexity
//!
//! O(n) where n = number of lanes.
//!
//! # Reference
//!
//! Webster, F. V. (1958). "Traffic Signal Settings", *Road Research
//! Technical Paper* No. 39, HMSO, London.

use log::debug;

use crate::config::{SignalConfig, SATURATION_CEILING};
use crate::models::{CyclePlan, LaneFlow};

/// Computes flow ratios and the nominal cycle length for one intersection.
///
/// One phase per lane is assumed, so total lost time scales with the number
/// of lanes submitted.
///
/// # Examples
///
/// ```
/// use u_signal::config::SignalConfig;
/// use u_signal::cycle::CycleTimeSolver;
///
/// let config = SignalConfig::default();
/// let solver = CycleTimeSolver::new(&config);
///
/// // 21 PCU over 4 lanes: Y = 0.7, L = 16, C0 = 29 / 0.3 ≈ 96.7
/// let plan = solver.solve(&[("N", 9.0), ("S", 6.0), ("E", 3.0), ("W", 3.0)]);
/// assert_eq!(plan.cycle_time, 96);
/// assert_eq!(plan.total_lost_time, 16);
/// assert!((plan.saturation_sum - 0.7).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CycleTimeSolver<'a> {
    config: &'a SignalConfig,
}

impl<'a> CycleTimeSolver<'a> {
    /// Creates a solver over the given configuration.
    pub fn new(config: &'a SignalConfig) -> Self {
        Self { config }
    }

    /// Flow ratio of a lane with the given density.
    pub fn flow_ratio(&self, density: f64) -> f64 {
        density / self.config.saturation_flow
    }

    /// Total lost time for the given number of phases.
    pub fn total_lost_time(&self, num_phases: usize) -> i64 {
        i64::from(self.config.lost_time_per_phase) * num_phases as i64
    }

    /// Unclamped optimal cycle length for a saturation sum and lost time.
    ///
    /// Returns `min_cycle_time` when there is no demand.
    pub fn optimal_cycle(&self, saturation_sum: f64, total_lost_time: i64) -> f64 {
        let y = saturation_sum.min(SATURATION_CEILING);
        if y > 0.0 {
            (1.5 * total_lost_time as f64 + 5.0) / (1.0 - y)
        } else {
            f64::from(self.config.min_cycle_time)
        }
    }

    /// Truncates a cycle length to whole seconds and clamps it to bounds.
    pub fn clamp_cycle(&self, optimal: f64) -> i64 {
        let min = i64::from(self.config.min_cycle_time);
        let max = i64::from(self.config.max_cycle_time);
        (optimal.floor() as i64).min(max).max(min)
    }

    /// Computes per-lane flow ratios, the saturation sum and the nominal
    /// cycle length for `(lane, density)` pairs.
    pub fn solve<S: AsRef<str>>(&self, densities: &[(S, f64)]) -> CyclePlan {
        let lanes: Vec<LaneFlow> = densities
            .iter()
            .map(|(lane, density)| LaneFlow {
                lane: lane.as_ref().to_string(),
                density: *density,
                flow_ratio: self.flow_ratio(*density),
            })
            .collect();

        let saturation_sum: f64 = lanes.iter().map(|l| l.flow_ratio).sum();
        let total_lost_time = self.total_lost_time(lanes.len());
        let optimal = self.optimal_cycle(saturation_sum, total_lost_time);
        let cycle_time = self.clamp_cycle(optimal);

        debug!(
            "Y={saturation_sum:.4} L={total_lost_time}s optimal={optimal:.2}s cycle={cycle_time}s"
        );

        CyclePlan {
            cycle_time,
            total_lost_time,
            saturation_sum,
            lanes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_demand_uses_min_cycle() {
        let config = SignalConfig::default();
        let plan = CycleTimeSolver::new(&config).solve(&[("A", 0.0), ("B", 0.0)]);
        assert_eq!(plan.cycle_time, 60);
        assert_eq!(plan.saturation_sum, 0.0);
        assert_eq!(plan.total_lost_time, 8);
    }

    #[test]
    fn test_short_cycle_clamped_up() {
        let config = SignalConfig::default();
        let plan = CycleTimeSolver::new(&config).solve(&[
            ("North", 10.0),
            ("South", 2.0),
            ("East", 1.0),
            ("West", 1.0),
        ]);
        // (24 + 5) / (1 - 0.4667) ≈ 54.4, below the 60 s floor
        assert_eq!(plan.cycle_time, 60);
        assert!((plan.saturation_sum - 14.0 / 30.0).abs() < 1e-10);
        assert!((plan.lanes[0].flow_ratio - 1.0 / 3.0).abs() < 1e-10);
        assert_eq!(plan.lanes[3].lane, "West");
    }

    #[test]
    fn test_oversaturated_is_finite_and_capped() {
        let config = SignalConfig::default();
        let plan =
            CycleTimeSolver::new(&config).solve(&[("A", 40.0), ("B", 40.0), ("C", 40.0)]);
        assert!((plan.saturation_sum - 4.0).abs() < 1e-10);
        assert_eq!(plan.cycle_time, 150);
    }

    #[test]
    fn test_saturation_exactly_one() {
        let config = SignalConfig::default();
        let solver = CycleTimeSolver::new(&config);
        let optimal = solver.optimal_cycle(1.0, 16);
        assert!(optimal.is_finite());
        assert!((optimal - 580.0).abs() < 1e-6);
    }

    #[test]
    fn test_truncates_not_rounds() {
        let config = SignalConfig::new().with_cycle_bounds(0, 1000);
        let solver = CycleTimeSolver::new(&config);
        assert_eq!(solver.clamp_cycle(96.99), 96);
        assert_eq!(solver.clamp_cycle(5000.0), 1000);
    }

    #[test]
    fn test_lost_time_scales_with_lanes() {
        let config = SignalConfig::new().with_lost_time_per_phase(3);
        let solver = CycleTimeSolver::new(&config);
        assert_eq!(solver.total_lost_time(5), 15);
        assert_eq!(solver.total_lost_time(0), 0);
    }

    #[test]
    fn test_custom_saturation_flow() {
        let config = SignalConfig::new().with_saturation_flow(10.0);
        let plan = CycleTimeSolver::new(&config).solve(&[("A", 5.0)]);
        assert!((plan.lanes[0].flow_ratio - 0.5).abs() < 1e-10);
        // (6 + 5) / 0.5 = 22, clamped to 60
        assert_eq!(plan.cycle_time, 60);
    }
}
