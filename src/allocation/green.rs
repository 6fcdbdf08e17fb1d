//! Proportional green split with a minimum-green floor.
//!
//! # Algorithm
//!
//! The effective green `G = cycle_time - total_lost_time` is split in
//! proportion to flow ratio, `g_i = (y_i / Y) × G`, or evenly when `Y = 0`.
//! Each share is rounded half-to-even and raised to `min_green_time`. Red
//! time is measured against the nominal cycle, while the as-run cycle is
//! re-derived from the floored greens:
//!
//! ```text
//! red_i  = cycle_time - g_i - yellow
//! actual = Σ g_i + total_lost_time
//! ```
//!
//! The two are left unreconciled. A longer as-run cycle is reported as
//! [`DiagnosticKind::CycleInflated`], a shorter one as
//! [`DiagnosticKind::CycleDeflated`].

use std::cmp::Ordering;

use log::warn;

use crate::config::SignalConfig;
use crate::models::{CyclePlan, Diagnostic, DiagnosticKind, LaneTiming};

/// Result of green allocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    /// Per-lane timings in plan order.
    pub lanes: Vec<LaneTiming>,
    /// Sum of green times plus total lost time.
    pub actual_cycle_time: i64,
    /// Degenerate-timing diagnostics.
    pub diagnostics: Vec<Diagnostic>,
}

/// Distributes a cycle's effective green time across lanes.
///
/// # Examples
///
/// ```
/// use u_signal::allocation::GreenTimeAllocator;
/// use u_signal::config::SignalConfig;
/// use u_signal::cycle::CycleTimeSolver;
///
/// let config = SignalConfig::default();
/// let plan = CycleTimeSolver::new(&config).solve(&[("A", 6.0), ("B", 3.0)]);
/// assert_eq!(plan.cycle_time, 60);
///
/// let alloc = GreenTimeAllocator::new(&config).allocate(&plan);
/// // effective green 52 split 2:1
/// assert_eq!(alloc.lanes[0].green_time, 35);
/// assert_eq!(alloc.lanes[1].green_time, 17);
/// assert_eq!(alloc.actual_cycle_time, 60);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct GreenTimeAllocator<'a> {
    config: &'a SignalConfig,
}

impl<'a> GreenTimeAllocator<'a> {
    /// Creates an allocator over the given configuration.
    pub fn new(config: &'a SignalConfig) -> Self {
        Self { config }
    }

    /// Unrounded green share of a lane.
    pub fn raw_green(
        &self,
        flow_ratio: f64,
        saturation_sum: f64,
        effective_green: i64,
        num_lanes: usize,
    ) -> f64 {
        if saturation_sum > 0.0 {
            (flow_ratio / saturation_sum) * effective_green as f64
        } else {
            effective_green as f64 / num_lanes as f64
        }
    }

    /// Rounds a raw share half-to-even and applies the minimum-green floor.
    pub fn floor_green(&self, raw_green: f64) -> i64 {
        (raw_green.round_ties_even() as i64).max(i64::from(self.config.min_green_time))
    }

    /// Allocates green, yellow and red time for every lane in the plan.
    pub fn allocate(&self, plan: &CyclePlan) -> Allocation {
        let effective_green = plan.effective_green();
        let yellow_time = i64::from(self.config.lost_time_per_phase);
        let mut diagnostics = Vec::new();

        if effective_green <= 0 {
            warn!(
                "effective green is {effective_green}s (cycle {}s, lost {}s)",
                plan.cycle_time, plan.total_lost_time
            );
            diagnostics.push(Diagnostic::new(DiagnosticKind::NonPositiveEffectiveGreen {
                effective_green,
            }));
        }

        let mut lanes = Vec::with_capacity(plan.num_phases());
        for flow in &plan.lanes {
            let raw = self.raw_green(
                flow.flow_ratio,
                plan.saturation_sum,
                effective_green,
                plan.num_phases(),
            );
            let green_time = self.floor_green(raw);
            let red_time = plan.cycle_time - green_time - yellow_time;

            if red_time < 0 {
                warn!("lane '{}' has negative red time {red_time}s", flow.lane);
                diagnostics.push(Diagnostic::new(DiagnosticKind::NegativeRedTime {
                    lane: flow.lane.clone(),
                    red_time,
                }));
            }

            lanes.push(LaneTiming {
                lane: flow.lane.clone(),
                green_time,
                yellow_time,
                red_time,
                density_score: flow.density,
                flow_ratio: round3(flow.flow_ratio),
            });
        }

        let actual_cycle_time =
            lanes.iter().map(|t| t.green_time).sum::<i64>() + plan.total_lost_time;

        match actual_cycle_time.cmp(&plan.cycle_time) {
            Ordering::Greater => {
                warn!(
                    "minimum green inflated cycle from {}s to {actual_cycle_time}s",
                    plan.cycle_time
                );
                diagnostics.push(Diagnostic::new(DiagnosticKind::CycleInflated {
                    nominal: plan.cycle_time,
                    actual: actual_cycle_time,
                }));
            }
            Ordering::Less => {
                warn!(
                    "rounding deflated cycle from {}s to {actual_cycle_time}s",
                    plan.cycle_time
                );
                diagnostics.push(Diagnostic::new(DiagnosticKind::CycleDeflated {
                    nominal: plan.cycle_time,
                    actual: actual_cycle_time,
                }));
            }
            Ordering::Equal => {}
        }

        Allocation {
            lanes,
            actual_cycle_time,
            diagnostics,
        }
    }
}

/// Rounds to three decimals, ties to even.
fn round3(x: f64) -> f64 {
    (x * 1000.0).round_ties_even() / 1000.0
}
