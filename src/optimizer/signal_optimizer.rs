//! Signal optimizer tying the solver stages together.

use log::{debug, warn};

use crate::allocation::GreenTimeAllocator;
use crate::config::{SignalConfig, SATURATION_CEILING};
use crate::cycle::CycleTimeSolver;
use crate::density::DensityCalculator;
use crate::error::Result;
use crate::models::{Diagnostic, DiagnosticKind, IntersectionRequest, IntersectionSolution};

/// Computes fixed-phase timing plans from per-lane vehicle counts.
///
/// Holds only its validated configuration; every call to
/// [`optimize`](SignalOptimizer::optimize) is a pure function of the
/// request, so one optimizer can be shared across threads.
///
/// # Examples
///
/// ```
/// use u_signal::models::{IntersectionRequest, LaneObservation, VehicleCategory};
/// use u_signal::optimizer::SignalOptimizer;
///
/// let optimizer = SignalOptimizer::default();
/// let request = IntersectionRequest::new()
///     .with_lane(LaneObservation::new("North").with_count(VehicleCategory::Car, 10))
///     .with_lane(LaneObservation::new("South").with_count(VehicleCategory::Car, 2))
///     .with_lane(LaneObservation::new("East").with_count(VehicleCategory::Car, 1))
///     .with_lane(LaneObservation::new("West").with_count(VehicleCategory::Car, 1));
///
/// let solution = optimizer.optimize(&request).unwrap();
/// assert_eq!(solution.cycle_time, 60);
/// assert_eq!(solution.lane("North").unwrap().green_time, 31);
/// assert_eq!(solution.actual_cycle_time, 77);
/// ```
#[derive(Debug, Clone)]
pub struct SignalOptimizer {
    config: SignalConfig,
}

impl SignalOptimizer {
    /// Creates an optimizer, rejecting invalid configuration.
    pub fn new(config: SignalConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration this optimizer was built with.
    pub fn config(&self) -> &SignalConfig {
        &self.config
    }

    /// Computes a timing plan for one intersection.
    ///
    /// Fails only on invalid input (no lanes, duplicate lane ids, negative
    /// counts). Infeasible plans are returned with diagnostics attached.
    pub fn optimize(&self, request: &IntersectionRequest) -> Result<IntersectionSolution> {
        request.validate()?;

        let calculator = DensityCalculator::new(&self.config.weights);
        let densities: Vec<(&str, f64)> = request
            .lanes()
            .iter()
            .map(|obs| (obs.lane(), calculator.density(obs.counts())))
            .collect();

        let plan = CycleTimeSolver::new(&self.config).solve(&densities);
        let allocation = GreenTimeAllocator::new(&self.config).allocate(&plan);

        let mut diagnostics = Vec::with_capacity(allocation.diagnostics.len() + 1);
        if plan.saturation_sum > SATURATION_CEILING {
            warn!(
                "saturation sum {:.3} exceeds ceiling {SATURATION_CEILING}",
                plan.saturation_sum
            );
            diagnostics.push(Diagnostic::new(DiagnosticKind::SaturationClamped {
                saturation_sum: plan.saturation_sum,
            }));
        }
        diagnostics.extend(allocation.diagnostics);

        debug!(
            "optimized {} lanes: cycle={}s actual={}s",
            plan.num_phases(),
            plan.cycle_time,
            allocation.actual_cycle_time
        );

        Ok(IntersectionSolution {
            cycle_time: plan.cycle_time,
            actual_cycle_time: allocation.actual_cycle_time,
            saturation_sum: plan.saturation_sum,
            lanes: allocation.lanes,
            diagnostics,
        })
    }

    /// Optimizes several independent intersections, results in input order.
    pub fn optimize_many(
        &self,
        requests: &[IntersectionRequest],
    ) -> Vec<Result<IntersectionSolution>> {
        requests.iter().map(|r| self.optimize(r)).collect()
    }
}

impl Default for SignalOptimizer {
    fn default() -> Self {
        Self {
            config: SignalConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SignalError;
    use crate::models::{LaneObservation, VehicleCategory};

    fn four_lanes(n: i64, s: i64, e: i64, w: i64) -> IntersectionRequest {
        IntersectionRequest::new()
            .with_lane(LaneObservation::new("North").with_count(VehicleCategory::Car, n))
            .with_lane(LaneObservation::new("South").with_count(VehicleCategory::Car, s))
            .with_lane(LaneObservation::new("East").with_count(VehicleCategory::Car, e))
            .with_lane(LaneObservation::new("West").with_count(VehicleCategory::Car, w))
    }

    #[test]
    fn test_new_rejects_bad_config() {
        let err = SignalOptimizer::new(SignalConfig::new().with_saturation_flow(0.0))
            .expect_err("invalid");
        assert!(err.is_configuration());
    }

    #[test]
    fn test_scenario_densities() {
        let sol = SignalOptimizer::default()
            .optimize(&four_lanes(10, 2, 1, 1))
            .expect("valid");
        assert_eq!(sol.lane("North").map(|t| t.density_score), Some(10.0));
        assert_eq!(sol.lane("South").map(|t| t.density_score), Some(2.0));
        assert!((sol.saturation_sum - 14.0 / 30.0).abs() < 1e-10);
        assert!(sol.is_degenerate());
    }

    #[test]
    fn test_all_empty_lanes() {
        let request: IntersectionRequest = ["North", "South", "East", "West"]
            .into_iter()
            .map(LaneObservation::new)
            .collect();
        let sol = SignalOptimizer::default().optimize(&request).expect("valid");
        assert_eq!(sol.cycle_time, 60);
        assert_eq!(sol.saturation_sum, 0.0);
        assert!(sol.lanes.iter().all(|t| t.green_time == 11));
        assert_eq!(sol.actual_cycle_time, 60);
        assert!(sol.diagnostics.is_empty());
    }

    #[test]
    fn test_oversaturation_diagnostic() {
        let sol = SignalOptimizer::default()
            .optimize(&four_lanes(30, 30, 30, 30))
            .expect("valid");
        assert_eq!(sol.cycle_time, 150);
        assert!((sol.saturation_sum - 4.0).abs() < 1e-10);
        assert!(matches!(
            sol.diagnostics[0].kind,
            DiagnosticKind::SaturationClamped { .. }
        ));
    }

    #[test]
    fn test_invalid_input_rejected() {
        let opt = SignalOptimizer::default();
        assert!(matches!(
            opt.optimize(&IntersectionRequest::new()),
            Err(SignalError::EmptyRequest)
        ));
        let err = opt.optimize(&four_lanes(1, -1, 0, 0)).expect_err("negative");
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_lane_order_preserved() {
        let sol = SignalOptimizer::default()
            .optimize(&four_lanes(1, 2, 3, 4))
            .expect("valid");
        let order: Vec<&str> = sol.lanes.iter().map(|t| t.lane.as_str()).collect();
        assert_eq!(order, vec!["North", "South", "East", "West"]);
    }

    #[test]
    fn test_optimize_many() {
        let opt = SignalOptimizer::default();
        let results = opt.optimize_many(&[four_lanes(1, 1, 1, 1), IntersectionRequest::new()]);
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
    }

    #[test]
    fn test_two_lane_intersection() {
        let request = IntersectionRequest::new()
            .with_lane(LaneObservation::new("Main").with_count(VehicleCategory::Bus, 4))
            .with_lane(LaneObservation::new("Side").with_count(VehicleCategory::Motorcycle, 6));
        let sol = SignalOptimizer::default().optimize(&request).expect("valid");
        // Y = (12 + 3) / 30 = 0.5, L = 8, C0 = 17 / 0.5 = 34 -> 60
        assert_eq!(sol.cycle_time, 60);
        // 52 split 4:1
        assert_eq!(sol.lane("Main").map(|t| t.green_time), Some(42));
        assert_eq!(sol.lane("Side").map(|t| t.green_time), Some(10));
        assert_eq!(sol.actual_cycle_time, 60);
    }

    #[test]
    fn test_shared_across_threads() {
        let opt = std::sync::Arc::new(SignalOptimizer::default());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let opt = opt.clone();
                std::thread::spawn(move || opt.optimize(&four_lanes(i, 2, 3, 4)))
            })
            .collect();
        for h in handles {
            assert!(h.join().expect("thread").is_ok());
        }
    }
}
