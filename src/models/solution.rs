//! Timing plan output and degenerate-timing diagnostics.

use std::fmt;

use serde::Serialize;

/// A non-fatal problem with a computed timing plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DiagnosticKind {
    /// Cycle length minus lost time left nothing to distribute.
    NonPositiveEffectiveGreen {
        /// `cycle_time - total_lost_time`.
        effective_green: i64,
    },
    /// Red time came out negative (reported unclamped).
    NegativeRedTime {
        /// Lane identifier.
        lane: String,
        /// Computed red time.
        red_time: i64,
    },
    /// Minimum-green enforcement made the as-run cycle longer than planned.
    CycleInflated {
        /// Nominal cycle length.
        nominal: i64,
        /// Cycle length actually produced.
        actual: i64,
    },
    /// Half-to-even rounding of the green shares made the as-run cycle
    /// shorter than planned.
    CycleDeflated {
        /// Nominal cycle length.
        nominal: i64,
        /// Cycle length actually produced.
        actual: i64,
    },
    /// The saturation sum exceeded the stability ceiling and was clamped
    /// for the cycle-length formula.
    SaturationClamped {
        /// Unclamped sum of flow ratios.
        saturation_sum: f64,
    },
}

/// A diagnostic attached to a solution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    /// The kind of diagnostic.
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    /// Creates a new diagnostic.
    pub fn new(kind: DiagnosticKind) -> Self {
        Self { kind }
    }

    /// Returns `true` if the plan cannot run as computed.
    pub fn is_degenerate(&self) -> bool {
        !matches!(self.kind, DiagnosticKind::SaturationClamped { .. })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DiagnosticKind::NonPositiveEffectiveGreen { effective_green } => {
                write!(f, "effective green is {effective_green}s")
            }
            DiagnosticKind::NegativeRedTime { lane, red_time } => {
                write!(f, "lane '{lane}' has negative red time {red_time}s")
            }
            DiagnosticKind::CycleInflated { nominal, actual } => {
                write!(f, "cycle inflated from {nominal}s to {actual}s")
            }
            DiagnosticKind::CycleDeflated { nominal, actual } => {
                write!(f, "cycle deflated from {nominal}s to {actual}s")
            }
            DiagnosticKind::SaturationClamped { saturation_sum } => {
                write!(f, "saturation sum {saturation_sum:.3} clamped")
            }
        }
    }
}

/// Signal timing for one lane.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaneTiming {
    /// Lane identifier.
    pub lane: String,
    /// Green time in seconds, never below the configured minimum.
    pub green_time: i64,
    /// Yellow (lost) time in seconds.
    pub yellow_time: i64,
    /// `cycle_time - green_time - yellow_time` against the nominal cycle.
    pub red_time: i64,
    /// Weighted density in PCU.
    pub density_score: f64,
    /// Flow ratio rounded to 3 decimals.
    pub flow_ratio: f64,
}

/// A complete timing plan for one intersection.
///
/// `actual_cycle_time` is the cycle the controller will actually run and
/// should be preferred over the nominal `cycle_time`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntersectionSolution {
    /// Nominal cycle length from the cycle-length stage.
    pub cycle_time: i64,
    /// Sum of green times plus total lost time.
    pub actual_cycle_time: i64,
    /// Unclamped sum of flow ratios.
    pub saturation_sum: f64,
    /// Per-lane timings in request order.
    pub lanes: Vec<LaneTiming>,
    /// Non-fatal problems detected while building the plan.
    pub diagnostics: Vec<Diagnostic>,
}

impl IntersectionSolution {
    /// Looks up the timing for a lane.
    pub fn lane(&self, id: &str) -> Option<&LaneTiming> {
        self.lanes.iter().find(|t| t.lane == id)
    }

    /// Sum of green times across all lanes.
    pub fn total_green(&self) -> i64 {
        self.lanes.iter().map(|t| t.green_time).sum()
    }

    /// Returns `true` if any diagnostic marks the plan as degenerate.
    pub fn is_degenerate(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_degenerate)
    }
}

impl fmt::Display for IntersectionSolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total cycle time: {}s", self.actual_cycle_time)?;
        for t in &self.lanes {
            writeln!(
                f,
                "{}: green {}s, red {}s, yellow {}s, density {:.1}",
                t.lane, t.green_time, t.red_time, t.yellow_time, t.density_score
            )?;
        }
        for d in &self.diagnostics {
            writeln!(f, "warning: {d}")?;
        }
        Ok(())
    }
}
