//! Passenger-car-unit density calculator.

use crate::models::{VehicleCounts, WeightTable};

/// Converts per-category vehicle counts into a single PCU density.
///
/// `density = Σ count × weight(category)`, with weight 1.0 for categories
/// absent from the table. Counts must already be validated as non-negative.
///
/// # Examples
///
/// ```
/// use u_signal::density::DensityCalculator;
/// use u_signal::models::{VehicleCategory, VehicleCounts, WeightTable};
///
/// let weights = WeightTable::default();
/// let calc = DensityCalculator::new(&weights);
///
/// let counts = VehicleCounts::new()
///     .with(VehicleCategory::Car, 4)
///     .with(VehicleCategory::Bus, 2)
///     .with(VehicleCategory::from("van"), 1);
/// assert!((calc.density(&counts) - 11.0).abs() < 1e-10);
/// assert_eq!(calc.density(&VehicleCounts::new()), 0.0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct DensityCalculator<'a> {
    weights: &'a WeightTable,
}

impl<'a> DensityCalculator<'a> {
    /// Creates a calculator over the given weight table.
    pub fn new(weights: &'a WeightTable) -> Self {
        Self { weights }
    }

    /// Weighted density of one lane in PCU.
    pub fn density(&self, counts: &VehicleCounts) -> f64 {
        counts
            .iter()
            .map(|(category, count)| count as f64 * self.weights.weight(category))
            .sum()
    }
}
