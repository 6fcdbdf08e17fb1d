//! Vehicle categories and passenger-car-equivalent weights.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Weight applied to categories missing from a [`WeightTable`].
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// A vehicle category reported by the upstream counter.
///
/// Names parse case-insensitively; anything unrecognised is kept verbatim as
/// [`VehicleCategory::Other`].
///
/// # Examples
///
/// ```
/// use u_signal::models::VehicleCategory;
///
/// assert_eq!(VehicleCategory::from("Bus"), VehicleCategory::Bus);
/// assert_eq!(VehicleCategory::from("tram").to_string(), "tram");
/// assert_eq!(VehicleCategory::from_coco_class(3), Some(VehicleCategory::Motorcycle));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VehicleCategory {
    Car,
    Motorcycle,
    Bus,
    Truck,
    Other(String),
}

impl VehicleCategory {
    /// Maps a COCO detector class id to a vehicle category.
    ///
    /// Only the four vehicle classes (2, 3, 5, 7) are recognised.
    pub fn from_coco_class(class_id: u32) -> Option<Self> {
        match class_id {
            2 => Some(VehicleCategory::Car),
            3 => Some(VehicleCategory::Motorcycle),
            5 => Some(VehicleCategory::Bus),
            7 => Some(VehicleCategory::Truck),
            _ => None,
        }
    }

    /// Lowercase name of this category.
    pub fn name(&self) -> &str {
        match self {
            VehicleCategory::Car => "car",
            VehicleCategory::Motorcycle => "motorcycle",
            VehicleCategory::Bus => "bus",
            VehicleCategory::Truck => "truck",
            VehicleCategory::Other(name) => name,
        }
    }
}

impl From<&str> for VehicleCategory {
    fn from(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "car" => VehicleCategory::Car,
            "motorcycle" => VehicleCategory::Motorcycle,
            "bus" => VehicleCategory::Bus,
            "truck" => VehicleCategory::Truck,
            _ => VehicleCategory::Other(name.to_string()),
        }
    }
}

impl From<String> for VehicleCategory {
    fn from(name: String) -> Self {
        VehicleCategory::from(name.as_str())
    }
}

impl From<VehicleCategory> for String {
    fn from(category: VehicleCategory) -> Self {
        match category {
            VehicleCategory::Other(name) => name,
            known => known.name().to_string(),
        }
    }
}

impl fmt::Display for VehicleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Passenger-car-unit weight per vehicle category.
///
/// Lookups for categories not in the table return [`DEFAULT_WEIGHT`].
///
/// # Examples
///
/// ```
/// use u_signal::models::{VehicleCategory, WeightTable};
///
/// let table = WeightTable::default();
/// assert_eq!(table.weight(&VehicleCategory::Bus), 3.0);
/// assert_eq!(table.weight(&VehicleCategory::from("tractor")), 1.0);
///
/// let custom = WeightTable::empty().with_weight(VehicleCategory::Truck, 2.0);
/// assert_eq!(custom.weight(&VehicleCategory::Truck), 2.0);
/// assert_eq!(custom.weight(&VehicleCategory::Bus), 1.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightTable {
    weights: BTreeMap<VehicleCategory, f64>,
}

impl WeightTable {
    /// Creates a table with no entries (every category weighs 1.0).
    pub fn empty() -> Self {
        Self {
            weights: BTreeMap::new(),
        }
    }

    /// Sets the weight for a category.
    pub fn with_weight(mut self, category: VehicleCategory, weight: f64) -> Self {
        self.weights.insert(category, weight);
        self
    }

    /// Weight for a category, falling back to [`DEFAULT_WEIGHT`].
    pub fn weight(&self, category: &VehicleCategory) -> f64 {
        self.weights
            .get(category)
            .copied()
            .unwrap_or(DEFAULT_WEIGHT)
    }

    /// Iterates over the configured entries.
    pub fn iter(&self) -> impl Iterator<Item = (&VehicleCategory, f64)> {
        self.weights.iter().map(|(c, &w)| (c, w))
    }

    /// Number of configured entries.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Returns `true` if no weights are configured.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

impl Default for WeightTable {
    fn default() -> Self {
        Self::empty()
            .with_weight(VehicleCategory::Car, 1.0)
            .with_weight(VehicleCategory::Motorcycle, 0.5)
            .with_weight(VehicleCategory::Bus, 3.0)
            .with_weight(VehicleCategory::Truck, 2.5)
    }
}
