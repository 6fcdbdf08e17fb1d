//! Per-lane vehicle counts and optimization requests.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::VehicleCategory;
use crate::error::{Result, SignalError};

/// Vehicle counts for one lane, keyed by category.
///
/// Counts are signed so that negative values coming from an external
/// producer can be rejected rather than silently coerced. Arithmetic on
/// counts saturates at the `i64` bounds.
///
/// Deserialising merges keys that name the same category, so
/// `{"car": 5, "Car": 3}` yields eight cars.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct VehicleCounts {
    counts: BTreeMap<VehicleCategory, i64>,
}

impl VehicleCounts {
    /// Creates an empty set of counts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the count for a category.
    pub fn with(mut self, category: VehicleCategory, count: i64) -> Self {
        self.counts.insert(category, count);
        self
    }

    /// Adds `count` to the running total for a category.
    pub fn add(&mut self, category: VehicleCategory, count: i64) {
        let slot = self.counts.entry(category).or_insert(0);
        *slot = slot.saturating_add(count);
    }

    /// Count for a category (0 if absent).
    pub fn get(&self, category: &VehicleCategory) -> i64 {
        self.counts.get(category).copied().unwrap_or(0)
    }

    /// Iterates over `(category, count)` pairs in category order.
    pub fn iter(&self) -> impl Iterator<Item = (&VehicleCategory, i64)> {
        self.counts.iter().map(|(c, &n)| (c, n))
    }

    /// Sum of all counts.
    pub fn total(&self) -> i64 {
        self.counts.values().fold(0, |acc, &n| acc.saturating_add(n))
    }

    /// Returns `true` if no category has been recorded.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Returns these counts with every value multiplied by `factor`.
    pub fn scaled(&self, factor: i64) -> Self {
        Self {
            counts: self
                .counts
                .iter()
                .map(|(c, &n)| (c.clone(), n.saturating_mul(factor)))
                .collect(),
        }
    }
}

impl<'de> Deserialize<'de> for VehicleCounts {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct CountsVisitor;

        impl<'de> Visitor<'de> for CountsVisitor {
            type Value = VehicleCounts;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of vehicle category to count")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut map: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut counts = VehicleCounts::new();
                while let Some((name, count)) = map.next_entry::<String, i64>()? {
                    counts.add(VehicleCategory::from(name), count);
                }
                Ok(counts)
            }
        }

        deserializer.deserialize_map(CountsVisitor)
    }
}

impl<C: Into<VehicleCategory>> FromIterator<(C, i64)> for VehicleCounts {
    fn from_iter<I: IntoIterator<Item = (C, i64)>>(iter: I) -> Self {
        let mut counts = VehicleCounts::new();
        for (category, count) in iter {
            counts.add(category.into(), count);
        }
        counts
    }
}

/// Vehicle counts observed on one lane.
///
/// # Examples
///
/// ```
/// use u_signal::models::{LaneObservation, VehicleCategory};
///
/// let obs = LaneObservation::new("North")
///     .with_count(VehicleCategory::Car, 10)
///     .with_count(VehicleCategory::Bus, 1);
/// assert_eq!(obs.lane(), "North");
/// assert_eq!(obs.counts().total(), 11);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaneObservation {
    lane: String,
    counts: VehicleCounts,
}

impl LaneObservation {
    /// Creates an observation with no vehicles.
    pub fn new(lane: impl Into<String>) -> Self {
        Self {
            lane: lane.into(),
            counts: VehicleCounts::new(),
        }
    }

    /// Creates an observation from existing counts.
    pub fn from_counts(lane: impl Into<String>, counts: VehicleCounts) -> Self {
        Self {
            lane: lane.into(),
            counts,
        }
    }

    /// Sets the count for a category.
    pub fn with_count(mut self, category: VehicleCategory, count: i64) -> Self {
        self.counts = self.counts.with(category, count);
        self
    }

    /// Lane identifier.
    pub fn lane(&self) -> &str {
        &self.lane
    }

    /// Vehicle counts for this lane.
    pub fn counts(&self) -> &VehicleCounts {
        &self.counts
    }

    /// Rejects negative counts.
    pub fn validate(&self) -> Result<()> {
        match self.counts.iter().find(|&(_, n)| n < 0) {
            Some((category, count)) => Err(SignalError::NegativeCount {
                lane: self.lane.clone(),
                category: category.to_string(),
                count,
            }),
            None => Ok(()),
        }
    }
}

/// One optimization request: the lanes of a single intersection.
///
/// Lanes keep insertion order, and the solution reports them in the same
/// order. The serialised form is a map from lane id to counts; lanes read
/// from a map keep document order, and a repeated lane id is an error.
///
/// # Examples
///
/// ```
/// use u_signal::models::{IntersectionRequest, LaneObservation, VehicleCategory};
///
/// let request = IntersectionRequest::new()
///     .with_lane(LaneObservation::new("North").with_count(VehicleCategory::Car, 4))
///     .with_lane(LaneObservation::new("South"));
/// assert_eq!(request.num_lanes(), 2);
/// assert!(request.validate().is_ok());
///
/// assert!(IntersectionRequest::new().validate().is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntersectionRequest {
    lanes: Vec<LaneObservation>,
}

impl IntersectionRequest {
    /// Creates an empty request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a lane.
    pub fn with_lane(mut self, lane: LaneObservation) -> Self {
        self.lanes.push(lane);
        self
    }

    /// Appends a lane in place.
    pub fn push(&mut self, lane: LaneObservation) {
        self.lanes.push(lane);
    }

    /// The lanes in this request.
    pub fn lanes(&self) -> &[LaneObservation] {
        &self.lanes
    }

    /// Number of lanes (and therefore phases).
    pub fn num_lanes(&self) -> usize {
        self.lanes.len()
    }

    /// Checks the request is non-empty, lane ids are unique and no count is
    /// negative.
    pub fn validate(&self) -> Result<()> {
        if self.lanes.is_empty() {
            return Err(SignalError::EmptyRequest);
        }
        let mut seen = HashSet::with_capacity(self.lanes.len());
        for lane in &self.lanes {
            if !seen.insert(lane.lane()) {
                return Err(SignalError::DuplicateLane(lane.lane().to_string()));
            }
            lane.validate()?;
        }
        Ok(())
    }
}

impl Serialize for IntersectionRequest {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.lanes.len()))?;
        for obs in &self.lanes {
            map.serialize_entry(&obs.lane, &obs.counts)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for IntersectionRequest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct RequestVisitor;

        impl<'de> Visitor<'de> for RequestVisitor {
            type Value = IntersectionRequest;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of lane id to vehicle counts")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut map: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut request = IntersectionRequest::new();
                let mut seen = HashSet::new();
                while let Some(lane) = map.next_key::<String>()? {
                    if !seen.insert(lane.clone()) {
                        return Err(de::Error::custom(SignalError::DuplicateLane(lane)));
                    }
                    let counts = map.next_value::<VehicleCounts>()?;
                    request.push(LaneObservation::from_counts(lane, counts));
                }
                Ok(request)
            }
        }

        deserializer.deserialize_map(RequestVisitor)
    }
}

impl FromIterator<LaneObservation> for IntersectionRequest {
    fn from_iter<I: IntoIterator<Item = LaneObservation>>(iter: I) -> Self {
        Self {
            lanes: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_add_and_total() {
        let mut c = VehicleCounts::new();
        c.add(VehicleCategory::Car, 3);
        c.add(VehicleCategory::Car, 2);
        c.add(VehicleCategory::Bus, 1);
        assert_eq!(c.get(&VehicleCategory::Car), 5);
        assert_eq!(c.get(&VehicleCategory::Truck), 0);
        assert_eq!(c.total(), 6);
    }

    #[test]
    fn test_counts_from_iter_merges() {
        let c: VehicleCounts = [("car", 2), ("Car", 3), ("van", 1)].into_iter().collect();
        assert_eq!(c.get(&VehicleCategory::Car), 5);
        assert_eq!(c.get(&VehicleCategory::from("van")), 1);
    }

    #[test]
    fn test_counts_scaled() {
        let c = VehicleCounts::new()
            .with(VehicleCategory::Car, 3)
            .with(VehicleCategory::Truck, 1);
        let d = c.scaled(2);
        assert_eq!(d.get(&VehicleCategory::Car), 6);
        assert_eq!(d.get(&VehicleCategory::Truck), 2);
    }

    #[test]
    fn test_negative_count_rejected() {
        let obs = LaneObservation::new("West").with_count(VehicleCategory::Truck, -1);
        let err = obs.validate().expect_err("negative");
        assert!(matches!(
            err,
            SignalError::NegativeCount { ref lane, count: -1, .. } if lane == "West"
        ));
    }

    #[test]
    fn test_empty_request_rejected() {
        let err = IntersectionRequest::new().validate().expect_err("empty");
        assert!(matches!(err, SignalError::EmptyRequest));
    }

    #[test]
    fn test_duplicate_lane_rejected() {
        let req = IntersectionRequest::new()
            .with_lane(LaneObservation::new("A"))
            .with_lane(LaneObservation::new("A"));
        let err = req.validate().expect_err("duplicate");
        assert!(matches!(err, SignalError::DuplicateLane(ref l) if l == "A"));
    }

    #[test]
    fn test_empty_lane_counts_are_valid() {
        let req = IntersectionRequest::new().with_lane(LaneObservation::new("A"));
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_deserialize_from_map() {
        let json = r#"{"North": {"car": 10, "bus": 1}, "East": {}}"#;
        let req: IntersectionRequest = serde_json::from_str(json).expect("valid");
        assert_eq!(req.num_lanes(), 2);
        // Document order.
        assert_eq!(req.lanes()[0].lane(), "North");
        assert_eq!(req.lanes()[0].counts().get(&VehicleCategory::Car), 10);
        assert_eq!(req.lanes()[1].lane(), "East");
    }

    #[test]
    fn test_deserialize_merges_category_spellings() {
        let counts: VehicleCounts =
            serde_json::from_str(r#"{"car": 5, "Car": 3, "van": 1}"#).expect("valid");
        assert_eq!(counts.get(&VehicleCategory::Car), 8);
        assert_eq!(counts.get(&VehicleCategory::from("van")), 1);

        let req: IntersectionRequest =
            serde_json::from_str(r#"{"N": {"car": 5, "Car": 3}}"#).expect("valid");
        assert_eq!(req.lanes()[0].counts().get(&VehicleCategory::Car), 8);
        assert_eq!(req.lanes()[0].counts().total(), 8);
    }

    #[test]
    fn test_deserialize_rejects_repeated_lane() {
        let json = r#"{"N": {"car": 5}, "N": {"car": 1}}"#;
        let err = serde_json::from_str::<IntersectionRequest>(json).expect_err("duplicate");
        assert!(err.to_string().contains("duplicate lane identifier"), "{err}");
        assert!(err.to_string().contains("'N'"), "{err}");
    }

    #[test]
    fn test_serialize_keeps_lane_order() {
        let req = IntersectionRequest::new()
            .with_lane(LaneObservation::new("West").with_count(VehicleCategory::Car, 2))
            .with_lane(LaneObservation::new("East"));
        let json = serde_json::to_string(&req).expect("serialize");
        assert_eq!(json, r#"{"West":{"car":2},"East":{}}"#);
        let back: IntersectionRequest = serde_json::from_str(&json).expect("valid");
        assert_eq!(back, req);
    }

    #[test]
    fn test_counts_saturate_instead_of_overflowing() {
        let mut c = VehicleCounts::new().with(VehicleCategory::Car, i64::MAX);
        c.add(VehicleCategory::Car, 1);
        assert_eq!(c.get(&VehicleCategory::Car), i64::MAX);

        let c = c.with(VehicleCategory::Bus, i64::MAX);
        assert_eq!(c.total(), i64::MAX);
        assert_eq!(c.scaled(2).get(&VehicleCategory::Bus), i64::MAX);
        assert_eq!(
            VehicleCounts::new()
                .with(VehicleCategory::Car, i64::MIN)
                .scaled(2)
                .get(&VehicleCategory::Car),
            i64::MIN
        );
    }
}
