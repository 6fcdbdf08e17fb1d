//! Reducing detector output to vehicle counts.

use crate::models::{IntersectionRequest, LaneObservation, VehicleCategory, VehicleCounts};

/// Minimum confidence a detection must exceed to be counted.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.3;

/// One bounding box reported by the detector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    /// COCO class id.
    pub class_id: u32,
    /// Detector confidence in `[0, 1]`.
    pub confidence: f32,
}

impl Detection {
    /// Creates a detection.
    pub fn new(class_id: u32, confidence: f32) -> Self {
        Self {
            class_id,
            confidence,
        }
    }
}

/// Vehicle counts for one frame.
///
/// # Examples
///
/// ```
/// use u_signal::detection::{Detection, DetectionTally};
/// use u_signal::models::VehicleCategory;
///
/// let boxes = [
///     Detection::new(2, 0.9),  // car
///     Detection::new(2, 0.25), // car, below threshold
///     Detection::new(7, 0.6),  // truck
///     Detection::new(0, 0.99), // person, ignored
/// ];
/// let tally = DetectionTally::from_detections(&boxes, 0.3);
/// assert_eq!(tally.total(), 2);
/// assert_eq!(tally.by_class().get(&VehicleCategory::Truck), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetectionTally {
    total: i64,
    by_class: VehicleCounts,
}

impl DetectionTally {
    /// Counts vehicle detections whose confidence is strictly above
    /// `confidence_threshold`. Non-vehicle classes are ignored.
    pub fn from_detections(detections: &[Detection], confidence_threshold: f32) -> Self {
        let mut tally = Self::default();
        for d in detections {
            if d.confidence <= confidence_threshold {
                continue;
            }
            if let Some(category) = VehicleCategory::from_coco_class(d.class_id) {
                tally.by_class.add(category, 1);
                tally.total += 1;
            }
        }
        tally
    }

    /// Number of vehicles counted.
    pub fn total(&self) -> i64 {
        self.total
    }

    /// Counts per category.
    pub fn by_class(&self) -> &VehicleCounts {
        &self.by_class
    }

    /// Converts this tally into a lane observation.
    pub fn into_observation(self, lane: impl Into<String>) -> LaneObservation {
        LaneObservation::from_counts(lane, self.by_class)
    }
}

/// An upstream producer of vehicle counts, e.g. an object detector run on a
/// camera frame.
pub trait VehicleCounter {
    /// Input the counter works on.
    type Frame: ?Sized;
    /// Error raised when a frame cannot be processed.
    type Error;

    /// Counts the vehicles in one frame.
    fn count(&self, frame: &Self::Frame) -> Result<DetectionTally, Self::Error>;
}

/// Runs a counter over one frame per lane and collects the results into an
/// optimization request, stopping at the first counter error.
pub fn observe_lanes<'f, C, L, I>(
    counter: &C,
    frames: I,
) -> Result<IntersectionRequest, C::Error>
where
    C: VehicleCounter,
    C::Frame: 'f,
    L: Into<String>,
    I: IntoIterator<Item = (L, &'f C::Frame)>,
{
    frames
        .into_iter()
        .map(|(lane, frame)| counter.count(frame).map(|t| t.into_observation(lane)))
        .collect()
}
