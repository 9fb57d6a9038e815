//! The in-memory KITTI object annotation record.

use crate::geom::BoundingBox;

/// One labeled object, matching the KITTI object-label column layout.
///
/// Constructed per detected object and never mutated afterwards. Every
/// field except the label defaults to zero (`[0.0; 4]` bbox, `[0.0; 3]`
/// arrays); `score` has no default and stays absent unless supplied.
#[derive(Clone, Debug, PartialEq)]
pub struct Annotation {
    /// Category name (the KITTI `type` column). Required; the codec
    /// refuses to serialize an empty label.
    pub label: String,
    /// Fraction of the object leaving image boundaries, `0.0..=1.0`.
    pub truncated: f64,
    /// Occlusion state (0 = fully visible .. 3 = unknown).
    pub occluded: i64,
    /// Observation angle in radians.
    pub alpha: f64,
    /// 2-D bounding box, absolute pixel XYXY.
    pub bbox: BoundingBox,
    /// 3-D object extent (height, width, length) in meters.
    pub dimensions: [f64; 3],
    /// 3-D object location (x, y, z) in camera coordinates.
    pub location: [f64; 3],
    /// Rotation around the camera Y axis in radians.
    pub rotation_y: f64,
    /// Detection confidence; only present on prediction records.
    pub score: Option<f64>,
}

impl Annotation {
    /// Creates an annotation with the given label and zeroed fields.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            truncated: 0.0,
            occluded: 0,
            alpha: 0.0,
            bbox: BoundingBox::default(),
            dimensions: [0.0; 3],
            location: [0.0; 3],
            rotation_y: 0.0,
            score: None,
        }
    }

    /// Sets the 2-D bounding box.
    pub fn with_bbox(mut self, bbox: BoundingBox) -> Self {
        self.bbox = bbox;
        self
    }

    /// Sets the truncation fraction.
    pub fn with_truncated(mut self, truncated: f64) -> Self {
        self.truncated = truncated;
        self
    }

    /// Sets the occlusion state.
    pub fn with_occluded(mut self, occluded: i64) -> Self {
        self.occluded = occluded;
        self
    }

    /// Sets the observation angle.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Sets the 3-D extent.
    pub fn with_dimensions(mut self, dimensions: [f64; 3]) -> Self {
        self.dimensions = dimensions;
        self
    }

    /// Sets the 3-D location.
    pub fn with_location(mut self, location: [f64; 3]) -> Self {
        self.location = location;
        self
    }

    /// Sets the Y-axis rotation.
    pub fn with_rotation_y(mut self, rotation_y: f64) -> Self {
        self.rotation_y = rotation_y;
        self
    }

    /// Attaches a detection score.
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }
}
