//! The closed set of bounding-box coordinate conventions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coordinate convention for the four numbers of a bounding box.
///
/// Every variant describes the same axis-aligned rectangle family; they
/// differ only in how the four stored numbers are to be read. Conversion
/// between any two modes is exact up to floating-point rounding and is
/// dispatched by exhaustive matching, so an unhandled mode is a compile
/// error rather than a runtime surprise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoxMode {
    /// `[cx, cy, w, h]`: centroid coordinates plus width and height.
    Cxcywh,
    /// `[xmin, ymin, xmax, ymax]`: opposite corners.
    Xyxy,
    /// `[xmin, xmax, ymin, ymax]`: the x-range followed by the y-range.
    Xxyy,
    /// `[x, y, w, h]`: top-left corner plus width and height.
    Xywh,
}

impl fmt::Display for BoxMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BoxMode::Cxcywh => "cxcywh",
            BoxMode::Xyxy => "xyxy",
            BoxMode::Xxyy => "xxyy",
            BoxMode::Xywh => "xywh",
        };
        write!(f, "{}", name)
    }
}
