//! Coordinate space of a box: pixel units or normalized to the image extent.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether box coordinates are pixel units or fractions of the image size.
///
/// A box is in exactly one space at a time; `normalize`/`denormalize` move
/// between them and refuse to run on a box already in the requested space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Space {
    /// Pixel-unit coordinates.
    Absolute,
    /// Coordinates normalized to `[0, 1]` against the image extent.
    Relative,
}

impl Space {
    /// Returns true for normalized coordinates.
    #[inline]
    pub fn is_relative(&self) -> bool {
        matches!(self, Space::Relative)
    }

    /// Returns true for pixel-unit coordinates.
    #[inline]
    pub fn is_absolute(&self) -> bool {
        matches!(self, Space::Absolute)
    }
}

impl fmt::Display for Space {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Space::Absolute => write!(f, "absolute"),
            Space::Relative => write!(f, "relative"),
        }
    }
}
