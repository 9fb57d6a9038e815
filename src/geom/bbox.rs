//! The bounding-box value type and its coordinate algebra.

use serde::{Deserialize, Serialize};

use super::mode::BoxMode;
use super::space::Space;
use crate::error::KittiboxError;

/// An axis-aligned rectangle: four numbers tagged with the [`BoxMode`] that
/// gives them meaning and the [`Space`] they are measured in.
///
/// The four numbers are only interpretable through `mode`; width, height and
/// area are derived on demand and never stored redundantly.
///
/// Equality is strict: two boxes are equal only if mode, space and the
/// numeric tuple all match. `[0, 0, 10, 10]` in XYXY and the same rectangle
/// expressed in XYWH compare unequal. Callers that want geometric equality
/// convert both sides to a common mode first.
///
/// Note: construction does NOT enforce that the rectangle is well-formed
/// (e.g. xmax >= xmin). Malformed boxes are representable on purpose;
/// [`BoundingBox::is_valid`] reports them and the transform pipeline and
/// dataset writer filter them out.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    coords: [f64; 4],
    mode: BoxMode,
    space: Space,
}

impl BoundingBox {
    /// Creates a box from four coordinates in the given mode and space.
    #[inline]
    pub fn new(coords: [f64; 4], mode: BoxMode, space: Space) -> Self {
        Self {
            coords,
            mode,
            space,
        }
    }

    /// Creates a box from a slice, failing unless it has exactly 4 elements.
    ///
    /// This is the entry point for raw boxes arriving from outside the type
    /// system (parsed files, dataset adapters).
    pub fn from_slice(coords: &[f64], mode: BoxMode, space: Space) -> Result<Self, KittiboxError> {
        let coords: [f64; 4] = coords
            .try_into()
            .map_err(|_| KittiboxError::BoxLength { len: coords.len() })?;
        Ok(Self::new(coords, mode, space))
    }

    /// The raw coordinate tuple, interpreted per [`BoundingBox::mode`].
    #[inline]
    pub fn coords(&self) -> [f64; 4] {
        self.coords
    }

    /// The coordinate convention of this box.
    #[inline]
    pub fn mode(&self) -> BoxMode {
        self.mode
    }

    /// The coordinate space of this box.
    #[inline]
    pub fn space(&self) -> Space {
        self.space
    }

    /// Converts the box to another coordinate convention.
    ///
    /// A conversion to the current mode returns the box unchanged, so
    /// repeated no-op conversions cannot accumulate floating-point drift.
    /// The space tag always carries over untouched.
    pub fn to(self, target: BoxMode) -> Self {
        if self.mode == target {
            return self;
        }

        let space = self.space;
        let remake = move |coords: [f64; 4]| BoundingBox {
            coords,
            mode: target,
            space,
        };

        // Centroid <-> top-left conversions share w/h and never need the
        // opposite corner.
        match (self.mode, target) {
            (BoxMode::Cxcywh, BoxMode::Xywh) => {
                let [cx, cy, w, h] = self.coords;
                return remake([cx - w / 2.0, cy - h / 2.0, w, h]);
            }
            (BoxMode::Xywh, BoxMode::Cxcywh) => {
                let [x, y, w, h] = self.coords;
                return remake([x + w / 2.0, y + h / 2.0, w, h]);
            }
            _ => {}
        }

        let (xmin, ymin, xmax, ymax) = match self.mode {
            BoxMode::Cxcywh => {
                let [cx, cy, w, h] = self.coords;
                let xmin = cx - w / 2.0;
                let ymin = cy - h / 2.0;
                (xmin, ymin, xmin + w, ymin + h)
            }
            BoxMode::Xywh => {
                let [x, y, w, h] = self.coords;
                (x, y, x + w, y + h)
            }
            BoxMode::Xyxy => {
                let [xmin, ymin, xmax, ymax] = self.coords;
                (xmin, ymin, xmax, ymax)
            }
            BoxMode::Xxyy => {
                let [xmin, xmax, ymin, ymax] = self.coords;
                (xmin, ymin, xmax, ymax)
            }
        };

        match target {
            BoxMode::Cxcywh => {
                let w = xmax - xmin;
                let h = ymax - ymin;
                remake([xmin + w / 2.0, ymin + h / 2.0, w, h])
            }
            BoxMode::Xywh => remake([xmin, ymin, xmax - xmin, ymax - ymin]),
            BoxMode::Xyxy => remake([xmin, ymin, xmax, ymax]),
            BoxMode::Xxyy => remake([xmin, xmax, ymin, ymax]),
        }
    }

    /// Scales the box from `source_size` to `target_size` (both `(w, h)`).
    ///
    /// Relative boxes are size-independent and pass through unchanged, as
    /// does any box when the sizes are equal. Scaling happens on the XYXY
    /// corners: scaling only `w`/`h` in an extent-carrying mode would leave
    /// the anchor point behind whenever the two axis ratios differ.
    pub fn resize(self, source_size: (u32, u32), target_size: (u32, u32)) -> Self {
        if self.space.is_relative() || source_size == target_size {
            return self;
        }

        let ratio_w = target_size.0 as f64 / source_size.0 as f64;
        let ratio_h = target_size.1 as f64 / source_size.1 as f64;

        let [xmin, ymin, xmax, ymax] = self.to(BoxMode::Xyxy).coords;
        BoundingBox {
            coords: [
                xmin * ratio_w,
                ymin * ratio_h,
                xmax * ratio_w,
                ymax * ratio_h,
            ],
            mode: BoxMode::Xyxy,
            space: self.space,
        }
        .to(self.mode)
    }

    /// Converts an absolute box to relative coordinates against `size`.
    ///
    /// Fails if the box is already relative.
    pub fn normalize(self, size: (u32, u32)) -> Result<Self, KittiboxError> {
        if self.space.is_relative() {
            return Err(KittiboxError::AlreadyRelative);
        }

        let (w, h) = (size.0 as f64, size.1 as f64);
        let [xmin, ymin, xmax, ymax] = self.to(BoxMode::Xyxy).coords;
        Ok(BoundingBox {
            coords: [xmin / w, ymin / h, xmax / w, ymax / h],
            mode: BoxMode::Xyxy,
            space: Space::Relative,
        }
        .to(self.mode))
    }

    /// Converts a relative box back to absolute coordinates against `size`.
    ///
    /// Fails if the box is already absolute.
    pub fn denormalize(self, size: (u32, u32)) -> Result<Self, KittiboxError> {
        if self.space.is_absolute() {
            return Err(KittiboxError::AlreadyAbsolute);
        }

        let (w, h) = (size.0 as f64, size.1 as f64);
        let [xmin, ymin, xmax, ymax] = self.to(BoxMode::Xyxy).coords;
        Ok(BoundingBox {
            coords: [xmin * w, ymin * h, xmax * w, ymax * h],
            mode: BoxMode::Xyxy,
            space: Space::Absolute,
        }
        .to(self.mode))
    }

    /// Width of the box, read mode-aware.
    ///
    /// May be negative if the box is malformed.
    #[inline]
    pub fn width(&self) -> f64 {
        match self.mode {
            BoxMode::Cxcywh | BoxMode::Xywh => self.coords[2],
            BoxMode::Xyxy => self.coords[2] - self.coords[0],
            BoxMode::Xxyy => self.coords[1] - self.coords[0],
        }
    }

    /// Height of the box, read mode-aware.
    ///
    /// May be negative if the box is malformed.
    #[inline]
    pub fn height(&self) -> f64 {
        match self.mode {
            BoxMode::Cxcywh | BoxMode::Xywh => self.coords[3],
            BoxMode::Xyxy => self.coords[3] - self.coords[1],
            BoxMode::Xxyy => self.coords[3] - self.coords[2],
        }
    }

    /// Area of the box.
    #[inline]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// True if the box spans a positive extent on both axes.
    ///
    /// Computed on the XYXY corners, so the result is independent of the
    /// stored mode.
    pub fn is_valid(&self) -> bool {
        let [xmin, ymin, xmax, ymax] = self.to(BoxMode::Xyxy).coords;
        xmax > xmin && ymax > ymin
    }

    /// True if `other` lies fully inside this box (borders included).
    ///
    /// Both operands are converted to XYXY first, so containment is
    /// independent of either box's stored mode.
    pub fn contains(&self, other: &BoundingBox) -> bool {
        let [x0, y0, x1, y1] = self.to(BoxMode::Xyxy).coords;
        let [x2, y2, x3, y3] = other.to(BoxMode::Xyxy).coords;
        x2 >= x0 && y2 >= y0 && x3 <= x1 && y3 <= y1
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::new([0.0; 4], BoxMode::Xyxy, Space::Absolute)
    }
}
