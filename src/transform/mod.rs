//! Joint image-and-boxes geometric transforms.
//!
//! Every operator takes an image-like value plus a sequence of boxes and
//! returns a new image plus a new sequence, keeping the two geometrically
//! consistent. Pixel work is delegated entirely through the [`ImageOps`]
//! collaborator; this crate only moves rectangles.
//!
//! Per-box failures never escape: a box that leaves the valid region is
//! silently excluded from the output sequence, and the image is always
//! returned even when every box is dropped.

pub mod pipeline;

pub use pipeline::{
    BoxTransform, CenterCrop, Compose, Crop, HorizontalFlip, RandomCrop, RandomHorizontalFlip,
    RandomVerticalFlip, Resize, ResizedCrop, Rotate, VerticalFlip,
};

use crate::error::KittiboxError;
use crate::geom::{BoundingBox, BoxMode, Space};

/// The external pixel collaborator.
///
/// Implementations perform the actual resampling (an image crate, a GPU
/// pipeline, a test stub); the transform functions only require that the
/// reported size tracks the geometric operations.
pub trait ImageOps: Sized {
    /// Current pixel dimensions as `(width, height)`.
    fn size(&self) -> (u32, u32);

    /// Resamples to the target `(width, height)`.
    fn resize(&self, size: (u32, u32)) -> Self;

    /// Mirrors about the vertical axis.
    fn hflip(&self) -> Self;

    /// Mirrors about the horizontal axis.
    fn vflip(&self) -> Self;

    /// Rotates by `angle` degrees about the image center, keeping the
    /// original canvas size.
    fn rotate(&self, angle: f64) -> Self;

    /// Extracts the `height` x `width` region whose top-left corner is at
    /// `(left, top)`.
    fn crop(&self, top: i64, left: i64, height: u32, width: u32) -> Self;
}

/// Resizes the image and scales every box accordingly.
pub fn resize<I: ImageOps>(
    image: &I,
    boxes: &[BoundingBox],
    size: (u32, u32),
) -> (I, Vec<BoundingBox>) {
    let source = image.size();
    let new_image = image.resize(size);
    let new_boxes = boxes.iter().map(|b| b.resize(source, size)).collect();
    (new_image, new_boxes)
}

/// Flips the image horizontally and reflects every box with it.
pub fn hflip<I: ImageOps>(image: &I, boxes: &[BoundingBox]) -> (I, Vec<BoundingBox>) {
    let size = image.size();
    let new_image = image.hflip();
    let new_boxes = boxes.iter().map(|b| bbox_hflip(*b, size)).collect();
    (new_image, new_boxes)
}

/// Reflects a box about the vertical axis of an image of `image_size`.
pub fn bbox_hflip(bbox: BoundingBox, image_size: (u32, u32)) -> BoundingBox {
    reflect(bbox, Some((image_size.0 - 1) as f64), None)
}

/// Flips the image vertically and reflects every box with it.
pub fn vflip<I: ImageOps>(image: &I, boxes: &[BoundingBox]) -> (I, Vec<BoundingBox>) {
    let size = image.size();
    let new_image = image.vflip();
    let new_boxes = boxes.iter().map(|b| bbox_vflip(*b, size)).collect();
    (new_image, new_boxes)
}

/// Reflects a box about the horizontal axis of an image of `image_size`.
pub fn bbox_vflip(bbox: BoundingBox, image_size: (u32, u32)) -> BoundingBox {
    reflect(bbox, None, Some((image_size.1 - 1) as f64))
}

/// Reflects the box centroid about `(offset - c)` on the selected axes.
///
/// The offset is `dimension - 1` in pixel-index convention: reflecting maps
/// centroid `c` to `offset - c`, which mirrors the pixel grid rather than
/// the continuous coordinate line. A single-pixel axis reflects onto
/// itself and is left untouched.
fn reflect(bbox: BoundingBox, tx: Option<f64>, ty: Option<f64>) -> BoundingBox {
    let mut centered = bbox.to(BoxMode::Cxcywh);
    let mut coords = centered.coords();

    if let Some(tx) = tx {
        if tx != 0.0 {
            coords[0] = tx - coords[0];
        }
    }
    if let Some(ty) = ty {
        if ty != 0.0 {
            coords[1] = ty - coords[1];
        }
    }

    centered = BoundingBox::new(coords, BoxMode::Cxcywh, centered.space());
    centered.to(bbox.mode())
}

/// Rotates the image by `angle` degrees and re-derives every box.
///
/// Each box's corners are rotated by `-angle` (the inverse of the image
/// rotation) about the image center and replaced by their axis-aligned
/// bounding rectangle. A rotated box is kept only if that rectangle is
/// fully contained in the original image bounds; boxes that land partially
/// outside are dropped, not clipped.
pub fn rotate<I: ImageOps>(
    image: &I,
    boxes: &[BoundingBox],
    angle: f64,
) -> (I, Vec<BoundingBox>) {
    let size = image.size();
    let image_bounds = BoundingBox::new(
        [0.0, 0.0, size.0 as f64, size.1 as f64],
        BoxMode::Xyxy,
        Space::Absolute,
    );

    let new_image = image.rotate(angle);
    let theta = (-angle).to_radians();

    let new_boxes = boxes
        .iter()
        .filter_map(|bbox| {
            let rotated = bbox_rotate(bbox.to(BoxMode::Xyxy), theta, size);
            image_bounds
                .contains(&rotated)
                .then(|| rotated.to(bbox.mode()))
        })
        .collect();

    (new_image, new_boxes)
}

/// Rotates the four corners of a box by `theta` radians about the center of
/// an image of `size` and returns their axis-aligned bounding rectangle.
pub fn bbox_rotate(bbox: BoundingBox, theta: f64, size: (u32, u32)) -> BoundingBox {
    let (sin, cos) = theta.sin_cos();
    let cx = size.0 as f64 / 2.0;
    let cy = size.1 as f64 / 2.0;

    let rotate_point = |x: f64, y: f64| {
        let a = x - cx;
        let b = y - cy;
        (cos * a - sin * b + cx, sin * a + cos * b + cy)
    };

    let [xmin, ymin, xmax, ymax] = bbox.to(BoxMode::Xyxy).coords();

    let corners = [
        rotate_point(xmin, ymin),
        rotate_point(xmax, ymin),
        rotate_point(xmin, ymax),
        rotate_point(xmax, ymax),
    ];

    let xs = corners.map(|(x, _)| x);
    let ys = corners.map(|(_, y)| y);

    BoundingBox::new(
        [
            xs.iter().copied().fold(f64::INFINITY, f64::min),
            ys.iter().copied().fold(f64::INFINITY, f64::min),
            xs.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            ys.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        ],
        BoxMode::Xyxy,
        bbox.space(),
    )
    .to(bbox.mode())
}

/// Crops the image and keeps only boxes fully inside the crop rectangle,
/// translated into the cropped frame.
pub fn crop<I: ImageOps>(
    image: &I,
    boxes: &[BoundingBox],
    top: i64,
    left: i64,
    height: u32,
    width: u32,
) -> (I, Vec<BoundingBox>) {
    let new_image = image.crop(top, left, height, width);

    let crop_bounds = BoundingBox::new(
        [
            left as f64,
            top as f64,
            (left + width as i64) as f64,
            (top + height as i64) as f64,
        ],
        BoxMode::Xyxy,
        Space::Absolute,
    );

    let new_boxes = boxes
        .iter()
        .filter(|b| crop_bounds.contains(b))
        .map(|b| bbox_crop(*b, left, top))
        .collect();

    (new_image, new_boxes)
}

/// Translates a box by `(-left, -top)` into the cropped frame.
pub fn bbox_crop(bbox: BoundingBox, left: i64, top: i64) -> BoundingBox {
    let centered = bbox.to(BoxMode::Cxcywh);
    let mut coords = centered.coords();
    coords[0] -= left as f64;
    coords[1] -= top as f64;

    BoundingBox::new(coords, BoxMode::Cxcywh, centered.space()).to(bbox.mode())
}

/// Crops the centered `output_size` region (`(width, height)`).
///
/// Top/left are the rounded-to-nearest offsets that center the target
/// extent within the source extent.
pub fn center_crop<I: ImageOps>(
    image: &I,
    boxes: &[BoundingBox],
    output_size: (u32, u32),
) -> (I, Vec<BoundingBox>) {
    let (src_w, src_h) = image.size();
    let (tgt_w, tgt_h) = output_size;

    let top = ((src_h as f64 - tgt_h as f64) / 2.0).round() as i64;
    let left = ((src_w as f64 - tgt_w as f64) / 2.0).round() as i64;

    crop(image, boxes, top, left, tgt_h, tgt_w)
}

/// Crops a region and resizes the result in one step.
#[allow(clippy::too_many_arguments)]
pub fn resized_crop<I: ImageOps>(
    image: &I,
    boxes: &[BoundingBox],
    top: i64,
    left: i64,
    height: u32,
    width: u32,
    size: (u32, u32),
) -> (I, Vec<BoundingBox>) {
    let (cropped, cropped_boxes) = crop(image, boxes, top, left, height, width);
    resize(&cropped, &cropped_boxes, size)
}

/// Normalizes every box against the image extent.
///
/// Fails if any input box is already relative; mixing spaces in one batch
/// is a caller bug, not a per-box condition to filter.
pub fn normalize_boxes<I: ImageOps>(
    image: &I,
    boxes: &[BoundingBox],
) -> Result<Vec<BoundingBox>, KittiboxError> {
    let size = image.size();
    boxes.iter().map(|b| b.normalize(size)).collect()
}

/// Flattens boxes into raw coordinate rows for tensor-style consumers.
///
/// The rows carry each box's stored mode untouched; callers wanting a
/// uniform convention convert before flattening.
pub fn box_rows(boxes: &[BoundingBox]) -> Vec<[f64; 4]> {
    boxes.iter().map(|b| b.coords()).collect()
}
